// Interview stage: a bounded, turn-based phone-screen state machine.
// Strictly sequential: at most one turn generation in flight per session,
// and the result is appended atomically before the next turn is accepted.

pub mod compliance;
pub mod coverage;
pub mod handlers;
pub mod phases;
pub mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::interview::compliance::Denylist;
use crate::interview::coverage::CompetencyTracker;
use crate::llm_client::{ChatMessage, LlmClient, LlmError};
use crate::models::context::InterviewContext;
use crate::models::transcript::{Phase, Speaker, Transcript, TranscriptError, Turn};

/// Seam over the generation capability so the state machine is testable with
/// scripted turns.
#[async_trait]
pub trait TurnGenerator: Send + Sync {
    async fn next_turn(
        &self,
        system: &str,
        directive: &str,
        history: &[ChatMessage],
        timeout: Duration,
    ) -> Result<String, LlmError>;
}

#[async_trait]
impl TurnGenerator for LlmClient {
    async fn next_turn(
        &self,
        system: &str,
        directive: &str,
        history: &[ChatMessage],
        timeout: Duration,
    ) -> Result<String, LlmError> {
        self.generate(system, directive, history, timeout).await
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is terminal and accepts no further turns")]
    Terminal,

    /// Bounded regeneration exhausted. Fatal to the session, surfaced to
    /// the caller, never silently degraded.
    #[error("could not produce a compliant interviewer turn after {attempts} attempts")]
    Compliance { attempts: u32 },

    #[error("turn generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// Calibration and candidate-question phases take a second turn only when
/// the previous answer was thin. Answers at or above this length move on.
const FOLLOWUP_ANSWER_LEN: usize = 240;

/// Explicit, serializable session state, passed through each call rather
/// than held as ambient server state, so sessions survive process restarts
/// and tests are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Assembled once from the InterviewContext at session start; never
    /// mutated per turn.
    pub system_prompt: String,
    pub include_logistics: bool,
    pub phase: Phase,
    pub transcript: Transcript,
    pub coverage: CompetencyTracker,
    pub cancelled: bool,
}

impl InterviewSession {
    pub fn new(context: &InterviewContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            system_prompt: prompts::interviewer_system_prompt(context),
            include_logistics: context.profile.has_logistics_constraints(),
            phase: Phase::Opening,
            transcript: Transcript::new(),
            coverage: CompetencyTracker::from_profile(&context.profile),
            cancelled: false,
        }
    }

    /// Records the candidate's answer (if any) and produces the next
    /// interviewer turn. Returns the appended turn.
    ///
    /// Generation failures are retried once; compliance violations trigger
    /// bounded regeneration and then fail the session.
    pub async fn advance(
        &mut self,
        candidate_answer: Option<&str>,
        generator: &dyn TurnGenerator,
        denylist: &Denylist,
        max_regen_attempts: u32,
        timeout: Duration,
    ) -> Result<Turn, SessionError> {
        if self.cancelled || self.phase == Phase::Terminal {
            return Err(SessionError::Terminal);
        }

        let answer = candidate_answer.map(str::trim).filter(|a| !a.is_empty());
        if let Some(answer) = answer {
            self.transcript
                .append(Speaker::Candidate, answer.to_string(), self.phase)?;
            self.coverage.note_answer(answer);
        }

        let phase = self.plan_phase(answer);
        let mut directive = phases::phase_directive(phase).to_string();
        if phase == Phase::CoreCompetencies {
            match self.coverage.next_target() {
                Some(target) => directive.push_str(&format!("\nTarget competency: {target}")),
                None => directive
                    .push_str("\nAll competencies probed — go deeper on the weakest evidence."),
            }
        }

        let history = self.history();
        let max_attempts = max_regen_attempts.max(1);
        for attempt in 0..max_attempts {
            let text = self
                .generate_with_retry(generator, &directive, &history, timeout)
                .await?;

            if let Some(pattern) = denylist.check(&text) {
                warn!(
                    session_id = %self.id,
                    "Interviewer turn matched denylist pattern '{pattern}' (attempt {})",
                    attempt + 1
                );
                directive.push_str(
                    "\nREGENERATE: your previous draft touched a protected characteristic. \
                     Produce a compliant turn that avoids it entirely.",
                );
                continue;
            }

            let turn = self
                .transcript
                .append(Speaker::Interviewer, text, phase)?
                .clone();
            self.phase = phase;
            if phase == Phase::Closing {
                self.phase = Phase::Terminal;
                self.transcript.complete = true;
            }
            return Ok(turn);
        }

        Err(SessionError::Compliance {
            attempts: max_attempts,
        })
    }

    /// Cancels the session mid-interview. The transcript so far is preserved
    /// and stays marked incomplete; further turns are rejected.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// One retry on capability failure, then surface the error.
    async fn generate_with_retry(
        &self,
        generator: &dyn TurnGenerator,
        directive: &str,
        history: &[ChatMessage],
        timeout: Duration,
    ) -> Result<String, SessionError> {
        match generator
            .next_turn(&self.system_prompt, directive, history, timeout)
            .await
        {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(session_id = %self.id, "Turn generation failed, retrying once: {e}");
                generator
                    .next_turn(&self.system_prompt, directive, history, timeout)
                    .await
                    .map_err(SessionError::Generation)
            }
        }
    }

    /// Decides which phase the next interviewer turn belongs to: stay until
    /// the minimum is met, advance at the maximum, and in between advance
    /// once the phase's purpose is served (breadth for core competencies, a
    /// substantive answer elsewhere).
    fn plan_phase(&self, last_answer: Option<&str>) -> Phase {
        let current = self.phase;
        let bounds = phases::bounds(current);
        let done = self.interviewer_turns_in(current);

        if done < bounds.min {
            return current;
        }
        let next = phases::next_phase(current, self.include_logistics);
        if done >= bounds.max {
            return next;
        }
        match current {
            Phase::CoreCompetencies => {
                if self.coverage.breadth_satisfied() {
                    next
                } else {
                    current
                }
            }
            Phase::Calibration | Phase::CandidateQuestions => {
                let thin = last_answer.map(|a| a.len() < FOLLOWUP_ANSWER_LEN).unwrap_or(false);
                if thin {
                    current
                } else {
                    next
                }
            }
            _ => next,
        }
    }

    fn interviewer_turns_in(&self, phase: Phase) -> usize {
        self.transcript
            .turns
            .iter()
            .filter(|t| t.phase == phase && t.speaker == Speaker::Interviewer)
            .count()
    }

    /// Transcript as chat history: interviewer turns map to the assistant
    /// role, candidate turns to the user role.
    fn history(&self) -> Vec<ChatMessage> {
        self.transcript
            .turns
            .iter()
            .map(|t| match t.speaker {
                Speaker::Interviewer => ChatMessage::assistant(t.text.clone()),
                Speaker::Candidate => ChatMessage::user(t.text.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobProfile;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn context() -> InterviewContext {
        InterviewContext {
            profile: JobProfile {
                job_title: "Staff Engineer".to_string(),
                company_name: "Beanhouse".to_string(),
                job_location: "Austin, TX".to_string(),
                requirements: "- Rust\n- Distributed systems".to_string(),
                expectations_and_responsibilities: "- Mentor engineers\n- Run incident reviews"
                    .to_string(),
                ..Default::default()
            },
            research_reports: BTreeMap::new(),
            interview_guide: "### 1) Role Snapshot\nBackend infrastructure role.".to_string(),
            degraded: true,
        }
    }

    /// Context with no logistics signal and no research at all.
    fn bare_context() -> InterviewContext {
        InterviewContext {
            profile: JobProfile {
                job_title: "Staff Engineer".to_string(),
                company_name: "Beanhouse".to_string(),
                requirements: "- Rust".to_string(),
                expectations_and_responsibilities: "- Mentor engineers".to_string(),
                ..Default::default()
            },
            research_reports: BTreeMap::new(),
            interview_guide: String::new(),
            degraded: true,
        }
    }

    struct CompliantGenerator {
        calls: AtomicUsize,
    }

    impl CompliantGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TurnGenerator for CompliantGenerator {
        async fn next_turn(
            &self,
            _system: &str,
            directive: &str,
            _history: &[ChatMessage],
            _timeout: Duration,
        ) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("({n}) Question following: {}", directive.lines().next().unwrap_or("")))
        }
    }

    /// Violates the denylist for the first `violations` calls, then complies.
    struct ViolatingGenerator {
        violations: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TurnGenerator for ViolatingGenerator {
        async fn next_turn(
            &self,
            _system: &str,
            _directive: &str,
            _history: &[ChatMessage],
            _timeout: Duration,
        ) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.violations {
                Ok("By the way, how old are you?".to_string())
            } else {
                Ok("Tell me about a recent project you led.".to_string())
            }
        }
    }

    /// Fails the first `failures` calls with a capability error.
    struct FlakyGenerator {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TurnGenerator for FlakyGenerator {
        async fn next_turn(
            &self,
            _system: &str,
            _directive: &str,
            _history: &[ChatMessage],
            _timeout: Duration,
        ) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(LlmError::EmptyContent)
            } else {
                Ok("What drew you to this role?".to_string())
            }
        }
    }

    async fn run_to_terminal(
        session: &mut InterviewSession,
        generator: &dyn TurnGenerator,
    ) -> Vec<Turn> {
        let denylist = Denylist::default();
        let mut turns = Vec::new();
        let mut answer: Option<String> = None;
        for _ in 0..50 {
            match session
                .advance(answer.as_deref(), generator, &denylist, 3, TIMEOUT)
                .await
            {
                Ok(turn) => {
                    turns.push(turn);
                    answer = Some("we improved it a lot".to_string());
                }
                Err(SessionError::Terminal) => break,
                Err(e) => panic!("unexpected session error: {e}"),
            }
        }
        turns
    }

    #[tokio::test]
    async fn test_full_session_reaches_terminal_in_order() {
        let mut session = InterviewSession::new(&context());
        let generator = CompliantGenerator::new();
        let turns = run_to_terminal(&mut session, &generator).await;

        assert_eq!(session.phase, Phase::Terminal);
        assert!(session.transcript.complete);

        // Phases never regress across the transcript
        for pair in session.transcript.turns.windows(2) {
            assert!(pair[0].phase <= pair[1].phase);
        }

        // Exact budgets for one-turn phases
        let count = |p: Phase| turns.iter().filter(|t| t.phase == p).count();
        assert_eq!(count(Phase::Opening), 1);
        assert_eq!(count(Phase::Closing), 1);
        assert_eq!(count(Phase::Logistics), 1); // Austin location constrains
        let core = count(Phase::CoreCompetencies);
        assert!((6..=8).contains(&core), "core turns = {core}");
        assert!((1..=2).contains(&count(Phase::Calibration)));
        assert!((1..=2).contains(&count(Phase::CandidateQuestions)));
    }

    #[tokio::test]
    async fn test_terminal_session_accepts_no_turns() {
        let mut session = InterviewSession::new(&context());
        let generator = CompliantGenerator::new();
        run_to_terminal(&mut session, &generator).await;

        let err = session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Terminal));
    }

    #[tokio::test]
    async fn test_zero_research_still_reaches_terminal() {
        let mut session = InterviewSession::new(&bare_context());
        let generator = CompliantGenerator::new();
        run_to_terminal(&mut session, &generator).await;
        assert_eq!(session.phase, Phase::Terminal);
        // No logistics signal → phase skipped entirely
        assert_eq!(session.transcript.turns_in_phase(Phase::Logistics), 0);
    }

    #[tokio::test]
    async fn test_violating_turn_is_regenerated() {
        let mut session = InterviewSession::new(&context());
        let generator = ViolatingGenerator {
            violations: 1,
            calls: AtomicUsize::new(0),
        };
        let turn = session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap();
        assert!(!turn.text.contains("how old"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unresolvable_violation_fails_session() {
        let mut session = InterviewSession::new(&context());
        let generator = ViolatingGenerator {
            violations: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let err = session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Compliance { attempts: 3 }));
        // Nothing appended to the transcript
        assert!(session.transcript.turns.is_empty());
    }

    #[tokio::test]
    async fn test_generation_error_retried_once() {
        let mut session = InterviewSession::new(&context());
        let generator = FlakyGenerator {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_generation_error_surfaces() {
        let mut session = InterviewSession::new(&context());
        let generator = FlakyGenerator {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let err = session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Generation(_)));
        // One retry, not more
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancellation_preserves_incomplete_transcript() {
        let mut session = InterviewSession::new(&context());
        let generator = CompliantGenerator::new();
        session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap();
        session
            .advance(
                Some("Hi, I'm Sam, ready to go."),
                &generator,
                &Denylist::default(),
                3,
                TIMEOUT,
            )
            .await
            .unwrap();

        session.cancel();
        assert_eq!(session.transcript.turns.len(), 3);
        assert!(!session.transcript.complete);
        let err = session
            .advance(Some("more"), &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Terminal));
        assert_eq!(session.transcript.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_session_state_round_trips_through_serde() {
        let mut session = InterviewSession::new(&context());
        let generator = CompliantGenerator::new();
        session
            .advance(None, &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let mut restored: InterviewSession = serde_json::from_str(&json).unwrap();
        restored
            .advance(Some("Hello!"), &generator, &Denylist::default(), 3, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(restored.transcript.turns.len(), 3);
    }
}
