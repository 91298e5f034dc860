use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

/// Interview phases in conversation order. The derived `Ord` is the phase
/// ordering the transcript enforces: phases never regress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Opening,
    Calibration,
    CoreCompetencies,
    Logistics,
    CandidateQuestions,
    Closing,
    Terminal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub turn_index: usize,
    pub text: String,
    pub phase: Phase,
}

#[derive(Debug, Error, PartialEq)]
pub enum TranscriptError {
    #[error("turn_index {got} out of order (expected {expected})")]
    IndexOutOfOrder { expected: usize, got: usize },

    #[error("phase {got:?} regresses from {current:?}")]
    PhaseRegression { current: Phase, got: Phase },
}

/// Append-only conversation record. Indices are contiguous from 0 and the
/// phase is monotonically non-decreasing across turns. `complete` is false
/// for transcripts preserved from a cancelled session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub turns: Vec<Turn>,
    pub complete: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            complete: false,
        }
    }

    pub fn append(
        &mut self,
        speaker: Speaker,
        text: String,
        phase: Phase,
    ) -> Result<&Turn, TranscriptError> {
        let expected = self.turns.len();
        if let Some(last) = self.turns.last() {
            if phase < last.phase {
                return Err(TranscriptError::PhaseRegression {
                    current: last.phase,
                    got: phase,
                });
            }
        }
        self.turns.push(Turn {
            speaker,
            turn_index: expected,
            text,
            phase,
        });
        Ok(self.turns.last().unwrap())
    }

    pub fn turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// Literal-substring evidence check. Quotes that cannot be located in any
    /// turn are unverifiable and must be discarded by consumers.
    pub fn contains_quote(&self, quote: &str) -> bool {
        !quote.trim().is_empty() && self.turns.iter().any(|t| t.text.contains(quote))
    }

    pub fn turns_in_phase(&self, phase: Phase) -> usize {
        self.turns.iter().filter(|t| t.phase == phase).count()
    }

    pub fn last_phase(&self) -> Option<Phase> {
        self.turns.last().map(|t| t.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_contiguous_indices() {
        let mut t = Transcript::new();
        t.append(Speaker::Interviewer, "Hello!".into(), Phase::Opening)
            .unwrap();
        t.append(Speaker::Candidate, "Hi, I'm Sam.".into(), Phase::Opening)
            .unwrap();
        assert_eq!(t.turns[0].turn_index, 0);
        assert_eq!(t.turns[1].turn_index, 1);
    }

    #[test]
    fn test_phase_regression_rejected() {
        let mut t = Transcript::new();
        t.append(Speaker::Interviewer, "q".into(), Phase::Calibration)
            .unwrap();
        let err = t
            .append(Speaker::Interviewer, "q2".into(), Phase::Opening)
            .unwrap_err();
        assert_eq!(
            err,
            TranscriptError::PhaseRegression {
                current: Phase::Calibration,
                got: Phase::Opening,
            }
        );
        // Failed append must not mutate
        assert_eq!(t.turns.len(), 1);
    }

    #[test]
    fn test_phase_may_stay_or_advance() {
        let mut t = Transcript::new();
        t.append(Speaker::Interviewer, "a".into(), Phase::Opening)
            .unwrap();
        t.append(Speaker::Candidate, "b".into(), Phase::Opening)
            .unwrap();
        t.append(Speaker::Interviewer, "c".into(), Phase::Closing)
            .unwrap();
        assert_eq!(t.last_phase(), Some(Phase::Closing));
    }

    #[test]
    fn test_contains_quote_literal_substring_only() {
        let mut t = Transcript::new();
        t.append(
            Speaker::Candidate,
            "we improved it a lot".into(),
            Phase::CoreCompetencies,
        )
        .unwrap();
        assert!(t.contains_quote("improved it"));
        assert!(!t.contains_quote("improved it significantly"));
        assert!(!t.contains_quote("   "));
    }

    #[test]
    fn test_phase_ordering_matches_conversation_flow() {
        assert!(Phase::Opening < Phase::Calibration);
        assert!(Phase::Calibration < Phase::CoreCompetencies);
        assert!(Phase::CoreCompetencies < Phase::Logistics);
        assert!(Phase::Logistics < Phase::CandidateQuestions);
        assert!(Phase::CandidateQuestions < Phase::Closing);
        assert!(Phase::Closing < Phase::Terminal);
    }
}
