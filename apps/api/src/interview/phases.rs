//! Turn budgets and ordering for the interview state machine.
//!
//! Bounds count interviewer turns. Logistics is the only optional phase;
//! whether it is included is fixed at session start from the profile.

use crate::models::transcript::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    pub min: usize,
    pub max: usize,
}

pub fn bounds(phase: Phase) -> PhaseBounds {
    match phase {
        Phase::Opening => PhaseBounds { min: 1, max: 1 },
        Phase::Calibration => PhaseBounds { min: 1, max: 2 },
        Phase::CoreCompetencies => PhaseBounds { min: 6, max: 8 },
        Phase::Logistics => PhaseBounds { min: 1, max: 1 },
        Phase::CandidateQuestions => PhaseBounds { min: 1, max: 2 },
        Phase::Closing => PhaseBounds { min: 1, max: 1 },
        Phase::Terminal => PhaseBounds { min: 0, max: 0 },
    }
}

/// The phase that follows `phase`, skipping Logistics when the session does
/// not include it.
pub fn next_phase(phase: Phase, include_logistics: bool) -> Phase {
    match phase {
        Phase::Opening => Phase::Calibration,
        Phase::Calibration => Phase::CoreCompetencies,
        Phase::CoreCompetencies => {
            if include_logistics {
                Phase::Logistics
            } else {
                Phase::CandidateQuestions
            }
        }
        Phase::Logistics => Phase::CandidateQuestions,
        Phase::CandidateQuestions => Phase::Closing,
        Phase::Closing | Phase::Terminal => Phase::Terminal,
    }
}

/// One-line directive woven into the per-turn context so the model knows
/// which phase the next question belongs to.
pub fn phase_directive(phase: Phase) -> &'static str {
    match phase {
        Phase::Opening => "Open the interview: greet, get the candidate's name, confirm readiness.",
        Phase::Calibration => {
            "Calibrate: ask briefly about background and motivation for this role and company."
        }
        Phase::CoreCompetencies => {
            "Ask one behavioral or situational question probing the target competency. \
             Elicit STAR/SAO evidence; one clear question at a time."
        }
        Phase::Logistics => {
            "Ask one concise, neutral logistics question about schedule or location feasibility."
        }
        Phase::CandidateQuestions => "Invite the candidate to ask a question, and answer it briefly.",
        Phase::Closing => "Close the interview: thank the candidate and wrap up politely.",
        Phase::Terminal => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_one_turn_phases() {
        assert_eq!(bounds(Phase::Opening), PhaseBounds { min: 1, max: 1 });
        assert_eq!(bounds(Phase::Closing), PhaseBounds { min: 1, max: 1 });
    }

    #[test]
    fn test_core_competencies_budget() {
        let b = bounds(Phase::CoreCompetencies);
        assert_eq!(b.min, 6);
        assert_eq!(b.max, 8);
    }

    #[test]
    fn test_next_phase_skips_logistics_when_excluded() {
        assert_eq!(
            next_phase(Phase::CoreCompetencies, false),
            Phase::CandidateQuestions
        );
        assert_eq!(next_phase(Phase::CoreCompetencies, true), Phase::Logistics);
    }

    #[test]
    fn test_phase_chain_terminates() {
        let mut phase = Phase::Opening;
        for _ in 0..10 {
            phase = next_phase(phase, true);
        }
        assert_eq!(phase, Phase::Terminal);
        assert_eq!(next_phase(Phase::Terminal, true), Phase::Terminal);
    }

    #[test]
    fn test_next_phase_never_regresses() {
        for phase in [
            Phase::Opening,
            Phase::Calibration,
            Phase::CoreCompetencies,
            Phase::Logistics,
            Phase::CandidateQuestions,
            Phase::Closing,
        ] {
            for logistics in [true, false] {
                assert!(next_phase(phase, logistics) > phase, "{phase:?}");
            }
        }
    }
}
