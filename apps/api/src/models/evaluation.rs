use serde::{Deserialize, Serialize};

/// Severity of a judge finding. Derived `Ord` is used when merging
/// (max severity wins) and ranking (higher severity first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

/// One finding from one judge about a turn (or small turn range) of the
/// interview. `evidence_quote` must be a literal substring of the transcript
/// it references; the aggregator verifies this, it is never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub judge_id: String,
    pub turn_start: usize,
    /// Inclusive. Single-turn findings set turn_end == turn_start.
    pub turn_end: usize,
    pub finding_text: String,
    pub severity: Severity,
    pub polarity: Polarity,
    pub evidence_quote: String,
}

impl EvaluationRecord {
    pub fn turn_range(&self) -> (usize, usize) {
        (
            self.turn_start.min(self.turn_end),
            self.turn_start.max(self.turn_end),
        )
    }
}

/// One merged, ranked entry of the coaching report. Ranks are strictly
/// increasing from 1, most important first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub title: String,
    pub quotes: Vec<String>,
    pub rationale: String,
    pub job_context: String,
    pub best_practices: String,
    pub polarity: Polarity,
    pub severity: Severity,
    pub rank: usize,
}

/// Final aggregation output. Created once per run, never mutated afterwards.
/// An empty `items` list with an insufficient-evidence summary is a valid
/// result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingReport {
    pub summary: String,
    pub items: Vec<FeedbackItem>,
    /// True when the report was built from an incomplete (cancelled)
    /// transcript. The summary states this too.
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_turn_range_normalizes_reversed_bounds() {
        let record = EvaluationRecord {
            judge_id: "content".to_string(),
            turn_start: 5,
            turn_end: 3,
            finding_text: "x".to_string(),
            severity: Severity::Low,
            polarity: Polarity::Negative,
            evidence_quote: "q".to_string(),
        };
        assert_eq!(record.turn_range(), (3, 5));
    }

    #[test]
    fn test_severity_serde_snake_case() {
        let s: Severity = serde_json::from_str(r#""high""#).unwrap();
        assert_eq!(s, Severity::High);
        assert_eq!(serde_json::to_string(&Polarity::Negative).unwrap(), r#""negative""#);
    }
}
