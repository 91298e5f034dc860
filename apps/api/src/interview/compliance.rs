//! Protected-characteristic filter applied to every generated interviewer
//! turn before it reaches the transcript. A violating turn is regenerated; a
//! session that cannot produce a compliant turn within the configured number
//! of attempts fails loudly.

/// Built-in patterns covering the protected characteristics an interviewer
/// must never probe: age, family status, religion, health, origin, and
/// similar. Matched case-insensitively as substrings. Extend via the
/// DENYLIST_EXTRA config, not by editing call sites.
const BUILTIN_PATTERNS: &[&str] = &[
    // Age. Kept specific: a bare "your age" would also match "your agenda"
    // and similar benign phrasing.
    "how old are you",
    "what is your age",
    "year were you born",
    "date of birth",
    // Family and marital status
    "are you married",
    "marital status",
    "do you have children",
    "have kids",
    "planning to have children",
    "are you pregnant",
    "family status",
    "childcare",
    // Religion
    "your religion",
    "religious beliefs",
    "attend church",
    "observe any religious",
    // Health and disability
    "health condition",
    "medical condition",
    "any disabilities",
    "are you disabled",
    "mental health",
    "taking medication",
    // Origin and citizenship
    "national origin",
    "where are you from originally",
    "are you a citizen",
    "citizenship status",
    "native language",
    // Orientation, identity, politics
    "sexual orientation",
    "gender identity",
    "political affiliation",
    "who did you vote",
];

#[derive(Debug, Clone)]
pub struct Denylist {
    patterns: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

impl Denylist {
    pub fn with_extra(extra: &[String]) -> Self {
        let mut patterns: Vec<String> =
            BUILTIN_PATTERNS.iter().map(|p| p.to_string()).collect();
        patterns.extend(
            extra
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
        );
        Self { patterns }
    }

    /// Returns the first matched pattern, if any. `None` means compliant.
    pub fn check(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.patterns
            .iter()
            .find(|p| lower.contains(p.as_str()))
            .map(|p| p.as_str())
    }
}
