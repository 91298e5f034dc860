//! Competency coverage tracking for the CoreCompetencies phase.
//!
//! Competencies are extracted deterministically from the listing's
//! requirements and expectations so that question selection maximizes
//! breadth instead of re-probing one area. A competency answered with a
//! complete Situation/Action/Result/Reflection answer is marked evidenced
//! and never re-probed.

use serde::{Deserialize, Serialize};

use crate::models::profile::JobProfile;

/// Cap on tracked competencies. The core phase has at most 8 turns to spend,
/// so breadth beats exhaustiveness.
const MAX_COMPETENCIES: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competency {
    pub label: String,
    pub probed: bool,
    pub evidenced: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetencyTracker {
    pub competencies: Vec<Competency>,
    /// Index of the competency the most recent question targeted.
    last_target: Option<usize>,
}

impl CompetencyTracker {
    pub fn from_profile(profile: &JobProfile) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for line in profile
            .requirements
            .lines()
            .chain(profile.expectations_and_responsibilities.lines())
            .flat_map(|l| l.split(';'))
        {
            let label = line.trim().trim_start_matches(['-', '*', '•']).trim();
            if label.len() < 3 {
                continue;
            }
            let normalized = label.to_lowercase();
            if labels.iter().any(|l: &String| l.to_lowercase() == normalized) {
                continue;
            }
            labels.push(label.to_string());
            if labels.len() == MAX_COMPETENCIES {
                break;
            }
        }
        if labels.is_empty() {
            // A listing with no parsed competencies still gets a broad probe
            labels.push("Relevant experience and role fit".to_string());
        }
        Self {
            competencies: labels
                .into_iter()
                .map(|label| Competency {
                    label,
                    probed: false,
                    evidenced: false,
                })
                .collect(),
            last_target: None,
        }
    }

    /// Next competency to probe: first never-probed one, else the first
    /// probed-but-unevidenced one. Evidenced competencies are skipped.
    pub fn next_target(&mut self) -> Option<String> {
        let idx = self
            .competencies
            .iter()
            .position(|c| !c.probed)
            .or_else(|| self.competencies.iter().position(|c| !c.evidenced))?;
        self.competencies[idx].probed = true;
        self.last_target = Some(idx);
        Some(self.competencies[idx].label.clone())
    }

    /// Scores the candidate's answer against the last-probed competency.
    pub fn note_answer(&mut self, answer: &str) {
        if let Some(idx) = self.last_target {
            if answer_is_star_complete(answer) {
                self.competencies[idx].evidenced = true;
            }
        }
    }

    /// Breadth goal: every tracked competency has been probed at least once.
    pub fn breadth_satisfied(&self) -> bool {
        self.competencies.iter().all(|c| c.probed)
    }
}

/// Heuristic completeness check for a STAR/SAO answer: the four evidence
/// dimensions each have a marker vocabulary; an answer covering at least
/// three (including a result) counts as complete.
pub fn answer_is_star_complete(answer: &str) -> bool {
    let text = answer.to_lowercase();

    let situation = ["when ", "while ", "at the time", "we were", "we had", "my team", "the project"];
    let action = ["i led", "i built", "i decided", "i designed", "i proposed", "i organized", "my role", "i took"];
    let result = ["result", "increased", "reduced", "improved", "saved", "grew", "cut ", "%", "shipped"];
    let reflection = ["learned", "in hindsight", "next time", "differently", "takeaway", "since then"];

    let has = |markers: &[&str]| markers.iter().any(|m| text.contains(m));

    let mut dims = 0;
    if has(&situation) {
        dims += 1;
    }
    if has(&action) {
        dims += 1;
    }
    if has(&reflection) {
        dims += 1;
    }
    // A quantified/explicit outcome is non-negotiable for completeness
    has(&result) && dims >= 2
}
