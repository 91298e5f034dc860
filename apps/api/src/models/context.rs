use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::profile::JobProfile;

/// The four research agents. A closed set: each kind owns a fixed query
/// template and Markdown section scaffold (see `research::tasks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchKind {
    Strategy,
    RoleSuccess,
    TeamCulture,
    DomainKnowledge,
}

impl ResearchKind {
    pub const ALL: [ResearchKind; 4] = [
        ResearchKind::Strategy,
        ResearchKind::RoleSuccess,
        ResearchKind::TeamCulture,
        ResearchKind::DomainKnowledge,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResearchKind::Strategy => "strategy",
            ResearchKind::RoleSuccess => "role_success",
            ResearchKind::TeamCulture => "team_culture",
            ResearchKind::DomainKnowledge => "domain_knowledge",
        }
    }
}

/// Everything the interview stage needs, assembled by the research
/// coordinator and handed over read-only.
///
/// `research_reports` is keyed only by kinds that produced a usable report;
/// 0 to 4 entries are all valid. `degraded` is true when any kind is absent
/// so downstream output can say so rather than present partial context as
/// complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewContext {
    pub profile: JobProfile,
    pub research_reports: BTreeMap<ResearchKind, String>,
    pub interview_guide: String,
    pub degraded: bool,
}

impl InterviewContext {
    pub fn missing_kinds(&self) -> Vec<ResearchKind> {
        ResearchKind::ALL
            .iter()
            .copied()
            .filter(|k| !self.research_reports.contains_key(k))
            .collect()
    }
}
