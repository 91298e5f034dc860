use serde::{Deserialize, Serialize};

/// The canonical job-listing record. Sole input contract for the pipeline;
/// downstream stages derive everything from it and never re-solicit fields.
///
/// All fields are strings; an empty string is a valid value. Absence is
/// signaled by omission in JSON (serde default), never by null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobProfile {
    pub job_title: String,
    pub job_location: String,
    pub job_description: String,
    pub work_schedule: String,
    pub company_name: String,
    pub expectations_and_responsibilities: String,
    pub requirements: String,
}

impl JobProfile {
    /// True when schedule or location carry content that could constrain
    /// feasibility. Gates the optional Logistics interview phase.
    pub fn has_logistics_constraints(&self) -> bool {
        !self.work_schedule.trim().is_empty() || !self.job_location.trim().is_empty()
    }
}
