//! Per-kind research task definitions: deterministic query templates, the
//! fixed section scaffolds, and the anti-fabrication scrub applied to every
//! report before it enters the interview context.

use crate::models::context::ResearchKind;
use crate::models::profile::JobProfile;

/// Builds the web search query for one research kind. Strategy uses the
/// company only; the other three use company + title. Derivation is
/// deterministic: same profile, same query.
pub fn build_query(kind: ResearchKind, profile: &JobProfile) -> String {
    let company = profile.company_name.trim();
    let title = profile.job_title.trim();
    match kind {
        ResearchKind::Strategy => format!(
            r#"site:{company}.com OR ("{company}" profile OR overview OR mission OR leadership OR strategy OR values OR "business model" OR "products and services" OR competitors OR "market position") latest news OR press release OR annual report OR funding OR growth OR acquisitions"#
        ),
        ResearchKind::RoleSuccess => format!(
            r#""{company}" "{title}" job description OR responsibilities OR duties OR "what you'll do" OR "skills required" OR qualifications OR "success metrics" OR KPI OR "performance expectations""#
        ),
        ResearchKind::TeamCulture => format!(
            r#""{company}" "{title}" culture OR "work environment" OR "values in action" OR "team structure" OR "cross-functional collaboration" OR "engineering culture" OR "employee experience" OR "how we work" OR "inside {company}""#
        ),
        ResearchKind::DomainKnowledge => format!(
            r#"("{company}" "{title}") OR intitle:"{title}" (tools OR stack OR frameworks OR "best practices" OR "industry standards" OR "role challenges" OR "key metrics" OR KPIs OR glossary OR workflow OR "case study" OR playbook OR "operating model" OR "day in the life") -intitle:job -intitle:jobs -intitle:career"#
        ),
    }
}

/// Expected document title for one kind. A report that does not open with
/// this exact heading is rejected as malformed.
pub fn report_title(kind: ResearchKind) -> &'static str {
    match kind {
        ResearchKind::Strategy => "# Company Context & Strategy",
        ResearchKind::RoleSuccess => "# Role Definition & Success Profile",
        ResearchKind::TeamCulture => "# Team Dynamics, Process, and Culture",
        ResearchKind::DomainKnowledge => "# Function-Specific and Domain Knowledge",
    }
}

/// The closed, ordered set of section headings a kind's report may contain.
pub fn section_headings(kind: ResearchKind) -> &'static [&'static str] {
    match kind {
        ResearchKind::Strategy => &[
            "## Identity & Overview",
            "## Strategy & Positioning",
            "## Market & External Landscape",
            "## Recent Developments",
        ],
        ResearchKind::RoleSuccess => &[
            "## Core Role Information",
            "## Responsibilities & Deliverables",
            "## Skills & Competencies",
            "## Role Evolution & Impact",
        ],
        ResearchKind::TeamCulture => &[
            "## Team Structure",
            "## Process & Workflow",
            "## Culture & Work Environment",
        ],
        ResearchKind::DomainKnowledge => &[
            "## Functional Overview",
            "## Tools, Frameworks, and Practices",
            "## Industry / Domain Concepts",
            "## Challenges and Opportunities",
        ],
    }
}

/// Placeholder values a model may emit instead of omitting a field. Bullets
/// whose value is one of these carry no sourced information.
const PLACEHOLDER_VALUES: [&str; 6] = ["unknown", "n/a", "na", "none", "not found", "tbd"];

fn bullet_has_value(line: &str) -> bool {
    let body = line
        .trim_start()
        .trim_start_matches(['-', '*'])
        .trim_start();
    if body.is_empty() {
        return false;
    }
    // "Field Name:" with nothing after the colon is a scaffold echo, and
    // "Field Name: Unknown" is a fabrication stand-in. Both are value-less.
    let value = match body.split_once(':') {
        Some((_, v)) => v.trim(),
        None => body,
    };
    if value.is_empty() {
        return false;
    }
    !PLACEHOLDER_VALUES.contains(&value.trim_end_matches('.').to_lowercase().as_str())
}

/// Enforces the anti-fabrication invariant mechanically, independent of the
/// prompt: drops value-less bullets, drops sections left without content,
/// drops sections outside the kind's scaffold. Returns `None` when nothing
/// sourced survives; the caller records the kind as absent.
pub fn scrub_report(kind: ResearchKind, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.starts_with(report_title(kind)) {
        return None;
    }
    let allowed = section_headings(kind);

    let mut out: Vec<String> = vec![report_title(kind).to_string()];
    let mut sections_kept = 0usize;

    let mut current_heading: Option<&str> = None;
    let mut current_body: Vec<String> = Vec::new();

    let flush =
        |heading: Option<&str>, body: &mut Vec<String>, out: &mut Vec<String>, kept: &mut usize| {
            if let Some(h) = heading {
                if !body.is_empty() {
                    out.push(String::new());
                    out.push(h.to_string());
                    out.append(body);
                    *kept += 1;
                }
            }
            body.clear();
        };

    for line in raw.lines().skip(1) {
        let trimmed = line.trim_end();
        if trimmed.trim_start().starts_with("## ") {
            flush(current_heading, &mut current_body, &mut out, &mut sections_kept);
            current_heading = allowed
                .iter()
                .copied()
                .find(|h| *h == trimmed.trim_start());
            // Unknown heading: current_heading = None, its body is dropped.
            continue;
        }
        if current_heading.is_none() {
            continue;
        }
        if trimmed.trim().is_empty() {
            continue;
        }
        let is_bullet = trimmed.trim_start().starts_with('-') || trimmed.trim_start().starts_with('*');
        if is_bullet && !bullet_has_value(trimmed) {
            continue;
        }
        current_body.push(trimmed.to_string());
    }
    flush(current_heading, &mut current_body, &mut out, &mut sections_kept);

    if sections_kept == 0 {
        return None;
    }
    Some(out.join("\n"))
}
