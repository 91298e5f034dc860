// Markdown rendering of a coaching report. Pure formatting; every fact in
// the output already exists in the report.

use crate::models::evaluation::{CoachingReport, Polarity};

/// Renders the report as Markdown with a summary section followed by the
/// ranked feedback items.
pub fn render_markdown(report: &CoachingReport) -> String {
    let mut out = String::new();
    out.push_str("# Performance Summary\n\n");
    out.push_str(&report.summary);
    out.push_str("\n\n# Aggregated Feedback\n");

    for item in &report.items {
        let marker = match item.polarity {
            Polarity::Positive => "Strength",
            Polarity::Negative => "Improvement area",
        };
        out.push_str(&format!(
            "\n## {}. {} ({marker}, {:?} severity)\n\n",
            item.rank, item.title, item.severity
        ));
        out.push_str("**Direct quotes:**\n\n");
        for quote in &item.quotes {
            out.push_str(&format!("> \"{quote}\"\n"));
        }
        out.push_str(&format!("\n**Evaluation:** {}\n", item.rationale));
        out.push_str(&format!("\n**Job context:** {}\n", item.job_context));
        out.push_str(&format!("\n**Best practices:** {}\n", item.best_practices));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{FeedbackItem, Severity};

    #[test]
    fn test_empty_report_renders_headings_and_summary() {
        let report = CoachingReport {
            summary: "Insufficient evidence to produce feedback.".to_string(),
            items: vec![],
            degraded: false,
        };
        let md = render_markdown(&report);
        assert!(md.starts_with("# Performance Summary"));
        assert!(md.contains("# Aggregated Feedback"));
        assert!(md.contains("Insufficient evidence"));
    }

    #[test]
    fn test_items_render_in_rank_order_with_quotes() {
        let item = |rank: usize, title: &str| FeedbackItem {
            title: title.to_string(),
            quotes: vec![format!("quote for {title}")],
            rationale: "rationale".to_string(),
            job_context: "context".to_string(),
            best_practices: "practices".to_string(),
            polarity: Polarity::Negative,
            severity: Severity::High,
            rank,
        };
        let report = CoachingReport {
            summary: "Two areas to improve.".to_string(),
            items: vec![item(1, "First"), item(2, "Second")],
            degraded: false,
        };
        let md = render_markdown(&report);
        let first = md.find("## 1. First").unwrap();
        let second = md.find("## 2. Second").unwrap();
        assert!(first < second);
        assert!(md.contains("> \"quote for First\""));
        assert!(md.contains("**Best practices:**"));
    }
}
