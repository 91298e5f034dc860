// Evaluation stage: pure, deterministic aggregation of judge findings into
// one ordered coaching report. Filter → merge → resolve → rank → summarize;
// inputs are never mutated and the same inputs always produce the same
// report.

pub mod handlers;
pub mod render;

use std::collections::BTreeSet;

use crate::models::evaluation::{
    CoachingReport, EvaluationRecord, FeedbackItem, Polarity, Severity,
};
use crate::models::profile::JobProfile;
use crate::models::transcript::{Speaker, Transcript};

/// Aggregates judge evaluations over a transcript into a coaching report.
///
/// Accepts incomplete (cancelled) transcripts and any number of records,
/// including zero. Emits an empty-items report with an insufficient-evidence
/// summary rather than fabricating findings.
pub fn aggregate(
    profile: &JobProfile,
    transcript: &Transcript,
    records: &[EvaluationRecord],
) -> CoachingReport {
    let usable = filter_records(transcript, records);
    let groups = merge_groups(&usable);
    let mut ranked: Vec<(FeedbackItem, usize)> = groups
        .into_iter()
        .filter_map(|g| build_item(profile, g))
        .collect();

    // Severity desc, corroborating-judge count desc, then a stable
    // lexicographic tie-break; rank order is checkable independently of
    // the text.
    ranked.sort_by(|(a, a_judges), (b, b_judges)| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b_judges.cmp(a_judges))
            .then_with(|| a.title.cmp(&b.title))
    });
    let mut items: Vec<FeedbackItem> = ranked.into_iter().map(|(item, _)| item).collect();
    for (i, item) in items.iter_mut().enumerate() {
        item.rank = i + 1;
    }

    let summary = summarize(&items, transcript);
    CoachingReport {
        summary,
        items,
        degraded: !transcript.complete,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 1: filter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct UsableRecord {
    judge_id: String,
    range: (usize, usize),
    finding_text: String,
    severity: Severity,
    polarity: Polarity,
    /// Verified literal-substring quote, if the supplied one checked out.
    quote: Option<String>,
    tokens: BTreeSet<String>,
}

/// Drops records that cannot fairly ground candidate feedback: ranges that
/// reference no candidate turn (interviewer-authored material is never the
/// basis of candidate criticism) and ranges outside the transcript.
/// Unverifiable quotes are stripped here; the record may still corroborate a
/// group, but only verified quotes become evidence.
fn filter_records(transcript: &Transcript, records: &[EvaluationRecord]) -> Vec<UsableRecord> {
    let mut usable: Vec<UsableRecord> = records
        .iter()
        .filter_map(|r| {
            let (start, end) = r.turn_range();
            if start >= transcript.turns.len() {
                return None;
            }
            let end = end.min(transcript.turns.len() - 1);
            let references_candidate = transcript.turns[start..=end]
                .iter()
                .any(|t| t.speaker == Speaker::Candidate);
            if !references_candidate {
                return None;
            }
            // Criticism must quote the candidate, not the interviewer.
            let quote_ok = transcript.contains_quote(&r.evidence_quote)
                && (r.polarity == Polarity::Positive
                    || quote_spoken_by_candidate(transcript, &r.evidence_quote));
            Some(UsableRecord {
                judge_id: r.judge_id.clone(),
                range: (start, end),
                finding_text: r.finding_text.trim().to_string(),
                severity: r.severity,
                polarity: r.polarity,
                quote: quote_ok.then(|| r.evidence_quote.clone()),
                tokens: theme_tokens(&r.finding_text),
            })
        })
        .collect();

    // Deterministic processing order regardless of input order
    usable.sort_by(|a, b| {
        a.range
            .cmp(&b.range)
            .then_with(|| a.judge_id.cmp(&b.judge_id))
            .then_with(|| a.finding_text.cmp(&b.finding_text))
    });
    usable
}

fn quote_spoken_by_candidate(transcript: &Transcript, quote: &str) -> bool {
    transcript
        .turns
        .iter()
        .any(|t| t.speaker == Speaker::Candidate && t.text.contains(quote))
}

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "was", "were", "this", "that", "their", "they", "its", "are",
    "has", "have", "had", "but", "not", "did", "does", "answer", "candidate", "response",
];

/// Deterministic subject tagging: salient lowercase tokens of the finding
/// text. Explicit tokens, not free-text similarity, keep merge decisions
/// reproducible.
fn theme_tokens(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Step 2: dedup/merge
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Group {
    records: Vec<UsableRecord>,
    tokens: BTreeSet<String>,
    quotes: BTreeSet<String>,
    range: (usize, usize),
}

fn ranges_touch(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 <= b.1 + 1 && b.0 <= a.1 + 1
}

/// Groups records about the same subject: overlapping or adjacent turn
/// ranges plus either shared theme tokens or shared/nested evidence quotes.
fn merge_groups(records: &[UsableRecord]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let compatible: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| {
                if !ranges_touch(g.range, record.range) {
                    return false;
                }
                let token_overlap = g.tokens.intersection(&record.tokens).next().is_some();
                let quote_overlap = record.quote.as_ref().is_some_and(|q| {
                    g.quotes
                        .iter()
                        .any(|gq| gq.contains(q.as_str()) || q.contains(gq.as_str()))
                });
                token_overlap || quote_overlap
            })
            .map(|(i, _)| i)
            .collect();

        let mut merged = Group {
            records: vec![record.clone()],
            tokens: record.tokens.clone(),
            quotes: record.quote.iter().cloned().collect(),
            range: record.range,
        };
        // A record can bridge several existing groups; fold them all in.
        for i in compatible.into_iter().rev() {
            let g = groups.remove(i);
            merged.records.extend(g.records);
            merged.tokens.extend(g.tokens);
            merged.quotes.extend(g.quotes);
            merged.range = (merged.range.0.min(g.range.0), merged.range.1.max(g.range.1));
        }
        groups.push(merged);
    }

    groups
}

// ────────────────────────────────────────────────────────────────────────────
// Steps 3–5: conflict resolution, item construction, evidence requirement
// ────────────────────────────────────────────────────────────────────────────

/// Resolves mixed-polarity groups and renders one feedback item, paired
/// with its corroborating-judge count for ranking. Returns `None` when the
/// winning side has no verifiable quote; speculative items are dropped,
/// never emitted.
fn build_item(profile: &JobProfile, group: Group) -> Option<(FeedbackItem, usize)> {
    let polarity = resolve_polarity(&group);
    let winners: Vec<&UsableRecord> = group
        .records
        .iter()
        .filter(|r| r.polarity == polarity)
        .collect();

    let quotes: Vec<String> = winners
        .iter()
        .filter_map(|r| r.quote.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if quotes.is_empty() {
        return None;
    }

    let severity = winners.iter().map(|r| r.severity).max()?;

    // Title and rationale come from the contributing findings: the most
    // severe finding (smallest judge on ties) titles the item, all distinct
    // findings feed the rationale.
    let lead = winners
        .iter()
        .max_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| b.judge_id.cmp(&a.judge_id))
        })?;
    let rationale = winners
        .iter()
        .map(|r| r.finding_text.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join("; ");

    let judges = winners
        .iter()
        .map(|r| r.judge_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let item = FeedbackItem {
        title: title_case(&lead.finding_text),
        quotes,
        rationale,
        job_context: job_context(profile, &group.tokens),
        best_practices: best_practices(polarity).to_string(),
        polarity,
        severity,
        rank: 0, // assigned after the global sort
    };
    Some((item, judges))
}

/// Documented, deterministic conflict policy: the side with more verified
/// quotes wins; ties go to higher severity, then to the side containing the
/// lexicographically smallest judge_id. Never surfaced as a disagreement.
fn resolve_polarity(group: &Group) -> Polarity {
    let side = |p: Polarity| {
        let records: Vec<&UsableRecord> =
            group.records.iter().filter(|r| r.polarity == p).collect();
        let quotes = records.iter().filter(|r| r.quote.is_some()).count();
        let severity = records.iter().map(|r| r.severity).max();
        let min_judge = records.iter().map(|r| r.judge_id.clone()).min();
        (records.len(), quotes, severity, min_judge)
    };

    let (neg_n, neg_quotes, neg_sev, neg_judge) = side(Polarity::Negative);
    let (pos_n, pos_quotes, pos_sev, pos_judge) = side(Polarity::Positive);

    if neg_n == 0 {
        return Polarity::Positive;
    }
    if pos_n == 0 {
        return Polarity::Negative;
    }
    match neg_quotes
        .cmp(&pos_quotes)
        .then_with(|| neg_sev.cmp(&pos_sev))
    {
        std::cmp::Ordering::Greater => Polarity::Negative,
        std::cmp::Ordering::Less => Polarity::Positive,
        std::cmp::Ordering::Equal => {
            // Smallest judge_id wins the tie
            if neg_judge <= pos_judge {
                Polarity::Negative
            } else {
                Polarity::Positive
            }
        }
    }
}

fn title_case(finding: &str) -> String {
    let trimmed = finding.trim().trim_end_matches('.');
    let mut chars = trimmed.chars();
    let titled = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => return String::new(),
    };
    if titled.len() > 80 {
        format!("{}…", titled.chars().take(79).collect::<String>())
    } else {
        titled
    }
}

/// Ties the item back to the listing: the first requirement or expectation
/// line sharing a theme token, else a generic role reference.
fn job_context(profile: &JobProfile, tokens: &BTreeSet<String>) -> String {
    for line in profile
        .requirements
        .lines()
        .chain(profile.expectations_and_responsibilities.lines())
    {
        let line = line.trim().trim_start_matches(['-', '*']).trim();
        if line.is_empty() {
            continue;
        }
        let line_tokens = theme_tokens(line);
        if line_tokens.intersection(tokens).next().is_some() {
            return format!("Directly tied to the listed requirement: \"{line}\".");
        }
    }
    if profile.job_title.trim().is_empty() {
        "Relevant to the core expectations of this role.".to_string()
    } else {
        format!(
            "Relevant to performing well as a {} at {}.",
            profile.job_title.trim(),
            if profile.company_name.trim().is_empty() {
                "the hiring company"
            } else {
                profile.company_name.trim()
            }
        )
    }
}

/// Fixed coaching templates: patterns, not invented personal anecdotes.
fn best_practices(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Negative => {
            "Structure answers as Situation → Action → Result → Reflection. Anchor the \
             context in one sentence, name the actions you personally took, and quantify \
             the outcome (baseline → delta → timeframe) before closing with what you \
             learned."
        }
        Polarity::Positive => {
            "Keep this pattern: concrete context, clear personal ownership, and a \
             quantified result. Reuse the same structure when the real interviewer probes \
             adjacent competencies."
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 6: summary
// ────────────────────────────────────────────────────────────────────────────

/// Non-evidentiary synthesis of the ranked items' polarity balance. Adds no
/// claims beyond what the ranked items already state.
fn summarize(items: &[FeedbackItem], transcript: &Transcript) -> String {
    let mut summary = if items.is_empty() {
        "Insufficient evidence to produce feedback: no verifiable findings survived \
         filtering and merging."
            .to_string()
    } else {
        let strengths = items
            .iter()
            .filter(|i| i.polarity == Polarity::Positive)
            .count();
        let improvements = items.len() - strengths;
        let high = items
            .iter()
            .filter(|i| i.polarity == Polarity::Negative && i.severity == Severity::High)
            .count();
        let mut s = format!(
            "The evaluation surfaced {strengths} strength{} and {improvements} area{} to \
             improve, ordered by importance below.",
            if strengths == 1 { "" } else { "s" },
            if improvements == 1 { "" } else { "s" },
        );
        if high > 0 {
            s.push_str(&format!(
                " Prioritize the {high} high-severity item{} first.",
                if high == 1 { "" } else { "s" }
            ));
        }
        s
    };

    if !transcript.complete {
        summary.push_str(
            " Note: the interview ended before completion; this feedback covers the \
             available turns only.",
        );
    }
    summary
}
