//! @ai:module:intent Extract overall, subject and question metrics from a raw submission
//! @ai:module:layer application
//! @ai:module:public_api extract_overall, extract_subjects, extract_questions
//! @ai:module:stateless true

use crate::analysis::round2;
use crate::analysis::types::{OverallMetrics, QuestionRecord, SubjectMetric};
use crate::error::{Error, Result};
use crate::submission::raw::RawSubmission;

/// Fixed platform taxonomy: subject object-id to display name.
const SUBJECT_NAMES: &[(&str, &str)] = &[
    ("607018ee404ae53194e73d92", "Physics"),
    ("607018ee404ae53194e73d90", "Chemistry"),
    ("607018ee404ae53194e73d91", "Maths"),
];

/// @ai:intent Resolve a subject object id to its display name
/// @ai:effects pure
fn resolve_subject(oid: Option<&str>) -> &'static str {
    oid.and_then(|id| {
        SUBJECT_NAMES
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, name)| *name)
    })
    .unwrap_or("Unknown")
}

/// @ai:intent Extract the headline metrics for a submission
///
/// Every field here is required; these are the report's headline numbers and
/// silently defaulting them would hide an upstream export problem.
/// @ai:effects pure
pub fn extract_overall(raw: &RawSubmission) -> Result<OverallMetrics> {
    let total_time = raw
        .total_time_taken
        .ok_or(Error::MissingField("totalTimeTaken"))?;
    let total_score = raw
        .total_mark_scored
        .ok_or(Error::MissingField("totalMarkScored"))?;
    let total_attempted = raw
        .total_attempted
        .ok_or(Error::MissingField("totalAttempted"))?;
    let total_correct = raw
        .total_correct
        .ok_or(Error::MissingField("totalCorrect"))?;
    let accuracy = raw.accuracy.ok_or(Error::MissingField("accuracy"))?;

    Ok(OverallMetrics {
        total_time_min: round2(total_time / 60.0),
        total_score,
        total_attempted,
        total_correct,
        accuracy_pct: round2(accuracy),
    })
}

/// @ai:intent Extract per-subject metrics in submission order
///
/// An absent or empty subject list is a valid submission, not an error.
/// Unmapped subject ids resolve to "Unknown" because the platform taxonomy
/// evolves independently of this pipeline.
/// @ai:effects pure
pub fn extract_subjects(raw: &RawSubmission) -> Vec<SubjectMetric> {
    raw.subjects
        .iter()
        .map(|sub| SubjectMetric {
            subject: resolve_subject(sub.subject_id.as_ref().map(|id| id.oid.as_str()))
                .to_string(),
            marks_scored: sub.total_mark_scored,
            attempted: sub.total_attempted,
            correct: sub.total_correct,
            accuracy_pct: round2(sub.accuracy),
            time_taken_min: round2(sub.total_time_taken / 60.0),
        })
        .collect()
}

/// @ai:intent Flatten all answered questions across sections, in encounter order
///
/// Only the first listed chapter/topic/concept is kept. A question is correct
/// when any marked option is flagged correct. Never fails: every optional
/// sub-field has a stated default.
/// @ai:effects pure
pub fn extract_questions(raw: &RawSubmission) -> Vec<QuestionRecord> {
    raw.sections
        .iter()
        .flat_map(|section| section.questions.iter())
        .map(|q| {
            let info = &q.question_id;
            QuestionRecord {
                chapter: first_title(&info.chapters),
                topic: first_title(&info.topics),
                concept: first_title(&info.concepts),
                difficulty: info.level.clone().unwrap_or_else(|| "unknown".to_string()),
                correct: q.marked_options.iter().any(|opt| opt.is_correct),
                time_taken_sec: q.time_taken,
                status: q.status.clone().unwrap_or_else(|| "unknown".to_string()),
            }
        })
        .collect()
}

/// @ai:intent First listed title, else "Unknown"
/// @ai:effects pure
fn first_title(entries: &[crate::submission::raw::Titled]) -> String {
    entries
        .first()
        .map(|e| e.title.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}
