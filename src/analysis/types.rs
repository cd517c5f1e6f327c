//! @ai:module:intent Metric types derived from a student submission
//! @ai:module:layer domain
//! @ai:module:public_api OverallMetrics, SubjectMetric, QuestionRecord, ChapterAggregate
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Headline numbers for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_time_min: f64,
    pub total_score: f64,
    pub total_attempted: u32,
    pub total_correct: u32,
    pub accuracy_pct: f64,
}

/// @ai:intent Per-subject rollup with the resolved subject name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectMetric {
    pub subject: String,
    pub marks_scored: f64,
    pub attempted: u32,
    pub correct: u32,
    pub accuracy_pct: f64,
    pub time_taken_min: f64,
}

/// @ai:intent One answered question flattened across all sections
///
/// Only the first listed chapter/topic/concept is retained; questions with
/// no tagged chapter are binned under "Unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub chapter: String,
    pub topic: String,
    pub concept: String,
    pub difficulty: String,
    pub correct: bool,
    pub time_taken_sec: f64,
    pub status: String,
}

/// @ai:intent Chapter-level aggregate over the question records
///
/// Invariant: `total >= 1` — chapters with no questions never produce an
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterAggregate {
    pub chapter: String,
    pub correct: u32,
    pub total: u32,
    pub total_time_sec: f64,
    pub accuracy_pct: f64,
    pub avg_time_sec: f64,
}
