//! @ai:module:intent MathonGo performance report pipeline library
//! @ai:module:layer application
//! @ai:module:public_api analysis, config, document, error, feedback, pipeline, report, submission

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod feedback;
pub mod pipeline;
pub mod report;
pub mod submission;

pub use analysis::{
    aggregate_weak_areas, extract_overall, extract_questions, extract_subjects, ChapterAggregate,
    OverallMetrics, QuestionRecord, SubjectMetric,
};
pub use config::ReportConfig;
pub use document::{classify_line, DocumentRenderer, Line};
pub use error::{Error, Result};
pub use feedback::{compose_prompt, GroqClient, MockGenerator, RequestPacer, TextGenerator};
pub use pipeline::{ReportPipeline, RunSummary};
pub use report::{ArtifactStore, ScatterChartRenderer};
pub use submission::{RawSubmission, SubmissionLoader};
