//! @ai:module:intent Define error types for the report pipeline
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all report pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("required field `{0}` missing from submission")]
    MissingField(&'static str),

    #[error("no {0} to analyze")]
    EmptyInput(&'static str),

    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("feedback generation failed: {0}")]
    GenerationFailed(String),

    #[error("table `{table}` has {columns} columns but {widths} column widths")]
    LayoutMismatch {
        table: String,
        columns: usize,
        widths: usize,
    },

    #[error("image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
