//! Error type for loaders and input validation
//!
//! The model functions themselves are total and never return errors; only the
//! edges of the crate (files, user-supplied parameters) can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid life table: {0}")]
    InvalidLifeTable(String),

    #[error("invalid model constant `{name}`: {reason}")]
    InvalidConstant { name: &'static str, reason: String },

    #[error("invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, LevError>;
