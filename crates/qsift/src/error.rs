//! Error types for the qsift crate.
//!
//! Translation itself never fails; these cover configuration and the
//! optional compilation of regex literals.

use thiserror::Error;

/// Errors raised outside the (total) translation path.
#[derive(Debug, Error)]
pub enum QsiftError {
    /// A regex literal from the query is not a valid pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A keyword was renamed to the empty string.
    #[error("keyword '{keyword}' cannot be renamed to an empty name")]
    EmptyKeyword { keyword: &'static str },

    /// Two keywords were renamed to the same parameter name.
    #[error("parameter name '{name}' is used by more than one keyword")]
    DuplicateKeyword { name: String },

    /// A settings document could not be decoded.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// Result type for qsift operations.
pub type Result<T> = std::result::Result<T, QsiftError>;
