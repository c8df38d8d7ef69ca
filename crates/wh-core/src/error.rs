//! Core error type.
//!
//! Sub-crates define their own error enums (`PathError`, `TaskError`, …) and
//! wrap `CoreError` where a grid or config parse can fail underneath them.

use thiserror::Error;

/// Errors produced by `wh-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `wh-core`.
pub type CoreResult<T> = Result<T, CoreError>;
