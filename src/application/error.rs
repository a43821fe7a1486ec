//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{InvalidOperation, TreeError};

/// Application errors wrap domain errors and add script and config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] TreeError),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: InvalidOperation,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
