//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    crate::exitcode::NOINPUT
                }
                _ => crate::exitcode::IOERR,
            },
            CliError::Application(e) => match e {
                ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Rejected { .. } => crate::exitcode::SOFTWARE,
                ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_codes() {
        let parse = CliError::from(ApplicationError::Parse {
            line: 3,
            message: "unknown command 'jump'".into(),
        });
        assert_eq!(parse.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(parse.to_string(), "line 3: unknown command 'jump'");

        let missing = CliError::io("open script", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let usage = CliError::InvalidArgs("bad".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);
    }
}
