//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                ApplicationError::Input { .. } => crate::exitcode::NOINPUT,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, RecordId};

    #[test]
    fn given_validation_failure_when_mapping_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::from(DomainError::CycleDetected(
            RecordId::from(1).to_string(),
        )));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_missing_input_when_mapping_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::Input {
            path: "missing.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn given_bad_json_or_config_when_mapping_exit_code_then_distinct_codes() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let bad_json = CliError::from(ApplicationError::Parse {
            origin: "records.json".into(),
            source: parse,
        });
        let bad_config = CliError::from(ApplicationError::Config {
            message: "TREELIST_RENDER__MARKERS needs 3 glyphs, got 2".into(),
        });
        assert_eq!(bad_json.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(bad_config.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
