//! Error types for gosummarize.

use crate::codemap::CodemapError;
use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type for gosummarize operations.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error finding Go files: {0}")]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Codemap(#[from] CodemapError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &SummarizeError) -> i32 {
    match error {
        SummarizeError::Walk(WalkError::NotFound { .. }) => 3,
        SummarizeError::Walk(WalkError::PermissionDenied { .. }) => 4,
        SummarizeError::Walk(_) => 2,
        SummarizeError::Io(_) => 1,
        SummarizeError::Codemap(_) => 1,
        SummarizeError::Output(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let not_found = SummarizeError::from(WalkError::NotFound {
            path: PathBuf::from("missing"),
        });
        let denied = SummarizeError::from(WalkError::PermissionDenied {
            path: PathBuf::from("locked"),
        });
        let loop_err = SummarizeError::from(WalkError::SymlinkLoop {
            path: PathBuf::from("loop"),
        });

        assert_eq!(exit_code(&not_found), 3);
        assert_eq!(exit_code(&denied), 4);
        assert_eq!(exit_code(&loop_err), 2);
        assert_eq!(exit_code(&SummarizeError::Codemap(CodemapError::ParserInit)), 1);
    }

    #[test]
    fn test_walk_error_message() {
        let err = SummarizeError::from(WalkError::NotFound {
            path: PathBuf::from("missing"),
        });
        assert_eq!(err.to_string(), "error finding Go files: path not found: missing");
    }
}
