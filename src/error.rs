//! Error handling and result types for index operations.

use thiserror::Error;

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur in department-index operations.
///
/// `DepartmentNotFound` and `RankNotFound` are ordinary query outcomes, not
/// faults. `Io` aborts the enclosing bulk load and leaves any previously
/// built tree untouched. Structural invariants are never re-checked on the
/// query path; `CorruptedIndex` is produced only by the explicit validation
/// pass used in tests.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("department not found")]
    DepartmentNotFound,

    #[error("rank {rank} not found in department")]
    RankNotFound { rank: usize },

    #[error("index corrupted: {0}")]
    CorruptedIndex(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn io_error_conversion() {
        let io_err = IoError::new(ErrorKind::NotFound, "no such run file");
        let err: IndexError = io_err.into();
        assert!(matches!(err, IndexError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn rank_not_found_display() {
        let err = IndexError::RankNotFound { rank: 7 };
        assert_eq!(err.to_string(), "rank 7 not found in department");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndexError>();
    }
}
