use thiserror::Error;

/// Crate-wide result type alias for collaborator calls.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Broad classification of a collaborator failure, for callers that branch
/// on category rather than message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    InvalidPath,
    Copy,
    Move,
    Delete,
    Open,
    Io,
    /// The request was superseded (pane closed or key invalidated) before
    /// its result could be delivered.
    Superseded,
}

/// Errors crossing the file-system service boundary.
///
/// These are carried as values, never panics; invariant violations inside the
/// state machines (closing the last tab, pasting onto a file) are silent
/// no-ops and do not produce a `ServiceError`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Path does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Access to the path was denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Path could not be resolved (empty, malformed, or bad segment index).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A copy operation failed.
    #[error("copy failed: {0}")]
    Copy(String),

    /// A move operation failed.
    #[error("move failed: {0}")]
    Move(String),

    /// A delete operation failed.
    #[error("delete failed: {0}")]
    Delete(String),

    /// Opening a file with the default application failed.
    #[error("open failed: {0}")]
    Open(String),

    /// Other I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request was superseded before resolution.
    #[error("superseded: {0}")]
    Superseded(String),
}

impl ServiceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            ServiceError::InvalidPath(_) => ErrorKind::InvalidPath,
            ServiceError::Copy(_) => ErrorKind::Copy,
            ServiceError::Move(_) => ErrorKind::Move,
            ServiceError::Delete(_) => ErrorKind::Delete,
            ServiceError::Open(_) => ErrorKind::Open,
            ServiceError::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::NotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::Io,
            },
            ServiceError::Superseded(_) => ErrorKind::Superseded,
        }
    }

    /// Build the error variant matching an I/O error for a given path, so
    /// not-found and permission-denied keep their category.
    pub fn from_io(err: std::io::Error, path: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ServiceError::NotFound(path.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                ServiceError::PermissionDenied(path.to_string())
            }
            _ => ServiceError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ServiceError = io_err.into();
        assert!(matches!(err, ServiceError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn from_io_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ServiceError::from_io(io_err, "/tmp/missing");
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), "not found: /tmp/missing");
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = ServiceError::from_io(io_err, "/root/secret");
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn invalid_path_display() {
        let err = ServiceError::InvalidPath("empty path".into());
        assert_eq!(err.to_string(), "invalid path: empty path");
    }
}
