use std::path::PathBuf;

use thiserror::Error;

/// Facade-level failures.
///
/// Operations return `anyhow::Result`; these values travel inside the
/// `anyhow::Error` and can be recovered with `downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("The file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Expected a {expected} at {}", path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("Directory could not be created at segment {}: {reason}", segment.display())]
    DirectoryCreation { segment: PathBuf, reason: String },

    #[error("{message}")]
    Provider { message: String, code: Option<i32> },

    #[error("Download job {0} has already settled")]
    AlreadySettled(u64),
}

impl Error {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider { message: message.into(), code: None }
    }

    pub fn expected_file(path: impl Into<PathBuf>) -> Self {
        Self::TypeMismatch { path: path.into(), expected: "file" }
    }
}

/// Returns the facade error carried by `err`, if any.
pub fn facade_error(err: &anyhow::Error) -> Option<&Error> {
    err.downcast_ref::<Error>()
}

/// Returns true when `err` wraps an io error of the given kind anywhere in its
/// chain.
pub fn is_io_kind(err: &anyhow::Error, kind: std::io::ErrorKind) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == kind)
}
