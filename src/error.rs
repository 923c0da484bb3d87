use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkError {
    // Inspection / listing
    #[error("permission denied")]
    PermissionDenied(PathBuf),

    #[error("path not found")]
    NotFound(PathBuf),

    #[error("IO error")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Raised by the visit callback
    #[error("visit aborted")]
    Visit(#[source] Box<dyn std::error::Error + Send + Sync>),

    // Config
    #[error("invalid thread count")]
    InvalidThreadCount(usize),

    // Runtime
    #[error("thread pool failure")]
    ThreadPool(String),
}

impl WalkError {
    /// Classify an I/O failure that happened at `path`.
    ///
    /// Permission and not-found failures get their own variants so callbacks
    /// can match on them without digging into the `io::Error`.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// Wrap an arbitrary error produced by the visit callback.
    pub fn visit(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Visit(err.into())
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the error came from inspecting or listing a single entry.
    ///
    /// These are the errors the walker hands to the callback; the walk
    /// keeps going unless the callback escalates them. Callback and
    /// configuration errors are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::NotFound(_) | Self::Io { .. }
        )
    }
}
