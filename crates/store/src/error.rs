use std::path::Path;

use signage_core::error::CoreError;

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error (unknown id, invalid update).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The process may not write the given path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Wrap an I/O error on `path`, singling out permission problems.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_string_lossy().to_string();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }
}
