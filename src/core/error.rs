//! Error type shared by the document-level operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The two ways a document operation can fail.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not well-formed JSON.
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_json(&self) -> bool {
        matches!(self, Self::InvalidJson(_))
    }
}
