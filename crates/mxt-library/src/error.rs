//! Template library errors

use mxt_model::DocumentError;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// No template file with this id
    #[error("template not found: {0}")]
    NotFound(String),

    /// Id would resolve outside the library directory
    #[error("invalid template id: {0:?}")]
    InvalidId(String),

    /// File exists but is not a template document
    #[error("failed to parse template {id}: {source}")]
    Parse {
        id: String,
        #[source]
        source: DocumentError,
    },

    #[error("failed to serialize template: {0}")]
    Serialize(#[source] DocumentError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LibraryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
