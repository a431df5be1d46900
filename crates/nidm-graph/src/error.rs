use std::path::PathBuf;

use thiserror::Error;

/// Writing one output failed. The destination is left untouched.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Output path {} has no parent directory", path.display())]
    NoParent { path: PathBuf },
}
