pub mod compiler;
pub mod pdf;
pub mod persist;

pub use compiler::*;
pub use pdf::*;
pub use persist::*;

use std::path::PathBuf;

use thiserror::Error;

/// Artifact persistence failures. Each one is fatal to its own artifact only.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("PDF rendering error: {0}")]
    Render(String),
}
