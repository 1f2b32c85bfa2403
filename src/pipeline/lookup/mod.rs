pub mod company;
pub mod dataset;
pub mod openfda;

pub use company::*;
pub use dataset::*;
pub use openfda::*;

use std::path::PathBuf;

use thiserror::Error;

/// Base-record lookup failures. Every variant ends the run: there is no drug
/// to report on.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("NDC dataset {path} could not be read: {source}")]
    DatasetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("NDC dataset {path} is not valid JSON: {source}")]
    DatasetMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No drug found with NDC {0}")]
    NotFound(String),
}

/// openFDA request failures. Never fatal: callers log and carry on with no data.
#[derive(Error, Debug)]
pub enum FdaError {
    #[error("openFDA is unreachable at {0}")]
    Connection(String),

    #[error("openFDA request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("openFDA returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
