pub mod approval;
pub mod drug;
pub mod enums;
pub mod insight;
pub mod label;
pub mod report;

pub use approval::*;
pub use drug::*;
pub use enums::*;
pub use insight::*;
pub use label::*;
pub use report::*;

use thiserror::Error;

/// Sentinel used for every text field the source data did not provide.
pub const UNKNOWN: &str = "Unknown";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct InvalidEnumValue {
    pub field: String,
    pub value: String,
}
