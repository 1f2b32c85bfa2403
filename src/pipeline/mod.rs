pub mod insights;
pub mod lookup;
pub mod processor;
pub mod report;
