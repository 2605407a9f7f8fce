//! Batch submission of DSR privacy requests
//!
//! Records come from a [`RecordSource`], each is planned with `dsr-core`,
//! driven through a [`FormDriver`](dsr_browser::FormDriver) one at a time, and
//! the outcome lands in a [`RunReport`].

pub mod report;
pub mod runner;
pub mod source;

pub use report::{RecordOutcome, RecordResult, RunReport, RunSummary};
pub use runner::{FormRunner, RunnerOptions};
pub use source::{JsonRecordSource, RecordSource};
