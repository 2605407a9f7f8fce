//! # dsr-core
//!
//! Decision engine for Data Subject Rights (DSR) privacy request submission.
//!
//! Given one loosely-typed spreadsheet row and the option labels currently
//! exposed by the privacy portal form, this crate decides:
//!
//! - which request category the row expresses and which on-screen label to click
//!   ([`classifier`])
//! - which sub-options (student / parent / educator data or accounts) to tick
//!   ([`selector`])
//! - how to normalize values such as birth dates before they are typed
//!   ([`normalize`])
//!
//! Everything here is pure and synchronous. Driving the actual browser lives in
//! `dsr-browser`, iterating over records lives in `dsr-runner`.

pub mod classifier;
pub mod config;
mod error;
pub mod normalize;
pub mod plan;
pub mod selector;
mod types;

pub use classifier::{classify, RequestFamily};
pub use config::{BrowserSettings, ColumnConfig, DsrConfig, FieldSelectors, FormConfig, OutputConfig};
pub use error::{DsrError, Result};
pub use normalize::{format_birth_date, is_missing};
pub use plan::SubmissionPlan;
pub use selector::{select_options, should_select, sub_options_for};
pub use types::*;
