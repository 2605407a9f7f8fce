//! Browser automation error types - re-exports unified DsrError from dsr-core
//!
//! Browser failures use these DsrError variants:
//! - Browser(String) - launch, navigation and CDP failures
//! - ElementNotFound { selector } - a configured field selector never appeared
//! - LabelNotFound(String) - no clickable element carries an option label
//! - UnmappedField(String) - a field role has no selector configured
//! - ScreenshotFailed(String) - capture or storage failures

pub use dsr_core::{DsrError, Result};

pub type BrowserError = DsrError;
