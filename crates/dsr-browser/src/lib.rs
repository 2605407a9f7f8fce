//! Form driving for DSR privacy request submission
//!
//! The decision logic in `dsr-core` produces a [`SubmissionPlan`](dsr_core::SubmissionPlan);
//! this crate turns a plan into on-screen actions through the [`FormDriver`]
//! capability trait. Selector knowledge stays behind the trait.
//!
//! # Drivers
//!
//! - [`ChromeFormDriver`]: Chrome/Chromium over the DevTools protocol
//! - [`MockFormDriver`]: records actions in memory, for tests and dry runs
//!
//! # Example
//!
//! ```no_run
//! use dsr_browser::{ChromeFormDriver, FormDriver};
//! use dsr_core::{DsrConfig, FieldRole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DsrConfig::default();
//!     let driver = ChromeFormDriver::launch(&config.browser, config.selectors.clone()).await?;
//!
//!     driver.open_form(&config.form.url).await?;
//!     driver.select_by_label("Request to delete my data").await?;
//!     driver.fill_field(FieldRole::BirthDate, "3/15/2012").await?;
//!     driver.submit().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium installed for [`ChromeFormDriver`]
//! - For connecting to an existing browser: `chrome --remote-debugging-port=9222`

pub mod chrome;
pub mod driver;
pub mod error;
pub mod screenshot;

pub use chrome::ChromeFormDriver;
pub use driver::{DriverAction, FormDriver, MockFormDriver};
pub use error::{BrowserError, Result};
pub use screenshot::save_screenshot;
