//! Form driver capability trait

use async_trait::async_trait;
use dsr_core::{DsrError, FieldRole, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

/// On-screen actions a privacy form needs
///
/// Implementations own all knowledge of how the form is laid out. Callers only
/// speak in option labels and field roles.
#[async_trait]
pub trait FormDriver: Send + Sync {
    /// Load a fresh copy of the request form
    async fn open_form(&self, url: &str) -> Result<()>;

    /// Click the option whose visible text contains `label`
    async fn select_by_label(&self, label: &str) -> Result<()>;

    /// Type a value into the field playing `role`
    async fn fill_field(&self, role: FieldRole, value: &str) -> Result<()>;

    /// Submit the form and confirm it was accepted
    async fn submit(&self) -> Result<()>;

    /// PNG bytes of the current page
    async fn capture_screenshot(&self) -> Result<Vec<u8>>;
}

/// Action recorded by [`MockFormDriver`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DriverAction {
    OpenForm { url: String },
    SelectLabel { label: String },
    Fill { role: FieldRole, value: String },
    Submit,
    Screenshot,
}

/// In-memory driver that records every action
///
/// By default every action succeeds. Restrict the labels the "form" shows with
/// [`MockFormDriver::with_labels`], or make submission fail with
/// [`MockFormDriver::failing_submit`].
#[derive(Default)]
pub struct MockFormDriver {
    actions: Mutex<Vec<DriverAction>>,
    labels: Option<HashSet<String>>,
    fail_submit: bool,
}

impl MockFormDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only these labels can be selected; others fail with `LabelNotFound`
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// Everything recorded so far
    pub fn actions(&self) -> Vec<DriverAction> {
        self.lock().clone()
    }

    /// Drain the recorded actions
    pub fn take_actions(&self) -> Vec<DriverAction> {
        std::mem::take(&mut *self.lock())
    }

    fn record(&self, action: DriverAction) {
        debug!("mock driver: {:?}", action);
        self.lock().push(action);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DriverAction>> {
        // A panic while holding the lock only happens in a failing test
        self.actions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl FormDriver for MockFormDriver {
    async fn open_form(&self, url: &str) -> Result<()> {
        self.record(DriverAction::OpenForm {
            url: url.to_string(),
        });
        Ok(())
    }

    async fn select_by_label(&self, label: &str) -> Result<()> {
        if let Some(labels) = &self.labels {
            if !labels.contains(label) {
                return Err(DsrError::LabelNotFound(label.to_string()));
            }
        }
        self.record(DriverAction::SelectLabel {
            label: label.to_string(),
        });
        Ok(())
    }

    async fn fill_field(&self, role: FieldRole, value: &str) -> Result<()> {
        self.record(DriverAction::Fill {
            role,
            value: value.to_string(),
        });
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        if self.fail_submit {
            return Err(DsrError::Submission("mock submit rejected".to_string()));
        }
        self.record(DriverAction::Submit);
        Ok(())
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.record(DriverAction::Screenshot);
        // PNG signature only
        Ok(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
    }
}
