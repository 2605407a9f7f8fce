//! Form driver backed by Chrome DevTools Protocol

use crate::driver::FormDriver;
use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use dsr_core::{BrowserSettings, FieldRole, FieldSelectors};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Chrome session driving the privacy request form
pub struct ChromeFormDriver {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    selectors: FieldSelectors,
    timeout: Duration,
}

impl ChromeFormDriver {
    /// Launch a new browser instance
    pub async fn launch(settings: &BrowserSettings, selectors: FieldSelectors) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            settings.headless, settings.window_width, settings.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .window_size(Some((settings.window_width, settings.window_height)))
            .build()
            .map_err(|e| BrowserError::Browser(format!("Failed to launch browser: {}", e)))?;

        let user_agent_arg: Option<String> = settings
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(ref ua_arg) = user_agent_arg {
            launch_options.args.push(OsStr::new(ua_arg));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            selectors,
            timeout: Duration::from_secs(settings.timeout_seconds),
        })
    }

    /// Connect to an existing browser instance
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    pub async fn connect(port: u16, selectors: FieldSelectors, timeout: Duration) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let browser = Browser::connect(format!("http://127.0.0.1:{}", port))
            .map_err(|e| BrowserError::Browser(format!("Failed to connect to browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Browser(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            selectors,
            timeout,
        })
    }

    /// Execute JavaScript in the page context
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the current URL
    pub async fn current_url(&self) -> Result<String> {
        let result = self.evaluate_script("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    fn selector_for(&self, role: FieldRole) -> Result<&str> {
        let selector = self.selectors.for_role(role);
        if selector.trim().is_empty() {
            return Err(BrowserError::UnmappedField(role.to_string()));
        }
        Ok(selector)
    }
}

#[async_trait]
impl FormDriver for ChromeFormDriver {
    #[instrument(skip(self))]
    async fn open_form(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;

        info!("Opened form {}", url);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn select_by_label(&self, label: &str) -> Result<()> {
        let xpath = label_xpath(label);
        debug!("Resolving option via {}", xpath);

        let element = self
            .tab
            .wait_for_xpath_with_custom_timeout(&xpath, self.timeout)
            .map_err(|_e| BrowserError::LabelNotFound(label.to_string()))?;

        element
            .click()
            .map_err(|e| BrowserError::Browser(format!("Failed to click '{}': {}", label, e)))?;

        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn fill_field(&self, role: FieldRole, value: &str) -> Result<()> {
        let selector = self.selector_for(role)?;

        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, self.timeout)
            .map_err(|_e| BrowserError::ElementNotFound {
                selector: selector.to_string(),
            })?;

        element
            .click()
            .and_then(|el| el.type_into(value))
            .map_err(|e| BrowserError::Browser(format!("Failed to fill {}: {}", role, e)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn submit(&self) -> Result<()> {
        let button = self
            .tab
            .wait_for_element_with_custom_timeout(&self.selectors.submit, self.timeout)
            .map_err(|_e| BrowserError::ElementNotFound {
                selector: self.selectors.submit.clone(),
            })?;

        button
            .click()
            .map_err(|e| BrowserError::Submission(format!("Failed to click submit: {}", e)))?;

        if let Some(confirmation) = &self.selectors.confirmation {
            self.tab
                .wait_for_element_with_custom_timeout(confirmation, self.timeout)
                .map_err(|_e| {
                    BrowserError::Submission(format!(
                        "Confirmation '{}' not shown after submit",
                        confirmation
                    ))
                })?;
        }

        info!("Submitted form, now at {}", self.current_url().await.unwrap_or_default());
        Ok(())
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| BrowserError::ScreenshotFailed(format!("CDP capture failed: {}", e)))
    }
}

impl Drop for ChromeFormDriver {
    fn drop(&mut self) {
        debug!("ChromeFormDriver dropped, browser will be cleaned up");
    }
}

/// XPath matching a clickable element whose visible text contains `label`
///
/// Labels, ARIA radios/checkboxes and buttons are tried in one union query.
fn label_xpath(label: &str) -> String {
    let literal = xpath_literal(label);
    format!(
        "//label[contains(normalize-space(.), {lit})] \
         | //*[@role='radio' or @role='checkbox' or @role='option'][contains(normalize-space(.), {lit})] \
         | //button[contains(normalize-space(.), {lit})]",
        lit = literal
    )
}

/// Quote a string as an XPath 1.0 literal
///
/// XPath 1.0 has no escape syntax, so text holding both quote kinds is split
/// into a `concat()` call.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
