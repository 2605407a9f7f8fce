//! Configuration for DSR form submission
//!
//! Everything that depends on the third-party form or the spreadsheet layout
//! lives here: the option catalog, spreadsheet column names, field selectors,
//! browser settings and output locations. Loaded from `.dsr/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{FieldRole, SubOption};
use crate::{DsrError, Result};

/// Relative location of the configuration file inside a working directory
pub const CONFIG_PATH: &str = ".dsr/config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DsrConfig {
    /// Target form and the option labels it currently shows
    #[serde(default)]
    pub form: FormConfig,

    /// Spreadsheet column names
    #[serde(default)]
    pub columns: ColumnConfig,

    /// CSS selectors for free-text fields, used by the browser driver only
    #[serde(default)]
    pub selectors: FieldSelectors,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Where reports and screenshots go
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Privacy portal form URL
    #[serde(default = "default_form_url")]
    pub url: String,

    /// Request-type labels exposed by the form, in on-screen order
    #[serde(default = "default_catalog")]
    pub catalog: Vec<String>,
}

/// Spreadsheet column names for each logical value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub request_type: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub state_province: String,
    pub birth_date: String,
    pub delete_student: String,
    pub delete_parent: String,
    pub delete_educator: String,
    pub close_student: String,
    pub close_educator: String,
}

/// CSS selectors for the form's free-text fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSelectors {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub state_province: String,
    pub birth_date: String,
    pub submit: String,
    /// Element whose presence confirms a successful submission
    pub confirmation: Option<String>,
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run in headless mode
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: Option<String>,
    /// Element wait timeout in seconds
    pub timeout_seconds: u64,
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for per-record screenshots; disabled when unset
    pub screenshot_dir: Option<PathBuf>,
    /// JSON run report path
    pub report_path: PathBuf,
}

fn default_form_url() -> String {
    "https://privacyportal.onetrust.com/webform/".to_string()
}

fn default_catalog() -> Vec<String> {
    [
        "Request a copy of my data",
        "Opt out of Search",
        "Remove my parent's cc information",
        "Request to delete my data",
        "Close/deactivate/cancel my College Board account",
        "Request to correct my data",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            url: default_form_url(),
            catalog: default_catalog(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            request_type: "Request_type".to_string(),
            first_name: "First_name".to_string(),
            last_name: "Last_name".to_string(),
            email: "Email".to_string(),
            phone: "Phone".to_string(),
            country: "Country".to_string(),
            state_province: "State".to_string(),
            birth_date: "Birth_date".to_string(),
            delete_student: "delete_student".to_string(),
            delete_parent: "delete_parent".to_string(),
            delete_educator: "delete_educator".to_string(),
            close_student: "close_student".to_string(),
            close_educator: "close_educator".to_string(),
        }
    }
}

impl ColumnConfig {
    /// Column holding the raw value for a sub-option slot
    pub fn sub_option(&self, option: SubOption) -> &str {
        match option {
            SubOption::StudentData => &self.delete_student,
            SubOption::ParentData => &self.delete_parent,
            SubOption::EducatorData => &self.delete_educator,
            SubOption::StudentAccount => &self.close_student,
            SubOption::EducatorAccount => &self.close_educator,
        }
    }

    /// Column holding the value for a free-text field
    pub fn field(&self, role: FieldRole) -> &str {
        match role {
            FieldRole::FirstName => &self.first_name,
            FieldRole::LastName => &self.last_name,
            FieldRole::Email => &self.email,
            FieldRole::Phone => &self.phone,
            FieldRole::Country => &self.country,
            FieldRole::StateProvince => &self.state_province,
            FieldRole::BirthDate => &self.birth_date,
        }
    }
}

impl Default for FieldSelectors {
    fn default() -> Self {
        Self {
            first_name: "input[name='firstName']".to_string(),
            last_name: "input[name='lastName']".to_string(),
            email: "input[name='email']".to_string(),
            phone: "input[name='phone']".to_string(),
            country: "input[name='country']".to_string(),
            state_province: "input[name='stateOrProvince']".to_string(),
            birth_date: "input[name='dateOfBirth']".to_string(),
            submit: "button[type='submit']".to_string(),
            confirmation: None,
        }
    }
}

impl FieldSelectors {
    pub fn for_role(&self, role: FieldRole) -> &str {
        match role {
            FieldRole::FirstName => &self.first_name,
            FieldRole::LastName => &self.last_name,
            FieldRole::Email => &self.email,
            FieldRole::Phone => &self.phone,
            FieldRole::Country => &self.country,
            FieldRole::StateProvince => &self.state_province,
            FieldRole::BirthDate => &self.birth_date,
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: None,
            report_path: PathBuf::from("dsr-report.json"),
        }
    }
}

impl DsrConfig {
    /// Load configuration from `.dsr/config.toml` under `root`, or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_PATH);

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            DsrError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write default configuration to `.dsr/config.toml` under `root`
    pub fn write_default(root: &Path) -> Result<PathBuf> {
        let config_path = root.join(CONFIG_PATH);
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| DsrError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Reject configurations no record could ever be classified against
    pub fn validate(&self) -> Result<()> {
        if self.form.catalog.iter().all(|label| label.trim().is_empty()) {
            return Err(DsrError::Config("form.catalog has no labels".to_string()));
        }
        if self.columns.request_type.trim().is_empty() {
            return Err(DsrError::Config("columns.request_type is empty".to_string()));
        }
        Ok(())
    }
}
