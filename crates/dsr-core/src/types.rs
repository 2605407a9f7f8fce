//! Core type definitions for DSR request handling

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One spreadsheet row: column name to raw cell text
///
/// Immutable once read. Values may be empty or carry export artifacts such as
/// `"nan"`, `"None"` or `"N/A"`; see [`crate::normalize::is_missing`].
///
/// Columns are kept sorted by name, not in spreadsheet order. Lookups are by
/// column name only, so the source order is not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value of a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Kind of privacy request a record expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Delete,
    Copy,
    OptOut,
    #[serde(rename = "remove_parent_cc")]
    RemoveParentCC,
    CloseAccount,
    Correct,
    Restrict,
    Unknown,
}

impl std::fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Copy => write!(f, "copy"),
            Self::OptOut => write!(f, "opt_out"),
            Self::RemoveParentCC => write!(f, "remove_parent_cc"),
            Self::CloseAccount => write!(f, "close_account"),
            Self::Correct => write!(f, "correct"),
            Self::Restrict => write!(f, "restrict"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for RequestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "copy" => Ok(Self::Copy),
            "opt_out" | "optout" | "opt-out" => Ok(Self::OptOut),
            "remove_parent_cc" | "removeparentcc" => Ok(Self::RemoveParentCC),
            "close_account" | "closeaccount" | "close" => Ok(Self::CloseAccount),
            "correct" => Ok(Self::Correct),
            "restrict" => Ok(Self::Restrict),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid request category: {}", s)),
        }
    }
}

/// How a classification was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Request text and a catalog label contain one another
    Exact,
    /// A keyword of the detected request family appears in a catalog label
    Keyword,
    /// Nothing matched; copy-family keywords were used as a best effort
    Fallback,
    /// Request text was blank
    None,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Keyword => write!(f, "keyword"),
            Self::Fallback => write!(f, "fallback"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Result of classifying one request text against the form catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: RequestCategory,
    /// Catalog label to click, when one could be determined
    pub matched_label: Option<String>,
    pub method: MatchMethod,
}

impl Classification {
    /// Classification for blank or missing request text
    pub fn unknown() -> Self {
        Self {
            category: RequestCategory::Unknown,
            matched_label: None,
            method: MatchMethod::None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == RequestCategory::Unknown
    }
}

/// Finer-grained choice shown under a request category
///
/// Declaration order is the order sub-options appear on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubOption {
    StudentData,
    ParentData,
    EducatorData,
    StudentAccount,
    EducatorAccount,
}

impl SubOption {
    pub const ALL: [SubOption; 5] = [
        Self::StudentData,
        Self::ParentData,
        Self::EducatorData,
        Self::StudentAccount,
        Self::EducatorAccount,
    ];

    /// Logical record slot holding the raw value for this sub-option
    pub fn slot(&self) -> &'static str {
        match self {
            Self::StudentData => "deleteStudent",
            Self::ParentData => "deleteParent",
            Self::EducatorData => "deleteEducator",
            Self::StudentAccount => "closeStudent",
            Self::EducatorAccount => "closeEducator",
        }
    }

    /// Label of the checkbox on the form
    ///
    /// The same text is pasted into spreadsheets to mean "this option applies".
    pub fn label(&self) -> &'static str {
        match self {
            Self::StudentData => "Student data (if any)",
            Self::ParentData => "Parent data (if any)",
            Self::EducatorData => "Educator data (if any)",
            Self::StudentAccount => "Student account (if any)",
            Self::EducatorAccount => "Educator account (if any)",
        }
    }
}

impl std::fmt::Display for SubOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StudentData => write!(f, "studentData"),
            Self::ParentData => write!(f, "parentData"),
            Self::EducatorData => write!(f, "educatorData"),
            Self::StudentAccount => write!(f, "studentAccount"),
            Self::EducatorAccount => write!(f, "educatorAccount"),
        }
    }
}

/// Per sub-option select/skip decisions for one record
pub type OptionDecision = BTreeMap<SubOption, bool>;

/// Role of a free-text field on the request form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    FirstName,
    LastName,
    Email,
    Phone,
    Country,
    StateProvince,
    BirthDate,
}

impl FieldRole {
    pub const ALL: [FieldRole; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Country,
        Self::StateProvince,
        Self::BirthDate,
    ];
}

impl std::fmt::Display for FieldRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstName => write!(f, "first_name"),
            Self::LastName => write!(f, "last_name"),
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
            Self::Country => write!(f, "country"),
            Self::StateProvince => write!(f, "state_province"),
            Self::BirthDate => write!(f, "birth_date"),
        }
    }
}
