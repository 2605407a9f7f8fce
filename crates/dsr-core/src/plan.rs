//! Per-record submission plans
//!
//! A plan is everything a form driver needs to submit one record: the request
//! label to click, the sub-option labels to tick, and the free-text values to
//! type. Building a plan never touches the browser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::classifier::classify;
use crate::config::ColumnConfig;
use crate::normalize::{format_birth_date, present};
use crate::selector::select_options;
use crate::types::{
    Classification, FieldRole, MatchMethod, OptionDecision, Record, RequestCategory,
};

/// Decisions for one record, ready to hand to a form driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPlan {
    pub classification: Classification,
    pub options: OptionDecision,
    /// Free-text values keyed by field role; missing values are left out
    pub fields: BTreeMap<FieldRole, String>,
    /// Set when the record should not be submitted at all
    pub skip_reason: Option<String>,
}

impl SubmissionPlan {
    /// Classify, select and normalize one record
    pub fn build<S: AsRef<str>>(record: &Record, catalog: &[S], columns: &ColumnConfig) -> Self {
        let request_text = record.get(&columns.request_type);
        let classification = classify(request_text, catalog);
        let options = select_options(record, classification.category, columns);

        let fields: BTreeMap<FieldRole, String> = FieldRole::ALL
            .into_iter()
            .filter_map(|role| {
                let raw = present(record.get(columns.field(role)))?;
                let value = match role {
                    FieldRole::BirthDate => format_birth_date(raw),
                    _ => raw.to_string(),
                };
                (!value.is_empty()).then_some((role, value))
            })
            .collect();

        let skip_reason = match (&classification.matched_label, classification.category) {
            _ if classification.method == MatchMethod::None => {
                Some("Request type is blank".to_string())
            }
            (None, _) => Some(format!(
                "No form option matches request type '{}'",
                request_text.unwrap_or_default().trim()
            )),
            (Some(_), RequestCategory::Unknown) => {
                Some(format!(
                    "Unrecognized request type '{}'",
                    request_text.unwrap_or_default().trim()
                ))
            }
            _ => None,
        };

        if let Some(reason) = &skip_reason {
            info!("Planned skip: {}", reason);
        } else {
            debug!(
                "Planned {} via {} match, {} field(s), {} sub-option(s) selected",
                classification.category,
                classification.method,
                fields.len(),
                options.values().filter(|s| **s).count()
            );
        }

        Self {
            classification,
            options,
            fields,
            skip_reason,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }

    /// Sub-option labels to tick, in form order
    pub fn selected_labels(&self) -> Vec<&'static str> {
        self.options
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(option, _)| option.label())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormConfig;
    use crate::types::SubOption;

    fn catalog() -> Vec<String> {
        FormConfig::default().catalog
    }

    #[test]
    fn test_delete_record_end_to_end() {
        let record: Record = [
            ("Request_type", "request to delete my data"),
            ("delete_student", "Student data (if any)"),
            ("delete_parent", ""),
            ("delete_educator", "Educator data (if any)"),
            ("Birth_date", "2012-03-15 00:00:00"),
            ("Email", " student@example.com "),
            ("Phone", "nan"),
        ]
        .into_iter()
        .collect();

        let plan = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());

        assert!(!plan.is_skipped());
        assert_eq!(plan.classification.category, RequestCategory::Delete);
        assert_eq!(plan.classification.method, MatchMethod::Exact);
        assert_eq!(
            plan.classification.matched_label.as_deref(),
            Some("Request to delete my data")
        );
        assert_eq!(
            plan.options,
            OptionDecision::from([
                (SubOption::StudentData, true),
                (SubOption::ParentData, false),
                (SubOption::EducatorData, true),
            ])
        );
        assert_eq!(
            plan.selected_labels(),
            vec!["Student data (if any)", "Educator data (if any)"]
        );
        assert_eq!(plan.fields[&FieldRole::BirthDate], "3/15/2012");
        assert_eq!(plan.fields[&FieldRole::Email], "student@example.com");
        assert!(!plan.fields.contains_key(&FieldRole::Phone));
    }

    #[test]
    fn test_blank_request_is_skipped() {
        let record: Record = [("Request_type", "N/A")].into_iter().collect();
        let plan = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());
        assert!(plan.is_skipped());
        assert_eq!(plan.skip_reason.as_deref(), Some("Request type is blank"));
        assert!(plan.options.is_empty());
    }

    #[test]
    fn test_placeholder_request_types_share_blank_reason() {
        for raw in ["", "   ", "nan", "None", "null", "NaT"] {
            let record: Record = [("Request_type", raw)].into_iter().collect();
            let plan = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());
            assert_eq!(
                plan.skip_reason.as_deref(),
                Some("Request type is blank"),
                "{raw:?}"
            );
        }

        let plan = SubmissionPlan::build(&Record::default(), &catalog(), &ColumnConfig::default());
        assert_eq!(plan.skip_reason.as_deref(), Some("Request type is blank"));
    }

    #[test]
    fn test_no_matching_label_reason() {
        let record: Record = [("Request_type", "gibberish")].into_iter().collect();
        let catalog = ["Opt out of Search"];
        let plan = SubmissionPlan::build(&record, &catalog, &ColumnConfig::default());
        assert_eq!(
            plan.skip_reason.as_deref(),
            Some("No form option matches request type 'gibberish'")
        );
    }

    #[test]
    fn test_unrecognized_request_is_skipped() {
        let record: Record = [("Request_type", "Send me a newsletter")].into_iter().collect();
        let plan = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());
        assert!(plan.is_skipped());
        assert_eq!(plan.classification.method, MatchMethod::Fallback);
        assert_eq!(
            plan.classification.matched_label.as_deref(),
            Some("Request a copy of my data")
        );
    }

    #[test]
    fn test_close_account_plan() {
        let record: Record = [
            ("Request_type", "Close/deactivate/cancel my College Board account"),
            ("close_student", "Student account (if any)"),
            ("close_educator", "no"),
        ]
        .into_iter()
        .collect();
        let plan = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());
        assert_eq!(plan.classification.category, RequestCategory::CloseAccount);
        assert_eq!(plan.selected_labels(), vec!["Student account (if any)"]);
    }

    #[test]
    fn test_record_is_not_mutated() {
        let record: Record = [("Request_type", "Opt out of Search")].into_iter().collect();
        let before = record.clone();
        let _ = SubmissionPlan::build(&record, &catalog(), &ColumnConfig::default());
        assert_eq!(record, before);
    }
}
