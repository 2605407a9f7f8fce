//! Sub-option selection
//!
//! Spreadsheet cells for sub-options hold anything from `yes` to a pasted copy
//! of the checkbox label to `nan`. Only values that clearly mean "select" tick
//! the box; everything else, including values nobody anticipated, is skipped.

use tracing::debug;

use crate::config::ColumnConfig;
use crate::types::{OptionDecision, Record, RequestCategory, SubOption};

const AFFIRMATIVE: [&str; 4] = ["yes", "true", "1", "y"];

/// Sub-options shown on the form for a request category, in form order
pub fn sub_options_for(category: RequestCategory) -> &'static [SubOption] {
    match category {
        RequestCategory::Delete => &[
            SubOption::StudentData,
            SubOption::ParentData,
            SubOption::EducatorData,
        ],
        RequestCategory::CloseAccount => &[SubOption::StudentAccount, SubOption::EducatorAccount],
        _ => &[],
    }
}

/// Interpret a raw cell value as "select this sub-option"
pub fn should_select(raw: Option<&str>) -> bool {
    let Some(value) = raw.map(str::trim) else {
        return false;
    };
    if value.is_empty() {
        return false;
    }
    if AFFIRMATIVE.iter().any(|a| value.eq_ignore_ascii_case(a)) {
        return true;
    }
    SubOption::ALL.iter().any(|option| option.label() == value)
}

/// Decide every sub-option relevant to `category` for one record
///
/// Categories without sub-options produce an empty decision.
pub fn select_options(
    record: &Record,
    category: RequestCategory,
    columns: &ColumnConfig,
) -> OptionDecision {
    sub_options_for(category)
        .iter()
        .map(|&option| {
            let selected = should_select(record.get(columns.sub_option(option)));
            debug!("{} -> {}", option, if selected { "select" } else { "skip" });
            (option, selected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_values() {
        for value in ["yes", "YES", "Y", "true", "1", " y "] {
            assert!(should_select(Some(value)), "{value:?} should select");
        }
    }

    #[test]
    fn test_label_values() {
        for value in [
            "Student data (if any)",
            "Educator account (if any)",
            "  Parent data (if any)  ",
        ] {
            assert!(should_select(Some(value)), "{value:?} should select");
        }
    }

    #[test]
    fn test_skip_values() {
        assert!(!should_select(None));
        for value in ["", "nan", "None", "N/A", "no", "false", "0", "student data"] {
            assert!(!should_select(Some(value)), "{value:?} should skip");
        }
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        assert!(!should_select(Some("student data (if any)")));
    }

    #[test]
    fn test_sub_option_table() {
        assert_eq!(sub_options_for(RequestCategory::Delete).len(), 3);
        assert_eq!(
            sub_options_for(RequestCategory::CloseAccount),
            &[SubOption::StudentAccount, SubOption::EducatorAccount]
        );
        assert!(sub_options_for(RequestCategory::Copy).is_empty());
        assert!(sub_options_for(RequestCategory::Unknown).is_empty());
    }

    #[test]
    fn test_select_options_delete() {
        let record: Record = [
            ("delete_student", "Student data (if any)"),
            ("delete_parent", ""),
            ("delete_educator", "Educator data (if any)"),
        ]
        .into_iter()
        .collect();

        let decision = select_options(&record, RequestCategory::Delete, &ColumnConfig::default());
        assert_eq!(decision.len(), 3);
        assert!(decision[&SubOption::StudentData]);
        assert!(!decision[&SubOption::ParentData]);
        assert!(decision[&SubOption::EducatorData]);
    }

    #[test]
    fn test_select_options_missing_columns_skip() {
        let record = Record::default();
        let decision =
            select_options(&record, RequestCategory::CloseAccount, &ColumnConfig::default());
        assert_eq!(decision.len(), 2);
        assert!(decision.values().all(|selected| !selected));
    }

    #[test]
    fn test_select_options_no_sub_options() {
        let record: Record = [("delete_student", "yes")].into_iter().collect();
        let decision = select_options(&record, RequestCategory::OptOut, &ColumnConfig::default());
        assert!(decision.is_empty());
    }
}
