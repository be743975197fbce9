//! Assertion helpers for headless runs.

use crate::app::AppSnapshot;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_fired(region: &str, expected: u32, snapshot: &AppSnapshot) -> AssertionResult {
    let Some(actual) = snapshot.fired.get(region) else {
        return AssertionResult::failed("missing_region", format!("{region}: region not mounted"));
    };
    if *actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "fire_count_mismatch",
            format!("{region}: expected {expected} fire(s), got {actual}"),
        )
    }
}

pub fn evaluate_assert_theme(expected: &str, snapshot: &AppSnapshot) -> AssertionResult {
    if snapshot.theme.as_str() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "theme_mismatch",
            format!("expected theme '{expected}', got '{}'", snapshot.theme),
        )
    }
}

pub fn evaluate_assert_expanded(id: &str, expected: bool, snapshot: &AppSnapshot) -> AssertionResult {
    let actual = snapshot.expanded.iter().any(|item| item == id);
    if actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "expansion_mismatch",
            format!("{id}: expected expanded={expected}, got expanded={actual}"),
        )
    }
}

pub fn evaluate_assert_active_region(
    expected: Option<&str>,
    snapshot: &AppSnapshot,
) -> AssertionResult {
    if snapshot.active_region.as_deref() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "active_region_mismatch",
            format!(
                "expected active region {:?}, got {:?}",
                expected, snapshot.active_region
            ),
        )
    }
}

pub fn evaluate_assert_notice(expected: &str, snapshot: &AppSnapshot) -> AssertionResult {
    let actual = match snapshot.contact_notice.as_deref() {
        None => "none",
        Some("success") => "success",
        Some(_) => "error",
    };
    if actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "notice_mismatch",
            format!(
                "expected notice '{expected}', got {:?}",
                snapshot.contact_notice
            ),
        )
    }
}
