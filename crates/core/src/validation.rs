//! Field-level validation shared by every transfer DTO.
//!
//! DTOs declare their constraints with the `validator` derive; [`validate_input`]
//! turns the resulting errors into [`FieldViolation`]s so callers see exactly
//! which field broke which rule.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TITLE_MIN_LEN: u64 = 5;
pub const TITLE_MAX_LEN: u64 = 200;

pub const DESCRIPTION_MIN_LEN: u64 = 10;
pub const DESCRIPTION_MAX_LEN: u64 = 5000;

pub const COMMENT_MIN_LEN: u64 = 3;
pub const COMMENT_MAX_LEN: u64 = 1000;

pub const USER_NAME_MIN_LEN: u64 = 2;
pub const USER_NAME_MAX_LEN: u64 = 100;

pub const CATEGORY_NAME_MIN_LEN: u64 = 2;
pub const CATEGORY_NAME_MAX_LEN: u64 = 50;

pub const TAG_NAME_MIN_LEN: usize = 2;
pub const TAG_NAME_MAX_LEN: usize = 30;

/// Color assigned to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

/// Pagination bounds for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Six-digit hex color, e.g. `#3498db`.
pub static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern compiles"));

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    /// Rule identifier, e.g. `length`, `email`, `regex`.
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Run the derived validation of `input`, mapping failures to
/// [`CoreError::InvalidFields`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidFields(collect_violations(&errors)))
}

/// Flatten `validator` errors into violations sorted by field name.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |err| FieldViolation::new(field.to_string(), err.code.to_string(), describe(err)))
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.rule.cmp(&b.rule)));
    violations
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match err.code.as_ref() {
        "length" => {
            let min = err.params.get("min").and_then(|v| v.as_u64());
            let max = err.params.get("max").and_then(|v| v.as_u64());
            match (min, max) {
                (Some(min), Some(max)) => format!("must be between {min} and {max} characters"),
                (Some(min), None) => format!("must be at least {min} characters"),
                (None, Some(max)) => format!("must be at most {max} characters"),
                (None, None) => "has an invalid length".to_string(),
            }
        }
        "email" => "must be a valid email address".to_string(),
        "regex" => "has an invalid format".to_string(),
        "range" => {
            let min = err.params.get("min").map(|v| v.to_string());
            let max = err.params.get("max").map(|v| v.to_string());
            match (min, max) {
                (Some(min), Some(max)) => format!("must be between {min} and {max}"),
                (Some(min), None) => format!("must be at least {min}"),
                (None, Some(max)) => format!("must be at most {max}"),
                (None, None) => "is out of range".to_string(),
            }
        }
        other => format!("failed rule '{other}'"),
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Normalize a tag name: trim whitespace and lowercase.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validate a single tag name after normalization, reported against `name`.
pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    match tag_name_violation("name".to_string(), name) {
        None => Ok(()),
        Some(violation) => Err(CoreError::InvalidFields(vec![violation])),
    }
}

/// Validate a list of tag names after normalization.
///
/// Each name must be 2-30 characters once trimmed. Violations are reported
/// against `tags[index]`.
pub fn validate_tag_names(names: &[String]) -> Result<(), CoreError> {
    let violations: Vec<FieldViolation> = names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| tag_name_violation(format!("tags[{i}]"), name))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(violations))
    }
}

fn tag_name_violation(field: String, name: &str) -> Option<FieldViolation> {
    let len = normalize_tag_name(name).chars().count();
    if (TAG_NAME_MIN_LEN..=TAG_NAME_MAX_LEN).contains(&len) {
        return None;
    }
    Some(FieldViolation::new(
        field,
        "length",
        format!("must be between {TAG_NAME_MIN_LEN} and {TAG_NAME_MAX_LEN} characters"),
    ))
}

/// Deduplicate tag names by their normalized form, keeping first-seen order.
pub fn dedup_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .map(|n| normalize_tag_name(n))
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 5, max = 200))]
        title: String,
        #[validate(email)]
        email: String,
        #[validate(regex(path = *HEX_COLOR))]
        color: String,
    }

    fn sample(title: &str, email: &str, color: &str) -> Sample {
        Sample {
            title: title.into(),
            email: email.into(),
            color: color.into(),
        }
    }

    #[test]
    fn hex_color_pattern() {
        assert!(HEX_COLOR.is_match("#3498db"));
        assert!(HEX_COLOR.is_match("#ABCDEF"));
        assert!(!HEX_COLOR.is_match("blue"));
        assert!(!HEX_COLOR.is_match("#3498d"));
        assert!(!HEX_COLOR.is_match("#3498dbff"));
        assert!(!HEX_COLOR.is_match("3498db"));
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_input(&sample("Hello", "a@example.com", "#3498db")).is_ok());
    }

    #[test]
    fn violations_name_field_and_rule() {
        let err = validate_input(&sample("Hi", "not-an-email", "blue")).unwrap_err();
        let violations = assert_matches!(err, CoreError::InvalidFields(v) => v);
        let fields: Vec<_> = violations.iter().map(|v| (v.field.as_str(), v.rule.as_str())).collect();
        assert_eq!(fields, vec![("color", "regex"), ("email", "email"), ("title", "length")]);
        assert_eq!(violations[2].message, "must be between 5 and 200 characters");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Five characters, ten bytes.
        assert!(validate_input(&sample("åäöåä", "a@example.com", "#000000")).is_ok());
    }

    #[test]
    fn tag_names_are_checked_after_trimming() {
        assert!(validate_tag_names(&["ok".into(), "  park  ".into()]).is_ok());
        let err = validate_tag_names(&["x".into(), "fine".into(), " ".into()]).unwrap_err();
        let violations = assert_matches!(err, CoreError::InvalidFields(v) => v);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "tags[0]");
        assert_eq!(violations[1].field, "tags[2]");
    }

    #[test]
    fn single_tag_name_reported_against_name() {
        assert!(validate_tag_name(" Cykel ").is_ok());
        let err = validate_tag_name("a").unwrap_err();
        let violations = assert_matches!(err, CoreError::InvalidFields(v) => v);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn tag_names_deduplicated_case_insensitively() {
        let names = vec!["Park".to_string(), "park ".to_string(), "Skola".to_string()];
        assert_eq!(dedup_tag_names(&names), vec!["park", "skola"]);
    }
}
