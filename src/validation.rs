//! Input validation and coercion for ledger edits and project fields.

use crate::error::{ApportionError, Result};
use crate::model::{Percent, Role, UserId};
use std::collections::HashSet;

/// Maximum allowed length for a project name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum allowed length for a project description.
pub const MAX_DESCRIPTION_LENGTH: usize = 50_000;

/// Coerces a free-form percent field: unparsable or empty input counts as 0,
/// anything else is clamped to `[0, 100]`.
pub fn parse_percent_input(input: &str) -> Percent {
    Percent::clamped(input.trim().parse::<f64>().unwrap_or(0.0))
}

/// Coerces a free-form ETA field: empty input clears the ETA, unparsable
/// input counts as 0, negative values clamp to 0.
pub fn parse_eta_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let days = trimmed.parse::<f64>().unwrap_or(0.0);
    Some(if days.is_nan() { 0.0 } else { days.max(0.0) })
}

/// Strict check for ETAs read from files.
pub fn validate_eta(days: f64) -> Result<()> {
    if !days.is_finite() || days < 0.0 {
        return Err(ApportionError::Validation(format!(
            "ETA must be a non-negative number of days, got {}",
            days
        )));
    }
    Ok(())
}

pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ApportionError::Validation(
            "Project name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ApportionError::Validation(format!(
            "Project name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ApportionError::Validation(format!(
            "Description exceeds maximum length of {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// A user may appear at most once per ledger.
pub fn validate_unique_ids(ids: &[UserId], role: Role) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ApportionError::Validation(format!(
                "User {} is listed more than once among {}s",
                id, role
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_input() {
        assert_eq!(parse_percent_input("42.5").value(), 42.5);
        assert_eq!(parse_percent_input(" 10 ").value(), 10.0);
        assert_eq!(parse_percent_input("").value(), 0.0);
        assert_eq!(parse_percent_input("abc").value(), 0.0);
        assert_eq!(parse_percent_input("120").value(), 100.0);
        assert_eq!(parse_percent_input("-4").value(), 0.0);
    }

    #[test]
    fn test_parse_eta_input() {
        assert_eq!(parse_eta_input(""), None);
        assert_eq!(parse_eta_input("   "), None);
        assert_eq!(parse_eta_input("2"), Some(2.0));
        assert_eq!(parse_eta_input("-1"), Some(0.0));
        assert_eq!(parse_eta_input("soon"), Some(0.0));
    }

    #[test]
    fn test_validate_eta() {
        assert!(validate_eta(0.0).is_ok());
        assert!(validate_eta(3.5).is_ok());
        assert!(validate_eta(-1.0).is_err());
        assert!(validate_eta(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("  ").is_err());
        assert!(validate_project_name("Bird species").is_ok());
        assert!(validate_project_name(&"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids(&[1, 2, 3], Role::Annotator).is_ok());
        let err = validate_unique_ids(&[1, 2, 1], Role::Reviewer).unwrap_err();
        assert!(err.to_string().contains("reviewers"));
    }
}
