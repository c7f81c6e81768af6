//! Field validation shared by every write path.
//!
//! Validation runs before any database write, so a rejected request never
//! creates partial state.

use thiserror::Error;

/// A required field is empty, missing, or out of bounds.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Validate and normalize an entity title. Returns the trimmed title.
///
/// Titles are required for sparks, ideas, projects, and tasks; promotion
/// re-validates the source title before any write occurs.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim().to_string();
    if trimmed.is_empty() {
        return Err(ValidationError("title must not be empty".into()));
    }
    if trimmed.len() > 256 {
        return Err(ValidationError("title must be at most 256 characters".into()));
    }
    Ok(trimmed)
}

/// Validate and normalize a project status name.
pub fn validate_status_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim().to_string();
    if trimmed.is_empty() {
        return Err(ValidationError("status name must not be empty".into()));
    }
    if trimmed.len() > 64 {
        return Err(ValidationError(
            "status name must be at most 64 characters".into(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("Build a CLI tool").unwrap(), "Build a CLI tool");
        assert_eq!(validate_title("  padded  ").unwrap(), "padded");
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(257)).is_err());
        assert!(validate_title(&"x".repeat(256)).is_ok());
    }

    #[test]
    fn test_validate_status_name() {
        assert_eq!(validate_status_name(" In Progress ").unwrap(), "In Progress");
        assert!(validate_status_name("\t").is_err());
        assert!(validate_status_name(&"s".repeat(65)).is_err());
    }
}
