// Validation utilities module
// Custom validation functions shared by request DTOs

use validator::ValidationError;

/// Rejects strings that are empty or only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        Err(error)
    } else {
        Ok(())
    }
}

/// Usernames are ASCII letters, digits, '.', '_' or '-'
pub fn validate_username_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some("Username may only contain letters, digits, '.', '_' and '-'".into());
        Err(error)
    }
}
