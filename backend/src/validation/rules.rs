//! Common validation rules shared across request payloads.

use validator::ValidationError;

use crate::utils::schedule::Schedule;

/// Validates username format.
///
/// Requirements:
/// - Only alphanumeric characters and underscores
/// - 1-50 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > 50 {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}

/// Validates a letter grade: A+, A, A-, ... F. At most two characters.
pub fn validate_grade(grade: &str) -> Result<(), ValidationError> {
    let mut chars = grade.chars();
    let letter = match chars.next() {
        Some(c @ ('A'..='D' | 'F')) => c,
        Some(_) => return Err(ValidationError::new("grade_unknown_letter")),
        None => return Err(ValidationError::new("grade_empty")),
    };
    match (chars.next(), chars.next()) {
        (None, _) => Ok(()),
        (Some('+') | Some('-'), None) if letter != 'F' => Ok(()),
        _ => Err(ValidationError::new("grade_malformed")),
    }
}

/// Validates a schedule string by parsing it.
pub fn validate_schedule_text(schedule: &str) -> Result<(), ValidationError> {
    Schedule::parse(schedule).map_err(|_| ValidationError::new("schedule_malformed"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(validate_username("").is_err());
    }

    #[test]
    fn username_rejects_special_chars() {
        assert!(validate_username("user@name").is_err());
    }

    #[test]
    fn username_accepts_valid() {
        assert!(validate_username("advisor_01").is_ok());
    }

    #[test]
    fn grade_accepts_plain_and_signed() {
        assert!(validate_grade("A").is_ok());
        assert!(validate_grade("B+").is_ok());
        assert!(validate_grade("C-").is_ok());
        assert!(validate_grade("F").is_ok());
    }

    #[test]
    fn grade_rejects_malformed() {
        assert!(validate_grade("").is_err());
        assert!(validate_grade("E").is_err());
        assert!(validate_grade("F+").is_err());
        assert!(validate_grade("A++").is_err());
        assert!(validate_grade("AB").is_err());
    }

    #[test]
    fn schedule_text_delegates_to_parser() {
        assert!(validate_schedule_text("Mon - Wed, 09:00 - 10:30").is_ok());
        assert!(validate_schedule_text("whenever").is_err());
    }
}
