use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::ApiError;

/// Collects per-field messages and turns them into a single validation error.
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn require_text(&mut self, field: &str, value: &str, max_len: usize) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, format!("{} is required", field));
        } else if trimmed.chars().count() > max_len {
            self.add(field, format!("{} must be at most {} characters", field, max_len));
        }
    }

    pub fn require_email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value.trim()) {
            self.add(field, "A valid email address is required");
        }
    }

    pub fn require_id(&mut self, field: &str, value: i64) {
        if value <= 0 {
            self.add(field, format!("{} must be a positive id", field));
        }
    }

    pub fn require_order(&mut self, field: &str, start: NaiveDate, end: NaiveDate) {
        if start > end {
            self.add(field, "End date must not be before start date");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.0)))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ann@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@@example.com"));
        assert!(!is_valid_email("ann lee@example.com"));
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "", 10);
        errors.add("name", "ignored");
        let err = errors.into_result("Invalid").unwrap_err();
        assert_eq!(err.field_errors().unwrap()["name"], "name is required");
    }
}
