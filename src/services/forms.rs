//! Input validation shared by the sign-in, profile, expense and report flows.
//!
//! Messages are meant to be shown to the user as-is.

use crate::net::types::Credentials;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters", min = MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Please fill in required fields")]
    MissingProfileFields,

    #[error("{field} must be a non-negative number")]
    InvalidNumber { field: &'static str },

    #[error("Monthly cycle start must be a day between 1 and 31")]
    InvalidCycleStart,

    #[error("Reminder time must be HH:MM")]
    InvalidReminderTime,

    #[error("Please fill in all fields and select a date")]
    MissingExpenseFields,

    #[error("Invalid date")]
    InvalidDate,

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Month must be between 1 and 12")]
    InvalidMonth,

    #[error("Year must be between {min} and {max}")]
    YearOutOfRange { min: i32, max: i32 },

    #[error("Report start month must not be after the end month")]
    InvertedRange,
}

/// Check login input before it reaches the network.
///
/// # Errors
///
/// [`FormError::MissingFields`] when either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<Credentials, FormError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FormError::MissingFields);
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

/// Check signup input: all fields present, confirmation matches, password
/// long enough.
///
/// # Errors
///
/// The first rule that fails, in that order.
pub fn validate_signup(email: &str, password: &str, confirm_password: &str) -> Result<Credentials, FormError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(FormError::MissingFields);
    }
    if password != confirm_password {
        return Err(FormError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

/// Parse a money amount typed by the user. Blank yields `None`.
pub(crate) fn parse_amount(raw: &str, field: &'static str) -> Result<Option<f64>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(FormError::InvalidNumber { field }),
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
