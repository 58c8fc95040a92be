use super::*;

// =============================================================================
// validate_login
// =============================================================================

#[test]
fn login_requires_both_fields() {
    assert_eq!(validate_login("", "pw"), Err(FormError::MissingFields));
    assert_eq!(validate_login("a@example.com", ""), Err(FormError::MissingFields));
    assert_eq!(validate_login("   ", "pw"), Err(FormError::MissingFields));
}

#[test]
fn login_trims_email_not_password() {
    let creds = validate_login(" a@example.com ", " pw ").unwrap();
    assert_eq!(creds.email, "a@example.com");
    assert_eq!(creds.password, " pw ");
}

// =============================================================================
// validate_signup
// =============================================================================

#[test]
fn signup_requires_all_fields() {
    assert_eq!(validate_signup("a@example.com", "secret1", ""), Err(FormError::MissingFields));
}

#[test]
fn signup_mismatch_checked_before_length() {
    assert_eq!(validate_signup("a@example.com", "abc", "abd"), Err(FormError::PasswordMismatch));
}

#[test]
fn signup_short_password_rejected() {
    let err = validate_signup("a@example.com", "abc12", "abc12").unwrap_err();
    assert_eq!(err, FormError::PasswordTooShort);
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
}

#[test]
fn signup_length_counts_chars_not_bytes() {
    assert!(validate_signup("a@example.com", "ééééé", "ééééé").is_err());
    assert!(validate_signup("a@example.com", "éééééé", "éééééé").is_ok());
}

#[test]
fn signup_valid_returns_credentials() {
    let creds = validate_signup("a@example.com", "secret1", "secret1").unwrap();
    assert_eq!(creds.email, "a@example.com");
}

// =============================================================================
// parse_amount
// =============================================================================

#[test]
fn parse_amount_blank_is_none() {
    assert_eq!(parse_amount("  ", "salary"), Ok(None));
}

#[test]
fn parse_amount_accepts_decimal() {
    assert_eq!(parse_amount("1234.50", "salary"), Ok(Some(1234.5)));
}

#[test]
fn parse_amount_rejects_negative_and_garbage() {
    assert_eq!(parse_amount("-1", "salary"), Err(FormError::InvalidNumber { field: "salary" }));
    assert_eq!(parse_amount("12k", "salary"), Err(FormError::InvalidNumber { field: "salary" }));
    assert_eq!(parse_amount("NaN", "salary"), Err(FormError::InvalidNumber { field: "salary" }));
}
