//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;
use shared::error::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product titles, categories, suppliers, customer names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, slide captions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, payment methods, icons
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Special characters accepted (and one required) in passwords
const PASSWORD_SPECIALS: &str = "@$!%*?&";

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} must not be empty"))
                .with_detail("field", field),
        );
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Unwrap a required optional field, validating it like [`validate_required_text`]
pub fn require_text(value: Option<String>, field: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.unwrap_or_default();
    validate_required_text(&value, field, max_len)?;
    Ok(value.trim().to_string())
}

/// Minimal shape check: `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Invalid email format",
        ));
    }
    Ok(())
}

/// Password policy: min length, lower + upper + digit + special, restricted charset
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let weak = || {
        AppError::with_message(
            ErrorCode::WeakPassword,
            format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long and include an uppercase letter, a lowercase letter, a digit and one of {PASSWORD_SPECIALS}"
            ),
        )
    };

    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(weak());
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    if !password.chars().all(allowed) {
        return Err(weak());
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(weak());
    }
    Ok(())
}
