//! Field-level validation rules shared by model inputs and request forms.
//!
//! # Invariants
//! - Text inputs are trimmed before any length or emptiness check.
//! - Optional text that is blank after trimming is stored as `NULL`.
//! - Length limits are counted in Unicode scalar values, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CLASS_NAME_MAX_CHARS: usize = 100;
pub const CLASS_SUBJECT_MAX_CHARS: usize = 100;
pub const STUDENT_NAME_MAX_CHARS: usize = 150;
pub const STUDENT_PHONE_MAX_CHARS: usize = 20;
pub const STUDENT_EMAIL_MAX_CHARS: usize = 254;

// Dot-atom local part and hostname domain with an alphabetic or punycode TLD.
static EMAIL_USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+)*$")
        .expect("valid email user regex")
});
static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+(?:[A-Za-z]{2,63}|xn--[A-Za-z0-9]{1,59})$",
    )
    .expect("valid email domain regex")
});
const EMAIL_DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

/// Validation failure attached to one named input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required value is missing or blank.
    Required { field: &'static str },
    /// Value exceeds the maximum allowed length.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Value is not a syntactically valid email address.
    InvalidEmail { field: &'static str },
}

impl ValidationError {
    /// Returns the input field name this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::InvalidEmail { field } => field,
        }
    }

    /// Returns the user-facing message, without the field name.
    pub fn message(&self) -> String {
        match self {
            Self::Required { .. } => "This field is required.".to_string(),
            Self::TooLong {
                max_chars,
                actual_chars,
                ..
            } => format!(
                "Ensure this value has at most {max_chars} characters (it has {actual_chars})."
            ),
            Self::InvalidEmail { .. } => "Enter a valid email address.".to_string(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl Error for ValidationError {}

/// Trims a required text value and checks it against an optional length cap.
pub fn normalize_required(
    field: &'static str,
    value: &str,
    max_chars: Option<usize>,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    check_length(field, trimmed, max_chars)?;
    Ok(trimmed.to_string())
}

/// Trims an optional text value; blank input collapses to `None`.
pub fn normalize_optional(
    field: &'static str,
    value: Option<&str>,
    max_chars: Option<usize>,
) -> Result<Option<String>, ValidationError> {
    let Some(trimmed) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    check_length(field, trimmed, max_chars)?;
    Ok(Some(trimmed.to_string()))
}

/// Checks email syntax. Callers pass already-trimmed values.
pub fn check_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check_length(field, value, Some(STUDENT_EMAIL_MAX_CHARS))?;
    let Some((user, domain)) = value.rsplit_once('@') else {
        return Err(ValidationError::InvalidEmail { field });
    };
    let domain_ok = EMAIL_DOMAIN_ALLOWLIST
        .iter()
        .any(|allowed| domain.eq_ignore_ascii_case(allowed))
        || EMAIL_DOMAIN_RE.is_match(domain);
    if EMAIL_USER_RE.is_match(user) && domain_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail { field })
    }
}

pub(crate) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn check_length(
    field: &'static str,
    value: &str,
    max_chars: Option<usize>,
) -> Result<(), ValidationError> {
    let Some(max_chars) = max_chars else {
        return Ok(());
    };
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
