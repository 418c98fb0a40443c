//! Student domain model.
//!
//! # Invariants
//! - `full_name` is non-blank and at most 150 chars.
//! - `email`, when present, is a syntactically valid address.
//! - `phone`, when present, is at most 20 chars.
//! - `age` is non-negative by construction (`u32`).

use crate::model::validation::{
    check_email, normalize_optional, normalize_required, trim_optional, ValidationError,
    STUDENT_NAME_MAX_CHARS, STUDENT_PHONE_MAX_CHARS,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type StudentId = i64;

/// A person who may be enrolled in zero or more classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}

impl Student {
    /// Returns the editable fields, e.g. to prefill an edit form.
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            age: self.age,
            birth_date: self.birth_date,
            address: self.address.clone(),
        }
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Editable student attributes.
///
/// Used for both creation and edit. Edits replace every field, so a `None`
/// here clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
}

impl StudentFields {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    /// Trims text fields and drops blank optional values.
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: trim_optional(self.email),
            phone: trim_optional(self.phone),
            age: self.age,
            birth_date: self.birth_date,
            address: trim_optional(self.address),
        }
    }

    /// Checks field rules. Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_required("full_name", &self.full_name, Some(STUDENT_NAME_MAX_CHARS))?;
        if let Some(email) = normalize_optional("email", self.email.as_deref(), None)? {
            check_email("email", &email)?;
        }
        normalize_optional("phone", self.phone.as_deref(), Some(STUDENT_PHONE_MAX_CHARS))?;
        Ok(())
    }
}
