//! Class (course) domain model.
//!
//! # Invariants
//! - `name` is non-blank, at most 100 chars, and globally unique.
//! - Classes are never updated or deleted through the operation surface.

use crate::model::validation::{
    normalize_optional, normalize_required, trim_optional, ValidationError, CLASS_NAME_MAX_CHARS,
    CLASS_SUBJECT_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type ClassId = i64;

/// A named class that students enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: ClassId,
    pub name: String,
    pub subject: Option<String>,
    pub description: Option<String>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}

impl Display for ClassGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for the create-class use-case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClassGroup {
    pub name: String,
    pub subject: Option<String>,
    pub description: Option<String>,
}

impl NewClassGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trims every field and drops blank optional values.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            subject: trim_optional(self.subject),
            description: trim_optional(self.description),
        }
    }

    /// Checks field rules. Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_required("name", &self.name, Some(CLASS_NAME_MAX_CHARS))?;
        normalize_optional("subject", self.subject.as_deref(), Some(CLASS_SUBJECT_MAX_CHARS))?;
        Ok(())
    }
}
