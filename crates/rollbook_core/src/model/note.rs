//! Note domain model.
//!
//! # Invariants
//! - `content` is non-blank plain text with no length cap.
//! - `updated_at == created_at` at creation; edits move `updated_at` strictly
//!   forward and never touch `created_at`.

use crate::model::enrollment::EnrollmentId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub type NoteId = i64;

const SHORT_CONTENT_CHARS: usize = 50;

/// Free-text note scoped to one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub enrollment_id: EnrollmentId,
    pub content: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms timestamp of the last mutation.
    pub updated_at: i64,
}

impl Note {
    /// Returns the first 50 chars of content, with `...` when truncated.
    pub fn short_content(&self) -> String {
        if self.content.chars().count() > SHORT_CONTENT_CHARS {
            let head: String = self.content.chars().take(SHORT_CONTENT_CHARS).collect();
            format!("{head}...")
        } else {
            self.content.clone()
        }
    }
}

/// Returns whether note content carries any non-whitespace text.
pub fn has_note_content(content: &str) -> bool {
    !content.trim().is_empty()
}

/// Checks that edited note content is not blank.
pub fn validate_note_content(content: &str) -> Result<(), ValidationError> {
    if has_note_content(content) {
        Ok(())
    } else {
        Err(ValidationError::Required { field: "content" })
    }
}

#[cfg(test)]
mod tests {
    use super::Note;

    fn note(content: &str) -> Note {
        Note {
            id: 1,
            enrollment_id: 1,
            content: content.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn short_content_keeps_short_text() {
        assert_eq!(note("short").short_content(), "short");
        assert_eq!(note(&"x".repeat(50)).short_content(), "x".repeat(50));
    }

    #[test]
    fn short_content_truncates_long_text() {
        let long = "y".repeat(51);
        assert_eq!(note(&long).short_content(), format!("{}...", "y".repeat(50)));
    }
}
