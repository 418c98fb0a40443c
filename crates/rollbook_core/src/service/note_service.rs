//! Note use-case service.
//!
//! # Invariants
//! - Adding blank content is a silent no-op: no row, no error.
//! - Editing to blank content is a validation error.
//! - Deletes are immediate and unconditional.
//! - Note content never reaches log output.

use crate::model::enrollment::EnrollmentId;
use crate::model::note::{has_note_content, Note, NoteId};
use crate::model::EntityRef;
use crate::repo::note_repo::NoteRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info};

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a note to an enrollment.
    ///
    /// Returns `Ok(None)` without writing when `content` is blank.
    ///
    /// # Errors
    /// - `NotFound` when the enrollment does not exist.
    pub fn add_note(
        &self,
        enrollment_id: EnrollmentId,
        content: &str,
    ) -> ServiceResult<Option<Note>> {
        if !self.repo.enrollment_exists(enrollment_id)? {
            return Err(ServiceError::NotFound(EntityRef::Enrollment(enrollment_id)));
        }
        if !has_note_content(content) {
            debug!(
                "event=note_add module=service status=skipped reason=blank_content enrollment_id={enrollment_id}"
            );
            return Ok(None);
        }

        let note = self.repo.create_note(enrollment_id, content)?;
        info!(
            "event=note_add module=service status=ok enrollment_id={} note_id={} content_chars={}",
            enrollment_id,
            note.id,
            note.content.chars().count()
        );
        Ok(Some(note))
    }

    /// Replaces note content and refreshes `updated_at`.
    pub fn edit_note(&self, note_id: NoteId, content: &str) -> ServiceResult<Note> {
        let note = self.repo.update_note_content(note_id, content)?;
        info!(
            "event=note_edit module=service status=ok note_id={} content_chars={}",
            note.id,
            note.content.chars().count()
        );
        Ok(note)
    }

    /// Deletes one note.
    pub fn delete_note(&self, note_id: NoteId) -> ServiceResult<()> {
        self.repo.delete_note(note_id)?;
        info!("event=note_delete module=service status=ok note_id={note_id}");
        Ok(())
    }

    pub fn get_note(&self, note_id: NoteId) -> ServiceResult<Note> {
        self.repo
            .get_note(note_id)?
            .ok_or(ServiceError::NotFound(EntityRef::Note(note_id)))
    }

    /// Lists notes of one enrollment, most recently updated first.
    pub fn list_notes_for_enrollment(&self, enrollment_id: EnrollmentId) -> ServiceResult<Vec<Note>> {
        if !self.repo.enrollment_exists(enrollment_id)? {
            return Err(ServiceError::NotFound(EntityRef::Enrollment(enrollment_id)));
        }
        Ok(self.repo.list_notes_for_enrollment(enrollment_id)?)
    }
}
