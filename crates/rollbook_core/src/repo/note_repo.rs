//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide enrollment-scoped note persistence.
//! - Own the `updated_at` refresh rule for note edits.
//!
//! # Invariants
//! - Note list order is `updated_at DESC, id DESC`.
//! - New notes are written with `created_at == updated_at`.
//! - Edits set `updated_at = max(now, previous + 1)`, so it advances strictly
//!   even when two writes land in the same millisecond.
//! - Deletes are hard deletes.

use crate::model::enrollment::EnrollmentId;
use crate::model::note::{validate_note_content, Note, NoteId};
use crate::model::EntityRef;
use crate::repo::rows::{parse_note_row, NOTE_COLUMNS};
use crate::repo::{ensure_connection_ready, now_epoch_ms, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Creates one note under an existing enrollment.
    fn create_note(&self, enrollment_id: EnrollmentId, content: &str) -> RepoResult<Note>;
    /// Replaces note content and refreshes `updated_at`.
    fn update_note_content(&self, note_id: NoteId, content: &str) -> RepoResult<Note>;
    fn delete_note(&self, note_id: NoteId) -> RepoResult<()>;
    fn get_note(&self, note_id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes_for_enrollment(&self, enrollment_id: EnrollmentId) -> RepoResult<Vec<Note>>;
    fn enrollment_exists(&self, enrollment_id: EnrollmentId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["enrollments", "notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, enrollment_id: EnrollmentId, content: &str) -> RepoResult<Note> {
        validate_note_content(content)?;
        if !row_exists(self.conn, "enrollments", enrollment_id)? {
            return Err(RepoError::NotFound(EntityRef::Enrollment(enrollment_id)));
        }

        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO notes (enrollment_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![enrollment_id, content, now],
        )?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            enrollment_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_note_content(&self, note_id: NoteId, content: &str) -> RepoResult<Note> {
        validate_note_content(content)?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                content = ?2,
                updated_at = MAX(?3, updated_at + 1)
             WHERE id = ?1;",
            params![note_id, content, now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Note(note_id)));
        }

        self.get_note(note_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("note {note_id} missing after update"))
        })
    }

    fn delete_note(&self, note_id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [note_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Note(note_id)));
        }
        Ok(())
    }

    fn get_note(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.id = ?1;"))?;
        let mut rows = stmt.query([note_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes_for_enrollment(&self, enrollment_id: EnrollmentId) -> RepoResult<Vec<Note>> {
        list_notes_in(self.conn, enrollment_id)
    }

    fn enrollment_exists(&self, enrollment_id: EnrollmentId) -> RepoResult<bool> {
        row_exists(self.conn, "enrollments", enrollment_id)
    }
}

pub(crate) fn list_notes_in(
    conn: &Connection,
    enrollment_id: EnrollmentId,
) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS}
         FROM notes n
         WHERE n.enrollment_id = ?1
         ORDER BY n.updated_at DESC, n.id DESC;"
    ))?;
    let mut rows = stmt.query([enrollment_id])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}
