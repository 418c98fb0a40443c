//! Shared column lists and row decoders for roster queries.
//!
//! Every query selects columns through these aliased lists so one decoder
//! serves both single-table and joined reads.

use crate::model::class_group::ClassGroup;
use crate::model::enrollment::Enrollment;
use crate::model::note::Note;
use crate::model::student::Student;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Row;

pub(crate) const CLASS_COLUMNS: &str = "c.id AS class_id,
    c.name AS class_name,
    c.subject AS class_subject,
    c.description AS class_description,
    c.created_at AS class_created_at";

pub(crate) const STUDENT_COLUMNS: &str = "s.id AS student_id,
    s.full_name AS student_full_name,
    s.email AS student_email,
    s.phone AS student_phone,
    s.age AS student_age,
    s.birth_date AS student_birth_date,
    s.address AS student_address,
    s.created_at AS student_created_at";

pub(crate) const ENROLLMENT_COLUMNS: &str = "e.id AS enrollment_id,
    e.student_id AS enrollment_student_id,
    e.class_id AS enrollment_class_id,
    e.joined_at AS enrollment_joined_at";

pub(crate) const NOTE_COLUMNS: &str = "n.id AS note_id,
    n.enrollment_id AS note_enrollment_id,
    n.content AS note_content,
    n.created_at AS note_created_at,
    n.updated_at AS note_updated_at";

pub(crate) fn parse_class_row(row: &Row<'_>) -> RepoResult<ClassGroup> {
    Ok(ClassGroup {
        id: row.get("class_id")?,
        name: row.get("class_name")?,
        subject: row.get("class_subject")?,
        description: row.get("class_description")?,
        created_at: row.get("class_created_at")?,
    })
}

pub(crate) fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: i64 = row.get("student_id")?;
    let age = match row.get::<_, Option<i64>>("student_age")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid age `{value}` in students.age for student {id}"
            ))
        })?),
        None => None,
    };

    Ok(Student {
        id,
        full_name: row.get("student_full_name")?,
        email: row.get("student_email")?,
        phone: row.get("student_phone")?,
        age,
        birth_date: row.get("student_birth_date")?,
        address: row.get("student_address")?,
        created_at: row.get("student_created_at")?,
    })
}

pub(crate) fn parse_enrollment_row(row: &Row<'_>) -> RepoResult<Enrollment> {
    Ok(Enrollment {
        id: row.get("enrollment_id")?,
        student_id: row.get("enrollment_student_id")?,
        class_id: row.get("enrollment_class_id")?,
        joined_at: row.get("enrollment_joined_at")?,
    })
}

pub(crate) fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("note_id")?,
        enrollment_id: row.get("note_enrollment_id")?,
        content: row.get("note_content")?,
        created_at: row.get("note_created_at")?,
        updated_at: row.get("note_updated_at")?,
    })
}
