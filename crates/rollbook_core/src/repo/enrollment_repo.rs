//! Enrollment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the get-or-create path for `(student, class)` memberships.
//! - Serve class rosters and per-class student detail with related rows
//!   loaded by joins instead of per-row lookups.
//!
//! # Invariants
//! - Get-or-create never produces a second row for the same pair, even
//!   under concurrent writers (`ON CONFLICT DO NOTHING` + read-back).
//! - Class roster order is `student.full_name ASC, student.id ASC`.

use crate::model::class_group::ClassId;
use crate::model::enrollment::{
    ClassEnrollment, Enrollment, EnrollmentId, EnrollmentOutcome, StudentClassDetail,
};
use crate::model::student::StudentId;
use crate::model::EntityRef;
use crate::repo::note_repo::list_notes_in;
use crate::repo::rows::{
    parse_class_row, parse_enrollment_row, parse_student_row, CLASS_COLUMNS, ENROLLMENT_COLUMNS,
    STUDENT_COLUMNS,
};
use crate::repo::{ensure_connection_ready, now_epoch_ms, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for enrollment operations.
pub trait EnrollmentRepository {
    /// Returns the existing enrollment for the pair or creates it.
    fn get_or_create_enrollment(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> RepoResult<EnrollmentOutcome>;
    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>>;
    /// Lists one class roster with students preloaded.
    fn list_for_class(&self, class_id: ClassId) -> RepoResult<Vec<ClassEnrollment>>;
    /// Loads class, student, enrollment and notes for one membership.
    fn get_student_detail(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> RepoResult<Option<StudentClassDetail>>;
    fn class_exists(&self, class_id: ClassId) -> RepoResult<bool>;
}

/// SQLite-backed enrollment repository.
pub struct SqliteEnrollmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["classes", "students", "enrollments", "notes"])?;
        Ok(Self { conn })
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository<'_> {
    fn get_or_create_enrollment(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> RepoResult<EnrollmentOutcome> {
        if !row_exists(self.conn, "classes", class_id)? {
            return Err(RepoError::NotFound(EntityRef::Class(class_id)));
        }
        if !row_exists(self.conn, "students", student_id)? {
            return Err(RepoError::NotFound(EntityRef::Student(student_id)));
        }
        get_or_create_in(self.conn, class_id, student_id)
    }

    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments e WHERE e.id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_enrollment_row(row)?));
        }
        Ok(None)
    }

    fn list_for_class(&self, class_id: ClassId) -> RepoResult<Vec<ClassEnrollment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENROLLMENT_COLUMNS}, {STUDENT_COLUMNS}
             FROM enrollments e
             INNER JOIN students s ON s.id = e.student_id
             WHERE e.class_id = ?1
             ORDER BY s.full_name ASC, s.id ASC;"
        ))?;
        let mut rows = stmt.query([class_id])?;
        let mut roster = Vec::new();
        while let Some(row) = rows.next()? {
            roster.push(ClassEnrollment {
                enrollment: parse_enrollment_row(row)?,
                student: parse_student_row(row)?,
            });
        }
        Ok(roster)
    }

    fn get_student_detail(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> RepoResult<Option<StudentClassDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENROLLMENT_COLUMNS}, {CLASS_COLUMNS}, {STUDENT_COLUMNS}
             FROM enrollments e
             INNER JOIN classes c ON c.id = e.class_id
             INNER JOIN students s ON s.id = e.student_id
             WHERE e.class_id = ?1
               AND e.student_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![class_id, student_id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let enrollment = parse_enrollment_row(row)?;
        let classroom = parse_class_row(row)?;
        let student = parse_student_row(row)?;
        let notes = list_notes_in(self.conn, enrollment.id)?;
        Ok(Some(StudentClassDetail {
            classroom,
            student,
            enrollment,
            notes,
        }))
    }

    fn class_exists(&self, class_id: ClassId) -> RepoResult<bool> {
        row_exists(self.conn, "classes", class_id)
    }
}

/// Get-or-create on the unique pair. Usable inside an open transaction.
pub(crate) fn get_or_create_in(
    conn: &Connection,
    class_id: ClassId,
    student_id: StudentId,
) -> RepoResult<EnrollmentOutcome> {
    let inserted = conn.execute(
        "INSERT INTO enrollments (student_id, class_id, joined_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (student_id, class_id) DO NOTHING;",
        params![student_id, class_id, now_epoch_ms()],
    )?;

    let enrollment = find_in(conn, class_id, student_id)?.ok_or_else(|| {
        RepoError::InvalidData(format!(
            "enrollment for student {student_id} in class {class_id} missing after upsert"
        ))
    })?;

    Ok(EnrollmentOutcome {
        enrollment,
        created: inserted == 1,
    })
}

fn find_in(
    conn: &Connection,
    class_id: ClassId,
    student_id: StudentId,
) -> RepoResult<Option<Enrollment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENROLLMENT_COLUMNS}
         FROM enrollments e
         WHERE e.class_id = ?1
           AND e.student_id = ?2;"
    ))?;
    let mut rows = stmt.query(params![class_id, student_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_enrollment_row(row)?));
    }
    Ok(None)
}
