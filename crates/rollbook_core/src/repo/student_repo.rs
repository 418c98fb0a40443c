//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist students and their optional initial enrollment atomically.
//! - Serve directory/profile reads with enrollments and classes preloaded.
//!
//! # Invariants
//! - Student + initial enrollment are written in one immediate transaction.
//! - Edits replace every editable column.
//! - Directory reads issue a fixed number of queries regardless of row count.
//! - Student list order is `full_name ASC, id ASC`; per-student enrollment
//!   order is `class.name ASC, class.id ASC`.

use crate::model::class_group::ClassId;
use crate::model::enrollment::{Enrollment, StudentEnrollment, StudentWithEnrollments};
use crate::model::student::{Student, StudentFields, StudentId};
use crate::model::EntityRef;
use crate::repo::enrollment_repo::get_or_create_in;
use crate::repo::rows::{
    parse_class_row, parse_enrollment_row, parse_student_row, CLASS_COLUMNS, ENROLLMENT_COLUMNS,
    STUDENT_COLUMNS,
};
use crate::repo::{ensure_connection_ready, now_epoch_ms, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, TransactionBehavior};
use std::collections::HashMap;

/// Repository interface for student operations.
pub trait StudentRepository {
    /// Creates one student and, when `class_id` is set, enrolls it in the
    /// same transaction.
    fn create_student(
        &mut self,
        fields: &StudentFields,
        class_id: Option<ClassId>,
    ) -> RepoResult<(Student, Option<Enrollment>)>;
    /// Replaces every editable field of an existing student.
    fn update_student(&self, id: StudentId, fields: &StudentFields) -> RepoResult<Student>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn list_students_with_enrollments(&self) -> RepoResult<Vec<StudentWithEnrollments>>;
    fn get_student_with_enrollments(
        &self,
        id: StudentId,
    ) -> RepoResult<Option<StudentWithEnrollments>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["classes", "students", "enrollments"])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(
        &mut self,
        fields: &StudentFields,
        class_id: Option<ClassId>,
    ) -> RepoResult<(Student, Option<Enrollment>)> {
        fields.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(class_id) = class_id {
            if !row_exists(&tx, "classes", class_id)? {
                return Err(RepoError::NotFound(EntityRef::Class(class_id)));
            }
        }

        let created_at = now_epoch_ms();
        tx.execute(
            "INSERT INTO students (
                full_name,
                email,
                phone,
                age,
                birth_date,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                fields.full_name.as_str(),
                fields.email.as_deref(),
                fields.phone.as_deref(),
                fields.age,
                fields.birth_date,
                fields.address.as_deref(),
                created_at,
            ],
        )?;
        let student = student_from_fields(tx.last_insert_rowid(), fields, created_at);

        let enrollment = match class_id {
            Some(class_id) => Some(get_or_create_in(&tx, class_id, student.id)?.enrollment),
            None => None,
        };

        tx.commit()?;
        Ok((student, enrollment))
    }

    fn update_student(&self, id: StudentId, fields: &StudentFields) -> RepoResult<Student> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE students
             SET
                full_name = ?2,
                email = ?3,
                phone = ?4,
                age = ?5,
                birth_date = ?6,
                address = ?7
             WHERE id = ?1;",
            params![
                id,
                fields.full_name.as_str(),
                fields.email.as_deref(),
                fields.phone.as_deref(),
                fields.age,
                fields.birth_date,
                fields.address.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Student(id)));
        }

        self.get_student(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("student {id} missing after update"))
        })
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students s WHERE s.id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students s ORDER BY s.full_name ASC, s.id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn list_students_with_enrollments(&self) -> RepoResult<Vec<StudentWithEnrollments>> {
        let students = self.list_students()?;
        let mut by_student = load_enrollments_by_student(&*self.conn, None)?;
        Ok(students
            .into_iter()
            .map(|student| StudentWithEnrollments {
                enrollments: by_student.remove(&student.id).unwrap_or_default(),
                student,
            })
            .collect())
    }

    fn get_student_with_enrollments(
        &self,
        id: StudentId,
    ) -> RepoResult<Option<StudentWithEnrollments>> {
        let Some(student) = self.get_student(id)? else {
            return Ok(None);
        };
        let mut by_student = load_enrollments_by_student(&*self.conn, Some(id))?;
        Ok(Some(StudentWithEnrollments {
            enrollments: by_student.remove(&id).unwrap_or_default(),
            student,
        }))
    }
}

/// Loads enrollments joined with their classes in one query, grouped by
/// student id. `only_student` narrows the query to one student.
fn load_enrollments_by_student(
    conn: &Connection,
    only_student: Option<StudentId>,
) -> RepoResult<HashMap<StudentId, Vec<StudentEnrollment>>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENROLLMENT_COLUMNS}, {CLASS_COLUMNS}
         FROM enrollments e
         INNER JOIN classes c ON c.id = e.class_id
         WHERE (?1 IS NULL OR e.student_id = ?1)
         ORDER BY c.name ASC, c.id ASC;"
    ))?;
    let mut rows = stmt.query([only_student])?;
    let mut grouped: HashMap<StudentId, Vec<StudentEnrollment>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let enrollment = parse_enrollment_row(row)?;
        let classroom = parse_class_row(row)?;
        grouped
            .entry(enrollment.student_id)
            .or_default()
            .push(StudentEnrollment {
                enrollment,
                classroom,
            });
    }
    Ok(grouped)
}

fn student_from_fields(id: StudentId, fields: &StudentFields, created_at: i64) -> Student {
    Student {
        id,
        full_name: fields.full_name.clone(),
        email: fields.email.clone(),
        phone: fields.phone.clone(),
        age: fields.age,
        birth_date: fields.birth_date,
        address: fields.address.clone(),
        created_at,
    }
}
