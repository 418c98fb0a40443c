//! Student use-case service.
//!
//! # Invariants
//! - Student fields are trimmed and validated before any write.
//! - Creating a student inside a class writes the student and the enrollment
//!   together or not at all.
//! - Edits are full replacements; there is no partial update.

use crate::model::class_group::ClassId;
use crate::model::enrollment::{Enrollment, StudentWithEnrollments};
use crate::model::student::{Student, StudentFields, StudentId};
use crate::model::EntityRef;
use crate::repo::student_repo::StudentRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

/// Student service facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a student and, when `class_id` is given, enrolls it in the
    /// same transaction.
    ///
    /// # Errors
    /// - `NotFound` when `class_id` does not exist; nothing is written.
    /// - `Validation` for invalid fields.
    pub fn create_student_and_enroll(
        &mut self,
        class_id: Option<ClassId>,
        fields: StudentFields,
    ) -> ServiceResult<(Student, Option<Enrollment>)> {
        let fields = fields.normalized();
        fields.validate()?;

        let (student, enrollment) = self.repo.create_student(&fields, class_id)?;
        info!(
            "event=student_create module=service status=ok student_id={} class_id={} enrollment_id={}",
            student.id,
            class_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
            enrollment
                .as_ref()
                .map_or_else(|| "none".to_string(), |e| e.id.to_string())
        );
        Ok((student, enrollment))
    }

    /// Creates a student with no enrollment.
    pub fn create_student_global(&mut self, fields: StudentFields) -> ServiceResult<Student> {
        let (student, _) = self.create_student_and_enroll(None, fields)?;
        Ok(student)
    }

    /// Replaces every editable field of one student.
    pub fn edit_student(&self, id: StudentId, fields: StudentFields) -> ServiceResult<Student> {
        let fields = fields.normalized();
        fields.validate()?;

        let student = self.repo.update_student(id, &fields)?;
        info!("event=student_edit module=service status=ok student_id={id}");
        Ok(student)
    }

    pub fn get_student(&self, id: StudentId) -> ServiceResult<Student> {
        self.repo
            .get_student(id)?
            .ok_or(ServiceError::NotFound(EntityRef::Student(id)))
    }

    /// Lists every student ordered by full name.
    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    /// Lists every student with enrollments and classes preloaded.
    pub fn list_students_with_enrollments(&self) -> ServiceResult<Vec<StudentWithEnrollments>> {
        Ok(self.repo.list_students_with_enrollments()?)
    }

    /// Loads one student profile with enrollments and classes preloaded.
    pub fn get_student_with_enrollments(
        &self,
        id: StudentId,
    ) -> ServiceResult<StudentWithEnrollments> {
        self.repo
            .get_student_with_enrollments(id)?
            .ok_or(ServiceError::NotFound(EntityRef::Student(id)))
    }
}
