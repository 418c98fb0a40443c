//! Enrollment use-case service.
//!
//! # Invariants
//! - Enrolling is idempotent on `(class, student)`.
//! - Per-class student detail exists only for enrolled pairs.

use crate::model::class_group::ClassId;
use crate::model::enrollment::{
    ClassEnrollment, Enrollment, EnrollmentId, EnrollmentOutcome, StudentClassDetail,
};
use crate::model::student::StudentId;
use crate::model::EntityRef;
use crate::repo::enrollment_repo::EnrollmentRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

/// Enrollment service facade over repository implementations.
pub struct EnrollmentService<R: EnrollmentRepository> {
    repo: R,
}

impl<R: EnrollmentRepository> EnrollmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one class roster with students preloaded, ordered by name.
    pub fn list_enrollments_for_class(
        &self,
        class_id: ClassId,
    ) -> ServiceResult<Vec<ClassEnrollment>> {
        if !self.repo.class_exists(class_id)? {
            return Err(ServiceError::NotFound(EntityRef::Class(class_id)));
        }
        Ok(self.repo.list_for_class(class_id)?)
    }

    /// Enrolls an existing student, returning the existing row when the
    /// pair is already enrolled.
    pub fn enroll_existing_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> ServiceResult<EnrollmentOutcome> {
        let outcome = self.repo.get_or_create_enrollment(class_id, student_id)?;
        info!(
            "event=enroll module=service status=ok class_id={} student_id={} enrollment_id={} created={}",
            class_id, student_id, outcome.enrollment.id, outcome.created
        );
        Ok(outcome)
    }

    /// Loads class, student, enrollment and ordered notes for one pair.
    pub fn get_student_detail_in_class(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> ServiceResult<StudentClassDetail> {
        self.repo
            .get_student_detail(class_id, student_id)?
            .ok_or(ServiceError::NotFound(EntityRef::Membership {
                class_id,
                student_id,
            }))
    }

    pub fn get_enrollment(&self, id: EnrollmentId) -> ServiceResult<Enrollment> {
        self.repo
            .get_enrollment(id)?
            .ok_or(ServiceError::NotFound(EntityRef::Enrollment(id)))
    }
}
