//! Core domain logic for Rollbook.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::class_group::{ClassGroup, ClassId, NewClassGroup};
pub use model::enrollment::{
    ClassEnrollment, Enrollment, EnrollmentId, EnrollmentOutcome, StudentClassDetail,
    StudentEnrollment, StudentWithEnrollments,
};
pub use model::note::{Note, NoteId};
pub use model::student::{Student, StudentFields, StudentId};
pub use model::validation::ValidationError;
pub use model::EntityRef;
pub use repo::class_repo::{ClassRepository, SqliteClassRepository};
pub use repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::class_service::ClassService;
pub use service::enrollment_service::EnrollmentService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::note_service::NoteService;
pub use service::student_service::StudentService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
