//! Enrollment join entity and its read projections.
//!
//! # Invariants
//! - `(student_id, class_id)` is unique; re-enrolling returns the existing row.
//! - Enrollments disappear only through cascade from their student or class.

use crate::model::class_group::{ClassGroup, ClassId};
use crate::model::note::Note;
use crate::model::student::{Student, StudentId};
use serde::{Deserialize, Serialize};

pub type EnrollmentId = i64;

/// Membership of one student in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    /// Epoch ms timestamp of when the student joined the class.
    pub joined_at: i64,
}

/// Result of a get-or-create enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentOutcome {
    pub enrollment: Enrollment,
    /// `false` when the pair was already enrolled.
    pub created: bool,
}

/// Class roster row: enrollment with its student preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEnrollment {
    pub enrollment: Enrollment,
    pub student: Student,
}

/// Student profile row: enrollment with its class preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEnrollment {
    pub enrollment: Enrollment,
    pub classroom: ClassGroup,
}

/// Student with every enrollment and class preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithEnrollments {
    pub student: Student,
    /// Sorted by class name.
    pub enrollments: Vec<StudentEnrollment>,
}

/// Everything shown for one student inside one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentClassDetail {
    pub classroom: ClassGroup,
    pub student: Student,
    pub enrollment: Enrollment,
    /// Most recently updated first.
    pub notes: Vec<Note>,
}

impl StudentClassDetail {
    /// Human-readable enrollment label, e.g. `Jane Doe → Algebra I`.
    pub fn label(&self) -> String {
        format!("{} → {}", self.student.full_name, self.classroom.name)
    }

    /// Title for notes of this enrollment.
    pub fn notes_title(&self) -> String {
        format!(
            "Note for {} in {}",
            self.student.full_name, self.classroom.name
        )
    }
}
