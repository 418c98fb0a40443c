//! Roster domain model: classes, students, enrollments and notes.
//!
//! # Responsibility
//! - Define canonical records returned by repositories and services.
//! - Define write-side input shapes and their validation rules.
//!
//! # Invariants
//! - Every persisted record is identified by a SQLite integer surrogate key.
//! - Timestamps are Unix epoch milliseconds.
//! - A note always belongs to exactly one enrollment.

pub mod class_group;
pub mod enrollment;
pub mod note;
pub mod student;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use class_group::ClassId;
use enrollment::EnrollmentId;
use note::NoteId;
use student::StudentId;

/// Reference to a record that a lookup or mutation expected to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EntityRef {
    Class(ClassId),
    Student(StudentId),
    Enrollment(EnrollmentId),
    /// Enrollment addressed by its `(class, student)` pair.
    Membership {
        class_id: ClassId,
        student_id: StudentId,
    },
    Note(NoteId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(id) => write!(f, "class {id}"),
            Self::Student(id) => write!(f, "student {id}"),
            Self::Enrollment(id) => write!(f, "enrollment {id}"),
            Self::Membership {
                class_id,
                student_id,
            } => write!(f, "enrollment of student {student_id} in class {class_id}"),
            Self::Note(id) => write!(f, "note {id}"),
        }
    }
}
