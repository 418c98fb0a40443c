//! Use-case error taxonomy shared by all roster services.

use crate::model::class_group::ClassId;
use crate::model::student::StudentId;
use crate::model::validation::ValidationError;
use crate::model::EntityRef;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for roster use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced record does not exist.
    NotFound(EntityRef),
    /// Class name is already taken.
    DuplicateName(String),
    /// Student is already enrolled in the class.
    ///
    /// Reserved: `enroll_existing_student` is get-or-create and never
    /// reports this today.
    DuplicateEnrollment {
        class_id: ClassId,
        student_id: StudentId,
    },
    /// Input failed a field rule.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether this error is the caller's fault (bad id or bad input) rather
    /// than a storage failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::DuplicateName(name) => write!(f, "class name already exists: `{name}`"),
            Self::DuplicateEnrollment {
                class_id,
                student_id,
            } => write!(
                f,
                "student {student_id} is already enrolled in class {class_id}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(entity) => Self::NotFound(entity),
            RepoError::DuplicateClassName(name) => Self::DuplicateName(name),
            RepoError::DuplicateEnrollment {
                class_id,
                student_id,
            } => Self::DuplicateEnrollment {
                class_id,
                student_id,
            },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
