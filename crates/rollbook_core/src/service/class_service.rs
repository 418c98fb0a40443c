//! Class use-case service.
//!
//! # Invariants
//! - Class input is trimmed before uniqueness is checked, so `" Algebra "`
//!   and `"Algebra"` collide.

use crate::model::class_group::{ClassGroup, ClassId, NewClassGroup};
use crate::model::EntityRef;
use crate::repo::class_repo::ClassRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Class service facade over repository implementations.
pub struct ClassService<R: ClassRepository> {
    repo: R,
}

impl<R: ClassRepository> ClassService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every class ordered by name.
    pub fn list_classes(&self) -> ServiceResult<Vec<ClassGroup>> {
        Ok(self.repo.list_classes()?)
    }

    /// Creates one class.
    ///
    /// # Errors
    /// - `Validation` for blank or too-long fields.
    /// - `DuplicateName` when the trimmed name already exists; no row is
    ///   written.
    pub fn create_class(&self, input: NewClassGroup) -> ServiceResult<ClassGroup> {
        let input = input.normalized();
        input.validate()?;

        match self.repo.create_class(&input) {
            Ok(class) => {
                info!(
                    "event=class_create module=service status=ok class_id={}",
                    class.id
                );
                Ok(class)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!("event=class_create module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Gets one class by id.
    pub fn get_class(&self, id: ClassId) -> ServiceResult<ClassGroup> {
        self.repo
            .get_class(id)?
            .ok_or(ServiceError::NotFound(EntityRef::Class(id)))
    }
}
