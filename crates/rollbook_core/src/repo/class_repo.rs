//! Class repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Class list order is `name ASC, id ASC`.
//! - Name uniqueness is enforced by the `classes.name` UNIQUE constraint,
//!   so concurrent writers cannot both succeed.

use crate::model::class_group::{ClassGroup, ClassId, NewClassGroup};
use crate::repo::rows::{parse_class_row, CLASS_COLUMNS};
use crate::repo::{
    ensure_connection_ready, is_unique_violation, now_epoch_ms, RepoError, RepoResult,
};
use rusqlite::{params, Connection};

/// Repository interface for class operations.
pub trait ClassRepository {
    /// Inserts one class. Input is expected to be normalized.
    fn create_class(&self, input: &NewClassGroup) -> RepoResult<ClassGroup>;
    fn get_class(&self, id: ClassId) -> RepoResult<Option<ClassGroup>>;
    fn list_classes(&self) -> RepoResult<Vec<ClassGroup>>;
}

/// SQLite-backed class repository.
pub struct SqliteClassRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClassRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["classes"])?;
        Ok(Self { conn })
    }
}

impl ClassRepository for SqliteClassRepository<'_> {
    fn create_class(&self, input: &NewClassGroup) -> RepoResult<ClassGroup> {
        input.validate()?;

        let created_at = now_epoch_ms();
        let inserted = self.conn.execute(
            "INSERT INTO classes (name, subject, description, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.name.as_str(),
                input.subject.as_deref(),
                input.description.as_deref(),
                created_at,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateClassName(input.name.clone()));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(ClassGroup {
            id: self.conn.last_insert_rowid(),
            name: input.name.clone(),
            subject: input.subject.clone(),
            description: input.description.clone(),
            created_at,
        })
    }

    fn get_class(&self, id: ClassId) -> RepoResult<Option<ClassGroup>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CLASS_COLUMNS} FROM classes c WHERE c.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_class_row(row)?));
        }
        Ok(None)
    }

    fn list_classes(&self) -> RepoResult<Vec<ClassGroup>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes c ORDER BY c.name ASC, c.id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut classes = Vec::new();
        while let Some(row) = rows.next()? {
            classes.push(parse_class_row(row)?);
        }
        Ok(classes)
    }
}
