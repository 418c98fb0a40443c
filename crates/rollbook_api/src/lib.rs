//! Use-case request API for the Rollbook roster.
//!
//! # Responsibility
//! - Turn roster requests into responses a renderer can consume.
//! - Own process configuration (database path, logging).
//!
//! # Invariants
//! - Public entry points never panic and never return an error type; every
//!   failure is a `Response`.
//! - Each `handle` call opens its own connection.

pub mod config;
pub mod dispatch;
pub mod forms;
pub mod handlers;
pub mod response;

pub use config::{app_config, AppConfig};
pub use dispatch::{dispatch, Request};
pub use forms::{ClassForm, EnrollForm, FormErrors, NoteForm, StudentForm};
pub use response::{Response, ResponseMode, Route, View};

use log::error;
use rollbook_core::db::open_db;

/// Health check passthrough.
pub fn ping() -> String {
    rollbook_core::ping().to_owned()
}

pub fn core_version() -> String {
    rollbook_core::core_version().to_owned()
}

/// Handles one request against the configured database.
///
/// Opens the database at [`AppConfig::db_path`], applying pending migrations
/// on first use.
pub fn handle(request: Request, mode: ResponseMode) -> Response {
    let config = app_config();
    let mut conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=api status=error op={} error={}",
                request.operation(),
                err
            );
            return Response::Failure {
                message: format!("{} failed: database open failed: {err}", request.operation()),
            };
        }
    };
    dispatch(&mut conn, request, mode)
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
