//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `rollbook_core` and
//!   `rollbook_api` linkage against the configured database.
//! - Keep output deterministic for quick local sanity checks.

use rollbook_api::{app_config, handle, Request, Response, ResponseMode, View};

fn main() {
    let config = app_config();
    if let Err(err) = config.init_logging() {
        eprintln!("rollbook logging disabled: {err}");
    }

    println!("rollbook_core ping={}", rollbook_core::ping());
    println!("rollbook_core version={}", rollbook_core::core_version());
    println!("rollbook db_path={}", config.db_path.display());

    match handle(Request::ListClasses, ResponseMode::FullPage) {
        Response::Page(View::ClassList { classes }) => {
            println!("rollbook classes={}", classes.len())
        }
        other => println!("rollbook classes=unavailable ({other:?})"),
    }
    match handle(Request::StudentDirectory, ResponseMode::FullPage) {
        Response::Page(View::StudentDirectory { students }) => {
            println!("rollbook students={}", students.len())
        }
        other => println!("rollbook students=unavailable ({other:?})"),
    }
}
