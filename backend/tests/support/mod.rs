//! Helpers shared by the PostgreSQL-backed integration suites.
//!
//! Each file under `tests/` is its own crate, so suites pull these in with
//! `mod support;`.

mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `postgres::Error`'s `Display` often reduces server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {}: {}",
        db_error.code().code(),
        db_error.message()
    );
    for (label, part) in [("detail", db_error.detail()), ("hint", db_error.hint())] {
        if let Some(text) = part {
            summary.push_str(&format!("; {label}: {text}"));
        }
    }
    summary
}
