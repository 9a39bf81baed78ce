//! Embedded PostgreSQL databases for integration tests.
//!
//! One cluster is shared per test binary. A template database carrying the
//! current migrations is created once, keyed by a hash of the migrations
//! directory, and every test clones a fresh database from it.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use enrollment_backend::outbound::persistence::MIGRATIONS;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

const TEMPLATE_PREFIX: &str = "enrollment_template";
const ATTEMPTS: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn retry<T>(what: &str, mut attempt: impl FnMut() -> Result<T, String>) -> Result<T, String> {
    let mut last = String::new();
    for round in 1..=ATTEMPTS {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(err) => last = format!("{what}: attempt {round}/{ATTEMPTS}: {err}"),
        }
        if round < ATTEMPTS {
            thread::sleep(RETRY_DELAY);
        }
    }
    Err(last)
}

/// The process-wide embedded cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    retry("start cluster", || {
        pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
            .map_err(|err| format!("{err:?}"))
    })
}

fn template_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

/// Apply every embedded migration to the database at `url`.
pub fn migrate(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| format!("migrate: {err}"))
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

/// A throwaway database cloned from the migrated template. Dropped with the
/// returned guard.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    retry("provision database", || {
        let template = ensure_template(cluster)?;
        let name = format!("test_{}", Uuid::new_v4().simple());
        cluster
            .temporary_database_from_template(name.as_str(), template.as_str())
            .map_err(|err| format!("clone template: {err:?}"))
    })
}
