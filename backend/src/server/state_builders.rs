//! Builders wiring storage adapters into the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use enrollment_backend::domain::AdmissionService;
use enrollment_backend::domain::ports::FixtureLoginService;
use enrollment_backend::inbound::http::state::HttpState;
use enrollment_backend::outbound::memory::InMemoryCampusStore;
use enrollment_backend::outbound::persistence::{
    DbPool, DieselCourseCatalogue, DieselEnrollmentRepository, DieselStudentRepository,
};

use super::ServerConfig;

/// Build the HTTP state from the configured storage backend.
///
/// A database pool selects the Diesel adapters. Without one the in-memory
/// store is seeded with demo courses and students.
///
/// # Errors
/// Returns [`std::io::Error`] when the demo seed is invalid.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let login = Arc::new(FixtureLoginService);
    match &config.db_pool {
        Some(pool) => Ok(HttpState::from_service(login, Arc::new(diesel_service(pool)))),
        None => {
            let store = InMemoryCampusStore::with_demo_data()
                .map_err(|err| std::io::Error::other(format!("invalid demo data: {err}")))?;
            info!("no database configured; serving the in-memory demo store");
            let store = Arc::new(store);
            let service = AdmissionService::new(
                store.clone(),
                store.clone(),
                store,
                Arc::new(DefaultClock),
            );
            Ok(HttpState::from_service(login, Arc::new(service)))
        }
    }
}

fn diesel_service(
    pool: &DbPool,
) -> AdmissionService<DieselCourseCatalogue, DieselStudentRepository, DieselEnrollmentRepository> {
    AdmissionService::new(
        Arc::new(DieselCourseCatalogue::new(pool.clone())),
        Arc::new(DieselStudentRepository::new(pool.clone())),
        Arc::new(DieselEnrollmentRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    )
}
