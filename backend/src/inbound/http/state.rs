//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CourseQuery, EnrollmentCommand, EnrollmentQuery, LoginService, StudentQuery,
};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub enrollment_query: Arc<dyn EnrollmentQuery>,
    pub courses: Arc<dyn CourseQuery>,
    pub students: Arc<dyn StudentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub enrollments: Arc<dyn EnrollmentCommand>,
    pub enrollment_query: Arc<dyn EnrollmentQuery>,
    pub courses: Arc<dyn CourseQuery>,
    pub students: Arc<dyn StudentQuery>,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            enrollments,
            enrollment_query,
            courses,
            students,
        } = ports;
        Self {
            login,
            enrollments,
            enrollment_query,
            courses,
            students,
        }
    }

    /// Share one service implementing every enrollment, course and student
    /// use-case.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    /// use enrollment_backend::domain::ports::FixtureLoginService;
    /// use enrollment_backend::domain::AdmissionService;
    /// use enrollment_backend::inbound::http::state::HttpState;
    /// use enrollment_backend::outbound::memory::InMemoryCampusStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryCampusStore::new());
    /// let service = AdmissionService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::from_service(Arc::new(FixtureLoginService), Arc::new(service));
    /// ```
    pub fn from_service<S>(login: Arc<dyn LoginService>, service: Arc<S>) -> Self
    where
        S: EnrollmentCommand + EnrollmentQuery + CourseQuery + StudentQuery + 'static,
    {
        Self::new(HttpStatePorts {
            login,
            enrollments: service.clone(),
            enrollment_query: service.clone(),
            courses: service.clone(),
            students: service,
        })
    }
}
