//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;

use crate::domain::ports::{
    CourseQuery, EnrollmentCommand, EnrollmentQuery, FixtureLoginService, MockCourseQuery,
    MockEnrollmentCommand, MockEnrollmentQuery, MockStudentQuery, StudentQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::users::LoginRequest;

/// Session middleware with a fresh key and an insecure `session` cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Log in as one of the fixture accounts and return its session cookie.
pub async fn login_as(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: username.into(),
            password: "password".into(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login as {username} failed");
    session_cookie(&response)
}

/// Mocked use-cases handed to [`state_with`]. Unset expectations panic when
/// called.
#[derive(Default)]
pub struct MockPorts {
    pub enrollments: MockEnrollmentCommand,
    pub enrollment_query: MockEnrollmentQuery,
    pub courses: MockCourseQuery,
    pub students: MockStudentQuery,
}

/// HTTP state wired to the fixture login service and the given mocks.
pub fn state_with(mocks: MockPorts) -> HttpState {
    let enrollments: Arc<dyn EnrollmentCommand> = Arc::new(mocks.enrollments);
    let enrollment_query: Arc<dyn EnrollmentQuery> = Arc::new(mocks.enrollment_query);
    let courses: Arc<dyn CourseQuery> = Arc::new(mocks.courses);
    let students: Arc<dyn StudentQuery> = Arc::new(mocks.students);
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        enrollments,
        enrollment_query,
        courses,
        students,
    })
}
