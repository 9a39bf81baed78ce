//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use enrollment_backend::Trace;
#[cfg(debug_assertions)]
use enrollment_backend::doc::ApiDoc;
use enrollment_backend::inbound::http::courses::{
    list_course_enrollments, list_course_subjects, list_courses,
};
use enrollment_backend::inbound::http::enrollments::{
    approve_enrollment, bulk_approve_enrollments, get_enrollment, list_student_enrollments,
    reject_enrollment, request_enrollment,
};
use enrollment_backend::inbound::http::health::{HealthState, live, ready};
use enrollment_backend::inbound::http::state::HttpState;
use enrollment_backend::inbound::http::students::{
    get_student, list_student_courses, list_students,
};
use enrollment_backend::inbound::http::users::login;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Private cookie session lasting two hours.
fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    let lifecycle =
        PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2));
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(lifecycle)
        .build()
}

/// Every `/api/v1` route. Literal segments are registered before the
/// `{id}` patterns they would otherwise collide with.
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(list_courses)
        .service(list_course_subjects)
        .service(list_course_enrollments)
        .service(list_students)
        .service(request_enrollment)
        .service(list_student_enrollments)
        .service(list_student_courses)
        .service(get_student)
        .service(bulk_approve_enrollments)
        .service(get_enrollment)
        .service(approve_enrollment)
        .service(reject_enrollment);
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(key, cookie_secure, same_site))
        .configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct the HTTP server and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when the demo seed is invalid or binding
/// the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
