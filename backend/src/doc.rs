//! OpenAPI documentation for the enrollment API.
//!
//! Registers every inbound HTTP path, the domain schema wrappers, and the
//! session cookie security scheme. Served by Swagger UI in debug builds and
//! exported by the `openapi-dump` binary.

use crate::inbound::http::courses::{CourseResponse, SubjectResponse};
use crate::inbound::http::enrollments::{
    BulkApprovalFailure, BulkApprovalItemResponse, BulkApprovalResponse, BulkApproveBody,
    EnrollmentRequestBody, EnrollmentResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::students::StudentResponse;
use crate::inbound::http::users::{LoginRequest, LoginResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Enrollment backend API",
        description = "Enrollment requests, seat-limited admission and administrator approval."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::list_course_subjects,
        crate::inbound::http::courses::list_course_enrollments,
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::get_student,
        crate::inbound::http::students::list_student_courses,
        crate::inbound::http::enrollments::request_enrollment,
        crate::inbound::http::enrollments::list_student_enrollments,
        crate::inbound::http::enrollments::get_enrollment,
        crate::inbound::http::enrollments::approve_enrollment,
        crate::inbound::http::enrollments::reject_enrollment,
        crate::inbound::http::enrollments::bulk_approve_enrollments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        CourseResponse,
        SubjectResponse,
        StudentResponse,
        EnrollmentRequestBody,
        EnrollmentResponse,
        BulkApproveBody,
        BulkApprovalFailure,
        BulkApprovalItemResponse,
        BulkApprovalResponse,
    )),
    tags(
        (name = "users", description = "Login"),
        (name = "courses", description = "Course catalogue, subjects and rosters"),
        (name = "students", description = "Student profiles"),
        (name = "enrollments", description = "Enrollment requests and administrator decisions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
