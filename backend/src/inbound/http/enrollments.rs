//! Enrollment API handlers.
//!
//! ```text
//! POST /api/v1/students/{student_id}/enrollments {"courseId":"..."}
//! GET  /api/v1/students/{student_id}/enrollments
//! GET  /api/v1/enrollments/{enrollment_id}
//! POST /api/v1/enrollments/{enrollment_id}/approve
//! POST /api/v1/enrollments/{enrollment_id}/reject
//! POST /api/v1/enrollments/approve {"enrollmentIds":["...", "..."]}
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::Error;
use crate::domain::ports::{BulkApproveRequest, DecideEnrollmentRequest, RequestEnrollmentRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub use super::enrollments_dto::{
    BULK_APPROVE_MAX_IDS, BulkApprovalFailure, BulkApprovalItemResponse, BulkApprovalResponse,
    BulkApproveBody, EnrollmentRequestBody, EnrollmentResponse,
};
use super::enrollments_dto::{EnrollmentPath, StudentPath};

/// Request a seat on a course. The enrollment starts pending and holds no
/// seat until an administrator approves it.
#[utoipa::path(
    post,
    path = "/api/v1/students/{student_id}/enrollments",
    params(("student_id" = String, Path, description = "Student user id")),
    request_body = EnrollmentRequestBody,
    responses(
        (status = 201, description = "Pending enrollment created", body = EnrollmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Student or course not found", body = ErrorSchema),
        (status = 409, description = "Course full or request already open", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "requestEnrollment"
)]
#[post("/students/{student_id}/enrollments")]
pub async fn request_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StudentPath>,
    payload: web::Json<EnrollmentRequestBody>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let student_id = path.parse()?;
    let course_id = payload.into_inner().parse()?;
    let enrollment = state
        .enrollments
        .request_enrollment(RequestEnrollmentRequest {
            principal,
            student_id,
            course_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(EnrollmentResponse::from(enrollment)))
}

/// List one student's enrollments.
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/enrollments",
    params(("student_id" = String, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Enrollments", body = [EnrollmentResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "listStudentEnrollments"
)]
#[get("/students/{student_id}/enrollments")]
pub async fn list_student_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StudentPath>,
) -> ApiResult<web::Json<Vec<EnrollmentResponse>>> {
    let principal = session.require_principal()?;
    let student_id = path.parse()?;
    let enrollments = state
        .enrollment_query
        .list_student_enrollments(&principal, &student_id)
        .await?;
    Ok(web::Json(enrollments.into_iter().map(Into::into).collect()))
}

/// Fetch one enrollment.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{enrollment_id}",
    params(("enrollment_id" = String, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment", body = EnrollmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "getEnrollment"
)]
#[get("/enrollments/{enrollment_id}")]
pub async fn get_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EnrollmentPath>,
) -> ApiResult<web::Json<EnrollmentResponse>> {
    let principal = session.require_principal()?;
    let enrollment_id = path.parse()?;
    let enrollment = state
        .enrollment_query
        .get_enrollment(&principal, &enrollment_id)
        .await?;
    Ok(web::Json(enrollment.into()))
}

/// Approve a pending enrollment, taking one seat on its course.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/{enrollment_id}/approve",
    params(("enrollment_id" = String, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment approved", body = EnrollmentResponse),
        (status = 400, description = "Invalid request or already decided", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Course full", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "approveEnrollment"
)]
#[post("/enrollments/{enrollment_id}/approve")]
pub async fn approve_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EnrollmentPath>,
) -> ApiResult<web::Json<EnrollmentResponse>> {
    let request = decide_request(&session, &path)?;
    let enrollment = state.enrollments.approve_enrollment(request).await?;
    Ok(web::Json(enrollment.into()))
}

/// Reject a pending enrollment. Seat counters are untouched.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/{enrollment_id}/reject",
    params(("enrollment_id" = String, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment rejected", body = EnrollmentResponse),
        (status = 400, description = "Invalid request or already decided", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "rejectEnrollment"
)]
#[post("/enrollments/{enrollment_id}/reject")]
pub async fn reject_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EnrollmentPath>,
) -> ApiResult<web::Json<EnrollmentResponse>> {
    let request = decide_request(&session, &path)?;
    let enrollment = state.enrollments.reject_enrollment(request).await?;
    Ok(web::Json(enrollment.into()))
}

/// Approve several enrollments in order. Items that fail are reported in
/// `results` and do not stop the batch.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/approve",
    request_body = BulkApproveBody,
    responses(
        (status = 200, description = "Per-item approval results", body = BulkApprovalResponse),
        (status = 400, description = "Invalid request or empty batch", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["enrollments"],
    operation_id = "bulkApproveEnrollments"
)]
#[post("/enrollments/approve")]
pub async fn bulk_approve_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkApproveBody>,
) -> ApiResult<web::Json<BulkApprovalResponse>> {
    let principal = session.require_principal()?;
    let enrollment_ids = payload.into_inner().parse()?;
    let report = state
        .enrollments
        .bulk_approve(BulkApproveRequest {
            principal,
            enrollment_ids,
        })
        .await?;
    Ok(web::Json(report.into()))
}

fn decide_request(
    session: &SessionContext,
    path: &EnrollmentPath,
) -> Result<DecideEnrollmentRequest, Error> {
    Ok(DecideEnrollmentRequest {
        principal: session.require_principal()?,
        enrollment_id: path.parse()?,
    })
}

#[cfg(test)]
#[path = "enrollments_tests.rs"]
mod tests;
