//! Course API handlers.
//!
//! ```text
//! GET /api/v1/courses
//! GET /api/v1/courses/{course_id}/subjects
//! GET /api/v1/courses/{course_id}/enrollments
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CourseSummary;
use crate::domain::{CourseId, Subject};
use crate::inbound::http::ApiResult;
use crate::inbound::http::enrollments::EnrollmentResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

#[derive(Debug, Deserialize)]
pub(super) struct CoursePath {
    course_id: String,
}

impl CoursePath {
    fn parse(&self) -> Result<CourseId, crate::domain::Error> {
        parse_uuid(&self.course_id, FieldName::new("courseId")).map(CourseId::from_uuid)
    }
}

/// A subject taught within a course.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: String,
    pub course_id: String,
    #[schema(example = "Vector spaces")]
    pub description: String,
    pub ects_points: u32,
}

impl From<Subject> for SubjectResponse {
    fn from(value: Subject) -> Self {
        Self {
            id: value.id().to_string(),
            course_id: value.course_id().to_string(),
            description: value.description().to_owned(),
            ects_points: value.ects_points(),
        }
    }
}

/// Course with its seat counters and subjects.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    #[schema(example = "lecture")]
    pub course_type: String,
    pub max_capacity: u32,
    /// Approved enrollments holding a seat.
    pub current_capacity: u32,
    pub remaining_seats: u32,
    pub subjects: Vec<SubjectResponse>,
}

impl From<CourseSummary> for CourseResponse {
    fn from(value: CourseSummary) -> Self {
        let CourseSummary { course, subjects } = value;
        let capacity = course.capacity();
        Self {
            id: course.id().to_string(),
            name: course.name().to_owned(),
            course_type: course.course_type().to_owned(),
            max_capacity: capacity.max(),
            current_capacity: capacity.current(),
            remaining_seats: capacity.remaining(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }
}

/// List courses with their current seat counters and subjects.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Courses", body = [CourseResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseResponse>>> {
    session.require_principal()?;
    let courses = state.courses.list_courses().await?;
    Ok(web::Json(courses.into_iter().map(Into::into).collect()))
}

/// Subjects taught in one course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/subjects",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Subjects", body = [SubjectResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourseSubjects"
)]
#[get("/courses/{course_id}/subjects")]
pub async fn list_course_subjects(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<Vec<SubjectResponse>>> {
    session.require_principal()?;
    let course_id = path.parse()?;
    let subjects = state.courses.list_course_subjects(&course_id).await?;
    Ok(web::Json(subjects.into_iter().map(Into::into).collect()))
}

/// Roster of enrollment requests for one course. Staff only.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/enrollments",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrollments", body = [EnrollmentResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "Course not found", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourseEnrollments"
)]
#[get("/courses/{course_id}/enrollments")]
pub async fn list_course_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CoursePath>,
) -> ApiResult<web::Json<Vec<EnrollmentResponse>>> {
    let principal = session.require_principal()?;
    let course_id = path.parse()?;
    let enrollments = state
        .enrollment_query
        .list_course_enrollments(&principal, &course_id)
        .await?;
    Ok(web::Json(enrollments.into_iter().map(Into::into).collect()))
}
