//! Student profile handlers.
//!
//! ```text
//! GET /api/v1/students
//! GET /api/v1/students/{student_id}
//! GET /api/v1/students/{student_id}/courses
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Student;
use crate::inbound::http::ApiResult;
use crate::inbound::http::courses::CourseResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

use super::enrollments_dto::StudentPath;

/// A student's profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    #[schema(example = "Northfield High")]
    pub school: String,
    /// Course named by the student's latest enrollment request. Set when the
    /// request is made, so it does not mean the seat was approved.
    pub current_course: Option<String>,
}

impl From<Student> for StudentResponse {
    fn from(value: Student) -> Self {
        Self {
            id: value.id().to_string(),
            school: value.school().to_owned(),
            current_course: value.current_course().map(|id| id.to_string()),
        }
    }
}

/// List every student profile. Staff only.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "Students", body = [StudentResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<StudentResponse>>> {
    let principal = session.require_principal()?;
    let students = state.students.list_students(&principal).await?;
    Ok(web::Json(students.into_iter().map(Into::into).collect()))
}

/// Read one student's profile.
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = String, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Student profile", body = StudentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudent"
)]
#[get("/students/{student_id}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StudentPath>,
) -> ApiResult<web::Json<StudentResponse>> {
    let principal = session.require_principal()?;
    let student_id = path.parse()?;
    let student = state
        .students
        .student_profile(&principal, &student_id)
        .await?;
    Ok(web::Json(student.into()))
}

/// The course a student currently holds, with its subjects.
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/courses",
    params(("student_id" = String, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Held course, or none", body = [CourseResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudentCourses"
)]
#[get("/students/{student_id}/courses")]
pub async fn list_student_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<StudentPath>,
) -> ApiResult<web::Json<Vec<CourseResponse>>> {
    let principal = session.require_principal()?;
    let student_id = path.parse()?;
    let courses = state
        .students
        .student_courses(&principal, &student_id)
        .await?;
    Ok(web::Json(courses.into_iter().map(Into::into).collect()))
}
