//! Enrollment admission and approval workflow.
//!
//! [`AdmissionService`] implements the enrollment, course and student driving
//! ports on top of the catalogue, student and enrollment driven ports. Seat counters are never
//! touched here directly: approvals go through
//! [`EnrollmentRepository::approve_with_reservation`] so the reservation and
//! the status write share one storage transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ApprovalWrite, BulkApprovalReport, BulkApproveRequest, CourseCatalogue, CourseQuery,
    CourseSummary, DecideEnrollmentRequest, EnrollmentCommand, EnrollmentInsert, EnrollmentQuery,
    EnrollmentRepository, PortError, PortFailure, RequestEnrollmentRequest, StudentQuery,
    StudentRepository,
};
use crate::domain::{
    Course, CourseId, Enrollment, EnrollmentDecision, EnrollmentId, EnrollmentStatus,
    EnrollmentTransitionError, Error, Principal, Student, Subject, UserId,
};

/// Details code attached to decisions on enrollments that are no longer
/// pending.
pub const ENROLLMENT_ALREADY_DECIDED: &str = "enrollment_already_decided";

fn map_port_error<E: PortError>(error: E) -> Error {
    match error.failure() {
        PortFailure::Unavailable => {
            Error::service_unavailable(format!("storage unavailable: {error}"))
        }
        PortFailure::Failed => Error::internal(format!("storage error: {error}")),
        PortFailure::Missing => Error::not_found(error.to_string()),
    }
}

fn already_decided(enrollment_id: EnrollmentId, status: Option<EnrollmentStatus>) -> Error {
    let message = match status {
        Some(status) => format!("enrollment {enrollment_id} was already {status}"),
        None => format!("enrollment {enrollment_id} is no longer pending"),
    };
    Error::invalid_request(message).with_details(json!({
        "code": ENROLLMENT_ALREADY_DECIDED,
        "enrollmentId": enrollment_id.to_string(),
        "status": status.map(EnrollmentStatus::as_str),
    }))
}

/// Refusal shared by request-time and approval-time capacity checks.
fn no_free_seats(course_id: CourseId) -> Error {
    Error::course_full(format!("course {course_id} has no free seats"))
        .with_details(json!({ "courseId": course_id.to_string() }))
}

fn require_administrator(principal: &Principal) -> Result<(), Error> {
    if principal.is_administrator() {
        Ok(())
    } else {
        Err(Error::forbidden("only administrators may decide enrollments"))
    }
}

/// Admission controller for enrollment requests and decisions.
pub struct AdmissionService<C, S, E> {
    courses: Arc<C>,
    students: Arc<S>,
    enrollments: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<C, S, E> Clone for AdmissionService<C, S, E> {
    fn clone(&self) -> Self {
        Self {
            courses: Arc::clone(&self.courses),
            students: Arc::clone(&self.students),
            enrollments: Arc::clone(&self.enrollments),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, S, E> AdmissionService<C, S, E>
where
    C: CourseCatalogue,
    S: StudentRepository,
    E: EnrollmentRepository,
{
    /// Create a service over the given ports.
    pub fn new(
        courses: Arc<C>,
        students: Arc<S>,
        enrollments: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            courses,
            students,
            enrollments,
            clock,
        }
    }

    async fn course(&self, course_id: &CourseId) -> Result<Course, Error> {
        self.courses
            .find_course(course_id)
            .await
            .map_err(map_port_error)?
            .ok_or_else(|| Error::not_found(format!("course {course_id} not found")))
    }

    async fn student(&self, student_id: &UserId) -> Result<Student, Error> {
        self.students
            .find_by_id(student_id)
            .await
            .map_err(map_port_error)?
            .ok_or_else(|| Error::not_found(format!("student {student_id} not found")))
    }

    async fn enrollment(&self, enrollment_id: &EnrollmentId) -> Result<Enrollment, Error> {
        self.enrollments
            .find_by_id(enrollment_id)
            .await
            .map_err(map_port_error)?
            .ok_or_else(|| Error::not_found(format!("enrollment {enrollment_id} not found")))
    }

    /// Load the enrollment and apply `decision` in memory.
    async fn prepare_decision(
        &self,
        request: &DecideEnrollmentRequest,
        decision: EnrollmentDecision,
    ) -> Result<Enrollment, Error> {
        require_administrator(&request.principal)?;
        let enrollment = self.enrollment(&request.enrollment_id).await?;
        enrollment
            .decide(decision, request.principal.user_id(), self.clock.utc())
            .map_err(|EnrollmentTransitionError::AlreadyDecided { status }| {
                already_decided(request.enrollment_id, Some(status))
            })
    }
}

#[async_trait]
impl<C, S, E> EnrollmentCommand for AdmissionService<C, S, E>
where
    C: CourseCatalogue,
    S: StudentRepository,
    E: EnrollmentRepository,
{
    async fn request_enrollment(
        &self,
        request: RequestEnrollmentRequest,
    ) -> Result<Enrollment, Error> {
        let RequestEnrollmentRequest {
            principal,
            student_id,
            course_id,
        } = request;
        if !principal.acts_for(student_id) {
            return Err(Error::forbidden(
                "students may only request enrollment for themselves",
            ));
        }
        let student = self.student(&student_id).await?;
        let course = self.course(&course_id).await?;
        if !course.capacity().has_room() {
            debug!(%course_id, student_id = %student.id(), "request refused, course full");
            return Err(no_free_seats(course.id()));
        }

        let enrollment = Enrollment::request(student.id(), course.id(), self.clock.utc());
        match self
            .enrollments
            .create_pending(&enrollment)
            .await
            .map_err(map_port_error)?
        {
            EnrollmentInsert::Created => {
                info!(
                    enrollment_id = %enrollment.id(),
                    %course_id,
                    %student_id,
                    "enrollment requested"
                );
                Ok(enrollment)
            }
            EnrollmentInsert::Duplicate => Err(Error::conflict(format!(
                "student {student_id} already has an open request for course {course_id}"
            ))),
        }
    }

    async fn approve_enrollment(
        &self,
        request: DecideEnrollmentRequest,
    ) -> Result<Enrollment, Error> {
        let approved = self
            .prepare_decision(&request, EnrollmentDecision::Approve)
            .await?;
        let write = self
            .enrollments
            .approve_with_reservation(&approved)
            .await
            .map_err(map_port_error)?;
        match write {
            ApprovalWrite::Approved => {
                info!(
                    enrollment_id = %approved.id(),
                    course_id = %approved.course_id(),
                    admin_id = %request.principal.user_id(),
                    outcome = "approved",
                    "enrollment decided"
                );
                Ok(approved)
            }
            ApprovalWrite::CourseFull => {
                info!(
                    enrollment_id = %approved.id(),
                    course_id = %approved.course_id(),
                    admin_id = %request.principal.user_id(),
                    outcome = "course_full",
                    "approval refused"
                );
                Err(no_free_seats(approved.course_id()))
            }
            ApprovalWrite::NotPending => {
                warn!(enrollment_id = %approved.id(), "enrollment decided concurrently");
                Err(already_decided(approved.id(), None))
            }
        }
    }

    async fn reject_enrollment(
        &self,
        request: DecideEnrollmentRequest,
    ) -> Result<Enrollment, Error> {
        let rejected = self
            .prepare_decision(&request, EnrollmentDecision::Reject)
            .await?;
        let written = self
            .enrollments
            .decide_if_pending(&rejected)
            .await
            .map_err(map_port_error)?;
        if !written {
            warn!(enrollment_id = %rejected.id(), "enrollment decided concurrently");
            return Err(already_decided(rejected.id(), None));
        }
        info!(
            enrollment_id = %rejected.id(),
            course_id = %rejected.course_id(),
            admin_id = %request.principal.user_id(),
            outcome = "rejected",
            "enrollment decided"
        );
        Ok(rejected)
    }

    async fn bulk_approve(
        &self,
        request: BulkApproveRequest,
    ) -> Result<BulkApprovalReport, Error> {
        require_administrator(&request.principal)?;
        if request.enrollment_ids.is_empty() {
            return Err(Error::invalid_request("enrollmentIds must not be empty")
                .with_details(json!({ "field": "enrollmentIds", "code": "empty_batch" })));
        }

        let mut report = BulkApprovalReport::default();
        for enrollment_id in request.enrollment_ids {
            let result = self
                .approve_enrollment(DecideEnrollmentRequest {
                    principal: request.principal,
                    enrollment_id,
                })
                .await;
            report.record(enrollment_id, result);
        }
        info!(
            admin_id = %request.principal.user_id(),
            approved = report.approved,
            total = report.results.len(),
            "bulk approval finished"
        );
        Ok(report)
    }
}

#[async_trait]
impl<C, S, E> EnrollmentQuery for AdmissionService<C, S, E>
where
    C: CourseCatalogue,
    S: StudentRepository,
    E: EnrollmentRepository,
{
    async fn get_enrollment(
        &self,
        principal: &Principal,
        enrollment_id: &EnrollmentId,
    ) -> Result<Enrollment, Error> {
        let enrollment = self.enrollment(enrollment_id).await?;
        if principal.is_staff() || principal.user_id() == enrollment.student_id() {
            Ok(enrollment)
        } else {
            Err(Error::forbidden("enrollment belongs to another student"))
        }
    }

    async fn list_student_enrollments(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, Error> {
        if !principal.acts_for(*student_id) {
            return Err(Error::forbidden(
                "students may only list their own enrollments",
            ));
        }
        self.student(student_id).await?;
        self.enrollments
            .list_for_student(student_id)
            .await
            .map_err(map_port_error)
    }

    async fn list_course_enrollments(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<Vec<Enrollment>, Error> {
        if !principal.is_staff() {
            return Err(Error::forbidden("course rosters are visible to staff only"));
        }
        self.course(course_id).await?;
        self.enrollments
            .list_for_course(course_id)
            .await
            .map_err(map_port_error)
    }
}

#[async_trait]
impl<C, S, E> CourseQuery for AdmissionService<C, S, E>
where
    C: CourseCatalogue,
    S: StudentRepository,
    E: EnrollmentRepository,
{
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, Error> {
        let courses = self.courses.list_courses().await.map_err(map_port_error)?;
        let subjects = self
            .courses
            .list_all_subjects()
            .await
            .map_err(map_port_error)?;
        Ok(courses
            .into_iter()
            .map(|course| CourseSummary::collect(course, &subjects))
            .collect())
    }

    async fn list_course_subjects(&self, course_id: &CourseId) -> Result<Vec<Subject>, Error> {
        self.course(course_id).await?;
        self.courses
            .list_subjects(course_id)
            .await
            .map_err(map_port_error)
    }
}

#[async_trait]
impl<C, S, E> StudentQuery for AdmissionService<C, S, E>
where
    C: CourseCatalogue,
    S: StudentRepository,
    E: EnrollmentRepository,
{
    async fn student_profile(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Student, Error> {
        if !principal.acts_for(*student_id) {
            return Err(Error::forbidden("profile belongs to another student"));
        }
        self.student(student_id).await
    }

    async fn list_students(&self, principal: &Principal) -> Result<Vec<Student>, Error> {
        if !principal.is_staff() {
            return Err(Error::forbidden("the student list is visible to staff only"));
        }
        self.students.list_students().await.map_err(map_port_error)
    }

    async fn student_courses(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Vec<CourseSummary>, Error> {
        let student = self.student_profile(principal, student_id).await?;
        let Some(course_id) = student.current_course() else {
            return Ok(Vec::new());
        };
        // The hold may point at a course removed since; report nothing then.
        let Some(course) = self
            .courses
            .find_course(&course_id)
            .await
            .map_err(map_port_error)?
        else {
            return Ok(Vec::new());
        };
        let subjects = self
            .courses
            .list_subjects(&course_id)
            .await
            .map_err(map_port_error)?;
        Ok(vec![CourseSummary { course, subjects }])
    }
}

#[cfg(test)]
#[path = "admission_service_tests.rs"]
mod tests;
