//! Driving port for reading enrollments.

use async_trait::async_trait;

use crate::domain::{CourseId, Enrollment, EnrollmentId, Error, Principal, UserId};

/// Enrollment read use-cases. Visibility rules are enforced by the
/// implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentQuery: Send + Sync {
    /// Fetch one enrollment. Visible to its student and to staff.
    async fn get_enrollment(
        &self,
        principal: &Principal,
        enrollment_id: &EnrollmentId,
    ) -> Result<Enrollment, Error>;

    /// Enrollments of one student. Visible to that student and to
    /// administrators.
    async fn list_student_enrollments(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, Error>;

    /// Enrollments for one course. Visible to staff.
    async fn list_course_enrollments(
        &self,
        principal: &Principal,
        course_id: &CourseId,
    ) -> Result<Vec<Enrollment>, Error>;
}
