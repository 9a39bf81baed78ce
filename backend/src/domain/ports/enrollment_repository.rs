//! Port for enrollment persistence.
//!
//! Status writes are conditional on the stored row still being pending, so
//! two racing decisions on the same enrollment cannot both land.

use async_trait::async_trait;

use crate::domain::{CourseId, Enrollment, EnrollmentId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment repository adapters.
    pub enum EnrollmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "enrollment repository connection failed: {message}" as Unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "enrollment repository query failed: {message}" as Failed,
        /// The enrollment's course is not in the ledger.
        UnknownCourse { course_id: String } =>
            "course {course_id} does not exist" as Missing,
    }
}

/// Outcome of inserting a pending enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentInsert {
    /// The enrollment was stored and the student's soft hold updated.
    Created,
    /// The student already has an open request for the course. Nothing was
    /// written.
    Duplicate,
}

/// Outcome of the combined seat reservation and approval write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalWrite {
    /// Seat taken and status written.
    Approved,
    /// The course had no seat. Nothing was written.
    CourseFull,
    /// The stored enrollment was no longer pending. Nothing was written.
    NotPending,
}

/// Durable enrollment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Store a new pending enrollment and set the student's current-course
    /// hold in the same storage operation.
    async fn create_pending(
        &self,
        enrollment: &Enrollment,
    ) -> Result<EnrollmentInsert, EnrollmentRepositoryError>;

    async fn find_by_id(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError>;

    /// Enrollments of one student, oldest request first.
    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError>;

    /// Enrollments for one course, oldest request first.
    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError>;

    /// Write status, approver and decision time of `decided` only if the
    /// stored row is still pending. Returns whether the write happened.
    ///
    /// Seat counters are untouched, so this is only correct for rejections.
    async fn decide_if_pending(
        &self,
        decided: &Enrollment,
    ) -> Result<bool, EnrollmentRepositoryError>;

    /// In one transaction, reserve a seat on the course of `approved` and
    /// write its approval if the stored row is still pending. Either both
    /// writes commit or neither does.
    async fn approve_with_reservation(
        &self,
        approved: &Enrollment,
    ) -> Result<ApprovalWrite, EnrollmentRepositoryError>;
}
