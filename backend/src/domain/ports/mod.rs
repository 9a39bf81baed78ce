//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CourseCatalogue`, `CapacityLedger`, `StudentRepository`,
//! `EnrollmentRepository`) are implemented by outbound adapters. Driving
//! ports (`EnrollmentCommand`, `EnrollmentQuery`, `CourseQuery`,
//! `StudentQuery`, `LoginService`) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod capacity_ledger;
mod course_catalogue;
mod course_query;
mod enrollment_command;
mod enrollment_query;
mod enrollment_repository;
mod login_service;
mod student_query;
mod student_repository;

#[cfg(test)]
pub use capacity_ledger::MockCapacityLedger;
pub use capacity_ledger::{CapacityLedger, CapacityLedgerError};
#[cfg(test)]
pub use course_catalogue::MockCourseCatalogue;
pub use course_catalogue::{CourseCatalogue, CourseCatalogueError};
#[cfg(test)]
pub use course_query::MockCourseQuery;
pub use course_query::{CourseQuery, CourseSummary};
#[cfg(test)]
pub use enrollment_command::MockEnrollmentCommand;
pub use enrollment_command::{
    BulkApprovalItem, BulkApprovalOutcome, BulkApprovalReport, BulkApproveRequest,
    DecideEnrollmentRequest, EnrollmentCommand, RequestEnrollmentRequest,
};
#[cfg(test)]
pub use enrollment_query::MockEnrollmentQuery;
pub use enrollment_query::EnrollmentQuery;
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{
    ApprovalWrite, EnrollmentInsert, EnrollmentRepository, EnrollmentRepositoryError,
};
pub use login_service::{
    FIXTURE_ADMIN_ID, FIXTURE_PROFESSOR_ID, FIXTURE_STUDENT_ID, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use student_query::MockStudentQuery;
pub use student_query::StudentQuery;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentRepository, StudentRepositoryError};

/// Failure class shared by every driven-port error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortFailure {
    /// The backing store could not be reached.
    Unavailable,
    /// The store was reached but the operation failed.
    Failed,
    /// The operation referenced a record the store does not hold.
    Missing,
}

/// Implemented by every error generated with `define_port_error!`.
pub trait PortError: std::error::Error {
    fn failure(&self) -> PortFailure;
}
