//! Domain entities, services and ports.
//!
//! Purpose: hold the enrollment admission rules independent of transport and
//! storage. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Course`, `Student`, `Enrollment`: the admission aggregates.
//! - `Subject`: read-only course contents.
//! - `AdmissionService`: the admission controller.

pub mod admission_service;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod ports;
pub mod student;
pub mod subject;
pub mod trace_id;
pub mod user;

pub use self::admission_service::{AdmissionService, ENROLLMENT_ALREADY_DECIDED};
pub use self::auth::{LoginCredentials, LoginValidationError, Principal, Role, UnknownRole};
pub use self::course::{Course, CourseCapacity, CourseId, CourseValidationError};
pub use self::enrollment::{
    Enrollment, EnrollmentDecision, EnrollmentId, EnrollmentParts, EnrollmentStatus,
    EnrollmentTransitionError, EnrollmentValidationError, UnknownEnrollmentStatus,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::student::Student;
pub use self::subject::{Subject, SubjectId, SubjectValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};
