//! Enrollment records and their approval lifecycle.
//!
//! An enrollment starts `Pending` when a student asks for a course and is
//! decided exactly once by an administrator:
//!
//! ```text
//! Pending --approve--> Approved
//! Pending --reject---> Rejected
//! ```
//!
//! Both terminal states are final. Seat accounting happens in the capacity
//! ledger; this module only guards the status transitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CourseId, UserId};

/// Enrollment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(Uuid);

impl EnrollmentId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        match self {
            Self::Pending => false,
            Self::Approved | Self::Rejected => true,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enrollment status: {0}")]
pub struct UnknownEnrollmentStatus(pub String);

impl FromStr for EnrollmentStatus {
    type Err = UnknownEnrollmentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownEnrollmentStatus(other.to_owned())),
        }
    }
}

/// Administrator verdict on a pending enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentDecision {
    Approve,
    Reject,
}

impl EnrollmentDecision {
    /// Status an enrollment reaches once this decision applies.
    pub fn target_status(self) -> EnrollmentStatus {
        match self {
            Self::Approve => EnrollmentStatus::Approved,
            Self::Reject => EnrollmentStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Transition refused by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentTransitionError {
    #[error("enrollment was already {status}")]
    AlreadyDecided { status: EnrollmentStatus },
}

/// Inconsistent stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentValidationError {
    #[error("pending enrollment must not carry a decision")]
    PendingWithDecision,
    #[error("decided enrollment must record the deciding administrator and time")]
    DecisionIncomplete,
}

/// A student's request to join a course.
///
/// ## Invariants
/// - `decided_by` and `decided_at` are absent while `Pending` and present
///   once decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    id: EnrollmentId,
    student_id: UserId,
    course_id: CourseId,
    status: EnrollmentStatus,
    decided_by: Option<UserId>,
    requested_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

/// Stored fields used to rebuild an [`Enrollment`].
#[derive(Debug, Clone)]
pub struct EnrollmentParts {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub status: EnrollmentStatus,
    pub decided_by: Option<UserId>,
    pub requested_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// A fresh pending request.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use enrollment_backend::domain::{CourseId, Enrollment, EnrollmentStatus, UserId};
    ///
    /// let enrollment = Enrollment::request(UserId::random(), CourseId::random(), Utc::now());
    /// assert_eq!(enrollment.status(), EnrollmentStatus::Pending);
    /// assert!(enrollment.decided_by().is_none());
    /// ```
    pub fn request(student_id: UserId, course_id: CourseId, at: DateTime<Utc>) -> Self {
        Self {
            id: EnrollmentId::random(),
            student_id,
            course_id,
            status: EnrollmentStatus::Pending,
            decided_by: None,
            requested_at: at,
            decided_at: None,
        }
    }

    /// Rebuild an enrollment from storage, checking decision consistency.
    pub fn from_parts(parts: EnrollmentParts) -> Result<Self, EnrollmentValidationError> {
        let EnrollmentParts {
            id,
            student_id,
            course_id,
            status,
            decided_by,
            requested_at,
            decided_at,
        } = parts;
        match (status, decided_by, decided_at) {
            (EnrollmentStatus::Pending, None, None) => {}
            (EnrollmentStatus::Pending, _, _) => {
                return Err(EnrollmentValidationError::PendingWithDecision);
            }
            (EnrollmentStatus::Approved | EnrollmentStatus::Rejected, Some(_), Some(_)) => {}
            (EnrollmentStatus::Approved | EnrollmentStatus::Rejected, _, _) => {
                return Err(EnrollmentValidationError::DecisionIncomplete);
            }
        }
        Ok(Self {
            id,
            student_id,
            course_id,
            status,
            decided_by,
            requested_at,
            decided_at,
        })
    }

    /// Apply an administrator decision.
    ///
    /// Only pending enrollments accept a decision. Seat reservation for an
    /// approval must already have succeeded.
    pub fn decide(
        self,
        decision: EnrollmentDecision,
        admin: UserId,
        at: DateTime<Utc>,
    ) -> Result<Self, EnrollmentTransitionError> {
        match self.status {
            EnrollmentStatus::Pending => Ok(Self {
                status: decision.target_status(),
                decided_by: Some(admin),
                decided_at: Some(at),
                ..self
            }),
            status @ (EnrollmentStatus::Approved | EnrollmentStatus::Rejected) => {
                Err(EnrollmentTransitionError::AlreadyDecided { status })
            }
        }
    }

    pub fn id(&self) -> EnrollmentId {
        self.id
    }

    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    /// Administrator who decided the enrollment.
    pub fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.status, EnrollmentStatus::Rejected)
    }
}
