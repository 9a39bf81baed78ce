//! Driving port for enrollment requests and administrator decisions.

use async_trait::async_trait;

use crate::domain::{CourseId, Enrollment, EnrollmentId, Error, ErrorCode, Principal, UserId};

/// Request a seat on a course for a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnrollmentRequest {
    pub principal: Principal,
    pub student_id: UserId,
    pub course_id: CourseId,
}

/// Approve or reject one enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideEnrollmentRequest {
    pub principal: Principal,
    pub enrollment_id: EnrollmentId,
}

/// Approve a batch of enrollments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkApproveRequest {
    pub principal: Principal,
    pub enrollment_ids: Vec<EnrollmentId>,
}

/// Outcome for one id in a bulk approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkApprovalOutcome {
    Approved,
    Failed { code: ErrorCode, message: String },
}

/// Per-item bulk approval result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkApprovalItem {
    pub enrollment_id: EnrollmentId,
    pub outcome: BulkApprovalOutcome,
}

/// Aggregate bulk approval result. `results` keeps request order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkApprovalReport {
    pub approved: usize,
    pub results: Vec<BulkApprovalItem>,
}

impl BulkApprovalReport {
    /// Append an item, counting it when approved.
    pub fn record(&mut self, enrollment_id: EnrollmentId, result: Result<Enrollment, Error>) {
        let outcome = match result {
            Ok(_) => {
                self.approved += 1;
                BulkApprovalOutcome::Approved
            }
            Err(err) => BulkApprovalOutcome::Failed {
                code: err.code(),
                message: err.message().to_owned(),
            },
        };
        self.results.push(BulkApprovalItem {
            enrollment_id,
            outcome,
        });
    }
}

/// Enrollment write use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Create a pending enrollment. Fails with `course_full` when the course
    /// has no free seat at request time.
    async fn request_enrollment(
        &self,
        request: RequestEnrollmentRequest,
    ) -> Result<Enrollment, Error>;

    /// Approve a pending enrollment, taking one seat.
    async fn approve_enrollment(
        &self,
        request: DecideEnrollmentRequest,
    ) -> Result<Enrollment, Error>;

    /// Reject a pending enrollment. Seats are untouched.
    async fn reject_enrollment(
        &self,
        request: DecideEnrollmentRequest,
    ) -> Result<Enrollment, Error>;

    /// Approve each id in order. Per-item failures are reported, never
    /// propagated.
    async fn bulk_approve(&self, request: BulkApproveRequest)
    -> Result<BulkApprovalReport, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn report_counts_only_approvals() {
        let mut report = BulkApprovalReport::default();
        let ok = Enrollment::request(UserId::random(), CourseId::random(), Utc::now());
        report.record(ok.id(), Ok(ok.clone()));
        let failed = EnrollmentId::random();
        report.record(failed, Err(Error::course_full("no seats")));

        assert_eq!(report.approved, 1);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].outcome, BulkApprovalOutcome::Approved);
        assert_eq!(
            report.results[1],
            BulkApprovalItem {
                enrollment_id: failed,
                outcome: BulkApprovalOutcome::Failed {
                    code: ErrorCode::CourseFull,
                    message: "no seats".to_owned(),
                },
            }
        );
    }
}
