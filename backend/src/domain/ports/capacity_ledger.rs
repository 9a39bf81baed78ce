//! Port for the per-course seat counters.
//!
//! Both operations are single atomic steps in the backing store. Adapters
//! must never implement them as a read followed by a write.

use async_trait::async_trait;

use crate::domain::CourseId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by capacity ledger adapters.
    pub enum CapacityLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "capacity ledger connection failed: {message}" as Unavailable,
        /// Update failed during execution.
        Query { message: String } =>
            "capacity ledger query failed: {message}" as Failed,
        /// The course id is not in the ledger.
        UnknownCourse { course_id: String } =>
            "course {course_id} is not in the capacity ledger" as Missing,
    }
}

/// Atomic seat accounting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapacityLedger: Send + Sync {
    /// Take one seat if `current < max`. Returns `false` when the course is
    /// full.
    async fn try_reserve(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError>;

    /// Give one seat back if any is held. Returns `false` when the counter is
    /// already zero.
    async fn release(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError>;
}
