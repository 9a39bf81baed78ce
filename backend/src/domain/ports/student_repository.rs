//! Port for reading student profiles.

use async_trait::async_trait;

use crate::domain::{Student, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        Connection { message: String } =>
            "student repository connection failed: {message}" as Unavailable,
        Query { message: String } =>
            "student repository query failed: {message}" as Failed,
    }
}

/// Read access to student profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by their account id.
    async fn find_by_id(&self, student_id: &UserId)
    -> Result<Option<Student>, StudentRepositoryError>;

    /// Every student profile ordered by school, then id.
    async fn list_students(&self) -> Result<Vec<Student>, StudentRepositoryError>;
}
