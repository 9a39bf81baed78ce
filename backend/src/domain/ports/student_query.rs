//! Driving port for student profile reads.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Student, UserId};

use super::CourseSummary;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentQuery: Send + Sync {
    /// One profile, including the course the student last requested.
    /// Visible to the student themself or an administrator.
    async fn student_profile(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Student, Error>;

    /// Every student profile. Staff only.
    async fn list_students(&self, principal: &Principal) -> Result<Vec<Student>, Error>;

    /// The course the student currently holds, with its subjects. Empty when
    /// the student has not requested a course yet.
    async fn student_courses(
        &self,
        principal: &Principal,
        student_id: &UserId,
    ) -> Result<Vec<CourseSummary>, Error>;
}
