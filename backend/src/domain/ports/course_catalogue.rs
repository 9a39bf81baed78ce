//! Port for reading courses and their subjects.

use async_trait::async_trait;

use crate::domain::{Course, CourseId, Subject};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course catalogue adapters.
    pub enum CourseCatalogueError {
        /// Catalogue connection could not be established.
        Connection { message: String } =>
            "course catalogue connection failed: {message}" as Unavailable,
        /// Query failed during execution.
        Query { message: String } =>
            "course catalogue query failed: {message}" as Failed,
    }
}

/// Read access to courses, their current seat counters and their subjects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCatalogue: Send + Sync {
    /// Find a course by id.
    async fn find_course(&self, course_id: &CourseId)
    -> Result<Option<Course>, CourseCatalogueError>;

    /// List every course ordered by name.
    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogueError>;

    /// Subjects of one course ordered by description. An unknown course has
    /// no subjects.
    async fn list_subjects(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Subject>, CourseCatalogueError>;

    /// Every subject of every course, ordered by description.
    async fn list_all_subjects(&self) -> Result<Vec<Subject>, CourseCatalogueError>;
}
