//! Driving port for the course catalogue.

use async_trait::async_trait;

use crate::domain::{Course, CourseId, Error, Subject};

/// A course together with the subjects taught in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub course: Course,
    pub subjects: Vec<Subject>,
}

impl CourseSummary {
    /// Attach the subjects of `course` picked from `subjects`.
    pub fn collect<'a>(course: Course, subjects: impl IntoIterator<Item = &'a Subject>) -> Self {
        let course_id = course.id();
        let subjects = subjects
            .into_iter()
            .filter(|subject| subject.course_id() == course_id)
            .cloned()
            .collect();
        Self { course, subjects }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Every course with its current seat counters and subjects.
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, Error>;

    /// Subjects of one course. Fails with `not_found` for unknown courses.
    async fn list_course_subjects(&self, course_id: &CourseId) -> Result<Vec<Subject>, Error>;
}
