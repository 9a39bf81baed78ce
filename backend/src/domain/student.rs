//! Student profiles.

use super::{CourseId, UserId};

/// A student's profile.
///
/// `current_course` is a soft hold set when the student requests a course.
/// It reflects the latest request, not a confirmed seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: UserId,
    school: String,
    current_course: Option<CourseId>,
}

impl Student {
    pub fn new(id: UserId, school: impl Into<String>, current_course: Option<CourseId>) -> Self {
        Self {
            id,
            school: school.into(),
            current_course,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn school(&self) -> &str {
        self.school.as_str()
    }

    pub fn current_course(&self) -> Option<CourseId> {
        self.current_course
    }

    /// Record a soft hold on `course`.
    pub fn hold(&mut self, course: CourseId) {
        self.current_course = Some(course);
    }
}
