//! Subjects taught within a course.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CourseId;

/// Subject identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(Uuid);

impl SubjectId {
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

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Validation errors for subject data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectValidationError {
    #[error("subject description must not be empty")]
    EmptyDescription,
    #[error("subject must be worth at least one ECTS point")]
    NoCredit,
}

/// A subject belonging to exactly one course.
///
/// ## Invariants
/// - `description` is non-blank.
/// - `ects_points >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    course_id: CourseId,
    description: String,
    ects_points: u32,
}

impl Subject {
    pub fn new(
        id: SubjectId,
        course_id: CourseId,
        description: impl Into<String>,
        ects_points: u32,
    ) -> Result<Self, SubjectValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(SubjectValidationError::EmptyDescription);
        }
        if ects_points == 0 {
            return Err(SubjectValidationError::NoCredit);
        }
        Ok(Self {
            id,
            course_id,
            description,
            ects_points,
        })
    }

    pub fn id(&self) -> SubjectId {
        self.id
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn ects_points(&self) -> u32 {
        self.ects_points
    }
}
