//! Courses and their seat counters.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(Uuid);

impl CourseId {
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

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Validation errors for course data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseValidationError {
    #[error("course name must not be empty")]
    EmptyName,
    #[error("course type must not be empty")]
    EmptyCourseType,
    #[error("current capacity {current} exceeds maximum {max}")]
    OverCapacity { current: u32, max: u32 },
}

/// Seat counters for a course.
///
/// ## Invariants
/// - `current <= max` at all times.
///
/// `current` counts approved enrollments only. Pending requests do not hold
/// a seat.
///
/// # Examples
/// ```
/// use enrollment_backend::domain::CourseCapacity;
///
/// let seats = CourseCapacity::new(1, 0).expect("valid counters");
/// let seats = seats.try_reserve().expect("one seat free");
/// assert!(!seats.has_room());
/// assert!(seats.try_reserve().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CapacityCounters", into = "CapacityCounters")]
pub struct CourseCapacity {
    max: u32,
    current: u32,
}

/// Wire form of [`CourseCapacity`]. Decoding goes through
/// [`CourseCapacity::new`] so stored counters cannot exceed the maximum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CapacityCounters {
    max: u32,
    current: u32,
}

impl From<CourseCapacity> for CapacityCounters {
    fn from(value: CourseCapacity) -> Self {
        Self {
            max: value.max,
            current: value.current,
        }
    }
}

impl TryFrom<CapacityCounters> for CourseCapacity {
    type Error = CourseValidationError;

    fn try_from(value: CapacityCounters) -> Result<Self, Self::Error> {
        Self::new(value.max, value.current)
    }
}

impl CourseCapacity {
    pub fn new(max: u32, current: u32) -> Result<Self, CourseValidationError> {
        if current > max {
            return Err(CourseValidationError::OverCapacity { current, max });
        }
        Ok(Self { max, current })
    }

    /// An empty course with `max` seats.
    pub fn empty(max: u32) -> Self {
        Self { max, current: 0 }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn remaining(&self) -> u32 {
        self.max - self.current
    }

    pub fn has_room(&self) -> bool {
        self.current < self.max
    }

    /// Counters after taking one seat, or `None` when the course is full.
    #[must_use]
    pub fn try_reserve(self) -> Option<Self> {
        self.has_room().then_some(Self {
            max: self.max,
            current: self.current + 1,
        })
    }

    /// Counters after giving one seat back, or `None` when nothing is held.
    #[must_use]
    pub fn release(self) -> Option<Self> {
        self.current.checked_sub(1).map(|current| Self {
            max: self.max,
            current,
        })
    }
}

/// A course students can request to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    course_type: String,
    capacity: CourseCapacity,
}

impl Course {
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        course_type: impl Into<String>,
        capacity: CourseCapacity,
    ) -> Result<Self, CourseValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        let course_type = course_type.into();
        if course_type.trim().is_empty() {
            return Err(CourseValidationError::EmptyCourseType);
        }
        Ok(Self {
            id,
            name,
            course_type,
            capacity,
        })
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-form category tag, e.g. "lecture" or "lab".
    pub fn course_type(&self) -> &str {
        self.course_type.as_str()
    }

    pub fn capacity(&self) -> CourseCapacity {
        self.capacity
    }

    /// The same course with updated seat counters.
    #[must_use]
    pub fn with_capacity(self, capacity: CourseCapacity) -> Self {
        Self { capacity, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_counters_above_maximum() {
        assert_eq!(
            CourseCapacity::new(2, 3),
            Err(CourseValidationError::OverCapacity { current: 3, max: 2 })
        );
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(2, 1, true)]
    #[case(2, 2, false)]
    fn room_depends_on_counters(#[case] max: u32, #[case] current: u32, #[case] room: bool) {
        let seats = CourseCapacity::new(max, current).expect("valid counters");
        assert_eq!(seats.has_room(), room);
        assert_eq!(seats.try_reserve().is_some(), room);
        assert_eq!(seats.remaining(), max - current);
    }

    #[rstest]
    fn decoding_rejects_overbooked_counters() {
        let err = serde_json::from_value::<CourseCapacity>(serde_json::json!({
            "max": 1,
            "current": 2,
        }))
        .expect_err("current above max");
        assert!(err.to_string().contains("exceeds maximum"));

        let seats: CourseCapacity =
            serde_json::from_value(serde_json::json!({ "max": 3, "current": 1 }))
                .expect("valid counters");
        assert_eq!(seats.remaining(), 2);
    }

    #[rstest]
    fn release_never_goes_negative() {
        let seats = CourseCapacity::empty(3);
        assert!(seats.release().is_none());
        let taken = seats.try_reserve().expect("room available");
        assert_eq!(taken.release(), Some(seats));
    }

    #[rstest]
    #[case("", "lecture", CourseValidationError::EmptyName)]
    #[case("Algebra", "  ", CourseValidationError::EmptyCourseType)]
    fn course_requires_labels(
        #[case] name: &str,
        #[case] course_type: &str,
        #[case] expected: CourseValidationError,
    ) {
        let result = Course::new(CourseId::random(), name, course_type, CourseCapacity::empty(1));
        assert_eq!(result, Err(expected));
    }
}
