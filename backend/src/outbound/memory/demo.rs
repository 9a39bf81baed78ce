//! Demonstration data for running without a database.

use uuid::{Uuid, uuid};

use crate::domain::ports::FIXTURE_STUDENT_ID;
use crate::domain::{
    Course, CourseCapacity, CourseId, CourseValidationError, Student, Subject, SubjectId,
    SubjectValidationError, UserId,
};

use super::InMemoryCampusStore;

/// Ids of the seeded courses, in seeding order: a large lecture, a small lab
/// and a single-seat seminar.
pub const DEMO_COURSE_IDS: [Uuid; 3] = [
    uuid!("9a0f3c1e-2b4d-4e6f-8a1b-3c5d7e9f0a11"),
    uuid!("9a0f3c1e-2b4d-4e6f-8a1b-3c5d7e9f0a12"),
    uuid!("9a0f3c1e-2b4d-4e6f-8a1b-3c5d7e9f0a13"),
];

/// A second student without a login, so administrators have someone to
/// request on behalf of.
pub const DEMO_SECOND_STUDENT_ID: Uuid = uuid!("5c1d2f3e-7a8b-4c9d-8e0f-1a2b3c4d5e70");

/// Invalid seed data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemoSeedError {
    #[error(transparent)]
    Course(#[from] CourseValidationError),
    #[error(transparent)]
    Subject(#[from] SubjectValidationError),
}

impl InMemoryCampusStore {
    /// A store seeded with three courses, their subjects and two students.
    ///
    /// # Errors
    ///
    /// Returns [`DemoSeedError`] if the seed data is malformed.
    pub fn with_demo_data() -> Result<Self, DemoSeedError> {
        let [lecture, lab, seminar] = DEMO_COURSE_IDS;
        let courses = [
            (lecture, "Linear Algebra", "lecture", 30),
            (lab, "Organic Chemistry Lab", "lab", 2),
            (seminar, "Creative Writing Seminar", "seminar", 1),
        ];
        let subjects = [
            (lecture, "Vector spaces", 4),
            (lecture, "Eigenvalues and eigenvectors", 3),
            (lab, "Laboratory safety", 1),
            (lab, "Synthesis of aspirin", 5),
            (seminar, "Short fiction workshop", 6),
        ];
        let mut store = Self::new()
            .with_student(Student::new(
                UserId::from_uuid(FIXTURE_STUDENT_ID),
                "Northfield High",
                None,
            ))
            .with_student(Student::new(
                UserId::from_uuid(DEMO_SECOND_STUDENT_ID),
                "Riverside Academy",
                None,
            ));
        for (id, name, course_type, seats) in courses {
            store = store.with_course(Course::new(
                CourseId::from_uuid(id),
                name,
                course_type,
                CourseCapacity::empty(seats),
            )?);
        }
        for (course, description, ects) in subjects {
            store = store.with_subject(Subject::new(
                SubjectId::random(),
                CourseId::from_uuid(course),
                description,
                ects,
            )?);
        }
        Ok(store)
    }
}
