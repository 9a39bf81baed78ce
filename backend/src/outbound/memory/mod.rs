//! In-process adapter for every driven port.
//!
//! [`InMemoryCampusStore`] keeps courses, subjects, students and enrollments
//! behind one mutex. Each port call takes the lock once, so conditional
//! updates such as "reserve a seat and approve" are atomic with respect to
//! every other call.
//! The server uses it when no database is configured and tests use it as a
//! realistic double.

mod demo;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ApprovalWrite, CapacityLedger, CapacityLedgerError, CourseCatalogue, CourseCatalogueError,
    EnrollmentInsert, EnrollmentRepository, EnrollmentRepositoryError, StudentRepository,
    StudentRepositoryError,
};
use crate::domain::{
    Course, CourseCapacity, CourseId, Enrollment, EnrollmentId, EnrollmentStatus, Student, Subject,
    SubjectId, UserId,
};

pub use demo::{DEMO_COURSE_IDS, DEMO_SECOND_STUDENT_ID, DemoSeedError};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct CampusState {
    courses: BTreeMap<CourseId, Course>,
    subjects: BTreeMap<SubjectId, Subject>,
    students: BTreeMap<UserId, Student>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
}

impl CampusState {
    fn has_open_request(&self, student_id: UserId, course_id: CourseId) -> bool {
        self.enrollments.values().any(|enrollment| {
            enrollment.student_id() == student_id
                && enrollment.course_id() == course_id
                && enrollment.is_open()
        })
    }

    fn is_pending(&self, enrollment_id: EnrollmentId) -> bool {
        self.enrollments
            .get(&enrollment_id)
            .is_some_and(|stored| stored.status() == EnrollmentStatus::Pending)
    }

    /// Apply `change` to the course counters. `None` from `change` means the
    /// update was refused.
    fn update_seats(
        &mut self,
        course_id: CourseId,
        change: impl FnOnce(CourseCapacity) -> Option<CourseCapacity>,
    ) -> Option<bool> {
        let course = self.courses.remove(&course_id)?;
        let (course, applied) = match change(course.capacity()) {
            Some(capacity) => (course.with_capacity(capacity), true),
            None => (course, false),
        };
        self.courses.insert(course_id, course);
        Some(applied)
    }

    fn subjects_where(&self, keep: impl Fn(&Subject) -> bool) -> Vec<Subject> {
        let mut subjects: Vec<Subject> =
            self.subjects.values().filter(|s| keep(s)).cloned().collect();
        subjects.sort_by(|a, b| {
            a.description()
                .cmp(b.description())
                .then(a.id().cmp(&b.id()))
        });
        subjects
    }

    fn sorted(mut enrollments: Vec<Enrollment>) -> Vec<Enrollment> {
        enrollments.sort_by_key(|e| (e.requested_at(), e.id()));
        enrollments
    }
}

/// Mutex-guarded store implementing the course, ledger, student and
/// enrollment ports.
#[derive(Debug, Default)]
pub struct InMemoryCampusStore {
    state: Mutex<CampusState>,
}

impl InMemoryCampusStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a course.
    #[must_use]
    pub fn with_course(self, course: Course) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.courses.insert(course.id(), course);
        }
        self
    }

    /// Add or replace a subject.
    #[must_use]
    pub fn with_subject(self, subject: Subject) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.subjects.insert(subject.id(), subject);
        }
        self
    }

    /// Add or replace a student profile.
    #[must_use]
    pub fn with_student(self, student: Student) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.students.insert(student.id(), student);
        }
        self
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, CampusState>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }
}

#[async_trait]
impl CourseCatalogue for InMemoryCampusStore {
    async fn find_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<Course>, CourseCatalogueError> {
        let state = self.lock(CourseCatalogueError::query)?;
        Ok(state.courses.get(course_id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogueError> {
        let state = self.lock(CourseCatalogueError::query)?;
        let mut courses: Vec<Course> = state.courses.values().cloned().collect();
        courses.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(courses)
    }

    async fn list_subjects(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Subject>, CourseCatalogueError> {
        let state = self.lock(CourseCatalogueError::query)?;
        Ok(state.subjects_where(|subject| subject.course_id() == *course_id))
    }

    async fn list_all_subjects(&self) -> Result<Vec<Subject>, CourseCatalogueError> {
        let state = self.lock(CourseCatalogueError::query)?;
        Ok(state.subjects_where(|_| true))
    }
}

#[async_trait]
impl CapacityLedger for InMemoryCampusStore {
    async fn try_reserve(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError> {
        let mut state = self.lock(CapacityLedgerError::query)?;
        state
            .update_seats(*course_id, CourseCapacity::try_reserve)
            .ok_or_else(|| CapacityLedgerError::unknown_course(course_id.to_string()))
    }

    async fn release(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError> {
        let mut state = self.lock(CapacityLedgerError::query)?;
        state
            .update_seats(*course_id, CourseCapacity::release)
            .ok_or_else(|| CapacityLedgerError::unknown_course(course_id.to_string()))
    }
}

#[async_trait]
impl StudentRepository for InMemoryCampusStore {
    async fn find_by_id(
        &self,
        student_id: &UserId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let state = self.lock(StudentRepositoryError::query)?;
        Ok(state.students.get(student_id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let state = self.lock(StudentRepositoryError::query)?;
        let mut students: Vec<Student> = state.students.values().cloned().collect();
        students.sort_by(|a, b| a.school().cmp(b.school()).then(a.id().cmp(&b.id())));
        Ok(students)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryCampusStore {
    async fn create_pending(
        &self,
        enrollment: &Enrollment,
    ) -> Result<EnrollmentInsert, EnrollmentRepositoryError> {
        let mut state = self.lock(EnrollmentRepositoryError::query)?;
        if state.has_open_request(enrollment.student_id(), enrollment.course_id()) {
            return Ok(EnrollmentInsert::Duplicate);
        }
        let Some(student) = state.students.get_mut(&enrollment.student_id()) else {
            return Err(EnrollmentRepositoryError::query(format!(
                "student {} does not exist",
                enrollment.student_id()
            )));
        };
        student.hold(enrollment.course_id());
        state.enrollments.insert(enrollment.id(), enrollment.clone());
        Ok(EnrollmentInsert::Created)
    }

    async fn find_by_id(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        let state = self.lock(EnrollmentRepositoryError::query)?;
        Ok(state.enrollments.get(enrollment_id).cloned())
    }

    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let state = self.lock(EnrollmentRepositoryError::query)?;
        Ok(CampusState::sorted(
            state
                .enrollments
                .values()
                .filter(|e| e.student_id() == *student_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let state = self.lock(EnrollmentRepositoryError::query)?;
        Ok(CampusState::sorted(
            state
                .enrollments
                .values()
                .filter(|e| e.course_id() == *course_id)
                .cloned()
                .collect(),
        ))
    }

    async fn decide_if_pending(
        &self,
        decided: &Enrollment,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let mut state = self.lock(EnrollmentRepositoryError::query)?;
        if !state.is_pending(decided.id()) {
            return Ok(false);
        }
        state.enrollments.insert(decided.id(), decided.clone());
        Ok(true)
    }

    async fn approve_with_reservation(
        &self,
        approved: &Enrollment,
    ) -> Result<ApprovalWrite, EnrollmentRepositoryError> {
        let mut state = self.lock(EnrollmentRepositoryError::query)?;
        if !state.is_pending(approved.id()) {
            return Ok(ApprovalWrite::NotPending);
        }
        match state.update_seats(approved.course_id(), CourseCapacity::try_reserve) {
            None => Err(EnrollmentRepositoryError::unknown_course(
                approved.course_id().to_string(),
            )),
            Some(false) => Ok(ApprovalWrite::CourseFull),
            Some(true) => {
                state.enrollments.insert(approved.id(), approved.clone());
                Ok(ApprovalWrite::Approved)
            }
        }
    }
}
