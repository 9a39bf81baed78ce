//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types validate the stored values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Course, CourseCapacity, CourseId, Enrollment, EnrollmentId, EnrollmentParts, Student, Subject,
    SubjectId, UserId,
};

use super::schema::{courses, enrollments, students, subjects};

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub name: String,
    pub course_type: String,
    pub max_capacity: i32,
    pub current_capacity: i32,
}

/// Row struct for reading from the subjects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubjectRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub description: String,
    pub ects_points: i32,
}

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: Uuid,
    pub school: String,
    pub current_course_id: Option<Uuid>,
}

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub decided_by: Option<Uuid>,
    pub requested_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Insertable struct for new pending enrollments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: &'a str,
    pub requested_at: DateTime<Utc>,
}

/// Changeset written when an enrollment is decided.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = enrollments)]
pub(crate) struct EnrollmentDecisionUpdate<'a> {
    pub status: &'a str,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Failure converting a stored row into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stored {table} row {id}: {reason}")]
pub(crate) struct RowConversionError {
    pub table: &'static str,
    pub id: Uuid,
    pub reason: String,
}

impl RowConversionError {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = RowConversionError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let CourseRow {
            id,
            name,
            course_type,
            max_capacity,
            current_capacity,
        } = row;
        let max = u32::try_from(max_capacity)
            .map_err(|err| RowConversionError::new("courses", id, err))?;
        let current = u32::try_from(current_capacity)
            .map_err(|err| RowConversionError::new("courses", id, err))?;
        let capacity = CourseCapacity::new(max, current)
            .map_err(|err| RowConversionError::new("courses", id, err))?;
        Course::new(CourseId::from_uuid(id), name, course_type, capacity)
            .map_err(|err| RowConversionError::new("courses", id, err))
    }
}

impl TryFrom<SubjectRow> for Subject {
    type Error = RowConversionError;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        let ects = u32::try_from(row.ects_points)
            .map_err(|err| RowConversionError::new("subjects", row.id, err))?;
        Subject::new(
            SubjectId::from_uuid(row.id),
            CourseId::from_uuid(row.course_id),
            row.description,
            ects,
        )
        .map_err(|err| RowConversionError::new("subjects", row.id, err))
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student::new(
            UserId::from_uuid(row.id),
            row.school,
            row.current_course_id.map(CourseId::from_uuid),
        )
    }
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = RowConversionError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|err| RowConversionError::new("enrollments", row.id, err))?;
        Enrollment::from_parts(EnrollmentParts {
            id: EnrollmentId::from_uuid(row.id),
            student_id: UserId::from_uuid(row.student_id),
            course_id: CourseId::from_uuid(row.course_id),
            status,
            decided_by: row.decided_by.map(UserId::from_uuid),
            requested_at: row.requested_at,
            decided_at: row.decided_at,
        })
        .map_err(|err| RowConversionError::new("enrollments", row.id, err))
    }
}

impl<'a> From<&'a Enrollment> for EnrollmentDecisionUpdate<'a> {
    fn from(enrollment: &'a Enrollment) -> Self {
        Self {
            status: enrollment.status().as_str(),
            decided_by: enrollment.decided_by().map(|id| *id.as_uuid()),
            decided_at: enrollment.decided_at(),
        }
    }
}
