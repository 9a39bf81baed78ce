//! PostgreSQL-backed `EnrollmentRepository`.
//!
//! Request creation and approval each run in one transaction. Approval takes
//! the seat with the ledger's conditional update and writes the status with a
//! `status = 'pending'` guard; a refused seat rolls the status write back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    ApprovalWrite, EnrollmentInsert, EnrollmentRepository, EnrollmentRepositoryError,
};
use crate::domain::{CourseId, Enrollment, EnrollmentId, EnrollmentStatus, UserId};

use super::diesel_capacity_ledger::{SeatUpdate, reserve_seat};
use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EnrollmentDecisionUpdate, EnrollmentRow, NewEnrollmentRow};
use super::pool::DbPool;
use super::schema::{enrollments, students};

/// Diesel-backed implementation of the enrollment repository port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: &diesel::result::Error) -> EnrollmentRepositoryError {
    map_diesel_error(
        error,
        EnrollmentRepositoryError::query,
        EnrollmentRepositoryError::connection,
    )
}

fn to_enrollment(row: EnrollmentRow) -> Result<Enrollment, EnrollmentRepositoryError> {
    Enrollment::try_from(row).map_err(|err| EnrollmentRepositoryError::query(err.to_string()))
}

fn to_enrollments(
    rows: Vec<EnrollmentRow>,
) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
    rows.into_iter()
        .map(to_enrollment)
        .collect()
}

/// Reasons the approval transaction rolls back.
#[derive(Debug)]
enum ApprovalAbort {
    CourseFull,
    UnknownCourse,
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for ApprovalAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

async fn write_decision_if_pending(
    conn: &mut AsyncPgConnection,
    decided: &Enrollment,
) -> QueryResult<bool> {
    let rows = diesel::update(
        enrollments::table
            .filter(enrollments::id.eq(decided.id().as_uuid()))
            .filter(enrollments::status.eq(EnrollmentStatus::Pending.as_str())),
    )
    .set(EnrollmentDecisionUpdate::from(decided))
    .execute(conn)
    .await?;
    Ok(rows == 1)
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn create_pending(
        &self,
        enrollment: &Enrollment,
    ) -> Result<EnrollmentInsert, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        let row = NewEnrollmentRow {
            id: *enrollment.id().as_uuid(),
            student_id: *enrollment.student_id().as_uuid(),
            course_id: *enrollment.course_id().as_uuid(),
            status: enrollment.status().as_str(),
            requested_at: enrollment.requested_at(),
        };

        conn.transaction(|conn| {
            async move {
                // The partial unique index on open requests turns a duplicate
                // into a skipped insert.
                let inserted = diesel::insert_into(enrollments::table)
                    .values(&row)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                if inserted == 0 {
                    return Ok(EnrollmentInsert::Duplicate);
                }
                diesel::update(students::table.filter(students::id.eq(row.student_id)))
                    .set(students::current_course_id.eq(Some(row.course_id)))
                    .execute(conn)
                    .await?;
                Ok(EnrollmentInsert::Created)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: diesel::result::Error| diesel_error(&err))
    }

    async fn find_by_id(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        let row = enrollments::table
            .filter(enrollments::id.eq(enrollment_id.as_uuid()))
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        row.map(to_enrollment).transpose()
    }

    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        let rows = enrollments::table
            .filter(enrollments::student_id.eq(student_id.as_uuid()))
            .order((enrollments::requested_at.asc(), enrollments::id.asc()))
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        to_enrollments(rows)
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        let rows = enrollments::table
            .filter(enrollments::course_id.eq(course_id.as_uuid()))
            .order((enrollments::requested_at.asc(), enrollments::id.asc()))
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        to_enrollments(rows)
    }

    async fn decide_if_pending(
        &self,
        decided: &Enrollment,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        write_decision_if_pending(&mut conn, decided)
            .await
            .map_err(|err| diesel_error(&err))
    }

    async fn approve_with_reservation(
        &self,
        approved: &Enrollment,
    ) -> Result<ApprovalWrite, EnrollmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, EnrollmentRepositoryError::connection))?;
        let course_id = *approved.course_id().as_uuid();

        let outcome = conn
            .transaction(|conn| {
                async move {
                    // Status first: the row lock serialises racing decisions on
                    // the same enrollment before any seat is taken.
                    if !write_decision_if_pending(conn, approved).await? {
                        return Ok(ApprovalWrite::NotPending);
                    }
                    match reserve_seat(conn, course_id).await? {
                        SeatUpdate::Applied => Ok(ApprovalWrite::Approved),
                        SeatUpdate::Refused => Err(ApprovalAbort::CourseFull),
                        SeatUpdate::UnknownCourse => Err(ApprovalAbort::UnknownCourse),
                    }
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(write) => Ok(write),
            Err(ApprovalAbort::CourseFull) => {
                debug!(enrollment_id = %approved.id(), "approval rolled back, course full");
                Ok(ApprovalWrite::CourseFull)
            }
            Err(ApprovalAbort::UnknownCourse) => Err(EnrollmentRepositoryError::unknown_course(
                approved.course_id().to_string(),
            )),
            Err(ApprovalAbort::Database(err)) => Err(diesel_error(&err)),
        }
    }
}
