//! PostgreSQL-backed `CapacityLedger`.
//!
//! Seat counters change through a single conditional `UPDATE`, so the
//! less-than check and the increment are one atomic statement. The same
//! helpers run inside the approval transaction of the enrollment repository.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::CourseId;
use crate::domain::ports::{CapacityLedger, CapacityLedgerError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::courses;

/// Outcome of a conditional counter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SeatUpdate {
    Applied,
    Refused,
    UnknownCourse,
}

async fn classify(
    conn: &mut AsyncPgConnection,
    course_id: Uuid,
    rows: usize,
) -> QueryResult<SeatUpdate> {
    if rows > 0 {
        return Ok(SeatUpdate::Applied);
    }
    let known = diesel::select(exists(courses::table.filter(courses::id.eq(course_id))))
        .get_result::<bool>(conn)
        .await?;
    Ok(if known {
        SeatUpdate::Refused
    } else {
        SeatUpdate::UnknownCourse
    })
}

/// `UPDATE courses SET current_capacity = current_capacity + 1
///  WHERE id = $1 AND current_capacity < max_capacity`
pub(super) async fn reserve_seat(
    conn: &mut AsyncPgConnection,
    course_id: Uuid,
) -> QueryResult<SeatUpdate> {
    let rows = diesel::update(
        courses::table
            .filter(courses::id.eq(course_id))
            .filter(courses::current_capacity.lt(courses::max_capacity)),
    )
    .set(courses::current_capacity.eq(courses::current_capacity + 1))
    .execute(conn)
    .await?;
    classify(conn, course_id, rows).await
}

/// `UPDATE courses SET current_capacity = current_capacity - 1
///  WHERE id = $1 AND current_capacity > 0`
pub(super) async fn release_seat(
    conn: &mut AsyncPgConnection,
    course_id: Uuid,
) -> QueryResult<SeatUpdate> {
    let rows = diesel::update(
        courses::table
            .filter(courses::id.eq(course_id))
            .filter(courses::current_capacity.gt(0)),
    )
    .set(courses::current_capacity.eq(courses::current_capacity - 1))
    .execute(conn)
    .await?;
    classify(conn, course_id, rows).await
}

fn diesel_error(error: &diesel::result::Error) -> CapacityLedgerError {
    map_diesel_error(
        error,
        CapacityLedgerError::query,
        CapacityLedgerError::connection,
    )
}

fn into_result(update: SeatUpdate, course_id: &CourseId) -> Result<bool, CapacityLedgerError> {
    match update {
        SeatUpdate::Applied => Ok(true),
        SeatUpdate::Refused => Ok(false),
        SeatUpdate::UnknownCourse => {
            Err(CapacityLedgerError::unknown_course(course_id.to_string()))
        }
    }
}

/// Diesel-backed implementation of the capacity ledger port.
#[derive(Clone)]
pub struct DieselCapacityLedger {
    pool: DbPool,
}

impl DieselCapacityLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CapacityLedger for DieselCapacityLedger {
    async fn try_reserve(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, CapacityLedgerError::connection))?;
        let update = reserve_seat(&mut conn, *course_id.as_uuid())
            .await
            .map_err(|err| diesel_error(&err))?;
        into_result(update, course_id)
    }

    async fn release(&self, course_id: &CourseId) -> Result<bool, CapacityLedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, CapacityLedgerError::connection))?;
        let update = release_seat(&mut conn, *course_id.as_uuid())
            .await
            .map_err(|err| diesel_error(&err))?;
        into_result(update, course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{PortError, PortFailure};
    use rstest::rstest;

    #[rstest]
    #[case(SeatUpdate::Applied, Some(true))]
    #[case(SeatUpdate::Refused, Some(false))]
    #[case(SeatUpdate::UnknownCourse, None)]
    fn seat_updates_map_to_port_results(
        #[case] update: SeatUpdate,
        #[case] expected: Option<bool>,
    ) {
        let course_id = CourseId::random();
        match (into_result(update, &course_id), expected) {
            (Ok(value), Some(want)) => assert_eq!(value, want),
            (Err(err), None) => assert_eq!(err.failure(), PortFailure::Missing),
            (other, want) => panic!("unexpected {other:?} for {want:?}"),
        }
    }
}
