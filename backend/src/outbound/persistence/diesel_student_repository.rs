//! PostgreSQL-backed `StudentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{Student, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::StudentRow;
use super::pool::DbPool;
use super::schema::students;

/// Diesel-backed implementation of the student repository port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: &diesel::result::Error) -> StudentRepositoryError {
    map_diesel_error(
        error,
        StudentRepositoryError::query,
        StudentRepositoryError::connection,
    )
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn find_by_id(
        &self,
        student_id: &UserId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, StudentRepositoryError::connection))?;
        let row = students::table
            .filter(students::id.eq(student_id.as_uuid()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        Ok(row.map(Student::from))
    }

    async fn list_students(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, StudentRepositoryError::connection))?;
        let rows = students::table
            .order((students::school.asc(), students::id.asc()))
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        Ok(rows.into_iter().map(Student::from).collect())
    }
}
