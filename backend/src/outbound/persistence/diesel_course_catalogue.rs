//! PostgreSQL-backed `CourseCatalogue` over the `courses` and `subjects`
//! tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CourseCatalogue, CourseCatalogueError};
use crate::domain::{Course, CourseId, Subject};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CourseRow, SubjectRow};
use super::pool::{DbPool, PooledConn};
use super::schema::{courses, subjects};

/// Diesel-backed implementation of the course catalogue port.
#[derive(Clone)]
pub struct DieselCourseCatalogue {
    pool: DbPool,
}

impl DieselCourseCatalogue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: &diesel::result::Error) -> CourseCatalogueError {
    map_diesel_error(
        error,
        CourseCatalogueError::query,
        CourseCatalogueError::connection,
    )
}

fn to_course(row: CourseRow) -> Result<Course, CourseCatalogueError> {
    Course::try_from(row).map_err(|err| CourseCatalogueError::query(err.to_string()))
}

fn to_subjects(rows: Vec<SubjectRow>) -> Result<Vec<Subject>, CourseCatalogueError> {
    rows.into_iter()
        .map(|row| {
            Subject::try_from(row).map_err(|err| CourseCatalogueError::query(err.to_string()))
        })
        .collect()
}

impl DieselCourseCatalogue {
    async fn conn(&self) -> Result<PooledConn<'_>, CourseCatalogueError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(&err, CourseCatalogueError::connection))
    }
}

#[async_trait]
impl CourseCatalogue for DieselCourseCatalogue {
    async fn find_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<Course>, CourseCatalogueError> {
        let mut conn = self.conn().await?;
        let row = courses::table
            .filter(courses::id.eq(course_id.as_uuid()))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;
        row.map(to_course).transpose()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, CourseCatalogueError> {
        let mut conn = self.conn().await?;
        let rows: Vec<CourseRow> = courses::table
            .order((courses::name.asc(), courses::id.asc()))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        rows.into_iter().map(to_course).collect()
    }

    async fn list_subjects(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Subject>, CourseCatalogueError> {
        let mut conn = self.conn().await?;
        let rows = subjects::table
            .filter(subjects::course_id.eq(course_id.as_uuid()))
            .order((subjects::description.asc(), subjects::id.asc()))
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        to_subjects(rows)
    }

    async fn list_all_subjects(&self) -> Result<Vec<Subject>, CourseCatalogueError> {
        let mut conn = self.conn().await?;
        let rows = subjects::table
            .order((subjects::description.asc(), subjects::id.asc()))
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(&err))?;
        to_subjects(rows)
    }
}
