//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters translate between Diesel rows and domain types and nothing more.
//! Row structs (`models`) and the table definitions (`schema`) stay private to
//! this module. Every database failure is mapped to the calling port's error
//! type.
//!
//! # Example
//!
//! ```ignore
//! use enrollment_backend::outbound::persistence::{DbPool, DieselEnrollmentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/enrollment")).await?;
//! let enrollments = DieselEnrollmentRepository::new(pool);
//! ```

mod diesel_capacity_ledger;
mod diesel_course_catalogue;
mod diesel_enrollment_repository;
mod diesel_error_mapping;
mod diesel_student_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_capacity_ledger::DieselCapacityLedger;
pub use diesel_course_catalogue::DieselCourseCatalogue;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
