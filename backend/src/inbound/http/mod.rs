//! HTTP inbound adapter exposing REST endpoints.

pub mod courses;
pub mod enrollments;
mod enrollments_dto;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
