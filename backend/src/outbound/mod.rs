//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed adapters using Diesel.
//! - **memory**: a mutex-guarded in-process store for development and tests.
//!
//! Adapters translate between domain types and storage representations. They
//! contain no admission rules.

pub mod memory;
pub mod persistence;
