//! Inbound adapters translating external requests into domain service calls.
//!
//! Framework details stay here. Handlers only talk to domain ports.

pub mod http;
