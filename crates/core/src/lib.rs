//! Domain rules for the IGECO session quota service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates build on these types and predicates.

pub mod error;
pub mod payments;
pub mod roles;
pub mod session_quota;
pub mod types;
pub mod user_agent;
