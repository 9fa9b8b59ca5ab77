//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the table row
//! plus the DTOs used to insert or update it.

pub mod active_session;
pub mod session_payment;
pub mod user;
