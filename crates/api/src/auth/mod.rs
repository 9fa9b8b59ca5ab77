//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- token issuing/verification and the session-token digest.
//! - [`cookie`] -- `Set-Cookie` values for browser clients.

pub mod cookie;
pub mod jwt;
pub mod password;
