//! IGECO session quota API server library.
//!
//! Exposes configuration, state, error handling, the session quota manager
//! and routes so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod sessions;
pub mod state;
