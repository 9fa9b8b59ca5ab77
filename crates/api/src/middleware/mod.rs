//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the verified credential (Bearer header or auth cookie).
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`session::SessionGuard`] -- authenticated *and* within session quota;
//!   refreshes the caller's session as a side effect.
//! - [`client::ClientInfo`] -- IP / user-agent / device label of the caller.

pub mod auth;
pub mod client;
pub mod rbac;
pub mod session;
