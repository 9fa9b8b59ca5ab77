//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod active_session_repo;
pub mod session_payment_repo;
pub mod user_repo;

pub use active_session_repo::ActiveSessionRepo;
pub use session_payment_repo::SessionPaymentRepo;
pub use user_repo::UserRepo;
