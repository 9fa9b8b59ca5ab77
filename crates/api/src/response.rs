//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope for list and entity payloads.
///
/// The session endpoints whose shape is fixed by the client contract
/// (`heartbeat`, `count`, `close`) return their own structs instead.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
