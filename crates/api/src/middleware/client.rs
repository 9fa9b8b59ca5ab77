//! Caller metadata recorded on each session row.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use igeco_core::user_agent;
use igeco_db::models::active_session::SessionMetadata;

/// Longest user-agent string kept on a session row.
const MAX_USER_AGENT_LEN: usize = 512;

/// IP address, user agent and derived device label of the caller.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub SessionMetadata);

impl ClientInfo {
    /// Replace the derived device label with one supplied by the client.
    pub fn with_device_info(mut self, device_info: Option<String>) -> SessionMetadata {
        if let Some(label) = device_info.filter(|d| !d.trim().is_empty()) {
            self.0.device_info = Some(label);
        }
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientInfo(client_metadata(&parts.headers)))
    }
}

/// Build [`SessionMetadata`] from request headers.
///
/// The IP is the first `X-Forwarded-For` hop, else `X-Real-IP`.
pub fn client_metadata(headers: &HeaderMap) -> SessionMetadata {
    let ip_address = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip").map(str::trim))
        .map(str::to_string);

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(MAX_USER_AGENT_LEN).collect::<String>());

    let device_info = user_agent
        .as_deref()
        .map(|ua| user_agent::summarize(ua).label());

    SessionMetadata {
        device_info,
        ip_address,
        user_agent,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(client_metadata(&headers).ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn device_label_derived_from_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) Firefox/121.0"),
        );
        let meta = client_metadata(&headers);
        assert_eq!(meta.device_info.as_deref(), Some("desktop · macOS · Firefox"));
        assert!(meta.ip_address.is_none());
    }

    #[test]
    fn explicit_device_info_overrides_label() {
        let info = ClientInfo(SessionMetadata {
            device_info: Some("desktop · Linux · Firefox".into()),
            ..Default::default()
        });
        let meta = info.with_device_info(Some("Booth scanner #4".into()));
        assert_eq!(meta.device_info.as_deref(), Some("Booth scanner #4"));
    }
}
