use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;

/// Identity used when no proxy header names the client. Every such
/// requester shares this one identity.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Longest textual IPv6 form; matches the `ip_address` column width.
const MAX_IP_LEN: usize = 45;

/// Requester identity for like bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_client_ip(&parts.headers)))
    }
}

fn usable(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|s| !s.is_empty() && s.len() <= MAX_IP_LEN)
}

/// First `x-forwarded-for` hop, then `x-real-ip`, then [`UNKNOWN_CLIENT`].
pub fn resolve_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(usable)
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(usable)
        })
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
