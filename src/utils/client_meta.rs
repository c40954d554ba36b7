//! Client metadata extracted from request headers.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;

/// Longest stored client IP (fits an IPv6 address with zone suffix).
pub const MAX_CLIENT_IP_LEN: usize = 45;
/// Longest stored User-Agent.
pub const MAX_USER_AGENT_LEN: usize = 255;
/// Longest stored language tag.
pub const MAX_LANGUAGE_LEN: usize = 35;

/// Truncates `value` to at most `max_chars` characters.
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// Who is asking: client IP, User-Agent and preferred language.
///
/// Never rejects a request; every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Primary subtag of the first `Accept-Language` entry, lowercased.
    pub accept_language: Option<String>,
}

impl ClientMeta {
    /// Reads metadata from request parts.
    ///
    /// With `behind_proxy` the first `X-Forwarded-For` hop (then `X-Real-IP`)
    /// wins over the socket peer address.
    pub fn from_parts(parts: &Parts, behind_proxy: bool) -> Self {
        let peer_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let ip = if behind_proxy {
            proxy_client_ip(&parts.headers).or(peer_ip)
        } else {
            peer_ip
        };

        Self {
            ip,
            user_agent: header_str(&parts.headers, header::USER_AGENT.as_str()),
            accept_language: header_str(&parts.headers, header::ACCEPT_LANGUAGE.as_str())
                .and_then(|v| primary_language(&v)),
        }
    }
}

impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.behind_proxy))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn proxy_client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
}

/// Extracts the primary subtag of the first language range.
///
/// `"ru-RU,ru;q=0.9,en;q=0.8"` gives `"ru"`; a wildcard gives `None`.
pub fn primary_language(value: &str) -> Option<String> {
    let range = value.split(',').next()?.split(';').next()?.trim();
    let primary = range.split(['-', '_']).next()?.trim();

    if primary.is_empty() || primary == "*" {
        None
    } else {
        Some(primary.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)], peer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/search");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            parts.extensions.insert(ConnectInfo(addr));
        }
        parts
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("привет", 2), "пр");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("ru-RU,ru;q=0.9,en;q=0.8"), Some("ru".to_string()));
        assert_eq!(primary_language("EN"), Some("en".to_string()));
        assert_eq!(primary_language("*"), None);
        assert_eq!(primary_language(""), None);
    }

    #[test]
    fn test_peer_ip_used_without_proxy() {
        let p = parts(&[("x-forwarded-for", "10.0.0.1")], Some("127.0.0.1:5000"));
        let meta = ClientMeta::from_parts(&p, false);
        assert_eq!(meta.ip.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_forwarded_for_used_behind_proxy() {
        let p = parts(
            &[("x-forwarded-for", "203.0.113.7, 10.0.0.1"), ("user-agent", "curl/8.0")],
            Some("127.0.0.1:5000"),
        );
        let meta = ClientMeta::from_parts(&p, true);
        assert_eq!(meta.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(meta.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_real_ip_then_peer_fallback_behind_proxy() {
        let p = parts(&[("x-real-ip", "198.51.100.2")], Some("127.0.0.1:5000"));
        assert_eq!(
            ClientMeta::from_parts(&p, true).ip.as_deref(),
            Some("198.51.100.2")
        );

        let p = parts(&[], Some("127.0.0.1:5000"));
        assert_eq!(ClientMeta::from_parts(&p, true).ip.as_deref(), Some("127.0.0.1"));

        let p = parts(&[("accept-language", "ru-RU,ru;q=0.9")], None);
        let meta = ClientMeta::from_parts(&p, false);
        assert_eq!(meta.ip, None);
        assert_eq!(meta.accept_language.as_deref(), Some("ru"));
    }
}
