// Redirect targets for the browser-facing payment endpoints

use http::{header, HeaderMap};
use reqwest::Url;

use crate::services::boost_service::FailureReason;

/// A path on the public web app plus its query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: &'static str,
    query: Vec<(&'static str, String)>,
}

impl Location {
    /// Where the browser lands after a processed (or already processed) boost
    pub fn success() -> Self {
        Location {
            path: "/events",
            query: Vec::new(),
        }
    }

    /// Where the browser lands when reconciliation fails
    pub fn failure(reason: FailureReason, session_id: Option<&str>, event_id: Option<&str>) -> Self {
        match reason {
            FailureReason::Unauthorized => Location {
                path: "/",
                query: vec![("error", "unauthorized".to_string())],
            },
            FailureReason::Forbidden => Location {
                path: "/dashboard",
                query: vec![("error", "forbidden".to_string())],
            },
            _ => {
                let mut query = vec![
                    ("payment", "error".to_string()),
                    ("reason", reason.code().to_string()),
                ];
                if let Some(session_id) = session_id {
                    query.push(("session_id", session_id.to_string()));
                }
                if let Some(event_id) = event_id {
                    query.push(("eventId", event_id.to_string()));
                }
                Location {
                    path: "/events",
                    query,
                }
            }
        }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL on `origin`; falls back to the relative form if the origin is unusable
    pub fn to_absolute(&self, origin: &str) -> String {
        match self.render(origin) {
            Some(url) => url.to_string(),
            None => self.to_relative(),
        }
    }

    /// Path and encoded query, e.g. `/events?payment=error&reason=not_paid`
    pub fn to_relative(&self) -> String {
        match self.render("http://localhost").as_ref().and_then(Url::query) {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.to_string(),
        }
    }

    fn render(&self, origin: &str) -> Option<Url> {
        let mut url = Url::parse(origin).ok()?.join(self.path).ok()?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Some(url)
    }
}

/// Public origin redirects should point at.
///
/// Priority: the configured app URL unless it is a loopback address, then the
/// reverse proxy's forwarded host/proto, then the Host header, then `fallback`.
pub fn resolve_public_origin(app_url: Option<&str>, headers: &HeaderMap, fallback: &str) -> String {
    if let Some(url) = app_url.and_then(|u| Url::parse(u.trim()).ok()) {
        if !is_loopback_host(url.host_str()) && url.has_host() {
            return url.origin().ascii_serialization();
        }
    }

    if let Some(host) = first_header_value(headers, "x-forwarded-host") {
        let proto = match first_header_value(headers, "x-forwarded-proto").as_deref() {
            Some("http") => "http",
            _ => "https",
        };
        if let Some(origin) = origin_from_parts(proto, &host) {
            return origin;
        }
    }

    if let Some(host) = first_header_value(headers, header::HOST.as_str()) {
        if let Some(origin) = origin_from_parts("http", &host) {
            return origin;
        }
    }

    fallback.trim_end_matches('/').to_string()
}

fn is_loopback_host(host: Option<&str>) -> bool {
    matches!(
        host,
        Some("localhost") | Some("127.0.0.1") | Some("0.0.0.0") | Some("[::1]") | Some("::1")
    )
}

/// First entry of a possibly comma-separated header
fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn origin_from_parts(proto: &str, host: &str) -> Option<String> {
    let url = Url::parse(&format!("{}://{}", proto, host)).ok()?;
    // Reject anything that smuggles a path or credentials into the host header
    if url.path() != "/" || !url.username().is_empty() || url.query().is_some() {
        return None;
    }
    url.has_host().then(|| url.origin().ascii_serialization())
}
