// Caller identity resolution
//
// Sessions are issued elsewhere; this module only verifies the signed session
// cookie the web app sets and turns it into a `Caller`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::{header, HeaderMap};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "viao_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Organizer => "ORGANIZER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "ORGANIZER" => Some(Role::Organizer),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Authenticated identity of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizer
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Resolves the caller of a request from its headers
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Option<Caller>;
}

/// Verifies `viao_session=<user_id>.<role>.<expires_unix>.<hex signature>` cookies
pub struct SignedCookieAuthenticator {
    secret: Option<String>,
}

impl SignedCookieAuthenticator {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<Caller> {
        let secret = self.secret.as_deref()?;

        let (payload, signature) = token.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        // User ids may contain dots, so parse from the right
        let mut parts = payload.rsplitn(3, '.');
        let expires_at: i64 = parts.next()?.parse().ok()?;
        let role = Role::parse(parts.next()?)?;
        let user_id = parts.next().filter(|id| !id.is_empty())?;
        if expires_at <= now.timestamp() {
            return None;
        }

        Some(Caller {
            user_id: user_id.to_string(),
            role,
        })
    }
}

impl Authenticator for SignedCookieAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<Caller> {
        let token = cookie_value(headers, SESSION_COOKIE)?;
        self.verify(&token, Utc::now())
    }
}

/// First value of a named cookie across all Cookie headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use http::HeaderValue;

    fn organizer() -> Caller {
        Caller {
            user_id: "org_1".to_string(),
            role: Role::Organizer,
        }
    }

    /// Token in the format the web app issues
    fn sign_session_token(secret: &str, caller: &Caller, expires_at: DateTime<Utc>) -> String {
        let payload = format!(
            "{}.{}.{}",
            caller.user_id,
            caller.role.as_str(),
            expires_at.timestamp()
        );
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()))
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_valid_cookie_authenticates() {
        let token = sign_session_token("s3cret", &organizer(), Utc::now() + Duration::hours(1));
        let headers = headers_with_cookie(&format!("theme=dark; {}={}", SESSION_COOKIE, token));

        let auth = SignedCookieAuthenticator::new(Some("s3cret".to_string()));
        assert_eq!(auth.authenticate(&headers), Some(organizer()));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign_session_token("other", &organizer(), Utc::now() + Duration::hours(1));
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, token));

        let auth = SignedCookieAuthenticator::new(Some("s3cret".to_string()));
        assert_eq!(auth.authenticate(&headers), None);
    }

    #[test]
    fn test_expired_cookie_is_rejected() {
        let token = sign_session_token("s3cret", &organizer(), Utc::now() - Duration::minutes(1));
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, token));

        let auth = SignedCookieAuthenticator::new(Some("s3cret".to_string()));
        assert_eq!(auth.authenticate(&headers), None);
    }

    #[test]
    fn test_tampered_role_is_rejected() {
        let token = sign_session_token("s3cret", &organizer(), Utc::now() + Duration::hours(1));
        let tampered = token.replacen("ORGANIZER", "ADMIN", 1);
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, tampered));

        let auth = SignedCookieAuthenticator::new(Some("s3cret".to_string()));
        assert_eq!(auth.authenticate(&headers), None);
    }

    #[test]
    fn test_no_secret_means_nobody_is_authenticated() {
        let token = sign_session_token("s3cret", &organizer(), Utc::now() + Duration::hours(1));
        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, token));

        let auth = SignedCookieAuthenticator::new(None);
        assert_eq!(auth.authenticate(&headers), None);
    }
}
