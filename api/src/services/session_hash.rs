// Keyed hashing of payment provider session ids
//
// The ledger is keyed by this hash so raw session ids are never stored at rest.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of a session id under the configured secret
pub fn hash_session_id(secret: &str, session_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
