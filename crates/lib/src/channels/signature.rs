//! Webhook signature verification.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a webhook signature header using constant-time comparison.
///
/// The platform sends `X-Line-Signature: <base64>` — the base64-encoded
/// HMAC-SHA256 of the raw request body keyed by the channel secret. This
/// validates the raw body against that header value.
pub fn verify(secret: &str, body: &[u8], signature_header: &str) -> bool {
    let Ok(expected) =
        base64::engine::general_purpose::STANDARD.decode(signature_header.as_bytes())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
