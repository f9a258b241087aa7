//! GitHub webhook signature verification using HMAC-SHA256.
//!
//! GitHub signs each delivery with a shared secret and presents the result in
//! the `X-Hub-Signature-256` header as `sha256=<hex>`. Verification happens
//! over the raw body bytes before any parsing; invalid signatures are
//! rejected without further processing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a webhook signature header against the payload and secret.
///
/// The expected header value is `"sha256=" + hex(HMAC-SHA256(secret, body))`.
/// A missing prefix, invalid hex, or an empty header all reject. The final
/// comparison is constant-time via the HMAC library. Never panics.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let hex_sig = match signature_header.strip_prefix("sha256=") {
        Some(s) => s,
        None => return false,
    };
    let presented = match hex::decode(hex_sig) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    mac.verify_slice(&presented).is_ok()
}

/// Computes the HMAC-SHA256 signature of a payload.
///
/// Used by tests to generate valid headers for synthetic deliveries.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a raw signature as a `sha256=<hex>` header value.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}
