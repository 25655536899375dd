use sha2::{Digest, Sha256};

/// Compute the `X-VERIFY` checksum the payment provider expects: a SHA-256
/// digest over `payload_base64 + api_path + secret`, hex encoded, with the
/// salt-key index appended after a `###` separator.
///
/// The `api_path` must match the request path on the provider side exactly;
/// a mismatch is rejected remotely with no useful diagnostic here.
pub fn sign(payload_base64: &str, api_path: &str, secret: &str, key_index: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload_base64.as_bytes());
    hasher.update(api_path.as_bytes());
    hasher.update(secret.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{digest}###{key_index}")
}
