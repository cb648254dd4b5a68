//! Storage key namespacing using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Derive a short, stable namespace from an API base URL.
///
/// Trailing slashes and letter case of the URL do not change the result.
pub fn scope_prefix(api_url: &str) -> String {
    let normalized = api_url.trim_end_matches('/').to_ascii_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());

    let hex = format!("{:x}", hasher.finalize());
    hex[..16].to_string()
}
