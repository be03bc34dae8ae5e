//! Tool fingerprinting.
//!
//! A tool is tracked under a hash of its canonical URL. Two tools are the
//! same tracked entity across runs iff their URLs are byte-identical; a
//! re-platformed URL looks like a new tool and resets its history, which is
//! an accepted limitation.

use sha2::{Digest, Sha256};

/// Stable identifier for a tool, derived from its URL.
///
/// Pure function of the URL string; no session or time input.
pub fn fingerprint(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
