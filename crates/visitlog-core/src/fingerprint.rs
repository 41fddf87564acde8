//! Anonymous visitor fingerprint.
//!
//! # Algorithm (version 1)
//!
//! 1. Join the six environment signals with `|`, in this order:
//!    screen width, screen height, color depth, time zone, locale, core count
//! 2. SHA-256 the UTF-8 bytes
//! 3. Render the digest as lowercase hex
//! 4. Keep the first 16 characters (64 bits)
//!
//! Changing the order, delimiter or truncation changes every visitor's
//! fingerprint and must be treated as a new algorithm version.

use thiserror::Error;

use crate::capability::{Digest, Environment};
use crate::model::VisitorFingerprint;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("SHA-256 digest is unavailable on this host")]
    DigestUnavailable,
}

/// Derive the visitor fingerprint from the host's environment signals.
pub fn derive_fingerprint(
    env: &dyn Environment,
    digest: &dyn Digest,
) -> Result<VisitorFingerprint, FingerprintError> {
    let screen = env.screen();
    let raw = [
        screen.width.to_string(),
        screen.height.to_string(),
        screen.color_depth.to_string(),
        env.time_zone(),
        env.locale(),
        env.core_count().to_string(),
    ]
    .join("|");

    let bytes = digest
        .sha256(raw.as_bytes())
        .ok_or(FingerprintError::DigestUnavailable)?;

    Ok(VisitorFingerprint::from_hex(hex::encode(
        &bytes[..VisitorFingerprint::LEN / 2],
    )))
}
