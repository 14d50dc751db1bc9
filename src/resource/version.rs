//! Version tags for optimistic-concurrency comparison.
//!
//! A version is an opaque weak validator in HTTP ETag form (`W/"..."`),
//! derived deterministically from the record's last-modified timestamp by
//! hashing its RFC3339 rendering. The same timestamp always yields the same
//! tag; different timestamps practically always yield different tags.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Opaque weak-validator version tag for a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Derive a version tag from a last-modified timestamp.
    pub fn from_timestamp(last_modified: DateTime<Utc>) -> Self {
        let rendered = last_modified.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let mut hasher = Sha256::new();
        hasher.update(rendered.as_bytes());
        let hash = hasher.finalize();
        // First 8 bytes keep the tag short while staying collision-resistant
        // for timestamp inputs.
        let encoded = BASE64.encode(&hash[..8]);
        Self(format!("W/\"{encoded}\""))
    }

    /// The tag as a string slice, including the `W/"..."` framing.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
