//! Peer Wire Protocol
//!
//! A peer read is `GET <base_path><group>/<key>` with both segments
//! percent-escaped. A key that is `.` or `..` cannot survive URL path
//! normalisation, so it is sent as `GET <base_path><group>?key=<key>`.
//! A successful reply carries one [`Response`] encoded with bincode as
//! `application/octet-stream`.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Path prefix under which a node serves peer reads.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

/// Content type of peer replies.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Query parameter carrying keys that cannot be a path segment.
pub const KEY_PARAM: &str = "key";

/// Body of a successful peer read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The cached value
    pub value: Vec<u8>,
}

impl Response {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| CacheError::Internal(format!("encoding response body: {}", e)))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| CacheError::Peer(format!("decoding response body: {}", e)))
    }
}

/// Whether `segment` would be dropped or resolved by URL normalisation.
pub fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Normalizes a base path to start and end with `/`.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
