//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query of the front-end read (GET /api?key=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The cache key; missing is treated like empty
    #[serde(default)]
    pub key: String,
}

/// Query of a peer read whose key cannot be a path segment
/// (GET <base_path><group>?key=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeerQuery {
    pub key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_query_deserialize() {
        let json = r#"{"key": "Tom"}"#;
        let query: ApiQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.key, "Tom");
    }

    #[test]
    fn test_peer_query_key_is_optional() {
        let query: PeerQuery = serde_json::from_str("{}").unwrap();
        assert!(query.key.is_none());

        let query: PeerQuery = serde_json::from_str(r#"{"key": ".."}"#).unwrap();
        assert_eq!(query.key.as_deref(), Some(".."));
    }

    #[test]
    fn test_api_query_missing_key_is_empty() {
        let query: ApiQuery = serde_json::from_str("{}").unwrap();
        assert!(query.key.is_empty());
    }
}
