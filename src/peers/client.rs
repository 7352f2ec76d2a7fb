//! HTTP peer client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::protocol::{is_dot_segment, Response, KEY_PARAM};
use super::PeerGetter;
use crate::error::{CacheError, Result};

// == HTTP Getter ==
/// Reads values from one peer's peer endpoint.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer address joined with the base path, e.g.
    /// `http://10.0.0.2:8001/_geecache/`
    base_url: String,
    client: Client,
    /// Per-request timeout, None = wait for the peer indefinitely
    timeout: Option<Duration>,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: Client, timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            timeout,
        }
    }

    /// Builds `<base_url><group>/<key>` with both segments percent-escaped,
    /// so keys may contain `/`, spaces or any other character. Dot keys go
    /// in the `key` query parameter instead.
    pub fn url_for(&self, group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CacheError::Peer(format!("invalid peer url {}: {}", self.base_url, e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                CacheError::Peer(format!("peer url cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty().push(group);
            if !is_dot_segment(key) {
                segments.push(key);
            }
        }
        if is_dot_segment(key) {
            url.query_pairs_mut().append_pair(KEY_PARAM, key);
        }
        Ok(url)
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key)?;
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CacheError::Peer(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::Peer(format!(
                "server returned: {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Peer(format!("reading response body: {}", e)))?;

        Ok(Response::decode(&body)?.value)
    }

    fn addr(&self) -> &str {
        &self.base_url
    }
}
