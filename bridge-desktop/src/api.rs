//! Screen API Client using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    api::{PlaylistDocument, PlaylistFetch, ScreenApi},
    error::{BridgeError, Result},
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-request timeout for playlist fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(7);

/// Reqwest-based screen API client
///
/// Provides playlist fetching with:
/// - Connection pooling via reqwest
/// - Bearer-token authentication per request
/// - TLS support by default
pub struct HttpScreenApi {
    client: Client,
    base_url: String,
}

impl HttpScreenApi {
    /// Create a new client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .user_agent("signage-playback-core/0.1.0")
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client with custom reqwest configuration.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn playlist_url(&self, screen_id: &str) -> String {
        format!("{}/screens/{}/screen_playlist", self.base_url, screen_id)
    }
}

#[async_trait]
impl ScreenApi for HttpScreenApi {
    async fn fetch_playlist(&self, screen_id: &str, token: &str) -> Result<PlaylistFetch> {
        let url = self.playlist_url(screen_id);
        debug!(url = %url, "Fetching playlist");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BridgeError::OperationFailed("Request timed out".to_string())
                } else if e.is_connect() {
                    BridgeError::OperationFailed(format!("Connection failed: {}", e))
                } else {
                    BridgeError::OperationFailed(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            warn!(status = status, "Playlist fetch returned non-success status");
            return Ok(PlaylistFetch {
                status,
                document: None,
            });
        }

        let document: PlaylistDocument = response.json().await.map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to decode playlist body: {}", e))
        })?;

        Ok(PlaylistFetch {
            status,
            document: Some(document),
        })
    }
}
