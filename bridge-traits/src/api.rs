//! Screen API Transport Abstraction
//!
//! Defines the wire-level contract against the signage cloud service and the
//! partial document shapes it returns. The documents keep every field
//! optional; the model layer turns them into complete, validated records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One playlist entry as returned by the server.
///
/// Every field is optional on the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemDocument {
    pub mediafile_id: Option<i64>,
    pub filename: Option<String>,
    pub download_url: Option<String>,
    pub filename_secondary: Option<String>,
    pub url: Option<String>,
    pub url_params: Option<String>,
    pub zoom: Option<f64>,
    pub display_duration: Option<u32>,
    pub transition: Option<String>,
    pub transition_speed: Option<u32>,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
    pub orientation: Option<String>,
    pub disabled: Option<bool>,
    pub title: Option<String>,
}

/// Playlist definition as returned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDocument {
    pub mode: Option<String>,
    #[serde(default)]
    pub items: Vec<PlaylistItemDocument>,
    pub orientation: Option<String>,
    pub fit_item: Option<String>,
    pub fit_item_opposing: Option<String>,
    pub check_for_updates_interval: Option<u32>,
    pub gapless: Option<bool>,
    pub shuffle_play: Option<bool>,
    pub enable_image_transitions: Option<bool>,
    pub enable_webapp_transitions: Option<bool>,
    pub default_transition: Option<String>,
    pub default_transition_speed: Option<u32>,
}

/// Result of a playlist fetch.
///
/// Transport-level failures (connection refused, TLS, timeout) surface as
/// [`BridgeError`](crate::error::BridgeError); an HTTP response of any status
/// is returned here so the sync layer can classify non-success statuses
/// itself.
#[derive(Debug, Clone)]
pub struct PlaylistFetch {
    /// HTTP status code of the response.
    pub status: u16,
    /// Decoded playlist body, present on success responses.
    pub document: Option<PlaylistDocument>,
}

impl PlaylistFetch {
    /// Check if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async transport to the signage cloud service.
///
/// Implementations authenticate each request with the screen's bearer token.
/// Connection pooling, TLS and timeouts are implementation concerns.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::api::ScreenApi;
///
/// async fn check(api: &dyn ScreenApi) -> bridge_traits::Result<bool> {
///     let fetch = api.fetch_playlist("screen-1", "token").await?;
///     Ok(fetch.is_success())
/// }
/// ```
#[async_trait]
pub trait ScreenApi: Send + Sync {
    /// Fetch the playlist assigned to a paired screen.
    async fn fetch_playlist(&self, screen_id: &str, token: &str) -> Result<PlaylistFetch>;
}
