//! Key-Value Settings Storage
//!
//! Abstracts the platform's persistent key-value store:
//! - Desktop: config file or OS-specific preferences
//! - Android/Fire OS: SharedPreferences / AsyncStorage
//! - Embedded: flash-backed store
//!
//! The core uses three fixed keys: the paired screen identifier, the screen
//! bearer token, and the serialized accepted playlist
//! ([`KEY_SCREEN_ID`](crate::KEY_SCREEN_ID),
//! [`KEY_SCREEN_TOKEN`](crate::KEY_SCREEN_TOKEN),
//! [`KEY_PLAYLIST`](crate::KEY_PLAYLIST)).

use async_trait::async_trait;

use crate::error::Result;

/// Persistent key-value storage trait.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn save_token(store: &dyn SettingsStore) -> bridge_traits::Result<()> {
///     store.set_string("screenToken", "abc123").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value.
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists without retrieving it.
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }
}
