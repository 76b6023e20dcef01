//! # Core Configuration Module
//!
//! Provides configuration management for the signage playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CoreConfig` instance that holds all necessary dependencies and settings
//! for the core library. It enforces fail-fast validation to ensure all
//! required bridges are provided before initialization.
//!
//! ## Required Dependencies
//!
//! - `ScreenApi` - Required for playlist fetching
//! - `SettingsStore` - Required for credential and playlist persistence
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .screen_api(Arc::new(MyScreenApi))
//!     .settings_store(Arc::new(MySettingsStore))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and provides actionable
//! error messages when capabilities are missing.

use crate::error::{Error, Result};
use bridge_traits::{ScreenApi, SettingsStore};
use std::sync::Arc;
use std::time::Duration;

/// Fetch cadence used when the accepted playlist carries no interval of its
/// own, or before any playlist has been accepted.
pub const DEFAULT_FALLBACK_CHECK_INTERVAL: Duration = Duration::from_secs(320);

/// Staging attempts per candidate playlist before it is abandoned.
pub const DEFAULT_MAX_STAGING_ATTEMPTS: u32 = 3;

/// Delay applied to an externally requested resync.
pub const DEFAULT_RESYNC_DELAY: Duration = Duration::from_millis(2000);

/// Delay before the first fetch cycle after startup, giving the host surface
/// time to settle.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(2500);

/// Core configuration for the signage playback core.
///
/// This struct holds all dependencies and settings required to initialize
/// the core library. Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Playlist fetch API (required)
    pub screen_api: Arc<dyn ScreenApi>,

    /// Credential and playlist persistence (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Fetch cadence when no accepted playlist provides one
    pub fallback_check_interval: Duration,

    /// Staging attempts per candidate before giving up
    pub max_staging_attempts: u32,

    /// Delay before honoring an external resync request
    pub resync_delay: Duration,

    /// Delay before the first fetch after startup
    pub startup_delay: Duration,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("screen_api", &"ScreenApi { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field("fallback_check_interval", &self.fallback_check_interval)
            .field("max_staging_attempts", &self.max_staging_attempts)
            .field("resync_delay", &self.resync_delay)
            .field("startup_delay", &self.startup_delay)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Staging attempt budget is at least 1
    /// - Timer durations are within a sane range
    pub fn validate(&self) -> Result<()> {
        if self.max_staging_attempts == 0 {
            return Err(Error::Config(
                "Staging attempt budget must be at least 1".to_string(),
            ));
        }

        if self.fallback_check_interval < Duration::from_secs(1) {
            return Err(Error::Config(
                "Fallback check interval must be at least 1 second".to_string(),
            ));
        }

        if self.fallback_check_interval > Duration::from_secs(86_400) {
            return Err(Error::Config(
                "Fallback check interval exceeds maximum of 24 hours".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
/// The builder validates required dependencies and provides helpful error
/// messages.
#[derive(Default)]
pub struct CoreConfigBuilder {
    screen_api: Option<Arc<dyn ScreenApi>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    fallback_check_interval: Option<Duration>,
    max_staging_attempts: Option<u32>,
    resync_delay: Option<Duration>,
    startup_delay: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Sets the screen API implementation (required).
    ///
    /// The screen API is used for polling the signage cloud for the paired
    /// screen's playlist.
    pub fn screen_api(mut self, api: Arc<dyn ScreenApi>) -> Self {
        self.screen_api = Some(api);
        self
    }

    /// Sets the settings store implementation (required).
    ///
    /// The settings store persists pairing credentials and the accepted
    /// playlist blob across restarts.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the fallback fetch cadence.
    ///
    /// Default: [`DEFAULT_FALLBACK_CHECK_INTERVAL`]
    pub fn fallback_check_interval(mut self, interval: Duration) -> Self {
        self.fallback_check_interval = Some(interval);
        self
    }

    /// Sets the staging attempt budget per candidate playlist.
    ///
    /// Default: [`DEFAULT_MAX_STAGING_ATTEMPTS`]
    pub fn max_staging_attempts(mut self, attempts: u32) -> Self {
        self.max_staging_attempts = Some(attempts);
        self
    }

    /// Sets the delay applied to external resync requests.
    ///
    /// Default: [`DEFAULT_RESYNC_DELAY`]
    pub fn resync_delay(mut self, delay: Duration) -> Self {
        self.resync_delay = Some(delay);
        self
    }

    /// Sets the delay before the first fetch after startup.
    ///
    /// Default: [`DEFAULT_STARTUP_DELAY`]
    pub fn startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = Some(delay);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - Required bridges are missing (ScreenApi, SettingsStore)
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let screen_api = self.screen_api.ok_or_else(|| Error::CapabilityMissing {
            capability: "ScreenApi".to_string(),
            message: "ScreenApi implementation is required for playlist fetching. \
                      Desktop: use bridge_desktop::HttpScreenApi. \
                      Tests: inject a mock implementation."
                .to_string(),
        })?;

        let settings_store = self.settings_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "SettingsStore".to_string(),
            message: "SettingsStore implementation is required for credential and \
                      playlist persistence. \
                      Desktop: use bridge_desktop::JsonFileSettingsStore. \
                      Tests: inject an in-memory store."
                .to_string(),
        })?;

        let config = CoreConfig {
            screen_api,
            settings_store,
            fallback_check_interval: self
                .fallback_check_interval
                .unwrap_or(DEFAULT_FALLBACK_CHECK_INTERVAL),
            max_staging_attempts: self
                .max_staging_attempts
                .unwrap_or(DEFAULT_MAX_STAGING_ATTEMPTS),
            resync_delay: self.resync_delay.unwrap_or(DEFAULT_RESYNC_DELAY),
            startup_delay: self.startup_delay.unwrap_or(DEFAULT_STARTUP_DELAY),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::api::PlaylistFetch;
    use bridge_traits::BridgeError;

    struct MockScreenApi;

    #[async_trait]
    impl ScreenApi for MockScreenApi {
        async fn fetch_playlist(
            &self,
            _screen_id: &str,
            _token: &str,
        ) -> std::result::Result<PlaylistFetch, BridgeError> {
            Ok(PlaylistFetch {
                status: 200,
                document: None,
            })
        }
    }

    struct MockSettingsStore;

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn set_string(
            &self,
            _key: &str,
            _value: &str,
        ) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_string(&self, _key: &str) -> std::result::Result<Option<String>, BridgeError> {
            Ok(None)
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_requires_screen_api() {
        let result = CoreConfig::builder()
            .settings_store(Arc::new(MockSettingsStore))
            .build();

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("ScreenApi"));
        assert!(err_msg.contains("playlist fetching"));
    }

    #[test]
    fn test_builder_requires_settings_store() {
        let result = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .build();

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("SettingsStore"));
        assert!(err_msg.contains("persistence"));
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .build()
            .unwrap();

        assert_eq!(
            config.fallback_check_interval,
            DEFAULT_FALLBACK_CHECK_INTERVAL
        );
        assert_eq!(config.max_staging_attempts, DEFAULT_MAX_STAGING_ATTEMPTS);
        assert_eq!(config.resync_delay, DEFAULT_RESYNC_DELAY);
        assert_eq!(config.startup_delay, DEFAULT_STARTUP_DELAY);
    }

    #[test]
    fn test_builder_with_custom_tunables() {
        let config = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .fallback_check_interval(Duration::from_secs(60))
            .max_staging_attempts(5)
            .resync_delay(Duration::from_millis(100))
            .startup_delay(Duration::ZERO)
            .build()
            .unwrap();

        assert_eq!(config.fallback_check_interval, Duration::from_secs(60));
        assert_eq!(config.max_staging_attempts, 5);
        assert_eq!(config.resync_delay, Duration::from_millis(100));
        assert_eq!(config.startup_delay, Duration::ZERO);
    }

    #[test]
    fn test_validate_rejects_zero_staging_attempts() {
        let result = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .max_staging_attempts(0)
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 1"));
    }

    #[test]
    fn test_validate_rejects_subsecond_check_interval() {
        let result = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .fallback_check_interval(Duration::from_millis(100))
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 1 second"));
    }

    #[test]
    fn test_validate_rejects_excessive_check_interval() {
        let result = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .fallback_check_interval(Duration::from_secs(200_000))
            .build();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = CoreConfig::builder()
            .screen_api(Arc::new(MockScreenApi))
            .settings_store(Arc::new(MockSettingsStore))
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.max_staging_attempts, config.max_staging_attempts);
        assert_eq!(
            cloned.fallback_check_interval,
            config.fallback_check_interval
        );
    }
}
