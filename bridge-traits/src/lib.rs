//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is wired differently per host (desktop player,
//! embedded signage device, preview harness).
//!
//! ## Traits
//!
//! - [`ScreenApi`](api::ScreenApi) - Playlist fetch against the signage cloud
//! - [`SettingsStore`](storage::SettingsStore) - Key-value persistence for
//!   pairing credentials and the accepted playlist blob
//!
//! The presentation surface trait lives in the playback crate next to the
//! scheduler that drives it, since it is typed over the playlist model.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert platform-specific errors to `BridgeError`
//! and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod api;
pub mod error;
pub mod storage;

pub use api::{PlaylistDocument, PlaylistFetch, PlaylistItemDocument, ScreenApi};
pub use error::{BridgeError, Result};
pub use storage::SettingsStore;

/// Settings key holding the paired screen identifier.
pub const KEY_SCREEN_ID: &str = "screenId";

/// Settings key holding the paired screen bearer token.
pub const KEY_SCREEN_TOKEN: &str = "screenToken";

/// Settings key holding the serialized accepted playlist.
pub const KEY_PLAYLIST: &str = "playlist";
