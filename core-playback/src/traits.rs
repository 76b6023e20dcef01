//! # Core Playback Traits
//!
//! This module defines the presentation abstraction for the **core logic
//! layer**. It is typed over the playlist model, which is why it lives here
//! rather than next to the host bridge traits.
//!
//! ## Completion model
//!
//! The renderer calls return once the item is *on screen*, not when it is
//! done. For finite-duration items the scheduler owns the clock; for
//! indeterminate items (video) the host pushes completion back in through
//! [`PlaybackScheduler::notify_item_ended`](crate::PlaybackScheduler::notify_item_ended)
//! or
//! [`notify_item_error`](crate::PlaybackScheduler::notify_item_error).

use async_trait::async_trait;
use bridge_traits::error::Result;
use core_playlist::PlaylistItem;

/// Puts playlist items on screen.
///
/// Implemented per host surface (desktop window, embedded framebuffer,
/// preview harness). Implementations must be safe to call from async tasks.
#[async_trait]
pub trait MediaRenderer: Send + Sync {
    /// Show a still image. Returns once the image is displayed.
    async fn present_image(&self, item: &PlaylistItem) -> Result<()>;

    /// Start video playback. Returns once playback has started; completion
    /// is signalled back to the scheduler by the host.
    async fn present_video(&self, item: &PlaylistItem) -> Result<()>;

    /// Blank the surface.
    async fn clear(&self) -> Result<()>;
}
