//! # Playback Scheduling
//!
//! Drives the accepted playlist onto the screen.
//!
//! ## Overview
//!
//! The [`PlaybackScheduler`] is a small state machine between the playlist
//! rotation and a host-provided [`MediaRenderer`]:
//!
//! - **Finite-duration items** (images) are presented and advanced by a
//!   one-shot timer armed from the item's display duration
//! - **Indeterminate items** (videos) are presented and advanced when the
//!   host pushes a completion or error signal back into the scheduler
//! - **Unsupported items** are skipped without presentation
//!
//! Replacing the playlist mid-item supersedes any armed timer through a
//! generation counter, so a superseded timer or a late completion signal
//! never advances the new playlist.
//!
//! Playback progress is reported through the runtime
//! [`EventBus`](core_runtime::EventBus) as
//! [`PlaybackEvent`](core_runtime::PlaybackEvent) values.

pub mod error;
pub mod scheduler;
pub mod traits;

pub use error::{PlaybackError, Result};
pub use scheduler::{PlaybackScheduler, PlaybackState};
pub use traits::MediaRenderer;
