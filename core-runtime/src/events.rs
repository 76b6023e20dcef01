//! # Event Bus System
//!
//! Provides an event-driven architecture for the signage playback core using
//! `tokio::sync::broadcast`. This module enables decoupled communication
//! between core modules through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//! - **Subscription Management**: Multiple subscribers can listen independently
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, SyncEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count: 4 }))
//!     .ok();
//!
//! let received = stream.recv().await.unwrap();
//! assert!(matches!(received, CoreEvent::Sync(_)));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The event bus uses `tokio::sync::broadcast`, which can produce two types
//! of errors:
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n`
//!   events. This is non-fatal; the subscriber can continue receiving new
//!   events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates
//!   shutdown.
//!
//! Subscribers should handle `Lagged` gracefully and treat `Closed` as a
//! signal to exit.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// This value balances memory usage with the ability to handle bursts of
/// events. Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
///
/// This is the main event type published and received through the event bus.
/// It wraps domain-specific event types for different modules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Sync-related events
    Sync(SyncEvent),
    /// Playback-related events
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Sync(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Sync(SyncEvent::StagingExhausted { .. }) => EventSeverity::Error,
            CoreEvent::Sync(SyncEvent::DownloadFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Sync(SyncEvent::FetchFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::ItemSkipped { .. }) => EventSeverity::Warning,
            CoreEvent::Sync(SyncEvent::PlaylistChanged { .. }) => EventSeverity::Info,
            CoreEvent::Playback(PlaybackEvent::BecameIdle) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Sync Events
// ============================================================================

/// Events related to playlist synchronization with the signage cloud.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SyncEvent {
    /// A new playlist was accepted and is ready for playback.
    PlaylistChanged {
        /// Number of items in the accepted playlist.
        item_count: usize,
    },
    /// A fetch cycle completed and the server playlist matched the current
    /// one; nothing was replaced.
    PlaylistUnchanged,
    /// A fetch cycle failed before a candidate could be considered; the
    /// previously accepted playlist stays in effect.
    FetchFailed {
        /// What went wrong (HTTP status, transport or store failure).
        message: String,
    },
    /// A content download failed during staging.
    DownloadFailed {
        /// The file that could not be staged.
        filename: String,
        /// Which staging attempt for this candidate failed (1-based).
        attempt: u32,
    },
    /// Staging for the same candidate playlist failed repeatedly and was
    /// abandoned; the previously accepted playlist stays in effect.
    StagingExhausted {
        /// Total attempts made for the candidate.
        attempts: u32,
    },
}

impl SyncEvent {
    fn description(&self) -> &str {
        match self {
            SyncEvent::PlaylistChanged { .. } => "Playlist changed",
            SyncEvent::PlaylistUnchanged => "Playlist unchanged",
            SyncEvent::FetchFailed { .. } => "Playlist fetch failed",
            SyncEvent::DownloadFailed { .. } => "Content download failed",
            SyncEvent::StagingExhausted { .. } => "Playlist staging abandoned",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events related to on-screen playback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// An item was handed to the renderer.
    ItemStarted {
        /// The item's file reference.
        filename: String,
        /// The wire content type.
        kind: String,
    },
    /// An item could not be shown and rotation moved past it.
    ItemSkipped {
        /// The item's file reference.
        filename: String,
        /// Why the item was skipped (e.g. "unsupported", "renderer error").
        reason: String,
    },
    /// The scheduler has nothing to display.
    BecameIdle,
    /// Playback was stopped.
    Stopped,
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::ItemStarted { .. } => "Playback item started",
            PlaybackEvent::ItemSkipped { .. } => "Playback item skipped",
            PlaybackEvent::BecameIdle => "Playback idle",
            PlaybackEvent::Stopped => "Playback stopped",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events, it
    /// will receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all
    /// future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering
/// capabilities.
///
/// This provides a more ergonomic API for consuming events with optional
/// filtering by event type or severity.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// This will skip events that don't match the filter and return the next
    /// matching event.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events. Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        let event = CoreEvent::Sync(SyncEvent::PlaylistUnchanged);

        // Should error when no subscribers
        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn test_event_emission_with_subscribers() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        let event = CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count: 3 });

        let result = bus.emit(event.clone());
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Playback(PlaybackEvent::ItemStarted {
            filename: "promo.mp4".to_string(),
            kind: "Video".to_string(),
        });

        bus.emit(event.clone()).ok();

        let received1 = sub1.recv().await.unwrap();
        let received2 = sub2.recv().await.unwrap();

        assert_eq!(received1, event);
        assert_eq!(received2, event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream =
            EventStream::new(bus.subscribe()).filter(|event| matches!(event, CoreEvent::Sync(_)));

        // Emit playback event (should be filtered out)
        bus.emit(CoreEvent::Playback(PlaybackEvent::BecameIdle)).ok();

        // Emit sync event (should pass through)
        let sync_event = CoreEvent::Sync(SyncEvent::DownloadFailed {
            filename: "banner.png".to_string(),
            attempt: 1,
        });
        bus.emit(sync_event.clone()).ok();

        let received = stream.recv().await.unwrap();
        assert_eq!(received, sync_event);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2); // Very small buffer
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.emit(CoreEvent::Sync(SyncEvent::PlaylistUnchanged)).ok();
        }

        // First recv should indicate lagging
        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[tokio::test]
    async fn test_event_severity() {
        let error_event = CoreEvent::Sync(SyncEvent::StagingExhausted { attempts: 3 });
        assert_eq!(error_event.severity(), EventSeverity::Error);

        let warn_event = CoreEvent::Playback(PlaybackEvent::ItemSkipped {
            filename: "weird.bin".to_string(),
            reason: "unsupported".to_string(),
        });
        assert_eq!(warn_event.severity(), EventSeverity::Warning);

        let fetch_event = CoreEvent::Sync(SyncEvent::FetchFailed {
            message: "playlist fetch returned HTTP status 500".to_string(),
        });
        assert_eq!(fetch_event.severity(), EventSeverity::Warning);

        let info_event = CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count: 1 });
        assert_eq!(info_event.severity(), EventSeverity::Info);

        let debug_event = CoreEvent::Sync(SyncEvent::PlaylistUnchanged);
        assert_eq!(debug_event.severity(), EventSeverity::Debug);
    }

    #[tokio::test]
    async fn test_event_description() {
        let event = CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count: 2 });
        assert_eq!(event.description(), "Playlist changed");
    }

    #[tokio::test]
    async fn test_event_serialization() {
        let event = CoreEvent::Sync(SyncEvent::DownloadFailed {
            filename: "clip.mp4".to_string(),
            attempt: 2,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("clip.mp4"));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());

        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for i in 0..10 {
                bus1.emit(CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count: i }))
                    .ok();
            }
        });

        let handle2 = tokio::spawn(async move {
            for _ in 0..10 {
                bus2.emit(CoreEvent::Playback(PlaybackEvent::BecameIdle)).ok();
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while sub.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }
}
