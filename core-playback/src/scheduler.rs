//! # Playback Scheduler
//!
//! State machine that walks the playlist rotation and times each item.
//!
//! ## States
//!
//! `Uninitialized` → `Idle` ↔ `Running` → `Uninitialized` (on `stop()`)
//!
//! - `Uninitialized`: no playlist has been supplied
//! - `Idle`: a playlist is set but has nothing displayable
//! - `Running`: an item is on screen (or a skip pass is in progress)
//!
//! ## Liveness
//!
//! Every playlist replacement bumps a generation counter. Timer tasks and
//! completion signals carry the generation they were armed under and are
//! dropped when it no longer matches, so a superseded timer can never
//! advance the playlist that replaced it.
//!
//! A playlist whose active items are all unsupported is walked once per
//! pass, then a short retry delay is armed instead of spinning.

use crate::error::Result;
use crate::traits::MediaRenderer;
use core_playlist::Playlist;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Pause between passes over a playlist with no presentable items.
const SKIP_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle phase of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playlist supplied yet (or stopped).
    Uninitialized,
    /// Playlist set but nothing displayable.
    Idle,
    /// Rotation in progress.
    Running,
}

struct State {
    playlist: Option<Playlist>,
    phase: PlaybackState,
    /// Bumped on every playlist replacement and on stop.
    generation: u64,
    /// The current presentation ends on an external signal.
    awaiting_external: bool,
}

/// Drives the accepted playlist onto a [`MediaRenderer`].
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct PlaybackScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    renderer: Arc<dyn MediaRenderer>,
    event_bus: EventBus,
    state: Mutex<State>,
}

impl PlaybackScheduler {
    /// Create a scheduler in the `Uninitialized` state.
    pub fn new(renderer: Arc<dyn MediaRenderer>, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer,
                event_bus,
                state: Mutex::new(State {
                    playlist: None,
                    phase: PlaybackState::Uninitialized,
                    generation: 0,
                    awaiting_external: false,
                }),
            }),
        }
    }

    /// Current lifecycle phase.
    pub async fn state(&self) -> PlaybackState {
        self.inner.state.lock().await.phase
    }

    /// Replace the playlist being played.
    ///
    /// Supersedes any armed timer or pending completion signal, rebuilds
    /// the rotation and presents the first item. A playlist with nothing
    /// displayable blanks the screen and moves to `Idle`.
    pub async fn set_playlist(&self, mut playlist: Playlist) {
        playlist.initialize();
        let displayable = playlist.has_items_to_display();

        let generation = {
            let mut state = self.inner.state.lock().await;
            state.generation += 1;
            state.awaiting_external = false;
            state.playlist = Some(playlist);
            state.phase = if displayable {
                PlaybackState::Running
            } else {
                PlaybackState::Idle
            };
            state.generation
        };

        if displayable {
            info!("playlist set; starting rotation");
            self.inner.present_current(generation).await;
        } else {
            info!("playlist has nothing to display; going idle");
            self.inner.go_idle().await;
        }
    }

    /// Host signal: the current indeterminate item finished.
    ///
    /// Ignored unless an externally timed item is actually on screen, so a
    /// late signal from a superseded playlist is a no-op.
    pub async fn notify_item_ended(&self) {
        let generation = {
            let mut state = self.inner.state.lock().await;
            if state.phase != PlaybackState::Running || !state.awaiting_external {
                debug!("ignoring stale playback completion signal");
                return;
            }
            state.awaiting_external = false;
            state.generation
        };
        self.inner.advance_if_live(generation).await;
    }

    /// Host signal: the current indeterminate item failed.
    ///
    /// A render error is a completion signal, never a cycle failure:
    /// rotation advances exactly as on a clean end, with an `ItemSkipped`
    /// event recording the failure.
    pub async fn notify_item_error(&self, message: &str) {
        let (generation, filename) = {
            let mut state = self.inner.state.lock().await;
            if state.phase != PlaybackState::Running || !state.awaiting_external {
                debug!("ignoring stale playback error signal");
                return;
            }
            state.awaiting_external = false;
            let filename = state
                .playlist
                .as_ref()
                .and_then(|p| p.current_item())
                .map(|item| item.filename.clone())
                .unwrap_or_default();
            (state.generation, filename)
        };

        warn!(filename = %filename, error = message, "item playback failed");
        self.inner
            .event_bus
            .emit(CoreEvent::Playback(PlaybackEvent::ItemSkipped {
                filename,
                reason: message.to_string(),
            }))
            .ok();

        self.inner.advance_if_live(generation).await;
    }

    /// Stop playback: supersede all timers, blank the screen and return to
    /// `Uninitialized`.
    ///
    /// The state transition happens regardless of the renderer; a failed
    /// `clear()` is returned so the host can decide whether the surface
    /// needs recovery.
    pub async fn stop(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            state.generation += 1;
            state.phase = PlaybackState::Uninitialized;
            state.playlist = None;
            state.awaiting_external = false;
        }

        let cleared = self.inner.renderer.clear().await;
        if let Err(e) = &cleared {
            warn!(error = %e, "failed to clear renderer on stop");
        }
        self.inner
            .event_bus
            .emit(CoreEvent::Playback(PlaybackEvent::Stopped))
            .ok();
        info!("playback stopped");

        cleared.map_err(Into::into)
    }
}

impl Inner {
    /// Present the current rotation item, skipping past unpresentable ones.
    ///
    /// Walks at most one full pass over the active items; a pass with no
    /// presentable item arms a retry delay instead of spinning.
    async fn present_current(self: &Arc<Self>, generation: u64) {
        let mut skipped_in_pass = 0usize;

        loop {
            let (item, active_len) = {
                let mut state = self.state.lock().await;
                if state.generation != generation || state.phase != PlaybackState::Running {
                    return;
                }
                let Some(playlist) = state.playlist.as_mut() else {
                    return;
                };
                let active_len = playlist.active_len();
                let Some(item) = playlist.current_item().cloned() else {
                    state.phase = PlaybackState::Idle;
                    drop(state);
                    self.go_idle().await;
                    return;
                };
                (item, active_len)
            };

            if !item.kind.is_supported() {
                debug!(filename = %item.filename, kind = %item.kind.as_str(), "skipping unsupported item");
                self.event_bus
                    .emit(CoreEvent::Playback(PlaybackEvent::ItemSkipped {
                        filename: item.filename.clone(),
                        reason: "unsupported".to_string(),
                    }))
                    .ok();

                skipped_in_pass += 1;
                if skipped_in_pass >= active_len {
                    debug!("no presentable item in this pass; retrying shortly");
                    self.arm_retry(generation);
                    return;
                }
                if !self.advance_locked(generation).await {
                    return;
                }
                tokio::task::yield_now().await;
                continue;
            }

            let result = if item.kind.is_finite_duration() {
                self.renderer.present_image(&item).await
            } else {
                self.renderer.present_video(&item).await
            };

            match result {
                Ok(()) => {
                    // Re-check liveness: the playlist may have been
                    // replaced while the renderer call was in flight.
                    let mut state = self.state.lock().await;
                    if state.generation != generation || state.phase != PlaybackState::Running {
                        return;
                    }

                    self.event_bus
                        .emit(CoreEvent::Playback(PlaybackEvent::ItemStarted {
                            filename: item.filename.clone(),
                            kind: item.kind.as_str().to_string(),
                        }))
                        .ok();

                    if item.kind.is_finite_duration() {
                        self.arm_timer(
                            generation,
                            Duration::from_secs(u64::from(item.display_duration_secs)),
                        );
                    } else {
                        state.awaiting_external = true;
                    }
                    return;
                }
                Err(e) => {
                    warn!(filename = %item.filename, error = %e, "renderer rejected item");
                    self.event_bus
                        .emit(CoreEvent::Playback(PlaybackEvent::ItemSkipped {
                            filename: item.filename.clone(),
                            reason: "renderer error".to_string(),
                        }))
                        .ok();

                    skipped_in_pass += 1;
                    if skipped_in_pass >= active_len {
                        self.arm_retry(generation);
                        return;
                    }
                    if !self.advance_locked(generation).await {
                        return;
                    }
                    tokio::task::yield_now().await;
                }
            }
        }
    }

    /// Advance rotation if still live. Returns false when superseded.
    async fn advance_locked(&self, generation: u64) -> bool {
        let mut state = self.state.lock().await;
        if state.generation != generation || state.phase != PlaybackState::Running {
            return false;
        }
        if let Some(playlist) = state.playlist.as_mut() {
            playlist.advance();
            true
        } else {
            false
        }
    }

    /// Advance rotation and present the next item, dropping stale callers.
    async fn advance_if_live(self: &Arc<Self>, generation: u64) {
        if !self.advance_locked(generation).await {
            debug!("dropping superseded advance");
            return;
        }
        self.present_current(generation).await;
    }

    /// One-shot display timer for a finite-duration item.
    fn arm_timer(self: &Arc<Self>, generation: u64, delay: Duration) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            sleep(delay).await;
            inner.advance_if_live(generation).await;
        });
    }

    /// Delayed re-attempt after a pass with no presentable items.
    fn arm_retry(self: &Arc<Self>, generation: u64) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            sleep(SKIP_RETRY_DELAY).await;
            inner.present_current(generation).await;
        });
    }

    async fn go_idle(&self) {
        if let Err(e) = self.renderer.clear().await {
            warn!(error = %e, "failed to clear renderer");
        }
        self.event_bus
            .emit(CoreEvent::Playback(PlaybackEvent::BecameIdle))
            .ok();
    }
}
