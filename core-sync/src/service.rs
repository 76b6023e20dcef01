//! # Sync Service
//!
//! Orchestrates the recurring playlist fetch/compare/stage cycle.
//!
//! ## Workflow
//!
//! 1. On [`start`](SyncService::start), restore the persisted playlist blob
//!    (if any) so playback can begin offline, then spawn the fetch loop
//! 2. After the startup delay, run a fetch cycle and reschedule it from the
//!    accepted playlist's `check_for_updates_interval_secs` (or the
//!    configured fallback when no playlist is accepted)
//! 3. A cycle that finds different content hands the candidate to the
//!    [`ContentStager`] on a spawned task; the loop keeps polling meanwhile
//! 4. Staging success persists the candidate and promotes it to the accepted
//!    playlist; failure retries the same candidate after a short delay,
//!    bounded by the configured attempt budget
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncService, NoopStager};
//! use std::sync::Arc;
//!
//! let service = SyncService::new(config, event_bus, Arc::new(NoopStager));
//! service.start().await?;
//!
//! // later
//! service.stop();
//! ```

use crate::{ContentStager, Result, SyncError};
use bridge_traits::{KEY_PLAYLIST, KEY_SCREEN_ID, KEY_SCREEN_TOKEN};
use core_playlist::Playlist;
use core_runtime::events::{CoreEvent, EventBus, SyncEvent};
use core_runtime::CoreConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Staging bookkeeping shared between the fetch loop and staging tasks.
#[derive(Default)]
struct StagingState {
    /// A staging task is in flight; replacements are deferred until it ends.
    busy: bool,
    /// A deferred or externally requested resync is pending.
    resync_requested: bool,
    /// The candidate whose staging last failed, for attempt accounting.
    failed_candidate: Option<Playlist>,
    /// Consecutive failed attempts for `failed_candidate`.
    attempts: u32,
}

/// Recurring playlist synchronization against the signage cloud.
///
/// Cheap to clone; all clones share the same state and fetch loop.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Inner>,
}

struct Inner {
    config: CoreConfig,
    event_bus: EventBus,
    stager: Arc<dyn ContentStager>,

    /// The accepted playlist currently eligible for playback.
    current: RwLock<Option<Playlist>>,

    staging: Mutex<StagingState>,

    /// Early wake-up for the fetch loop.
    wake: Notify,

    cancel: CancellationToken,
    started: AtomicBool,
}

impl SyncService {
    /// Create a new sync service.
    ///
    /// The service is idle until [`start`](SyncService::start) is called.
    pub fn new(config: CoreConfig, event_bus: EventBus, stager: Arc<dyn ContentStager>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                event_bus,
                stager,
                current: RwLock::new(None),
                staging: Mutex::new(StagingState::default()),
                wake: Notify::new(),
                cancel: CancellationToken::new(),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Start the service: restore the persisted playlist and spawn the
    /// fetch loop.
    ///
    /// Restoring lets playback resume from the last accepted content before
    /// the network is reachable. The first fetch cycle runs after the
    /// configured startup delay.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AlreadyRunning`] when called twice.
    pub async fn start(&self) -> Result<()> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(SyncError::AlreadyRunning);
        }

        self.inner.restore_persisted().await;

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_loop().await;
        });

        info!("sync service started");
        Ok(())
    }

    /// Stop the fetch loop and any pending wake-ups.
    ///
    /// In-flight staging tasks finish their current download but their
    /// retry wake-ups are dropped.
    pub fn stop(&self) {
        self.inner.cancel.cancel();
        info!("sync service stopped");
    }

    /// Request an out-of-band fetch cycle after the configured resync delay.
    ///
    /// Used by hosts reacting to push notifications or user action. The
    /// delay absorbs bursts of requests into a single cycle.
    pub fn request_resync(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.cancel.cancelled() => {}
                _ = sleep(inner.config.resync_delay) => {
                    inner.wake.notify_one();
                }
            }
        });
    }

    /// Snapshot of the currently accepted playlist, if any.
    pub async fn current_playlist(&self) -> Option<Playlist> {
        self.inner.current.read().await.clone()
    }
}

impl Inner {
    /// Load the persisted playlist blob and promote it to the accepted
    /// playlist.
    ///
    /// A corrupt blob is discarded rather than propagated: the next fetch
    /// cycle re-establishes a good one.
    async fn restore_persisted(&self) {
        let blob = match self.config.settings_store.get_string(KEY_PLAYLIST).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "failed to read persisted playlist");
                return;
            }
        };

        let mut playlist: Playlist = match serde_json::from_str(&blob) {
            Ok(playlist) => playlist,
            Err(e) => {
                warn!(error = %e, "discarding corrupt persisted playlist");
                if let Err(e) = self.config.settings_store.delete(KEY_PLAYLIST).await {
                    warn!(error = %e, "failed to delete corrupt playlist blob");
                }
                return;
            }
        };

        playlist.initialize();
        let item_count = playlist.items.len();
        *self.current.write().await = Some(playlist);

        info!(item_count, "restored persisted playlist");
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count }))
            .ok();
    }

    async fn run_loop(self: Arc<Self>) {
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = sleep(self.config.startup_delay) => {}
        }

        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            match self.run_cycle().await {
                Ok(()) => {}
                Err(SyncError::NotPaired) => {
                    debug!("screen not paired; skipping fetch cycle");
                }
                Err(e) => {
                    warn!(error = %e, "sync cycle failed");
                    self.event_bus
                        .emit(CoreEvent::Sync(SyncEvent::FetchFailed {
                            message: e.to_string(),
                        }))
                        .ok();
                }
            }

            let interval = self.next_interval().await;
            debug!(interval_secs = interval.as_secs(), "next fetch scheduled");

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = self.wake.notified() => {
                    debug!("fetch loop woken early");
                }
                _ = sleep(interval) => {}
            }
        }
    }

    /// Cadence until the next fetch cycle.
    ///
    /// The accepted playlist's own interval wins; the configured fallback
    /// covers the unpaired/empty case and a zero server interval.
    async fn next_interval(&self) -> Duration {
        match self.current.read().await.as_ref() {
            Some(playlist) if playlist.check_for_updates_interval_secs > 0 => {
                Duration::from_secs(u64::from(playlist.check_for_updates_interval_secs))
            }
            _ => self.config.fallback_check_interval,
        }
    }

    /// One fetch/compare/stage cycle.
    #[instrument(skip(self))]
    async fn run_cycle(self: &Arc<Self>) -> Result<()> {
        let store = &self.config.settings_store;

        let screen_id = store.get_string(KEY_SCREEN_ID).await?;
        let token = store.get_string(KEY_SCREEN_TOKEN).await?;
        let (screen_id, token) = match (screen_id, token) {
            (Some(id), Some(token)) => (id, token),
            _ => return Err(SyncError::NotPaired),
        };

        let fetch = self
            .config
            .screen_api
            .fetch_playlist(&screen_id, &token)
            .await?;

        if !fetch.is_success() {
            return Err(SyncError::FetchFailed {
                status: fetch.status,
            });
        }

        let candidate = Playlist::from_document(fetch.document.unwrap_or_default());

        {
            let current = self.current.read().await;
            if let Some(current) = current.as_ref() {
                if current.content_eq(&candidate) {
                    debug!("server playlist unchanged");
                    self.event_bus
                        .emit(CoreEvent::Sync(SyncEvent::PlaylistUnchanged))
                        .ok();
                    return Ok(());
                }
            }
        }

        {
            let mut staging = self.staging.lock().await;
            if staging.busy {
                // Replacing mid-stage would race the download; pick the
                // change up again once staging settles.
                staging.resync_requested = true;
                debug!("staging in progress; deferring playlist replacement");
                return Ok(());
            }
            staging.busy = true;
        }

        info!(item_count = candidate.items.len(), "staging candidate playlist");
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            inner.stage_candidate(candidate).await;
        });

        Ok(())
    }

    /// Stage a candidate and, on success, persist and accept it.
    async fn stage_candidate(self: Arc<Self>, candidate: Playlist) {
        let stage_result = self.stager.stage(&candidate).await;

        let mut retry_pending = false;
        let resync_requested;
        {
            let mut staging = self.staging.lock().await;

            match &stage_result {
                Ok(()) => {
                    staging.failed_candidate = None;
                    staging.attempts = 0;
                }
                Err(e) => {
                    let same_candidate = staging
                        .failed_candidate
                        .as_ref()
                        .is_some_and(|failed| failed.content_eq(&candidate));
                    let attempts = if same_candidate {
                        staging.attempts + 1
                    } else {
                        1
                    };
                    staging.attempts = attempts;
                    staging.failed_candidate = Some(candidate.clone());

                    let filename = match e {
                        SyncError::StagingFailed { filename } => filename.clone(),
                        _ => String::new(),
                    };
                    warn!(error = %e, attempt = attempts, "playlist staging failed");
                    self.event_bus
                        .emit(CoreEvent::Sync(SyncEvent::DownloadFailed {
                            filename,
                            attempt: attempts,
                        }))
                        .ok();

                    if attempts >= self.config.max_staging_attempts {
                        let exhausted = SyncError::StagingExhausted { attempts };
                        warn!(error = %exhausted, "abandoning candidate playlist");
                        self.event_bus
                            .emit(CoreEvent::Sync(SyncEvent::StagingExhausted { attempts }))
                            .ok();
                        staging.failed_candidate = None;
                        staging.attempts = 0;
                    } else {
                        retry_pending = true;
                    }
                }
            }

            staging.busy = false;
            resync_requested = std::mem::take(&mut staging.resync_requested);
        }

        if stage_result.is_ok() {
            self.accept(candidate).await;
        }

        if retry_pending || resync_requested {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = sleep(self.config.resync_delay) => {
                    self.wake.notify_one();
                }
            }
        }
    }

    /// Persist and promote a staged candidate.
    ///
    /// A persistence failure is logged but does not block the in-memory
    /// swap; the screen keeps playing the new content and persistence is
    /// retried implicitly on the next accepted change.
    async fn accept(&self, mut candidate: Playlist) {
        match serde_json::to_string(&candidate) {
            Ok(blob) => {
                if let Err(e) = self
                    .config
                    .settings_store
                    .set_string(KEY_PLAYLIST, &blob)
                    .await
                {
                    warn!(error = %SyncError::Persist(e.to_string()), "playlist persistence failed");
                }
            }
            Err(e) => {
                warn!(error = %SyncError::Persist(e.to_string()), "playlist serialization failed");
            }
        }

        candidate.initialize();
        let item_count = candidate.items.len();
        *self.current.write().await = Some(candidate);

        info!(item_count, "accepted new playlist");
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::PlaylistChanged { item_count }))
            .ok();
    }
}
