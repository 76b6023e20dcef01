//! # Playlist Sync
//!
//! Keeps the locally accepted playlist in step with the signage cloud.
//!
//! ## Overview
//!
//! The [`SyncService`] runs a recurring fetch cycle against the paired
//! screen's playlist endpoint:
//!
//! 1. Read pairing credentials from the settings store
//! 2. Fetch the server playlist and build a complete candidate from it
//! 3. Compare the candidate against the currently accepted playlist
//! 4. When content differs, stage the candidate's media through a
//!    [`ContentStager`] and, on success, persist and accept it
//! 5. Reschedule the next cycle from the accepted playlist's own cadence
//!
//! Staging runs as a concurrent task so a slow download never blocks the
//! fetch loop; fetch cycles that land while staging is busy defer the
//! replacement instead of racing it. Repeated staging failures for the same
//! candidate are bounded, after which the candidate is abandoned and the
//! previously accepted playlist stays in effect.
//!
//! Progress is reported through the runtime [`EventBus`](core_runtime::EventBus)
//! as [`SyncEvent`](core_runtime::SyncEvent) values.

pub mod error;
pub mod service;
pub mod stage;

pub use error::{Result, SyncError};
pub use service::SyncService;
pub use stage::{ContentStager, NoopStager};
