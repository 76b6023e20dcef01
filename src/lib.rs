//! Workspace facade crate.
//!
//! This crate exists so host applications can depend on `signage` alone and
//! reach every layer of the playback core without wiring each workspace
//! crate individually. The `desktop` feature (on by default) pulls in the
//! reqwest/JSON-file bridge implementations; embedded hosts disable it and
//! supply their own bridges.

pub use bridge_traits;
pub use core_playback;
pub use core_playlist;
pub use core_runtime;
pub use core_sync;

#[cfg(feature = "desktop")]
pub use bridge_desktop;
