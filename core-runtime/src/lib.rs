//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the signage playback core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the core runtime utilities the sync and playback
//! modules depend on. It establishes the async runtime patterns, logging
//! conventions, and event broadcasting mechanisms used throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::CoreConfig;
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, PlaybackEvent, SyncEvent};
