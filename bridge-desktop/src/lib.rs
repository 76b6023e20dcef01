//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the host bridge
//! traits using desktop-appropriate libraries:
//! - `ScreenApi` using `reqwest`
//! - `SettingsStore` using a JSON settings file
//!
//! The media renderer is deliberately absent: rendering is owned by the host
//! shell embedding the core, which supplies its own
//! `MediaRenderer` implementation.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HttpScreenApi, JsonFileSettingsStore};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::Result<()> {
//!     let api = HttpScreenApi::new("https://signage.example.com/api/v1")?;
//!     let settings = JsonFileSettingsStore::new("settings.json".into()).await?;
//!
//!     // Hand both to the core configuration
//!     Ok(())
//! }
//! ```

mod api;
mod settings;

pub use api::HttpScreenApi;
pub use settings::JsonFileSettingsStore;
