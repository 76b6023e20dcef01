//! # Playlist Model
//!
//! The playlist data model for the signage playback core.
//!
//! ## Overview
//!
//! This crate turns the partial wire documents produced by the screen API
//! into complete, validated records and owns the rotation algorithm that
//! decides which item is on screen:
//!
//! - **Item model** (`item`): a single piece of content with its display
//!   parameters, plus the media-kind and orientation enumerations
//! - **Playlist model** (`playlist`): the item sequence, playback policy,
//!   the active-index rotation cursor and the shuffle algorithm
//!
//! ## Rotation
//!
//! A playlist keeps a list of *active indexes* - positions of non-disabled
//! items, in original or shuffled order. Two cursors into that list are kept
//! decoupled: the currently displayed position stays stable while the next
//! position is computed, and callers advance exactly once per displayed item.
//!
//! Rotation state is never persisted and never trusted from storage; it is
//! rebuilt by [`Playlist::initialize`] whenever a playlist is accepted for
//! playback.

pub mod item;
pub mod playlist;

pub use item::{MediaKind, Orientation, PlaylistItem};
pub use playlist::Playlist;
