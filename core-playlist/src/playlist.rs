//! Playlist aggregate: items, playback policy and the rotation cursor.

use crate::item::{Orientation, PlaylistItem};
use bridge_traits::api::PlaylistDocument;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default playlist fetch cadence, in seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: u32 = 60;

/// Shuffle passes attempted before falling back to a manual swap when the
/// new order would lead with the previously shown item.
const SHUFFLE_RETRY_LIMIT: u32 = 8;

/// A playlist: ordered items plus playback-order policy and rotation state.
///
/// The rotation fields are serde-skipped: a deserialized playlist always
/// comes back with pristine rotation state, and [`Playlist::initialize`]
/// must be called before playback regardless of where the playlist came
/// from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub mode: String,
    pub items: Vec<PlaylistItem>,
    pub orientation: Orientation,
    pub fit_item: String,
    pub fit_item_opposing: String,
    pub check_for_updates_interval_secs: u32,
    pub gapless: bool,
    pub shuffle_play: bool,
    pub enable_image_transitions: bool,
    pub enable_webapp_transitions: bool,
    pub default_transition: Option<String>,
    pub default_transition_speed: Option<u32>,

    /// Indexes into `items` that take part in rotation, in play order.
    #[serde(skip)]
    active_indexes: Vec<usize>,
    /// Walk counter within `active_indexes`.
    #[serde(skip)]
    cursor: usize,
    /// Position of the currently displayed item within `active_indexes`.
    #[serde(skip)]
    current_pos: usize,
    /// Position of the upcoming item within `active_indexes`.
    #[serde(skip)]
    next_pos: usize,
    /// Original-array index of the last displayed item, used to avoid an
    /// immediate repeat across a shuffle boundary.
    #[serde(skip)]
    prev_index: Option<usize>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            mode: "active".to_string(),
            items: Vec::new(),
            orientation: Orientation::Landscape,
            fit_item: "FitXY".to_string(),
            fit_item_opposing: "FitXY".to_string(),
            check_for_updates_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            gapless: false,
            shuffle_play: false,
            enable_image_transitions: true,
            enable_webapp_transitions: false,
            default_transition: None,
            default_transition_speed: None,
            active_indexes: Vec::new(),
            cursor: 0,
            current_pos: 0,
            next_pos: 0,
            prev_index: None,
        }
    }
}

impl Playlist {
    /// Build a complete playlist from a partial wire document.
    pub fn from_document(doc: PlaylistDocument) -> Self {
        let defaults = Playlist::default();
        Self {
            mode: doc.mode.unwrap_or(defaults.mode),
            items: doc
                .items
                .into_iter()
                .map(PlaylistItem::from_document)
                .collect(),
            orientation: doc
                .orientation
                .as_deref()
                .map(Orientation::parse)
                .unwrap_or_default(),
            fit_item: doc.fit_item.unwrap_or(defaults.fit_item),
            fit_item_opposing: doc.fit_item_opposing.unwrap_or(defaults.fit_item_opposing),
            check_for_updates_interval_secs: doc
                .check_for_updates_interval
                .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
            gapless: doc.gapless.unwrap_or(false),
            shuffle_play: doc.shuffle_play.unwrap_or(false),
            enable_image_transitions: doc.enable_image_transitions.unwrap_or(true),
            enable_webapp_transitions: doc.enable_webapp_transitions.unwrap_or(false),
            default_transition: doc.default_transition,
            default_transition_speed: doc.default_transition_speed,
            ..Playlist::default()
        }
    }

    /// Reset rotation state and rebuild the active-index order.
    ///
    /// Rebuilds `active_indexes` from the non-disabled items (shuffled when
    /// `shuffle_play` is set), then advances once so the first current item
    /// is populated before playback begins.
    pub fn initialize(&mut self) {
        self.cursor = 0;
        self.current_pos = 0;
        self.next_pos = 0;
        self.prev_index = None;

        self.active_indexes = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.disabled)
            .map(|(i, _)| i)
            .collect();

        if self.shuffle_play {
            self.shuffle_items();
        }

        debug!(
            active = self.active_indexes.len(),
            total = self.items.len(),
            shuffle = self.shuffle_play,
            "playlist initialized"
        );

        self.advance();
    }

    /// Move rotation forward by one displayed item.
    ///
    /// The superseded next position becomes the current position and its
    /// original-array index is recorded as `prev_index`; the walk counter
    /// wraps to zero at the end of the active list, reshuffling when shuffle
    /// play is on. Call exactly once per displayed item.
    pub fn advance(&mut self) {
        self.prev_index = self.active_indexes.get(self.next_pos).copied();
        self.current_pos = self.next_pos;

        self.cursor += 1;
        if self.cursor >= self.active_indexes.len() {
            self.cursor = 0;
            if self.shuffle_play {
                self.shuffle_items();
            }
        }

        self.next_pos = self.cursor;
    }

    /// The item currently eligible for display, if any.
    pub fn current_item(&self) -> Option<&PlaylistItem> {
        let index = *self.active_indexes.get(self.current_pos)?;
        self.items.get(index)
    }

    /// The item that will be displayed after the current one, if any.
    pub fn next_item(&self) -> Option<&PlaylistItem> {
        let index = *self.active_indexes.get(self.next_pos)?;
        self.items.get(index)
    }

    /// Number of items taking part in rotation.
    pub fn active_len(&self) -> usize {
        self.active_indexes.len()
    }

    /// Randomize the active-index order.
    pub fn shuffle_items(&mut self) {
        self.shuffle_items_with(&mut rand::rng());
    }

    /// Randomize the active-index order with the provided RNG.
    ///
    /// The new order must not lead with the last displayed item. Retries are
    /// bounded: after [`SHUFFLE_RETRY_LIMIT`] colliding passes the offending
    /// first element is swapped with a differing one, so an adversarial RNG
    /// cannot spin this loop forever. Single-element lists trivially repeat
    /// and are left as-is.
    pub fn shuffle_items_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.active_indexes.len() < 2 {
            return;
        }

        for _ in 0..SHUFFLE_RETRY_LIMIT {
            self.active_indexes.shuffle(rng);
            if self.prev_index != self.active_indexes.first().copied() {
                return;
            }
        }

        // Manual fallback: put any differing element first.
        if let Some(swap_with) = self
            .active_indexes
            .iter()
            .position(|&i| Some(i) != self.prev_index)
        {
            self.active_indexes.swap(0, swap_with);
        }
    }

    /// True iff at least one item is not disabled.
    pub fn has_items_to_display(&self) -> bool {
        self.items.iter().any(|item| !item.disabled)
    }

    /// Screen rotation angle for this playlist's orientation.
    pub fn orientation_angle(&self) -> u16 {
        self.orientation.angle()
    }

    /// Structural content comparison.
    ///
    /// Compares every playback-policy field and every item pairwise on
    /// content-affecting fields; rotation state never participates, so two
    /// playlists at different cursor positions still compare equal.
    pub fn content_eq(&self, other: &Playlist) -> bool {
        if self.mode != other.mode
            || self.orientation != other.orientation
            || self.fit_item != other.fit_item
            || self.fit_item_opposing != other.fit_item_opposing
            || self.check_for_updates_interval_secs != other.check_for_updates_interval_secs
            || self.default_transition != other.default_transition
            || self.default_transition_speed != other.default_transition_speed
            || self.shuffle_play != other.shuffle_play
            || self.enable_image_transitions != other.enable_image_transitions
            || self.enable_webapp_transitions != other.enable_webapp_transitions
        {
            return false;
        }

        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.content_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MediaKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn image(filename: &str, duration: u32, disabled: bool) -> PlaylistItem {
        PlaylistItem {
            filename: filename.to_string(),
            kind: MediaKind::Image,
            display_duration_secs: duration,
            disabled,
            ..Default::default()
        }
    }

    fn video(filename: &str, disabled: bool) -> PlaylistItem {
        PlaylistItem {
            filename: filename.to_string(),
            kind: MediaKind::Video,
            disabled,
            ..Default::default()
        }
    }

    fn playlist_of(items: Vec<PlaylistItem>) -> Playlist {
        Playlist {
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_playlist_has_nothing_to_display() {
        let mut playlist = playlist_of(vec![]);
        assert!(!playlist.has_items_to_display());
        playlist.initialize();
        assert!(playlist.current_item().is_none());
        assert!(playlist.next_item().is_none());
    }

    #[test]
    fn test_all_disabled_playlist_has_nothing_to_display() {
        let mut playlist = playlist_of(vec![
            image("a.png", 5, true),
            video("b.mp4", true),
        ]);
        assert!(!playlist.has_items_to_display());
        playlist.initialize();
        assert!(playlist.current_item().is_none());
        assert!(playlist.next_item().is_none());
    }

    #[test]
    fn test_initialize_skips_disabled_items() {
        let mut playlist = playlist_of(vec![
            image("a.png", 5, false),
            image("b.png", 3, true),
            video("c.mp4", false),
        ]);
        playlist.initialize();
        assert_eq!(playlist.active_len(), 2);
        assert_eq!(playlist.current_item().unwrap().filename, "a.png");
        assert_eq!(playlist.next_item().unwrap().filename, "c.mp4");
    }

    #[test]
    fn test_rotation_cycles_enabled_items_only() {
        let mut playlist = playlist_of(vec![
            image("a.png", 5, false),
            image("b.png", 3, true),
            video("c.mp4", false),
        ]);
        playlist.initialize();

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(playlist.current_item().unwrap().filename.clone());
            playlist.advance();
        }
        assert_eq!(seen, vec!["a.png", "c.mp4", "a.png", "c.mp4"]);
    }

    #[test]
    fn test_rotation_visits_each_enabled_item_per_wraparound() {
        let mut playlist = playlist_of(vec![
            image("a.png", 1, false),
            image("b.png", 1, false),
            image("c.png", 1, false),
        ]);
        playlist.initialize();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..3 {
            seen.insert(playlist.current_item().unwrap().filename.clone());
            playlist.advance();
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_single_item_playlist_repeats() {
        let mut playlist = playlist_of(vec![image("a.png", 5, false)]);
        playlist.shuffle_play = true;
        playlist.initialize();
        for _ in 0..5 {
            assert_eq!(playlist.current_item().unwrap().filename, "a.png");
            playlist.advance();
        }
    }

    #[test]
    fn test_current_item_stable_until_advance() {
        let mut playlist = playlist_of(vec![
            image("a.png", 5, false),
            image("b.png", 5, false),
        ]);
        playlist.initialize();
        assert_eq!(playlist.current_item().unwrap().filename, "a.png");
        assert_eq!(playlist.next_item().unwrap().filename, "b.png");
        // Reading does not move the cursor.
        assert_eq!(playlist.current_item().unwrap().filename, "a.png");
        playlist.advance();
        assert_eq!(playlist.current_item().unwrap().filename, "b.png");
    }

    #[test]
    fn test_reshuffle_never_leads_with_previous_item() {
        let mut playlist = playlist_of(vec![
            image("a.png", 1, false),
            image("b.png", 1, false),
            image("c.png", 1, false),
            image("d.png", 1, false),
        ]);
        playlist.shuffle_play = true;
        playlist.initialize();

        for _ in 0..100 {
            playlist.advance();
            if playlist.next_pos == 0 {
                // A wrap just reshuffled; the new order must not lead with
                // the item recorded as last displayed.
                assert_ne!(
                    playlist.active_indexes.first().copied(),
                    playlist.prev_index,
                    "reshuffle led with the previously displayed item"
                );
            }
        }
    }

    #[test]
    fn test_shuffle_two_items_terminates_and_avoids_repeat() {
        // With two active items every random pass has a 50% chance of
        // reproducing the same leading element; the bounded retry plus
        // manual swap must still terminate with the other item first.
        let mut playlist = playlist_of(vec![
            image("a.png", 1, false),
            image("b.png", 1, false),
        ]);
        playlist.shuffle_play = true;
        playlist.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            playlist.advance();
            let prev = playlist.prev_index;
            playlist.shuffle_items_with(&mut rng);
            assert_ne!(playlist.active_indexes.first().copied(), prev);
        }
    }

    #[test]
    fn test_toggling_shuffle_takes_effect_on_initialize() {
        let mut playlist = playlist_of(vec![
            image("a.png", 1, false),
            image("b.png", 1, false),
            image("c.png", 1, false),
        ]);
        playlist.initialize();
        assert_eq!(playlist.current_item().unwrap().filename, "a.png");

        // Enabling shuffle does not reorder the already-built rotation.
        playlist.shuffle_play = true;
        playlist.advance();
        assert_eq!(playlist.current_item().unwrap().filename, "b.png");
    }

    #[test]
    fn test_content_eq_reflexive_and_symmetric() {
        let a = playlist_of(vec![image("a.png", 5, false), video("c.mp4", false)]);
        let b = playlist_of(vec![image("a.png", 5, false), video("c.mp4", false)]);
        assert!(a.content_eq(&a));
        assert!(a.content_eq(&b));
        assert!(b.content_eq(&a));
    }

    #[test]
    fn test_content_eq_ignores_rotation_state() {
        let mut a = playlist_of(vec![image("a.png", 5, false), video("c.mp4", false)]);
        let b = a.clone();
        a.initialize();
        a.advance();
        assert!(a.content_eq(&b));
    }

    #[test]
    fn test_content_eq_detects_item_change() {
        let a = playlist_of(vec![image("a.png", 5, false)]);
        let b = playlist_of(vec![image("b.png", 5, false)]);
        assert!(!a.content_eq(&b));
    }

    #[test]
    fn test_content_eq_detects_policy_change() {
        let a = playlist_of(vec![image("a.png", 5, false)]);
        let mut b = a.clone();
        b.shuffle_play = true;
        assert!(!a.content_eq(&b));

        let mut c = a.clone();
        c.check_for_updates_interval_secs = 300;
        assert!(!a.content_eq(&c));
    }

    #[test]
    fn test_content_eq_detects_length_change() {
        let a = playlist_of(vec![image("a.png", 5, false)]);
        let b = playlist_of(vec![image("a.png", 5, false), image("b.png", 5, false)]);
        assert!(!a.content_eq(&b));
    }

    #[test]
    fn test_from_document_fills_defaults() {
        let playlist = Playlist::from_document(PlaylistDocument::default());
        assert_eq!(playlist.mode, "active");
        assert_eq!(playlist.fit_item, "FitXY");
        assert_eq!(
            playlist.check_for_updates_interval_secs,
            DEFAULT_CHECK_INTERVAL_SECS
        );
        assert!(playlist.enable_image_transitions);
        assert!(!playlist.shuffle_play);
    }

    #[test]
    fn test_orientation_angle_mapping() {
        let mut playlist = Playlist::default();
        assert_eq!(playlist.orientation_angle(), 0);
        playlist.orientation = Orientation::Portrait;
        assert_eq!(playlist.orientation_angle(), 90);
        playlist.orientation = Orientation::ReverseLandscape;
        assert_eq!(playlist.orientation_angle(), 180);
        playlist.orientation = Orientation::ReversePortrait;
        assert_eq!(playlist.orientation_angle(), 270);
    }

    #[test]
    fn test_serde_resets_rotation_state() {
        let mut playlist = playlist_of(vec![
            image("a.png", 5, false),
            image("b.png", 5, false),
        ]);
        playlist.initialize();
        playlist.advance();

        let blob = serde_json::to_string(&playlist).unwrap();
        let mut restored: Playlist = serde_json::from_str(&blob).unwrap();
        assert!(restored.content_eq(&playlist));
        // Rotation state comes back pristine regardless of the source state.
        assert!(restored.current_item().is_none());
        restored.initialize();
        assert_eq!(restored.current_item().unwrap().filename, "a.png");
    }

    #[test]
    fn test_serde_blob_with_foreign_rotation_fields_is_ignored() {
        let blob = r#"{
            "items": [{"filename": "a.png", "kind": "Image"}],
            "active_indexes": [9, 9],
            "cursor": 7,
            "prev_index": 3
        }"#;
        let mut restored: Playlist = serde_json::from_str(blob).unwrap();
        restored.initialize();
        assert_eq!(restored.current_item().unwrap().filename, "a.png");
    }
}
