//! Playlist item model.
//!
//! A [`PlaylistItem`] is a complete, validated record built from the partial
//! [`PlaylistItemDocument`](bridge_traits::api::PlaylistItemDocument) the
//! server returns. Construction fills every missing field with an explicit
//! default rather than merging partial input onto an existing record.

use bridge_traits::api::PlaylistItemDocument;
use serde::{Deserialize, Serialize};

/// Default display duration for finite-duration items, in seconds.
pub const DEFAULT_DISPLAY_DURATION_SECS: u32 = 10;

/// Content type of a playlist item.
///
/// Finite-duration kinds are advanced by the scheduler's timer;
/// indeterminate-duration kinds end on an external completion or error
/// signal from the renderer. Unrecognized wire values are preserved in
/// [`MediaKind::Other`] and skipped at playback time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    /// Still image, shown for its configured duration.
    Image,
    /// Video, played until the renderer signals completion.
    Video,
    /// Unrecognized content type.
    Other(String),
}

impl MediaKind {
    /// Parse the wire `fileType` string.
    pub fn parse(value: &str) -> Self {
        match value {
            "Image" => MediaKind::Image,
            "Video" => MediaKind::Video,
            other => MediaKind::Other(other.to_string()),
        }
    }

    /// Whether this kind is advanced by an internal timer.
    pub fn is_finite_duration(&self) -> bool {
        matches!(self, MediaKind::Image)
    }

    /// Whether the scheduler can present this kind at all.
    pub fn is_supported(&self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Video)
    }

    /// The wire representation of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Other(s) => s,
        }
    }
}

impl From<String> for MediaKind {
    fn from(value: String) -> Self {
        MediaKind::parse(&value)
    }
}

impl From<MediaKind> for String {
    fn from(value: MediaKind) -> Self {
        value.as_str().to_string()
    }
}

/// Screen or item orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    ReverseLandscape,
    ReversePortrait,
}

impl Orientation {
    /// Parse the wire orientation string; unknown values fall back to
    /// landscape.
    pub fn parse(value: &str) -> Self {
        match value {
            "portrait" => Orientation::Portrait,
            "reverse_landscape" => Orientation::ReverseLandscape,
            "reverse_portrait" => Orientation::ReversePortrait,
            _ => Orientation::Landscape,
        }
    }

    /// Rotation angle in degrees for this orientation.
    pub fn angle(&self) -> u16 {
        match self {
            Orientation::Landscape => 0,
            Orientation::Portrait => 90,
            Orientation::ReverseLandscape => 180,
            Orientation::ReversePortrait => 270,
        }
    }
}

/// One piece of content and its display parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistItem {
    /// Server-side media identifier, if the item references a media file.
    pub media_file_id: Option<i64>,
    /// Local reference name of the primary file.
    pub filename: String,
    /// Where the primary file can be downloaded from.
    pub download_url: String,
    /// Secondary file reference (e.g. a poster frame).
    pub filename_secondary: String,
    pub url: String,
    pub url_params: String,
    pub zoom: Option<f64>,
    /// Seconds on screen; only meaningful for finite-duration kinds.
    pub display_duration_secs: u32,
    pub transition: String,
    pub transition_speed: Option<u32>,
    pub kind: MediaKind,
    pub file_size: Option<u64>,
    pub orientation: Orientation,
    /// Disabled items are excluded from rotation.
    pub disabled: bool,
    pub title: String,
}

impl Default for PlaylistItem {
    fn default() -> Self {
        Self {
            media_file_id: None,
            filename: String::new(),
            download_url: String::new(),
            filename_secondary: String::new(),
            url: String::new(),
            url_params: String::new(),
            zoom: None,
            display_duration_secs: DEFAULT_DISPLAY_DURATION_SECS,
            transition: String::new(),
            transition_speed: None,
            kind: MediaKind::Other(String::new()),
            file_size: None,
            orientation: Orientation::Landscape,
            disabled: false,
            title: String::new(),
        }
    }
}

impl PlaylistItem {
    /// Build a complete item from a partial wire document.
    ///
    /// Missing fields take their defaults; a zero display duration on a
    /// finite-duration item is replaced by
    /// [`DEFAULT_DISPLAY_DURATION_SECS`].
    pub fn from_document(doc: PlaylistItemDocument) -> Self {
        let kind = doc
            .file_type
            .as_deref()
            .map(MediaKind::parse)
            .unwrap_or(MediaKind::Other(String::new()));

        let mut display_duration_secs = doc
            .display_duration
            .unwrap_or(DEFAULT_DISPLAY_DURATION_SECS);
        if kind.is_finite_duration() && display_duration_secs == 0 {
            display_duration_secs = DEFAULT_DISPLAY_DURATION_SECS;
        }

        Self {
            media_file_id: doc.mediafile_id,
            filename: doc.filename.unwrap_or_default(),
            download_url: doc.download_url.unwrap_or_default(),
            filename_secondary: doc.filename_secondary.unwrap_or_default(),
            url: doc.url.unwrap_or_default(),
            url_params: doc.url_params.unwrap_or_default(),
            zoom: doc.zoom,
            display_duration_secs,
            transition: doc.transition.unwrap_or_default(),
            transition_speed: doc.transition_speed,
            kind,
            file_size: doc.file_size,
            orientation: doc
                .orientation
                .as_deref()
                .map(Orientation::parse)
                .unwrap_or_default(),
            disabled: doc.disabled.unwrap_or(false),
            title: doc.title.unwrap_or_default(),
        }
    }

    /// Content comparison over the fields that affect what is shown.
    ///
    /// Cosmetic defaults filled at construction participate the same way the
    /// server-sent values do; fields that only matter for bookkeeping
    /// (`file_size`, `download_url`, `title`, `orientation`) do not.
    pub fn content_eq(&self, other: &PlaylistItem) -> bool {
        self.media_file_id == other.media_file_id
            && self.display_duration_secs == other.display_duration_secs
            && self.filename == other.filename
            && self.filename_secondary == other.filename_secondary
            && self.url == other.url
            && self.url_params == other.url_params
            && self.zoom == other.zoom
            && self.transition == other.transition
            && self.transition_speed == other.transition_speed
            && self.disabled == other.disabled
    }
}
