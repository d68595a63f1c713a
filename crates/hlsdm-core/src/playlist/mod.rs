//! Playlist (HLS media manifest) parsing.
//!
//! Turns manifest text into an ordered list of segment references plus the
//! little metadata the downloader cares about (version, completeness). Only
//! a subset of the format is honored: `#EXT-X-VERSION`, `#EXTINF` followed by
//! a reference line, and `#EXT-X-ENDLIST`. Target duration and media sequence
//! are recorded when present; every other tag is skipped.

mod error;
mod line;
mod parse;

pub use error::PlaylistError;
pub use parse::{parse_playlist, parse_playlist_bytes};

/// The only `#EXT-X-VERSION` value accepted.
pub const SUPPORTED_VERSION: u32 = 3;

/// One `#EXTINF` entry: the segment reference and the tag's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    /// Reference exactly as written in the manifest (absolute URL or relative path).
    pub reference: String,
    /// Duration in seconds from `#EXTINF:<duration>`.
    pub duration: f64,
    /// Optional title after the comma.
    pub title: Option<String>,
}

/// Parsed media playlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    /// Validated `#EXT-X-VERSION`, if the manifest declared one.
    pub version: Option<u32>,
    /// `#EXT-X-TARGETDURATION` in seconds.
    pub target_duration: Option<u64>,
    /// `#EXT-X-MEDIA-SEQUENCE`.
    pub media_sequence: Option<u64>,
    /// Entries in playback order.
    pub entries: Vec<PlaylistEntry>,
    /// True when `#EXT-X-ENDLIST` was reached.
    pub complete: bool,
}

impl Playlist {
    /// Segment references in playback order.
    pub fn segment_references(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.reference.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.entries.iter().map(|e| e.duration).sum()
    }
}
