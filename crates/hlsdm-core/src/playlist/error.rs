//! Playlist parse errors.

/// Why a manifest could not be turned into a segment list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
    /// `#EXT-X-VERSION` declared something other than version 3.
    #[error("unsupported playlist version on line {line_number}: {line:?} (only version 3 is supported)")]
    UnsupportedVersion { line_number: usize, line: String },
    /// A known tag whose payload could not be parsed.
    #[error("malformed {tag} tag on line {line_number}: {line:?}")]
    MalformedTag {
        tag: String,
        line_number: usize,
        line: String,
    },
    /// The manifest bytes could not be read as text.
    #[error("playlist is unreadable: {0}")]
    UnreadableInput(String),
}
