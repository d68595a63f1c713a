//! Manifest parser: one pass over classified lines.

use super::error::PlaylistError;
use super::line::{
    classify, Line, TAG_ENDLIST, TAG_INF, TAG_MEDIA_SEQUENCE, TAG_TARGET_DURATION, TAG_VERSION,
};
use super::{Playlist, PlaylistEntry, SUPPORTED_VERSION};

/// `#EXTINF` seen, waiting for its reference line.
struct PendingEntry {
    duration: f64,
    title: Option<String>,
}

/// Parses raw manifest bytes (e.g. the persisted copy). Non-UTF-8 input is
/// reported as `UnreadableInput`.
pub fn parse_playlist_bytes(bytes: &[u8]) -> Result<Playlist, PlaylistError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| PlaylistError::UnreadableInput(format!("manifest is not valid UTF-8: {}", e)))?;
    parse_playlist(text)
}

/// Parses manifest text into an ordered list of segment references.
///
/// Rules:
/// - `#EXT-X-VERSION` must be 3.
/// - `#EXTINF` makes the next reference line a segment. A blank line while an
///   entry is pending drops it, so no empty reference is ever recorded.
///   Other tags and comments in between leave the entry pending.
/// - `#EXT-X-ENDLIST` stops scanning; nothing after it is looked at.
/// - Reference lines without a preceding `#EXTINF` are ignored.
pub fn parse_playlist(text: &str) -> Result<Playlist, PlaylistError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut playlist = Playlist::default();
    let mut pending: Option<PendingEntry> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        match classify(raw) {
            Line::Blank => {
                if pending.take().is_some() {
                    tracing::debug!(line_number, "#EXTINF followed by blank line, entry skipped");
                }
            }
            Line::Comment => {}
            Line::Uri(reference) => {
                if let Some(entry) = pending.take() {
                    playlist.entries.push(PlaylistEntry {
                        reference: reference.to_string(),
                        duration: entry.duration,
                        title: entry.title,
                    });
                }
            }
            Line::Tag { name, payload } => match name {
                TAG_ENDLIST => {
                    if payload.is_some() {
                        return Err(malformed(TAG_ENDLIST, line_number, raw));
                    }
                    playlist.complete = true;
                    break;
                }
                TAG_VERSION => {
                    playlist.version = Some(parse_version(payload, line_number, raw)?);
                }
                TAG_INF => {
                    pending = Some(parse_inf(payload, line_number, raw)?);
                }
                TAG_TARGET_DURATION => {
                    playlist.target_duration =
                        Some(parse_integer(TAG_TARGET_DURATION, payload, line_number, raw)?);
                }
                TAG_MEDIA_SEQUENCE => {
                    playlist.media_sequence =
                        Some(parse_integer(TAG_MEDIA_SEQUENCE, payload, line_number, raw)?);
                }
                _ => {}
            },
        }
    }

    Ok(playlist)
}

fn malformed(tag: &str, line_number: usize, raw: &str) -> PlaylistError {
    PlaylistError::MalformedTag {
        tag: tag.to_string(),
        line_number,
        line: raw.trim().to_string(),
    }
}

fn parse_version(payload: Option<&str>, line_number: usize, raw: &str) -> Result<u32, PlaylistError> {
    let version: u32 = payload
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(|| malformed(TAG_VERSION, line_number, raw))?;
    if version != SUPPORTED_VERSION {
        return Err(PlaylistError::UnsupportedVersion {
            line_number,
            line: raw.trim().to_string(),
        });
    }
    Ok(version)
}

/// `#EXTINF:<duration>[,<title>]`
fn parse_inf(payload: Option<&str>, line_number: usize, raw: &str) -> Result<PendingEntry, PlaylistError> {
    let payload = payload.ok_or_else(|| malformed(TAG_INF, line_number, raw))?;
    let (duration, title) = match payload.split_once(',') {
        Some((d, t)) => (d, Some(t.trim())),
        None => (payload, None),
    };
    let duration: f64 = duration
        .trim()
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| malformed(TAG_INF, line_number, raw))?;
    Ok(PendingEntry {
        duration,
        title: title.filter(|t| !t.is_empty()).map(str::to_string),
    })
}

fn parse_integer(
    tag: &str,
    payload: Option<&str>,
    line_number: usize,
    raw: &str,
) -> Result<u64, PlaylistError> {
    payload
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(|| malformed(tag, line_number, raw))
}
