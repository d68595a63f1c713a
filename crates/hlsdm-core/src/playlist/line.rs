//! Line tokenizer: classifies each manifest line before any tag handling.

pub(super) const TAG_VERSION: &str = "#EXT-X-VERSION";
pub(super) const TAG_INF: &str = "#EXTINF";
pub(super) const TAG_ENDLIST: &str = "#EXT-X-ENDLIST";
pub(super) const TAG_TARGET_DURATION: &str = "#EXT-X-TARGETDURATION";
pub(super) const TAG_MEDIA_SEQUENCE: &str = "#EXT-X-MEDIA-SEQUENCE";

/// A manifest line after classification. Borrowed from the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Line<'a> {
    Blank,
    /// `#EXT...` line. `name` is everything before the first `:`.
    Tag {
        name: &'a str,
        payload: Option<&'a str>,
    },
    /// Any other line starting with `#`.
    Comment,
    /// Non-blank, non-`#` line: a segment reference (or a stray URI).
    Uri(&'a str),
}

/// Classifies one line. Never indexes by byte offset, so lines of any length are safe.
pub(super) fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with("#EXT") {
        return match line.split_once(':') {
            Some((name, payload)) => Line::Tag {
                name,
                payload: Some(payload),
            },
            None => Line::Tag {
                name: line,
                payload: None,
            },
        };
    }
    if line.starts_with('#') {
        return Line::Comment;
    }
    Line::Uri(line)
}
