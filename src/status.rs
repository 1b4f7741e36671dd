//! Turns raw tool output into the strings shown in the info box.

pub const TITLE_MAX_CHARS: usize = 50;
pub const SNIPPET_MAX_CHARS: usize = 60;
pub const VOLUME_UNAVAILABLE: &str = "--%";

const ELLIPSIS: &str = "...";
const VOLUME_MARKER: &str = "Volume:";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl PlaybackStatus {
    /// Anything other than an exact `Playing` or `Paused`, including a failed
    /// query, reads as stopped.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Playing") => PlaybackStatus::Playing,
            Some("Paused") => PlaybackStatus::Paused,
            _ => PlaybackStatus::Stopped,
        }
    }

    pub fn glyph_text(self) -> &'static str {
        match self {
            PlaybackStatus::Playing => "▶ Playing",
            PlaybackStatus::Paused => "⏸ Paused",
            PlaybackStatus::Stopped => "■ Stopped",
        }
    }
}

pub fn format_status(raw: Option<&str>) -> &'static str {
    PlaybackStatus::from_raw(raw).glyph_text()
}

/// Extracts the first channel's percentage from `pactl get-sink-volume`.
///
/// The line looks like
/// `Volume: front-left: 29491 /  45% / -20.81 dB,   front-right: ...`.
pub fn format_volume(raw: Option<&str>) -> String {
    raw.and_then(parse_volume)
        .unwrap_or_else(|| VOLUME_UNAVAILABLE.to_string())
}

fn parse_volume(output: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains(VOLUME_MARKER))?;
    let percent = line.split('/').nth(1)?.trim();
    if percent.is_empty() {
        return None;
    }
    Some(percent.to_string())
}

/// Caps `text` at `max_chars` characters, marking the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn format_title(title: &str) -> String {
    truncate_with_ellipsis(title, TITLE_MAX_CHARS)
}

/// `"{artist} {status}"` with surrounding whitespace removed, so a missing
/// artist leaves only the status glyph.
pub fn format_status_line(artist: &str, status: PlaybackStatus) -> String {
    format!("{artist} {}", status.glyph_text()).trim().to_string()
}
