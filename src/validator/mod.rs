//! Video reference validation
//!
//! Every string that reaches the embed widget or durable storage passes
//! through this module first. Four shapes are accepted: a full watch URL,
//! a short URL, an embed URL, and a bare 11-character video ID.

use crate::utils::display_len;
use crate::utils::error::{RemoteError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Maximum accepted reference length
pub const MAX_REFERENCE_LEN: usize = 500;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("reference pattern should compile")
}

static ACCEPTED_SHAPES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        pattern(r"^https?://(www\.)?youtube\.com/watch\?v=[a-zA-Z0-9_-]{11}(&.*)?$"),
        pattern(r"^https?://youtu\.be/[a-zA-Z0-9_-]{11}$"),
        pattern(r"^https?://(www\.)?youtube\.com/embed/[a-zA-Z0-9_-]{11}$"),
        pattern(r"^[a-zA-Z0-9_-]{11}$"),
    ]
});

static EXTRACTORS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        pattern(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)"),
        pattern(r"^([a-zA-Z0-9_-]{11})$"),
    ]
});

/// Opaque video identifier understood by the embed widget
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap an identifier recorded by an earlier session
    pub(crate) fn from_trusted(id: String) -> Self {
        VideoId(id)
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check whether `raw` is an accepted video reference
///
/// Pure predicate: no network or widget access.
pub fn is_valid_reference(raw: &str) -> bool {
    if display_len(raw) > MAX_REFERENCE_LEN {
        return false;
    }

    ACCEPTED_SHAPES
        .iter()
        .filter(|pattern| pattern.is_match(raw))
        .count()
        == 1
}

/// Extract the video ID from a reference
///
/// Extraction is independent of [`is_valid_reference`]; callers must
/// validate before trusting the result for playback or persistence.
pub fn extract_id(raw: &str) -> Option<VideoId> {
    EXTRACTORS.iter().find_map(|pattern| {
        pattern
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoId(m.as_str().to_string()))
    })
}

/// Validate a reference and extract its video ID in one step
pub fn validate_reference(raw: &str) -> Result<VideoId> {
    if !is_valid_reference(raw) {
        return Err(RemoteError::invalid_reference(raw));
    }

    extract_id(raw).ok_or_else(|| RemoteError::invalid_reference(raw))
}
