//! History entry and its structural validation

use crate::utils::display_len;
use crate::validator::{is_valid_reference, VideoId};
use serde::Serialize;
use serde_json::Value;

/// Longest timestamp accepted from persisted state
pub const MAX_TIMESTAMP_LEN: usize = 100;

/// One played video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    url: String,
    video_id: Option<VideoId>,
    title: String,
    timestamp: String,
}

impl HistoryEntry {
    pub(crate) fn new(url: String, video_id: Option<VideoId>, title: String, timestamp: String) -> Self {
        Self {
            url,
            video_id,
            title,
            timestamp,
        }
    }

    /// Reference the video was played from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Extracted video ID, if one was recorded
    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    /// Title recorded when the entry was added
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Opaque display timestamp
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Text to show for this entry: the title, or the url when untitled
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    /// Rebuild an entry from an untrusted persisted value
    ///
    /// Returns `None` unless the value is an object with a valid `url`, a
    /// string `timestamp` of at most [`MAX_TIMESTAMP_LEN`] characters, and a
    /// `videoId` that is either a string or falsy.
    pub(crate) fn from_persisted(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let url = obj.get("url")?.as_str()?;
        if !is_valid_reference(url) {
            return None;
        }

        let timestamp = obj.get("timestamp")?.as_str()?;
        if display_len(timestamp) > MAX_TIMESTAMP_LEN {
            return None;
        }

        let video_id = match obj.get("videoId") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(id)) if id.is_empty() => None,
            Some(Value::String(id)) => Some(VideoId::from_trusted(id.clone())),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(_) => return None,
        };

        // Titles were never checked on write; keep whatever was stored as text
        let title = match obj.get("title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(title)) => title.clone(),
            Some(other) => other.to_string(),
        };

        Some(Self::new(url.to_string(), video_id, title, timestamp.to_string()))
    }
}
