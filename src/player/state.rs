//! Playback session state
//!
//! The session records whether the embed widget has finished initializing,
//! which video it was last told to load, and the one-shot quality latch.

use crate::validator::VideoId;
use log::{debug, info};

/// Readiness phase of the embed widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Widget still initializing; commands are deferred
    Uninitialized,

    /// Widget accepts commands
    Ready,
}

/// Per-video quality latch
///
/// At most one automatic quality adjustment happens per loaded video. The
/// latch is re-armed when the widget reports a new video cued or unstarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLatch {
    Unset,
    Locked,
}

/// State shared by the controller and dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSession {
    ready: ReadyState,
    current_video_id: Option<VideoId>,
    quality: QualityLatch,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            ready: ReadyState::Uninitialized,
            current_video_id: None,
            quality: QualityLatch::Unset,
        }
    }
}

impl PlaybackSession {
    /// Whether the widget accepts commands
    pub fn is_ready(&self) -> bool {
        self.ready == ReadyState::Ready
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready
    }

    /// Video the widget was last told to load
    pub fn current_video_id(&self) -> Option<&VideoId> {
        self.current_video_id.as_ref()
    }

    /// Whether the automatic quality adjustment already ran for this video
    pub fn quality_locked(&self) -> bool {
        self.quality == QualityLatch::Locked
    }

    /// Enter the ready state
    ///
    /// # Returns
    ///
    /// `true` on the first call, `false` once already ready
    pub(crate) fn mark_ready(&mut self) -> bool {
        if self.is_ready() {
            return false;
        }
        self.ready = ReadyState::Ready;
        info!("Embed widget is ready");
        true
    }

    pub(crate) fn set_current_video(&mut self, video_id: Option<VideoId>) {
        self.current_video_id = video_id;
    }

    pub(crate) fn lock_quality(&mut self) {
        self.quality = QualityLatch::Locked;
    }

    pub(crate) fn rearm_quality(&mut self) {
        if self.quality == QualityLatch::Locked {
            debug!("Quality latch re-armed for next video");
        }
        self.quality = QualityLatch::Unset;
    }
}
