//! Player controller module for TubeRemote
//!
//! This module owns the embed widget handle. It tracks widget readiness,
//! defers commands issued before the widget is ready, applies the one-shot
//! quality policy, and records successful plays in the history store.

mod controller;
mod headless;
mod quality;
mod state;

pub use controller::{PlayOutcome, PlaybackController};
pub use headless::HeadlessWidget;
pub use quality::{select_quality, QualityTier};
pub use state::{PlaybackSession, QualityLatch, ReadyState};

use crate::utils::error::Result;
use crate::validator::VideoId;

/// Message shown when the widget fails to play a video
pub const PLAYBACK_ERROR_MESSAGE: &str = "Error loading video. Please check the URL.";

/// Command/query interface of the third-party embed widget
pub trait EmbedWidget: Send {
    /// Load a video and start playing it
    ///
    /// # Arguments
    ///
    /// * `video_id` - Validated video identifier
    fn load_video_by_id(&mut self, video_id: &VideoId) -> Result<()>;

    /// Resume playback
    fn play_video(&mut self) -> Result<()>;

    /// Pause playback
    fn pause_video(&mut self) -> Result<()>;

    /// Stop playback and unload the current video
    fn stop_video(&mut self) -> Result<()>;

    /// Quality tiers offered for the current video, possibly empty
    fn available_quality_levels(&self) -> Result<Vec<String>>;

    /// Request a quality tier by name
    fn set_playback_quality(&mut self, quality: &str) -> Result<()>;

    /// Title of the current video, when the widget knows it
    fn video_title(&self) -> Result<Option<String>>;
}

/// Playback state reported by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Nothing started yet (new video loaded)
    Unstarted,

    /// Reached the end of the video
    Ended,

    /// Currently playing
    Playing,

    /// Playback paused
    Paused,

    /// Buffering media
    Buffering,

    /// Video cued, waiting for play
    Cued,
}

impl WidgetState {
    /// Map a numeric state code from the embed API
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(WidgetState::Unstarted),
            0 => Some(WidgetState::Ended),
            1 => Some(WidgetState::Playing),
            2 => Some(WidgetState::Paused),
            3 => Some(WidgetState::Buffering),
            5 => Some(WidgetState::Cued),
            _ => None,
        }
    }

    /// Whether this state means a new video was loaded
    pub fn is_fresh_video(self) -> bool {
        matches!(self, WidgetState::Unstarted | WidgetState::Cued)
    }
}

/// Event raised by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Initialization finished
    Ready,

    /// Playback state changed
    StateChange(WidgetState),

    /// Playback failed with a widget error code
    Error { code: i32 },
}
