//! Simulated embed widget
//!
//! Drives the controller without a browser: every command is logged and
//! answered with the state changes a real widget would report.

use crate::player::{EmbedWidget, WidgetEvent, WidgetState};
use crate::utils::error::{IntoRemoteError, Result};
use crate::validator::VideoId;
use log::info;

type EventSink = Box<dyn Fn(WidgetEvent) + Send>;

/// Widget that plays nothing and reports plausible state changes
pub struct HeadlessWidget {
    quality_levels: Vec<String>,
    current: Option<VideoId>,
    quality: Option<String>,
    sink: EventSink,
}

impl HeadlessWidget {
    /// Create a widget offering `quality_levels` for every video
    ///
    /// # Arguments
    ///
    /// * `quality_levels` - Tiers reported by `available_quality_levels`
    /// * `sink` - Receives the widget's state change events
    pub fn new<F>(quality_levels: Vec<String>, sink: F) -> Self
    where
        F: Fn(WidgetEvent) + Send + 'static,
    {
        Self {
            quality_levels,
            current: None,
            quality: None,
            sink: Box::new(sink),
        }
    }

    /// Quality most recently applied
    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    fn report(&self, state: WidgetState) {
        (self.sink)(WidgetEvent::StateChange(state));
    }

    fn require_video(&self, command: &str) -> Result<&VideoId> {
        self.current.as_ref().ok_or("no video loaded").widget_err(command)
    }
}

impl EmbedWidget for HeadlessWidget {
    fn load_video_by_id(&mut self, video_id: &VideoId) -> Result<()> {
        info!("[widget] load {}", video_id);
        self.current = Some(video_id.clone());
        self.quality = None;
        self.report(WidgetState::Unstarted);
        self.report(WidgetState::Buffering);
        self.report(WidgetState::Playing);
        Ok(())
    }

    fn play_video(&mut self) -> Result<()> {
        let video_id = self.require_video("play")?;
        info!("[widget] play {}", video_id);
        self.report(WidgetState::Playing);
        Ok(())
    }

    fn pause_video(&mut self) -> Result<()> {
        let video_id = self.require_video("pause")?;
        info!("[widget] pause {}", video_id);
        self.report(WidgetState::Paused);
        Ok(())
    }

    fn stop_video(&mut self) -> Result<()> {
        info!("[widget] stop");
        self.current = None;
        self.report(WidgetState::Unstarted);
        Ok(())
    }

    fn available_quality_levels(&self) -> Result<Vec<String>> {
        Ok(if self.current.is_some() {
            self.quality_levels.clone()
        } else {
            Vec::new()
        })
    }

    fn set_playback_quality(&mut self, quality: &str) -> Result<()> {
        self.require_video("set quality")?;
        info!("[widget] quality {}", quality);
        self.quality = Some(quality.to_string());
        Ok(())
    }

    fn video_title(&self) -> Result<Option<String>> {
        Ok(self.current.as_ref().map(|id| format!("Video {}", id)))
    }
}
