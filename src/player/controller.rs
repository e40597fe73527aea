//! Player controller implementation for TubeRemote
//!
//! The controller is the only owner of the embed widget. Commands that
//! arrive before the widget is ready go onto a FIFO queue which is drained,
//! in order, on the ready transition.

use crate::events::{ClientEvent, Notice, Notifier, NO_VIDEO_LOADED};
use crate::history::HistoryStore;
use crate::player::{
    select_quality, EmbedWidget, PlaybackSession, WidgetEvent, WidgetState, PLAYBACK_ERROR_MESSAGE,
};
use crate::utils::error::{RemoteError, Result};
use crate::validator::{validate_reference, VideoId};

use log::{debug, error, info, warn};
use std::collections::VecDeque;

/// Result of a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The widget was told to load the video
    Started(VideoId),

    /// The widget is not ready; the request runs once it is
    Deferred,
}

/// Play request waiting for the widget
#[derive(Debug, Clone)]
struct DeferredPlay {
    url: String,
    record_history: bool,
}

/// Playback controller
pub struct PlaybackController {
    widget: Box<dyn EmbedWidget>,
    session: PlaybackSession,
    deferred: VecDeque<DeferredPlay>,
    current_reference: Option<String>,
    fullscreen: bool,
    notifier: Notifier,
}

impl PlaybackController {
    /// Create a controller for a widget that has not signalled readiness yet
    pub fn new(widget: Box<dyn EmbedWidget>, notifier: Notifier) -> Self {
        Self {
            widget,
            session: PlaybackSession::default(),
            deferred: VecDeque::new(),
            current_reference: None,
            fullscreen: false,
            notifier,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Reference currently shown as playing
    pub fn current_reference(&self) -> Option<&str> {
        self.current_reference.as_deref()
    }

    /// Number of play requests waiting for readiness
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Play a video
    ///
    /// Invalid references raise a user-facing notice and go no further.
    /// Before the widget is ready the request is queued and replayed on the
    /// ready transition. Replaying the current url simply reloads it.
    ///
    /// # Arguments
    ///
    /// * `url` - Raw video reference
    /// * `record_history` - Whether to add the video to the play history
    /// * `history` - History store receiving the entry
    pub fn play(&mut self, url: &str, record_history: bool, history: &mut HistoryStore) -> Result<PlayOutcome> {
        let video_id = match validate_reference(url) {
            Ok(video_id) => video_id,
            Err(e) => {
                error!("Invalid YouTube URL: {}", e);
                self.notifier.notify(Notice::blocking("Invalid YouTube URL"));
                return Err(e);
            }
        };

        if !self.session.is_ready() {
            info!("Player not ready yet, deferring {}", video_id);
            self.deferred.push_back(DeferredPlay {
                url: url.to_string(),
                record_history,
            });
            return Ok(PlayOutcome::Deferred);
        }

        self.start(url, video_id, record_history, history)
    }

    /// Pause playback; ignored until the widget is ready
    pub fn pause(&mut self) -> Result<()> {
        self.with_ready_widget("pause", |widget| widget.pause_video())
    }

    /// Resume playback; ignored until the widget is ready
    pub fn resume(&mut self) -> Result<()> {
        self.with_ready_widget("resume", |widget| widget.play_video())
    }

    /// Stop playback and restore the placeholder; ignored until the widget is ready
    pub fn stop(&mut self) -> Result<()> {
        let mut stopped = false;
        self.with_ready_widget("stop", |widget| {
            widget.stop_video()?;
            stopped = true;
            Ok(())
        })?;

        if stopped {
            self.current_reference = None;
            self.session.set_current_video(None);
            self.notifier.emit(ClientEvent::PlaceholderVisible(true));
            self.notifier.emit(ClientEvent::NowShowing {
                reference: None,
                title: None,
            });
            info!("Video stopped");
        }
        Ok(())
    }

    /// Ask the renderer to enter or leave fullscreen
    ///
    /// Nothing is emitted when the page is already in the requested mode.
    pub fn request_fullscreen(&mut self, enter: bool) {
        if self.fullscreen == enter {
            debug!("Fullscreen already {}", if enter { "on" } else { "off" });
            return;
        }
        self.fullscreen = enter;
        self.notifier.emit(ClientEvent::FullscreenRequested(enter));
    }

    pub fn toggle_fullscreen(&mut self) {
        self.request_fullscreen(!self.fullscreen);
    }

    /// Record a fullscreen change made outside the controller (e.g. Escape)
    pub fn fullscreen_changed(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Apply an event raised by the widget
    pub fn handle_widget_event(&mut self, event: WidgetEvent, history: &mut HistoryStore) {
        match event {
            WidgetEvent::Ready => {
                if self.session.mark_ready() {
                    self.drain_deferred(history);
                }
            }
            WidgetEvent::StateChange(WidgetState::Playing) => {
                if !self.session.quality_locked() {
                    self.apply_quality_policy();
                }
            }
            WidgetEvent::StateChange(state) if state.is_fresh_video() => {
                self.session.rearm_quality();
            }
            WidgetEvent::StateChange(state) => {
                debug!("Widget state: {:?}", state);
            }
            WidgetEvent::Error { code } => {
                error!("YouTube player error: {}", code);
                self.notifier.notify(Notice::blocking(PLAYBACK_ERROR_MESSAGE));
            }
        }
    }

    fn start(
        &mut self,
        url: &str,
        video_id: VideoId,
        record_history: bool,
        history: &mut HistoryStore,
    ) -> Result<PlayOutcome> {
        if let Err(e) = self.widget.load_video_by_id(&video_id) {
            error!("Failed to load video {}: {}", video_id, e);
            self.notifier.notify(Notice::blocking(PLAYBACK_ERROR_MESSAGE));
            return Err(e);
        }

        self.session.set_current_video(Some(video_id.clone()));
        self.current_reference = Some(url.to_string());
        self.notifier.emit(ClientEvent::PlaceholderVisible(false));
        self.notifier.emit(ClientEvent::NowShowing {
            reference: Some(url.to_string()),
            title: None,
        });

        if record_history {
            let title = self.current_title();
            history.add(url, title.as_deref());
        }

        info!("Playing video: {}", video_id);
        Ok(PlayOutcome::Started(video_id))
    }

    fn drain_deferred(&mut self, history: &mut HistoryStore) {
        if !self.deferred.is_empty() {
            info!("Running {} deferred play request(s)", self.deferred.len());
        }

        while let Some(pending) = self.deferred.pop_front() {
            if let Err(e) = self.play(&pending.url, pending.record_history, history) {
                warn!("Deferred play of {} failed: {}", pending.url, e);
            }
        }
    }

    /// Select and apply quality once per video
    ///
    /// Failures are logged and still lock the latch so a failing widget is
    /// not retried mid-playback.
    fn apply_quality_policy(&mut self) {
        if !self.session.is_ready() {
            warn!("Player not ready for quality adjustment");
            return;
        }

        match self.select_and_apply_quality() {
            Ok(Some(quality)) => {
                info!("Set video quality to: {}", quality);
                self.session.lock_quality();
                self.refresh_title();
            }
            Ok(None) => {
                warn!("No quality levels available for this video");
                self.session.lock_quality();
            }
            Err(e) => {
                warn!("Could not set quality: {}", e);
                self.session.lock_quality();
            }
        }
    }

    fn select_and_apply_quality(&mut self) -> Result<Option<String>> {
        let offered = self.widget.available_quality_levels()?;
        let Some(selected) = select_quality(&offered) else {
            return Ok(None);
        };
        self.widget.set_playback_quality(&selected)?;
        Ok(Some(selected))
    }

    /// Replace the displayed reference with the video's title once known
    fn refresh_title(&mut self) {
        if let Some(title) = self.current_title() {
            self.notifier.emit(ClientEvent::NowShowing {
                reference: self.current_reference.clone(),
                title: Some(title),
            });
        }
    }

    fn current_title(&self) -> Option<String> {
        if !self.session.is_ready() {
            return None;
        }
        match self.widget.video_title() {
            Ok(title) => title.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not get video title: {}", e);
                None
            }
        }
    }

    fn ready_widget(&mut self) -> Result<&mut dyn EmbedWidget> {
        if self.session.is_ready() {
            Ok(self.widget.as_mut())
        } else {
            Err(RemoteError::NotReady)
        }
    }

    fn with_ready_widget<F>(&mut self, command: &str, action: F) -> Result<()>
    where
        F: FnOnce(&mut dyn EmbedWidget) -> Result<()>,
    {
        match self.ready_widget() {
            Ok(widget) => {
                action(widget)?;
                debug!("Widget {} done", command);
                Ok(())
            }
            Err(RemoteError::NotReady) => {
                debug!("Ignoring {}: {}", command, RemoteError::NotReady);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Text the "now playing" panel shows
    pub fn display_text(&self) -> &str {
        self.current_reference.as_deref().unwrap_or(NO_VIDEO_LOADED)
    }
}
