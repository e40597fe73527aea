//! Command dispatcher
//!
//! Routes every inbound event to exactly one controller or history
//! operation. Events are handled one at a time in delivery order; the
//! dispatcher owns all mutable client state, so nothing here is locked.

mod frames;
mod inbound;

pub use frames::forward_frames;
pub use inbound::{AuthAttempt, ChannelEvent, InboundEvent, UiEvent, WireMessage};

use crate::events::{ClientEvent, Notice, Notifier};
use crate::history::HistoryStore;
use crate::player::{PlaybackController, WidgetEvent};
use crate::storage::{Section, UiPreferences};
use crate::utils::error::{RemoteError, Result};
use crate::validator::is_valid_reference;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

/// Routes inbound events to the playback controller and history store
pub struct Dispatcher {
    controller: PlaybackController,
    history: HistoryStore,
    preferences: UiPreferences,
    notifier: Notifier,
    on_ready: Option<oneshot::Sender<()>>,
}

impl Dispatcher {
    pub fn new(
        controller: PlaybackController,
        history: HistoryStore,
        preferences: UiPreferences,
        notifier: Notifier,
    ) -> Self {
        Self {
            controller,
            history,
            preferences,
            notifier,
            on_ready: None,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn preferences(&self) -> &UiPreferences {
        &self.preferences
    }

    /// Resolves once the widget is ready and every play deferred until then
    /// has been handed to it
    ///
    /// Replaces any receiver returned earlier.
    pub fn ready_signal(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.on_ready = Some(tx);
        self.signal_ready();
        rx
    }

    /// Load persisted state and publish the initial view
    pub fn startup(&mut self) {
        self.history.load();
        for section in [Section::CurrentVideo, Section::History] {
            self.notifier.emit(ClientEvent::SectionCollapsed {
                section,
                collapsed: self.preferences.is_collapsed(section),
            });
        }
        self.notifier.emit(ClientEvent::PlaceholderVisible(true));
        self.notifier.emit(ClientEvent::NowShowing {
            reference: None,
            title: None,
        });
    }

    /// Process events until the stream closes or a shutdown arrives
    ///
    /// On shutdown, widget reports already queued are still applied so the
    /// last commands see their state changes; anything else is discarded.
    pub async fn run(&mut self, mut events: UnboundedReceiver<InboundEvent>) {
        info!("Dispatcher running");
        while let Some(event) = events.recv().await {
            if event == InboundEvent::Shutdown {
                info!("Dispatcher shutting down");
                self.settle(&mut events);
                break;
            }
            self.dispatch(event);
        }
    }

    fn settle(&mut self, events: &mut UnboundedReceiver<InboundEvent>) {
        while let Ok(event) = events.try_recv() {
            match event {
                InboundEvent::Widget(event) => self.handle_widget(event),
                other => debug!("Discarding {:?} after shutdown", other),
            }
        }
    }

    /// Handle one event
    pub fn dispatch(&mut self, event: InboundEvent) {
        let result = match event {
            InboundEvent::Channel(event) => self.handle_channel(event),
            InboundEvent::Ui(event) => self.handle_ui(event),
            InboundEvent::Widget(event) => {
                self.handle_widget(event);
                Ok(())
            }
            InboundEvent::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            // User-facing failures were already surfaced by the controller
            if e.is_user_facing() {
                warn!("{}", e);
            } else {
                debug!("{}", e);
            }
        }

        self.signal_ready();
    }

    fn signal_ready(&mut self) {
        if self.controller.is_ready() && self.controller.deferred_len() == 0 {
            if let Some(tx) = self.on_ready.take() {
                let _ = tx.send(());
            }
        }
    }

    fn handle_channel(&mut self, event: ChannelEvent) -> Result<()> {
        debug!("Received channel event: {:?}", event);
        match event {
            ChannelEvent::Connected => {
                info!("Connected to server");
                self.notifier.emit(ClientEvent::ConnectionStatus(true));
            }
            ChannelEvent::Disconnected => {
                info!("Disconnected from server");
                self.notifier.emit(ClientEvent::ConnectionStatus(false));
            }
            ChannelEvent::PlayVideo { url } => {
                let url = url.unwrap_or_default();
                self.controller.play(&url, true, &mut self.history)?;
            }
            ChannelEvent::Pause => self.controller.pause()?,
            ChannelEvent::Resume => self.controller.resume()?,
            ChannelEvent::Stop => self.controller.stop()?,
            ChannelEvent::EnterFullscreen => self.controller.request_fullscreen(true),
            ChannelEvent::ExitFullscreen => self.controller.request_fullscreen(false),
            ChannelEvent::AuthAttempt(attempt) => self.notifier.notify(auth_notice(&attempt)),
        }
        Ok(())
    }

    fn handle_ui(&mut self, event: UiEvent) -> Result<()> {
        debug!("Received UI event: {:?}", event);
        match event {
            UiEvent::SubmitUrl(url) => self.submit_url(url.trim())?,
            UiEvent::Pause => self.controller.pause()?,
            UiEvent::Resume => self.controller.resume()?,
            UiEvent::Stop => self.controller.stop()?,
            UiEvent::ToggleFullscreen => self.controller.toggle_fullscreen(),
            UiEvent::FullscreenChanged(fullscreen) => self.controller.fullscreen_changed(fullscreen),
            UiEvent::Replay(url) => {
                self.controller.play(&url, true, &mut self.history)?;
            }
            UiEvent::ClearHistory { confirmed } => {
                if confirmed {
                    self.history.clear();
                } else {
                    debug!("History clear cancelled");
                }
            }
            UiEvent::CopyCurrentReference => {
                if let Some(reference) = self.controller.current_reference() {
                    self.notifier.emit(ClientEvent::CopyToClipboard(reference.to_string()));
                }
            }
            UiEvent::CopyReference(url) => self.notifier.emit(ClientEvent::CopyToClipboard(url)),
            UiEvent::ToggleSection(section) => {
                let collapsed = self.preferences.toggle(section);
                self.notifier.emit(ClientEvent::SectionCollapsed { section, collapsed });
            }
        }
        Ok(())
    }

    fn handle_widget(&mut self, event: WidgetEvent) {
        self.controller.handle_widget_event(event, &mut self.history);
    }

    /// Validate the url form before handing it to the play endpoint
    fn submit_url(&mut self, url: &str) -> Result<()> {
        if url.is_empty() {
            self.notifier.notify(Notice::blocking("Please enter a YouTube URL"));
            return Err(RemoteError::invalid_reference(url));
        }

        if !is_valid_reference(url) {
            self.notifier.notify(Notice::blocking("Please enter a valid YouTube URL"));
            return Err(RemoteError::invalid_reference(url));
        }

        self.notifier.emit(ClientEvent::SubmitPlay { url: url.to_string() });
        Ok(())
    }
}

fn auth_notice(attempt: &AuthAttempt) -> Notice {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "unknown".to_string());

    if attempt.success {
        Notice::success(
            "Device Connected",
            format!("{} authenticated successfully", field(&attempt.device_name)),
        )
    } else {
        Notice::error(
            "Authentication Failed",
            format!("{} from {}", field(&attempt.reason), field(&attempt.ip)),
        )
    }
}
