//! Outbound events for the rendering layer
//!
//! The core never renders. It emits immutable snapshots and notices over a
//! channel; whatever draws the page subscribes to the receiving end.

use crate::history::HistoryEntry;
use crate::storage::Section;
use crossbeam_channel::{Receiver, Sender};
use log::trace;

/// Text shown when nothing is loaded
pub const NO_VIDEO_LOADED: &str = "No video loaded";

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Blocking notices need acknowledgement; the rest dismiss themselves
    pub blocking: bool,
}

impl Notice {
    /// Transient success toast
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
            blocking: false,
        }
    }

    /// Transient error toast
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
            blocking: false,
        }
    }

    /// Modal error the user has to dismiss
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
            blocking: true,
        }
    }
}

/// Event emitted by the core for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// History contents changed; carries the full list, newest first
    HistoryChanged(Vec<HistoryEntry>),

    /// The "now playing" display changed
    NowShowing {
        reference: Option<String>,
        title: Option<String>,
    },

    /// Show or hide the placeholder covering the widget
    PlaceholderVisible(bool),

    /// Message for the user
    Notice(Notice),

    /// Channel connected or disconnected
    ConnectionStatus(bool),

    /// Enter or leave fullscreen
    FullscreenRequested(bool),

    /// A validated url should be posted to the play endpoint
    SubmitPlay { url: String },

    /// Copy text to the clipboard
    CopyToClipboard(String),

    /// A collapsible section changed state
    SectionCollapsed { section: Section, collapsed: bool },
}

/// Sending half of the outbound event channel
///
/// Cheap to clone. Emitting never fails: with no subscriber attached the
/// event is dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<ClientEvent>,
}

impl Notifier {
    /// Create a notifier and the receiver the renderer subscribes with
    pub fn channel() -> (Self, Receiver<ClientEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// Emit an event
    pub fn emit(&self, event: ClientEvent) {
        if let Err(e) = self.tx.send(event) {
            trace!("No subscriber for {:?}", e.into_inner());
        }
    }

    /// Emit a notice
    pub fn notify(&self, notice: Notice) {
        self.emit(ClientEvent::Notice(notice));
    }
}
