//! Inbound events
//!
//! Everything the dispatcher reacts to arrives as one [`InboundEvent`]:
//! commands pushed over the channel, clicks from the page, and widget
//! callbacks.

use crate::player::WidgetEvent;
use crate::storage::Section;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

/// One frame from the channel transport: an event name and its payload
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

impl WireMessage {
    /// Parse a JSON-encoded frame
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Decode the frame into a channel event; `None` for unknown names
    pub fn channel_event(&self) -> Option<ChannelEvent> {
        ChannelEvent::from_wire(&self.event, &self.payload)
    }
}

/// Command received over the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Transport connected
    Connected,

    /// Transport disconnected
    Disconnected,

    /// Play a video; `url` is `None` when the payload lacks a string url
    PlayVideo { url: Option<String> },

    Pause,
    Resume,
    Stop,
    EnterFullscreen,
    ExitFullscreen,

    /// A device tried to authenticate with the command server
    AuthAttempt(AuthAttempt),
}

/// Outcome of a device authentication attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthAttempt {
    pub success: bool,
    pub device_name: Option<String>,
    pub reason: Option<String>,
    pub ip: Option<String>,
}

impl ChannelEvent {
    /// Decode a named channel event
    ///
    /// Only the fields each event needs are read; anything else in the
    /// payload is ignored. Unknown event names yield `None`.
    pub fn from_wire(name: &str, payload: &Value) -> Option<Self> {
        let event = match name {
            "connect" => ChannelEvent::Connected,
            "disconnect" => ChannelEvent::Disconnected,
            "play-video" => ChannelEvent::PlayVideo {
                url: string_field(payload, "url"),
            },
            "control-pause" => ChannelEvent::Pause,
            "control-resume" => ChannelEvent::Resume,
            "control-stop" => ChannelEvent::Stop,
            "control-fullscreen" => ChannelEvent::EnterFullscreen,
            "control-exitfullscreen" => ChannelEvent::ExitFullscreen,
            "auth-attempt" => ChannelEvent::AuthAttempt(AuthAttempt {
                success: payload.get("success").and_then(Value::as_bool).unwrap_or(false),
                device_name: string_field(payload, "deviceName"),
                reason: string_field(payload, "reason"),
                ip: string_field(payload, "ip"),
            }),
            other => {
                warn!("Ignoring unknown channel event '{}'", other);
                return None;
            }
        };
        Some(event)
    }
}

fn string_field(payload: &Value, field: &str) -> Option<String> {
    payload.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Action taken on the client page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The url form was submitted
    SubmitUrl(String),
    Pause,
    Resume,
    Stop,
    ToggleFullscreen,
    /// The page entered or left fullscreen on its own
    FullscreenChanged(bool),
    /// Play a history entry again
    Replay(String),
    /// Clear history; `confirmed` is the user's answer to the prompt
    ClearHistory { confirmed: bool },
    /// Copy the playing reference
    CopyCurrentReference,
    /// Copy a history entry's reference
    CopyReference(String),
    ToggleSection(Section),
}

/// Everything the dispatcher consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Channel(ChannelEvent),
    Ui(UiEvent),
    Widget(WidgetEvent),
    /// Stop the dispatch loop
    Shutdown,
}

impl From<ChannelEvent> for InboundEvent {
    fn from(event: ChannelEvent) -> Self {
        InboundEvent::Channel(event)
    }
}

impl From<UiEvent> for InboundEvent {
    fn from(event: UiEvent) -> Self {
        InboundEvent::Ui(event)
    }
}

impl From<WidgetEvent> for InboundEvent {
    fn from(event: WidgetEvent) -> Self {
        InboundEvent::Widget(event)
    }
}
