//! Integration test utilities for TubeRemote
//!
//! This module provides common utilities for integration testing including:
//! - A recording embed widget
//! - Temp-dir backed storage fixtures
//! - A fully wired client (dispatcher plus outbound event receiver)

use anyhow::Result;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tuberemote::events::{ClientEvent, Notice, Notifier};
use tuberemote::history::HistoryStore;
use tuberemote::player::{EmbedWidget, PlaybackController};
use tuberemote::storage::{DurableStorage, FileStorage, UiPreferences};
use tuberemote::utils::HistoryConfig;
use tuberemote::{Dispatcher, InboundEvent, VideoId, WireMessage};

/// Storage quota used by fixtures unless a test asks otherwise
pub const DEFAULT_QUOTA: usize = 5 * 1024 * 1024;

#[derive(Debug, Default)]
struct WidgetRecord {
    calls: Vec<String>,
    quality_levels: Vec<String>,
    title: Option<String>,
}

/// Embed widget that records every command it receives
///
/// Clones share the same record, so a test keeps one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingWidget {
    record: Arc<Mutex<WidgetRecord>>,
}

impl RecordingWidget {
    pub fn with_levels(levels: &[&str]) -> Self {
        let widget = Self::default();
        widget.record.lock().quality_levels = levels.iter().map(|s| s.to_string()).collect();
        widget
    }

    pub fn set_title(&self, title: &str) {
        self.record.lock().title = Some(title.to_string());
    }

    /// Commands received so far, e.g. `load:dQw4w9WgXcQ`, `pause`
    pub fn calls(&self) -> Vec<String> {
        self.record.lock().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn push(&self, call: String) {
        self.record.lock().calls.push(call);
    }
}

impl EmbedWidget for RecordingWidget {
    fn load_video_by_id(&mut self, video_id: &VideoId) -> tuberemote::Result<()> {
        self.push(format!("load:{}", video_id));
        Ok(())
    }

    fn play_video(&mut self) -> tuberemote::Result<()> {
        self.push("play".to_string());
        Ok(())
    }

    fn pause_video(&mut self) -> tuberemote::Result<()> {
        self.push("pause".to_string());
        Ok(())
    }

    fn stop_video(&mut self) -> tuberemote::Result<()> {
        self.push("stop".to_string());
        Ok(())
    }

    fn available_quality_levels(&self) -> tuberemote::Result<Vec<String>> {
        Ok(self.record.lock().quality_levels.clone())
    }

    fn set_playback_quality(&mut self, quality: &str) -> tuberemote::Result<()> {
        self.push(format!("quality:{}", quality));
        Ok(())
    }

    fn video_title(&self) -> tuberemote::Result<Option<String>> {
        Ok(self.record.lock().title.clone())
    }
}

/// Test fixture owning a temporary data directory
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Open file storage over the fixture directory
    pub fn storage(&self, quota: usize) -> Result<FileStorage> {
        Ok(FileStorage::open(self.path(), quota)?)
    }

    /// Wire a client over the fixture directory
    pub fn client(&self, widget: RecordingWidget) -> Result<TestClient> {
        let storage = self.storage(DEFAULT_QUOTA)?;
        Ok(TestClient::new(widget, storage))
    }
}

/// Dispatcher plus the receiving end of its outbound events
pub struct TestClient {
    pub dispatcher: Dispatcher,
    pub events: Receiver<ClientEvent>,
    pub widget: RecordingWidget,
}

impl TestClient {
    pub fn new<S>(widget: RecordingWidget, storage: S) -> Self
    where
        S: DurableStorage + Clone + 'static,
    {
        let (notifier, events) = Notifier::channel();
        let controller = PlaybackController::new(Box::new(widget.clone()), notifier.clone());
        let history = HistoryStore::new(Box::new(storage.clone()), HistoryConfig::default(), notifier.clone());
        let preferences = UiPreferences::load(Box::new(storage));
        let mut dispatcher = Dispatcher::new(controller, history, preferences, notifier);
        dispatcher.startup();

        Self {
            dispatcher,
            events,
            widget,
        }
    }

    /// Drain outbound events emitted so far
    pub fn drain(&self) -> Vec<ClientEvent> {
        self.events.try_iter().collect()
    }

    /// Drain outbound events, keeping only notices
    pub fn notices(&self) -> Vec<Notice> {
        self.drain()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }
}

/// Decode a JSON wire frame into an inbound event
pub fn frame(json: &str) -> InboundEvent {
    let message = WireMessage::parse(json).unwrap_or_else(|e| panic!("bad test frame {}: {}", json, e));
    let event = message
        .channel_event()
        .unwrap_or_else(|| panic!("unknown test event {}", message.event));
    event.into()
}
