//! TubeRemote - remote-control client for an embedded video player
//!
//! The client receives play/pause/stop/fullscreen commands over a push
//! channel, drives an embed widget, and keeps a bounded play history in
//! durable key/value storage. Rendering lives outside this crate: the core
//! publishes [`events::ClientEvent`]s and consumes [`dispatcher::InboundEvent`]s.

pub mod dispatcher;
pub mod events;
pub mod history;
pub mod player;
pub mod storage;
pub mod utils;
pub mod validator;

pub use dispatcher::{ChannelEvent, Dispatcher, InboundEvent, UiEvent, WireMessage};
pub use events::{ClientEvent, Notice, NoticeLevel, Notifier};
pub use history::{HistoryEntry, HistoryStore};
pub use player::{EmbedWidget, HeadlessWidget, PlaybackController, WidgetEvent, WidgetState};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError, UiPreferences};
pub use utils::{Config, RemoteError, Result};
pub use validator::{extract_id, is_valid_reference, validate_reference, VideoId};
