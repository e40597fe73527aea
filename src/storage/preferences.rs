//! Collapsible section flags
//!
//! Two independent booleans consumed only by the rendering layer. They are
//! stored as the strings `"true"` / `"false"` under their own keys; anything
//! else reads as expanded.

use super::DurableStorage;
use log::warn;

/// A collapsible panel of the client page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// "Now playing" panel
    CurrentVideo,

    /// Play history list
    History,
}

impl Section {
    /// Storage key holding this section's flag
    pub fn storage_key(self) -> &'static str {
        match self {
            Section::CurrentVideo => "currentVideoCollapsed",
            Section::History => "historyCollapsed",
        }
    }
}

/// Persisted UI-collapse flags
pub struct UiPreferences {
    storage: Box<dyn DurableStorage>,
    current_video_collapsed: bool,
    history_collapsed: bool,
}

impl UiPreferences {
    /// Read both flags from `storage`
    pub fn load(storage: Box<dyn DurableStorage>) -> Self {
        let mut prefs = Self {
            storage,
            current_video_collapsed: false,
            history_collapsed: false,
        };
        prefs.current_video_collapsed = prefs.read_flag(Section::CurrentVideo);
        prefs.history_collapsed = prefs.read_flag(Section::History);
        prefs
    }

    /// Whether `section` is collapsed
    pub fn is_collapsed(&self, section: Section) -> bool {
        match section {
            Section::CurrentVideo => self.current_video_collapsed,
            Section::History => self.history_collapsed,
        }
    }

    /// Flip `section` and persist the new value
    ///
    /// # Returns
    ///
    /// The new collapsed state
    pub fn toggle(&mut self, section: Section) -> bool {
        let collapsed = !self.is_collapsed(section);
        match section {
            Section::CurrentVideo => self.current_video_collapsed = collapsed,
            Section::History => self.history_collapsed = collapsed,
        }

        let value = if collapsed { "true" } else { "false" };
        if let Err(e) = self.storage.set_item(section.storage_key(), value) {
            warn!("Failed to save {:?} collapse state: {}", section, e);
        }
        collapsed
    }

    fn read_flag(&self, section: Section) -> bool {
        match self.storage.get_item(section.storage_key()) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Failed to read {:?} collapse state: {}", section, e);
                false
            }
        }
    }
}
