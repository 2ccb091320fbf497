//! Per-tab language registry.
//!
//! Tracks the last-detected page language of every open tab, so the start
//! flow can fall back to it when extraction has no language of its own, and
//! so the UI can ask for a tab's language before reading begins.

use std::collections::HashMap;
use std::sync::RwLock;

use readaloud_core::TabId;

/// Maps tabs to their last-detected language tag.
///
/// Uses a std lock, not an async one: every access is a quick map operation
/// in sync context, and the lock is never held across an `.await` point.
#[derive(Default)]
pub struct TabLanguageRegistry {
    languages: RwLock<HashMap<TabId, String>>,
}

impl TabLanguageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `language` as `tab`'s current page language.
    ///
    /// An empty tag means detection failed for the new page; the entry is
    /// removed, so a previous page's tag cannot leak across a navigation.
    pub fn record(&self, tab: TabId, language: &str) {
        let mut map = self.languages.write().unwrap();
        if language.is_empty() {
            map.remove(&tab);
        } else {
            map.insert(tab, language.to_string());
        }
    }

    /// Forget everything recorded about `tab`.
    pub fn forget(&self, tab: TabId) {
        self.languages.write().unwrap().remove(&tab);
    }

    /// Last-detected language for `tab`; empty when unknown.
    #[must_use]
    pub fn lookup(&self, tab: TabId) -> String {
        self.languages
            .read()
            .unwrap()
            .get(&tab)
            .cloned()
            .unwrap_or_default()
    }
}
