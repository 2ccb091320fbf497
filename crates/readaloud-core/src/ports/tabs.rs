//! Tab lifecycle port: browser signals consumed by the orchestrator.

use crate::domain::TabId;

/// Sink for tab lifecycle signals from the host browser.
///
/// Methods are synchronous and must not block; implementations use interior
/// mutability with a lock that is never held across an `.await` point.
pub trait TabLifecycle: Send + Sync {
    /// A page finished loading in `tab`, with its best-effort detected
    /// language.
    ///
    /// An empty `language` means detection failed for the new page; any tag
    /// recorded for the tab before must be discarded, so a stale language
    /// cannot leak across a navigation.
    fn page_loaded(&self, tab: TabId, language: &str);

    /// `tab` was closed; everything recorded about it is forgotten.
    fn tab_closed(&self, tab: TabId);
}
