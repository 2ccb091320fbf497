//! Core domain identifiers shared across the workspace.

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab, as assigned by the host browser.
///
/// Opaque to the orchestrator: it is only ever compared, hashed, and echoed
/// back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
