//! Reader port: trait abstraction for the reading command surface.
//!
//! # Design Rules
//!
//! - DTOs here are transport-agnostic wire shapes. They carry no
//!   orchestrator-internal types, so a popup UI and a test harness can both
//!   speak them directly.
//! - Conversion from orchestrator-native types happens on the implementing
//!   side, never here. This keeps `readaloud-core` free of any dependency
//!   on the orchestrator crate.
//! - Commands return `Result`; queries are infallible snapshots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TabId;
use crate::ports::engine::VoiceDescriptor;

// ── DTOs ───────────────────────────────────────────────────────────

/// Response to a successful start request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStartedDto {
    /// Language tag resolved for the session; empty when undetected.
    pub language_tag: String,
    /// Voice handed to the engine; empty when the engine default was used.
    pub voice_used: String,
}

/// Snapshot of reading progress, suitable for polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    /// Whether a session is live (speaking or paused).
    pub speaking: bool,
    /// Whether the live session is paused. Never true while `speaking` is
    /// false.
    pub paused: bool,
    /// Tab the session is reading from, if any.
    pub tab_id: Option<TabId>,
    /// Number of units in the session; 0 when idle.
    pub total: usize,
    /// 0-based index of the unit currently in flight.
    pub current_index: usize,
    /// Text of the unit currently in flight; empty when idle.
    pub current_unit_text: String,
}

/// Response to a pause/resume toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseStateDto {
    /// Whether the session is paused after the toggle.
    pub paused: bool,
}

// ── Error ──────────────────────────────────────────────────────────

/// Errors returned by [`ReaderPort`] commands.
#[derive(Debug, Error)]
pub enum ReaderPortError {
    /// Extraction found nothing worth reading on the page.
    #[error("no readable main text found on this page")]
    NoReadableContent,

    /// The command does not apply in the current session state.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The content extraction machinery failed.
    #[error("content extraction failed: {0}")]
    Extraction(String),
}

// ── Port trait ─────────────────────────────────────────────────────

/// Port trait for the reading command surface.
///
/// Implemented by the orchestrator; consumed by UI adapters and tests.
#[async_trait]
pub trait ReaderPort: Send + Sync {
    /// Start reading `tab` aloud, preempting any session in progress.
    ///
    /// `voice` names an engine voice to use verbatim; `None` or an empty
    /// string selects one automatically from the page language.
    async fn start_reading(
        &self,
        tab: TabId,
        rate: f32,
        voice: Option<String>,
    ) -> Result<ReadingStartedDto, ReaderPortError>;

    /// Stop the active session. Stopping while idle is a harmless no-op.
    async fn stop_reading(&self) -> Result<(), ReaderPortError>;

    /// Pause the active session. Fails unless it is currently speaking.
    async fn pause(&self) -> Result<(), ReaderPortError>;

    /// Resume the active session. Fails unless it is currently paused.
    async fn resume(&self) -> Result<(), ReaderPortError>;

    /// Pause if speaking, resume if paused. Fails when no session is live.
    async fn toggle_pause(&self) -> Result<PauseStateDto, ReaderPortError>;

    /// Change the playback rate.
    ///
    /// The engine cannot change rate mid-utterance, so a live session is
    /// stopped; the caller starts a fresh session to hear the new rate.
    async fn set_rate(&self, rate: f32) -> Result<(), ReaderPortError>;

    /// Snapshot the current session for progress display.
    async fn progress(&self) -> ProgressDto;

    /// Last-detected page language of `tab`; empty when unknown.
    async fn detected_language(&self, tab: TabId) -> String;

    /// Engine voices sorted for display, by language tag then name.
    async fn voices(&self) -> Vec<VoiceDescriptor>;
}
