//! Speech engine port: engine-agnostic interface to the platform TTS layer.
//!
//! The engine is an external collaborator (a browser TTS service, a native
//! speech API). Commands are fire-and-forget: [`SpeechEngine::speak`] returns
//! immediately and the engine reports the utterance's fate later through the
//! callback handed to it. The orchestrator turns those callbacks into typed
//! channel messages so state transitions stay strictly ordered.

use serde::{Deserialize, Serialize};

// ── Voice metadata ─────────────────────────────────────────────────

/// One voice the engine can synthesise with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    /// Voice identifier; the display name doubles as the id on most engines.
    pub name: String,
    /// BCP-47-style language tag (e.g. `"en-GB"`). May be empty.
    pub lang: String,
    /// Whether the voice synthesises locally, without a network round-trip.
    pub is_local: bool,
}

// ── Utterance lifecycle ────────────────────────────────────────────

/// Terminal fate of a single utterance.
///
/// The engine delivers at most one of these per `speak` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceOutcome {
    /// The utterance was spoken to the end.
    Completed,
    /// The engine could not speak the utterance.
    Failed,
    /// The utterance was cut off before finishing (an engine stop, or a
    /// newer utterance displacing it).
    Interrupted,
}

/// Callback invoked once with the utterance's terminal outcome.
pub type UtteranceCallback = Box<dyn FnOnce(UtteranceOutcome) + Send + 'static>;

/// Per-utterance options passed to [`SpeechEngine::speak`].
#[derive(Debug, Clone)]
pub struct SpeakOptions {
    /// Playback rate multiplier (1.0 is normal speed).
    pub rate: f32,
    /// Voice to use; `None` lets the engine pick its default.
    pub voice: Option<String>,
    /// Language hint for the engine's default-voice selection.
    pub language: Option<String>,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            voice: None,
            language: None,
        }
    }
}

// ── Engine trait ───────────────────────────────────────────────────

/// Backend-agnostic text-to-speech engine.
///
/// Implementations must be `Send + Sync`; the orchestrator holds one behind
/// an `Arc` and calls it from async context. No method may block: `speak`
/// hands the utterance over and returns, `stop` takes effect immediately
/// from the caller's point of view.
pub trait SpeechEngine: Send + Sync {
    /// Speak one utterance, displacing any utterance already in flight.
    ///
    /// `on_done` is invoked at most once, with the terminal outcome. A
    /// wedged engine may never invoke it; callers recover via [`stop`].
    ///
    /// [`stop`]: Self::stop
    fn speak(&self, text: &str, options: &SpeakOptions, on_done: UtteranceCallback);

    /// Suspend the in-flight utterance, keeping its position.
    fn pause(&self);

    /// Resume a previously paused utterance.
    fn resume(&self);

    /// Stop and discard any in-flight utterance.
    fn stop(&self);

    /// Enumerate the voices this engine offers, in engine order.
    fn voices(&self) -> Vec<VoiceDescriptor>;
}
