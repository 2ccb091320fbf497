//! Speech playback orchestration for readaloud.
//!
//! Turns extracted page text into an ordered sequence of speakable units
//! and drives the platform speech engine through them unit by unit, under
//! pause/resume/stop control. When the caller names no voice, one is
//! scored out of the engine's list against the page language.
//!
//! [`ReaderService`] implements the command surface defined in
//! `readaloud-core`; underneath it sit the session state machine in
//! [`playback`], the sentence segmentation in [`segment`], the voice
//! scoring in [`voices`], and the per-tab language registry in
//! [`registry`].

#![deny(unused_crate_dependencies)]

pub mod error;
pub mod playback;
pub mod registry;
pub mod segment;
pub mod service;
pub mod voices;

// Re-export key types for convenience
pub use error::ReadError;
pub use playback::{EngineSignal, JobSnapshot, JobState, PlaybackJob, ReaderEvent};
pub use registry::TabLanguageRegistry;
pub use service::ReaderService;

// Exercised by the integration suites, not by in-module unit tests.
#[cfg(test)]
use tracing_subscriber as _;
