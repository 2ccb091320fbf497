//! Core domain types and port definitions for readaloud.
//!
//! This crate holds the shared vocabulary of the workspace: the [`TabId`]
//! identifier, the port traits that adapters implement ([`ports::engine`],
//! [`ports::extractor`], [`ports::tabs`]), and the single surface the
//! orchestrator offers upward to UI adapters ([`ports::reader`]).
//!
//! It deliberately contains no behaviour beyond type definitions, so that
//! every other crate can depend on it without pulling in an engine, a
//! runtime, or the orchestrator itself.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export key types for convenience
pub use domain::TabId;
pub use ports::engine::{
    SpeakOptions, SpeechEngine, UtteranceCallback, UtteranceOutcome, VoiceDescriptor,
};
pub use ports::extractor::{ContentExtractor, ExtractError, ExtractedContent};
pub use ports::reader::{
    PauseStateDto, ProgressDto, ReaderPort, ReaderPortError, ReadingStartedDto,
};
pub use ports::tabs::TabLifecycle;
