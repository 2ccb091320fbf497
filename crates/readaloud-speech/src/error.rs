//! Reading session error types.
//!
//! Two failure classes deliberately never surface here: a unit the engine
//! fails to speak is skipped and the session keeps going, and an engine
//! callback from a superseded generation is discarded unprocessed. Both are
//! handled inside [`crate::playback`].

use thiserror::Error;

/// Errors that can occur while orchestrating a reading session.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Extraction found no usable main text on the page.
    #[error("no readable main text found on this page")]
    NoReadableContent,

    /// Extraction produced text, but segmentation found nothing speakable.
    #[error("page text contains no speakable sentences")]
    NoReadableSentences,

    /// The content extraction machinery failed.
    #[error("content extraction failed: {0}")]
    Extraction(#[source] anyhow::Error),

    /// A session-control command arrived with no session to act on.
    #[error("no active reading session")]
    NotReading,

    /// `pause` was called while the session was already paused.
    #[error("reading is already paused")]
    AlreadyPaused,

    /// `resume` was called while the session was not paused.
    #[error("reading is not paused")]
    NotPaused,

    /// A playback rate outside the usable range was requested.
    #[error("playback rate must be a positive number, got {0}")]
    InvalidRate(f32),
}
