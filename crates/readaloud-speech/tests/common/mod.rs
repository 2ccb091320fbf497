//! Shared mock collaborators for the integration suites.
//!
//! Provides a recording speech engine, a canned content extractor, and
//! helpers for draining the reader event stream.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use readaloud_core::TabId;
use readaloud_core::ports::engine::{
    SpeakOptions, SpeechEngine, UtteranceCallback, UtteranceOutcome, VoiceDescriptor,
};
use readaloud_core::ports::extractor::{ContentExtractor, ExtractError, ExtractedContent};
use readaloud_speech::ReaderEvent;

/// Install a subscriber so `RUST_LOG=debug cargo test` shows session logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Shorthand for building a [`VoiceDescriptor`].
pub fn voice(name: &str, lang: &str, is_local: bool) -> VoiceDescriptor {
    VoiceDescriptor {
        name: name.to_string(),
        lang: lang.to_string(),
        is_local,
    }
}

// ── Mock speech engine ─────────────────────────────────────────────

/// One utterance the mock engine was asked to speak.
#[derive(Debug, Clone)]
pub struct SpokenUnit {
    pub text: String,
    pub rate: f32,
    pub voice: Option<String>,
    pub language: Option<String>,
}

/// A speech engine that records every command it receives.
///
/// In auto mode each utterance reports itself completed the moment it is
/// issued, so a session runs to the end on its own. In manual mode the
/// callbacks queue up and the test decides when (and how) each utterance
/// ends.
pub struct MockEngine {
    pub spoken: Mutex<Vec<SpokenUnit>>,
    pub stops: AtomicUsize,
    pub pauses: AtomicUsize,
    pub resumes: AtomicUsize,
    pending: Mutex<Vec<UtteranceCallback>>,
    voices: Vec<VoiceDescriptor>,
    auto_complete: bool,
}

impl MockEngine {
    /// Engine that completes every utterance immediately.
    pub fn auto(voices: Vec<VoiceDescriptor>) -> Self {
        Self::build(voices, true)
    }

    /// Engine that holds utterances open until the test ends them.
    pub fn manual(voices: Vec<VoiceDescriptor>) -> Self {
        Self::build(voices, false)
    }

    fn build(voices: Vec<VoiceDescriptor>, auto_complete: bool) -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
            pauses: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
            pending: Mutex::new(Vec::new()),
            voices,
            auto_complete,
        }
    }

    /// End the oldest outstanding utterance with `outcome`.
    ///
    /// Panics if nothing is outstanding, which is a test bug.
    pub fn end_next(&self, outcome: UtteranceOutcome) {
        let callback = {
            let mut pending = self.pending.lock().unwrap();
            assert!(!pending.is_empty(), "no outstanding utterance to end");
            pending.remove(0)
        };
        callback(outcome);
    }

    /// Texts handed to `speak`, in order.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken.lock().unwrap().iter().map(|u| u.text.clone()).collect()
    }

    /// Number of utterances issued so far.
    pub fn speak_count(&self) -> usize {
        self.spoken.lock().unwrap().len()
    }
}

impl SpeechEngine for MockEngine {
    fn speak(&self, text: &str, options: &SpeakOptions, on_done: UtteranceCallback) {
        self.spoken.lock().unwrap().push(SpokenUnit {
            text: text.to_string(),
            rate: options.rate,
            voice: options.voice.clone(),
            language: options.language.clone(),
        });
        if self.auto_complete {
            on_done(UtteranceOutcome::Completed);
        } else {
            self.pending.lock().unwrap().push(on_done);
        }
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.clone()
    }
}

// ── Mock content extractor ─────────────────────────────────────────

/// What the mock extractor finds on every page.
pub enum MockPage {
    /// Extraction succeeds with this text and language tag.
    Content { text: String, language: String },
    /// The page has no readable main text.
    NoContent,
    /// The extraction machinery itself falls over.
    Broken,
}

/// A content extractor that returns the same canned page for every tab.
pub struct MockExtractor {
    page: MockPage,
}

impl MockExtractor {
    pub fn page(text: &str, language: &str) -> Self {
        Self {
            page: MockPage::Content {
                text: text.to_string(),
                language: language.to_string(),
            },
        }
    }

    pub fn no_content() -> Self {
        Self {
            page: MockPage::NoContent,
        }
    }

    pub fn broken() -> Self {
        Self {
            page: MockPage::Broken,
        }
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract(&self, _tab: TabId) -> Result<ExtractedContent, ExtractError> {
        match &self.page {
            MockPage::Content { text, language } => Ok(ExtractedContent {
                text: text.clone(),
                language: language.clone(),
            }),
            MockPage::NoContent => Err(ExtractError::NoReadableContent),
            MockPage::Broken => Err(ExtractError::Backend(anyhow::anyhow!(
                "content script unreachable"
            ))),
        }
    }
}

// ── Event helpers ──────────────────────────────────────────────────

/// Drain all events currently sitting in the receiver.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<ReaderEvent>) -> Vec<ReaderEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Await events until `pred` matches one, panicking after two seconds.
pub async fn wait_for_event<F>(
    rx: &mut mpsc::UnboundedReceiver<ReaderEvent>,
    mut pred: F,
) -> ReaderEvent
where
    F: FnMut(&ReaderEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for reader event")
}
