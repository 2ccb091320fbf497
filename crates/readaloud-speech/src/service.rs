//! `ReaderService`: implements the command surface over one playback job.
//!
//! This module is the single place where orchestrator-native types are
//! converted to the transport-agnostic DTOs defined in `readaloud-core`.
//! Nothing outside this file should build a `ProgressDto` by hand.
//!
//! # Locking discipline
//!
//! Every command locks the job for the whole transition. `start_reading`
//! holds the lock across the extraction await on purpose: engine signals
//! queue up in the pump's channel meanwhile, and no other command can
//! interleave with the stop-extract-begin sequence. The language registry
//! has its own std lock, taken only for instantaneous map operations and
//! never held across an await.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::info;

use readaloud_core::TabId;
use readaloud_core::ports::engine::{SpeechEngine, VoiceDescriptor};
use readaloud_core::ports::extractor::{ContentExtractor, ExtractError};
use readaloud_core::ports::reader::{
    PauseStateDto, ProgressDto, ReaderPort, ReaderPortError, ReadingStartedDto,
};
use readaloud_core::ports::tabs::TabLifecycle;

use crate::error::ReadError;
use crate::playback::{EngineSignal, PlaybackJob, ReaderEvent};
use crate::registry::TabLanguageRegistry;
use crate::segment;
use crate::voices;

// ── Service ────────────────────────────────────────────────────────

/// Implements [`ReaderPort`] and [`TabLifecycle`] over one [`PlaybackJob`].
pub struct ReaderService {
    /// The single mutable session, shared with the signal pump.
    job: Arc<Mutex<PlaybackJob>>,
    /// Last-detected page language per tab.
    registry: TabLanguageRegistry,
    /// Pulls readable text out of a tab; invoked once per start.
    extractor: Arc<dyn ContentExtractor>,
    /// The platform speech engine (the job holds its own handle too).
    engine: Arc<dyn SpeechEngine>,
}

impl ReaderService {
    /// Create the service and spawn its engine-signal pump.
    ///
    /// Must be called from within a Tokio runtime. Returns the service and
    /// the receiver for the session's [`ReaderEvent`]s.
    #[must_use]
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        engine: Arc<dyn SpeechEngine>,
    ) -> (Self, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (job, event_rx) = PlaybackJob::new(Arc::clone(&engine), signal_tx);
        let job = Arc::new(Mutex::new(job));

        spawn_signal_pump(signal_rx, Arc::downgrade(&job));

        let service = Self {
            job,
            registry: TabLanguageRegistry::new(),
            extractor,
            engine,
        };
        (service, event_rx)
    }

    /// Resolve the language tag for a new session.
    ///
    /// Extraction's own tag wins; when the extractor could not tell, the
    /// registry's last page-load detection for the tab fills in.
    fn resolve_language(&self, tab: TabId, extracted: &str) -> String {
        if extracted.is_empty() {
            self.registry.lookup(tab)
        } else {
            extracted.to_string()
        }
    }

    /// Resolve the voice for a new session.
    ///
    /// An explicitly named voice is passed through verbatim; the engine
    /// reports its own failure if the name is bogus. Otherwise the best
    /// match for `language` is scored out of the engine's voice list.
    fn resolve_voice(&self, explicit: Option<String>, language: &str) -> Option<String> {
        match explicit {
            Some(name) if !name.is_empty() => Some(name),
            _ => voices::select_voice(language, &self.engine.voices()),
        }
    }
}

// ── Signal pump ────────────────────────────────────────────────────

/// Feed engine signals into the state machine, one at a time.
///
/// The task holds only a `Weak` reference to the job: when the service (the
/// last strong reference) is dropped, the upgrade fails and the task exits.
/// Utterance callbacks that outlive the service then send into a closed
/// channel, which they already treat as moot.
fn spawn_signal_pump(
    mut signal_rx: mpsc::UnboundedReceiver<EngineSignal>,
    job: Weak<Mutex<PlaybackJob>>,
) {
    tokio::spawn(async move {
        while let Some(signal) = signal_rx.recv().await {
            let Some(job) = job.upgrade() else { break };
            job.lock().await.handle_signal(signal);
        }
        tracing::debug!("Engine signal pump exited");
    });
}

// ── Error mapping ──────────────────────────────────────────────────

/// Convert a `ReadError` into its closest `ReaderPortError` equivalent.
///
/// This conversion lives here, in `readaloud-speech`, so that
/// `readaloud-core` never needs to import this crate. The dependency arrow
/// stays one-way.
fn to_port_err(e: ReadError) -> ReaderPortError {
    match e {
        // "Nothing extracted" and "nothing speakable in what was extracted"
        // are the same failure as far as the user is concerned.
        ReadError::NoReadableContent | ReadError::NoReadableSentences => {
            ReaderPortError::NoReadableContent
        }
        ReadError::Extraction(source) => ReaderPortError::Extraction(source.to_string()),
        other => ReaderPortError::InvalidCommand(other.to_string()),
    }
}

/// Lift extractor failures into the session error taxonomy.
fn extract_to_read_err(e: ExtractError) -> ReadError {
    match e {
        ExtractError::NoReadableContent => ReadError::NoReadableContent,
        ExtractError::Backend(source) => ReadError::Extraction(source),
    }
}

// ── ReaderPort implementation ──────────────────────────────────────

#[async_trait]
impl ReaderPort for ReaderService {
    async fn start_reading(
        &self,
        tab: TabId,
        rate: f32,
        voice: Option<String>,
    ) -> Result<ReadingStartedDto, ReaderPortError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(to_port_err(ReadError::InvalidRate(rate)));
        }

        let mut job = self.job.lock().await;

        // Preempt before extracting: the old session goes silent now, and
        // its outstanding callbacks are stale even if extraction fails.
        job.stop();

        let content = self
            .extractor
            .extract(tab)
            .await
            .map_err(|e| to_port_err(extract_to_read_err(e)))?;

        let units = segment::segment(&content.text);
        if units.is_empty() {
            return Err(to_port_err(ReadError::NoReadableSentences));
        }

        let language = self.resolve_language(tab, &content.language);
        let chosen = self.resolve_voice(voice, &language);
        job.begin(tab, units, language.clone(), chosen.clone(), rate);

        info!(tab = %tab, "Start command served");
        Ok(ReadingStartedDto {
            language_tag: language,
            voice_used: chosen.unwrap_or_default(),
        })
    }

    async fn stop_reading(&self) -> Result<(), ReaderPortError> {
        self.job.lock().await.stop();
        info!("Stop command served");
        Ok(())
    }

    async fn pause(&self) -> Result<(), ReaderPortError> {
        self.job.lock().await.pause().map_err(to_port_err)
    }

    async fn resume(&self) -> Result<(), ReaderPortError> {
        self.job.lock().await.resume().map_err(to_port_err)
    }

    async fn toggle_pause(&self) -> Result<PauseStateDto, ReaderPortError> {
        let paused = self.job.lock().await.toggle_pause().map_err(to_port_err)?;
        Ok(PauseStateDto { paused })
    }

    async fn set_rate(&self, rate: f32) -> Result<(), ReaderPortError> {
        self.job.lock().await.set_rate(rate).map_err(to_port_err)
    }

    async fn progress(&self) -> ProgressDto {
        let snapshot = self.job.lock().await.snapshot();
        ProgressDto {
            speaking: snapshot.speaking,
            paused: snapshot.paused,
            tab_id: snapshot.tab,
            total: snapshot.total,
            current_index: snapshot.current_index,
            current_unit_text: snapshot.current_unit,
        }
    }

    async fn detected_language(&self, tab: TabId) -> String {
        self.registry.lookup(tab)
    }

    async fn voices(&self) -> Vec<VoiceDescriptor> {
        voices::sorted(self.engine.voices())
    }
}

// ── TabLifecycle implementation ────────────────────────────────────

impl TabLifecycle for ReaderService {
    fn page_loaded(&self, tab: TabId, language: &str) {
        tracing::debug!(tab = %tab, language, "Page load recorded");
        self.registry.record(tab, language);
    }

    fn tab_closed(&self, tab: TabId) {
        tracing::debug!(tab = %tab, "Tab closed, language entry dropped");
        self.registry.forget(tab);
    }
}
