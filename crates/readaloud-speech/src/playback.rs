//! Playback session state machine.
//!
//! One [`PlaybackJob`] drives the external speech engine through a sequence
//! of speakable units. Engine callbacks never touch the job directly: each
//! utterance is issued with a callback that forwards the terminal outcome,
//! tagged with the generation and unit index it was issued under, as an
//! [`EngineSignal`] over a channel. The owner feeds signals back in through
//! [`PlaybackJob::handle_signal`] one at a time, so transitions never
//! interleave.
//!
//! The generation counter is the sole staleness mechanism: every begin and
//! every stop bumps it, and a signal whose generation does not match the
//! live one belongs to a superseded session and is discarded unprocessed.
//! That guard is what keeps a late callback from a killed utterance from
//! advancing or corrupting a newer session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use readaloud_core::TabId;
use readaloud_core::ports::engine::{SpeakOptions, SpeechEngine, UtteranceOutcome};

use crate::error::ReadError;

// ── Session state ──────────────────────────────────────────────────

/// Current state of the playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// No session. Initial state, and the state after every stop,
    /// completion, or preemption.
    Idle,
    /// The engine has the current unit in flight.
    Speaking,
    /// Speaking is suspended; the engine holds its position in the unit.
    Paused,
}

// ── Engine signals ─────────────────────────────────────────────────

/// Terminal outcome of one utterance, routed back to the state machine.
#[derive(Debug, Clone, Copy)]
pub struct EngineSignal {
    /// Generation the utterance was issued under.
    pub generation: u64,
    /// Index of the unit the utterance carried.
    pub unit_index: usize,
    /// What the engine says happened to it.
    pub outcome: UtteranceOutcome,
}

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the playback session to observers.
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// A reading session began.
    Started {
        /// Tab being read.
        tab: TabId,
        /// Language tag resolved for the session; may be empty.
        language: String,
        /// Voice handed to the engine; `None` means the engine default.
        voice: Option<String>,
        /// Number of units in the session.
        total: usize,
    },

    /// Session state changed.
    StateChanged(JobState),

    /// A unit was handed to the engine.
    Progress {
        /// 0-based index of the unit now in flight.
        index: usize,
        /// Number of units in the session.
        total: usize,
    },

    /// The engine could not speak a unit; the session skipped past it.
    UnitSkipped {
        /// Index of the abandoned unit.
        index: usize,
    },

    /// The session reached the end of its unit sequence.
    Finished,
}

// ── Progress snapshot ──────────────────────────────────────────────

/// Point-in-time view of the session, for polling consumers.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    /// Whether a session is live (speaking or paused).
    pub speaking: bool,
    /// Whether the live session is paused.
    pub paused: bool,
    /// Tab the session reads from, if any.
    pub tab: Option<TabId>,
    /// Number of units in the session; 0 when idle.
    pub total: usize,
    /// 0-based index of the unit currently in flight.
    pub current_index: usize,
    /// Text of the unit currently in flight; empty when idle.
    pub current_unit: String,
}

// ── Playback job ───────────────────────────────────────────────────

/// The single mutable reading session.
///
/// All methods take `&mut self`; the owner serialises access (commands and
/// signal processing alike) behind one lock, so a transition always sees
/// the state the previous one left behind.
pub struct PlaybackJob {
    /// Current state.
    state: JobState,

    /// Ordered speakable units; empty while idle.
    units: Vec<String>,

    /// Index of the unit currently in flight.
    current: usize,

    /// Language tag resolved for this session; may be empty.
    language: String,

    /// Voice handed to the engine; `None` means the engine default.
    voice: Option<String>,

    /// Playback rate multiplier.
    rate: f32,

    /// Tab the session reads from.
    tab: Option<TabId>,

    /// Bumped on every begin and every stop. Utterances carry the value
    /// they were issued under; see the module docs.
    generation: u64,

    /// The external speech engine.
    engine: Arc<dyn SpeechEngine>,

    /// Observer event channel.
    event_tx: mpsc::UnboundedSender<ReaderEvent>,

    /// Where utterance callbacks deliver their signals.
    signal_tx: mpsc::UnboundedSender<EngineSignal>,
}

impl PlaybackJob {
    /// Create an idle job.
    ///
    /// Utterance callbacks send their [`EngineSignal`]s through `signal_tx`;
    /// the caller owns the receiving end and feeds each signal back in via
    /// [`handle_signal`](Self::handle_signal). Returns the job and the
    /// receiver for its [`ReaderEvent`]s.
    #[must_use]
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        signal_tx: mpsc::UnboundedSender<EngineSignal>,
    ) -> (Self, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let job = Self {
            state: JobState::Idle,
            units: Vec::new(),
            current: 0,
            language: String::new(),
            voice: None,
            rate: 1.0,
            tab: None,
            generation: 0,
            engine,
            event_tx,
            signal_tx,
        };
        (job, event_rx)
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Generation the session is currently on.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Snapshot the session for progress display. No side effects.
    #[must_use]
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            speaking: self.state != JobState::Idle,
            paused: self.state == JobState::Paused,
            tab: self.tab,
            total: self.units.len(),
            current_index: self.current,
            current_unit: self.units.get(self.current).cloned().unwrap_or_default(),
        }
    }

    // ── Session lifecycle ──────────────────────────────────────────

    /// Begin a new session over `units`, preempting whatever was live.
    ///
    /// Bumps the generation, so an utterance issued by any earlier session
    /// can never be mistaken for one of this session's.
    pub fn begin(
        &mut self,
        tab: TabId,
        units: Vec<String>,
        language: String,
        voice: Option<String>,
        rate: f32,
    ) {
        debug_assert!(!units.is_empty(), "callers screen out empty segmentations");

        self.generation += 1;
        self.units = units;
        self.current = 0;
        self.language = language;
        self.voice = voice;
        self.rate = rate;
        self.tab = Some(tab);

        tracing::info!(
            tab = %tab,
            units = self.units.len(),
            language = %self.language,
            voice = self.voice.as_deref().unwrap_or("engine default"),
            rate = self.rate,
            "Reading session started"
        );

        self.emit(ReaderEvent::Started {
            tab,
            language: self.language.clone(),
            voice: self.voice.clone(),
            total: self.units.len(),
        });
        self.set_state(JobState::Speaking);
        self.speak_current();
    }

    /// Stop the session and reset to the empty idle form.
    ///
    /// Legal in every state; stopping while idle is a no-op apart from the
    /// generation bump, which invalidates anything still in flight.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.engine.stop();

        if self.state != JobState::Idle {
            tracing::info!(
                index = self.current,
                total = self.units.len(),
                "Reading session stopped"
            );
        }
        self.reset();
    }

    /// Pause the in-flight utterance. Legal only while speaking.
    pub fn pause(&mut self) -> Result<(), ReadError> {
        match self.state {
            JobState::Speaking => {
                self.engine.pause();
                self.set_state(JobState::Paused);
                Ok(())
            }
            JobState::Paused => Err(ReadError::AlreadyPaused),
            JobState::Idle => Err(ReadError::NotReading),
        }
    }

    /// Resume a paused utterance. Legal only while paused.
    pub fn resume(&mut self) -> Result<(), ReadError> {
        match self.state {
            JobState::Paused => {
                self.engine.resume();
                self.set_state(JobState::Speaking);
                Ok(())
            }
            JobState::Speaking => Err(ReadError::NotPaused),
            JobState::Idle => Err(ReadError::NotReading),
        }
    }

    /// Pause if speaking, resume if paused. Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> Result<bool, ReadError> {
        match self.state {
            JobState::Speaking => {
                self.pause()?;
                Ok(true)
            }
            JobState::Paused => {
                self.resume()?;
                Ok(false)
            }
            JobState::Idle => Err(ReadError::NotReading),
        }
    }

    /// Change the playback rate.
    ///
    /// The engine cannot change rate mid-utterance, so a live session is
    /// stopped outright; the caller starts a fresh session to hear the new
    /// rate. There is deliberately no automatic restart.
    pub fn set_rate(&mut self, rate: f32) -> Result<(), ReadError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ReadError::InvalidRate(rate));
        }
        if self.state != JobState::Idle {
            tracing::info!(rate, "Rate changed mid-session, stopping playback");
            self.stop();
        }
        self.rate = rate;
        Ok(())
    }

    // ── Engine signal processing ───────────────────────────────────

    /// Apply one terminal utterance signal to the session.
    ///
    /// A generation mismatch identifies a callback from a superseded or
    /// stopped session; it is dropped without touching any state. Signals
    /// that match the live generation but not the in-flight unit (an engine
    /// double-report) are ignored the same way.
    pub fn handle_signal(&mut self, signal: EngineSignal) {
        if signal.generation != self.generation {
            tracing::debug!(
                stale = signal.generation,
                live = self.generation,
                outcome = ?signal.outcome,
                "Discarding stale engine signal"
            );
            return;
        }
        if self.state == JobState::Idle {
            tracing::debug!(outcome = ?signal.outcome, "Engine signal while idle ignored");
            return;
        }
        if signal.unit_index != self.current {
            tracing::debug!(
                signalled = signal.unit_index,
                current = self.current,
                "Engine signal for a unit not in flight ignored"
            );
            return;
        }

        match signal.outcome {
            UtteranceOutcome::Completed => self.advance(),
            UtteranceOutcome::Failed => {
                tracing::warn!(index = self.current, "Engine failed a unit, skipping it");
                self.emit(ReaderEvent::UnitSkipped { index: self.current });
                self.advance();
            }
            // No stop was requested (that would have bumped the generation),
            // so the engine lost the utterance on its own. Restart the same
            // unit rather than the next one.
            UtteranceOutcome::Interrupted => self.speak_current(),
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Move past the in-flight unit: issue the next one, or finish.
    fn advance(&mut self) {
        self.current += 1;
        if self.current < self.units.len() {
            self.speak_current();
        } else {
            tracing::info!(units = self.units.len(), "Reading session finished");
            self.emit(ReaderEvent::Finished);
            self.reset();
        }
    }

    /// Hand the current unit to the engine.
    ///
    /// The callback captures the generation and index at issue time, so the
    /// signal it eventually sends identifies exactly which utterance ended.
    fn speak_current(&mut self) {
        let index = self.current;
        let Some(text) = self.units.get(index) else {
            return;
        };

        let options = SpeakOptions {
            rate: self.rate,
            voice: self.voice.clone(),
            language: (!self.language.is_empty()).then(|| self.language.clone()),
        };

        let generation = self.generation;
        let signal_tx = self.signal_tx.clone();
        self.engine.speak(
            text,
            &options,
            Box::new(move |outcome| {
                // The receiver disappears when the owner shuts down; a
                // signal with nowhere to go is already moot.
                let _ = signal_tx.send(EngineSignal {
                    generation,
                    unit_index: index,
                    outcome,
                });
            }),
        );

        tracing::debug!(
            index,
            total = self.units.len(),
            chars = text.chars().count(),
            "Unit handed to engine"
        );
        self.emit(ReaderEvent::Progress {
            index,
            total: self.units.len(),
        });
    }

    /// Clear session data and return to idle. The generation survives
    /// resets; only begin and stop move it.
    fn reset(&mut self) {
        self.units.clear();
        self.current = 0;
        self.language.clear();
        self.voice = None;
        self.rate = 1.0;
        self.tab = None;
        self.set_state(JobState::Idle);
    }

    /// Transition to a new state, emitting an event on actual change.
    fn set_state(&mut self, new_state: JobState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Session state transition");
            self.state = new_state;
            self.emit(ReaderEvent::StateChanged(new_state));
        }
    }

    /// Emit an event (best-effort; if the receiver is gone, log and move on).
    fn emit(&self, event: ReaderEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Reader event receiver dropped");
        }
    }
}

impl Drop for PlaybackJob {
    fn drop(&mut self) {
        // Silence the engine if the owner goes away mid-session.
        self.stop();
    }
}
