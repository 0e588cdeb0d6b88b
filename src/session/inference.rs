use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use super::config::{OverlapPolicy, RealtimeConfig};
use super::state::{Segment, SessionState};
use super::stats::SessionCounters;
use super::SessionEvent;
use crate::audio::{RingBuffer, SilenceGate};
use crate::engine::{SpeechEngine, TranscribeOptions};

/// Bridges the ring buffer to the recognition engine: pulls the trailing
/// window, gates on silence, rebases returned timestamps onto the session
/// timeline, and books the results into [`SessionState`].
pub struct InferenceAdapter {
    engine: Arc<dyn SpeechEngine>,
    state: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
    counters: Arc<SessionCounters>,
    gate: SilenceGate,
    options: TranscribeOptions,
    chunk_samples: usize,
    chunk_secs: f64,
    sample_rate: u32,
    overlap_policy: OverlapPolicy,
}

impl InferenceAdapter {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        state: Arc<Mutex<SessionState>>,
        events: broadcast::Sender<SessionEvent>,
        counters: Arc<SessionCounters>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            engine,
            state,
            events,
            counters,
            gate: SilenceGate::new(config.silence_threshold),
            options: TranscribeOptions {
                language: config.language_hint(),
                fast: true,
            },
            chunk_samples: config.chunk_samples(),
            chunk_secs: config.chunk_duration_secs as f64,
            sample_rate: config.sample_rate,
            overlap_policy: config.overlap_policy,
        }
    }

    /// One inference pass over the current trailing window.
    ///
    /// Engine failures terminate this attempt only; the processor loop
    /// carries on with the next stride.
    pub async fn run(&self, ring: &RingBuffer) {
        let window = ring.read_last(self.chunk_samples);
        if self.gate.is_silent(&window) {
            debug!("window below silence threshold, skipping inference");
            return;
        }

        self.counters.window_transcribed();
        let output = match self.engine.transcribe(&window, &self.options).await {
            Ok(output) => output,
            Err(e) => {
                warn!("inference failed, dropping this window: {:#}", e);
                return;
            }
        };

        // Engine timestamps are window-relative; the window ends at the
        // ring's total-written position on the session timeline. Early in
        // a session the window start is negative (zero-filled lead-in).
        let window_start =
            ring.total_written() as f64 / self.sample_rate as f64 - self.chunk_secs;
        let segments: Vec<Segment> = output
            .segments
            .into_iter()
            .map(|s| Segment {
                start: (window_start + s.start).max(0.0),
                end: (window_start + s.end).max(0.0),
                text: s.text,
            })
            .collect();

        let mut state = self.state.lock().await;
        state.note_language(output.language);
        let new_text = state.append_segments(segments, self.overlap_policy);
        drop(state);

        if !new_text.is_empty() {
            let _ = self.events.send(SessionEvent::Text(new_text));
        }
    }
}
