use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::config::RealtimeConfig;
use super::inference::InferenceAdapter;
use super::processor::StreamProcessor;
use super::state::{SessionState, Transcript};
use super::stats::{SessionCounters, SessionStats};
use super::SessionEvent;
use crate::audio::{CaptureSink, CaptureSource, MicrophoneSource, RecordingLog, RingBuffer};
use crate::engine::SpeechEngine;

/// How long `stop()` waits for the processor before abandoning it.
const PROCESSOR_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("audio device error: {0:#}")]
    Device(anyhow::Error),

    #[error("export failed: {0:#}")]
    Export(anyhow::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Orchestrates one live transcription session: capture source, stream
/// processor, accumulated state, and the full-session recording. The only
/// object the surrounding application needs to hold.
pub struct RealtimeSession {
    config: RealtimeConfig,
    capture: Box<dyn CaptureSource>,
    engine: Arc<dyn SpeechEngine>,
    status: Arc<RwLock<SessionStatus>>,
    state: Arc<Mutex<SessionState>>,
    recording: Arc<RecordingLog>,
    counters: Arc<SessionCounters>,
    events: broadcast::Sender<SessionEvent>,
    stop: Arc<AtomicBool>,
    processor: Option<JoinHandle<()>>,
    started_at: Option<DateTime<Utc>>,
}

impl RealtimeSession {
    /// Build a session around an injected capture source and engine.
    /// Nothing is opened until [`start`](Self::start).
    pub fn new(
        config: RealtimeConfig,
        capture: Box<dyn CaptureSource>,
        engine: Arc<dyn SpeechEngine>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            capture,
            engine,
            status: Arc::new(RwLock::new(SessionStatus::Idle)),
            state: Arc::new(Mutex::new(SessionState::default())),
            recording: Arc::new(RecordingLog::new()),
            counters: Arc::new(SessionCounters::default()),
            events,
            stop: Arc::new(AtomicBool::new(false)),
            processor: None,
            started_at: None,
        }
    }

    /// Convenience constructor capturing from the configured microphone.
    pub fn with_microphone(config: RealtimeConfig, engine: Arc<dyn SpeechEngine>) -> Self {
        let capture = Box::new(MicrophoneSource::new(config.device_index, config.block_size));
        Self::new(config, capture, engine)
    }

    /// Open the capture source and spawn the processor.
    ///
    /// A no-op when already active. On device failure the session reverts
    /// cleanly to `Idle` and the error is returned — never a
    /// half-initialized session.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        {
            let status = self.status.read().await;
            if *status != SessionStatus::Idle {
                info!("session already active, ignoring start");
                return Ok(());
            }
        }

        self.config
            .validate()
            .map_err(SessionError::InvalidConfig)?;

        *self.status.write().await = SessionStatus::Starting;

        // Fresh run state. The previous run's results are discarded here
        // rather than at stop, so they stay queryable in between.
        self.state.lock().await.reset();
        self.recording.clear();
        self.counters.reset();
        self.stop.store(false, Ordering::SeqCst);

        let (frame_tx, frame_rx) = mpsc::channel(self.config.queue_capacity);
        let sink = CaptureSink::new(
            frame_tx,
            self.events.clone(),
            Arc::clone(&self.recording),
            Arc::clone(&self.counters),
            self.config.sample_rate,
        );

        if let Err(e) = self.capture.open(sink) {
            *self.status.write().await = SessionStatus::Idle;
            return Err(SessionError::Device(e));
        }

        let ring = RingBuffer::new(self.config.buffer_samples());
        let adapter = InferenceAdapter::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.state),
            self.events.clone(),
            Arc::clone(&self.counters),
            &self.config,
        );
        let processor = StreamProcessor::new(
            frame_rx,
            ring,
            adapter,
            Arc::clone(&self.stop),
            self.config.stride_samples(),
        );
        self.processor = Some(tokio::spawn(processor.run()));
        self.started_at = Some(Utc::now());

        *self.status.write().await = SessionStatus::Active;
        info!(
            "session '{}' started ({}, {} Hz)",
            self.config.session_id,
            self.capture.name(),
            self.config.sample_rate
        );
        Ok(())
    }

    /// Stop capture and wait for the processor to finish its drain pass.
    ///
    /// Idempotent. On return the device stream is closed and the
    /// processor has terminated (or been abandoned after a bounded wait,
    /// with a logged warning).
    pub async fn stop(&mut self) {
        {
            let status = self.status.read().await;
            if *status == SessionStatus::Idle {
                return;
            }
        }
        *self.status.write().await = SessionStatus::Stopping;

        self.stop.store(true, Ordering::SeqCst);
        self.capture.close();

        if let Some(handle) = self.processor.take() {
            match tokio::time::timeout(PROCESSOR_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("stream processor panicked: {}", e),
                Err(_) => warn!(
                    "stream processor did not stop within {:?}, abandoning it",
                    PROCESSOR_JOIN_TIMEOUT
                ),
            }
        }

        *self.status.write().await = SessionStatus::Idle;
        info!("session '{}' stopped", self.config.session_id);
    }

    pub async fn status(&self) -> SessionStatus {
        *self.status.read().await
    }

    /// Subscribe to text and level events. Events are delivered on
    /// background threads/tasks; UI callers re-dispatch onto their own
    /// event loop.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Everything recognized so far, joined in arrival order.
    pub async fn transcript(&self) -> Transcript {
        self.state.lock().await.transcript(&self.config.language)
    }

    pub async fn detected_language(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .detected_language()
            .map(str::to_string)
    }

    pub async fn stats(&self) -> SessionStats {
        let segment_count = self.state.lock().await.segments().len();
        let is_active = *self.status.read().await == SessionStatus::Active;
        let duration_secs = self
            .started_at
            .map(|t| {
                Utc::now()
                    .signed_duration_since(t)
                    .num_milliseconds() as f64
                    / 1000.0
            })
            .unwrap_or(0.0);

        SessionStats {
            is_active,
            started_at: self.started_at,
            duration_secs,
            frames_captured: self.counters.frames_captured(),
            frames_dropped: self.counters.frames_dropped(),
            windows_transcribed: self.counters.windows_transcribed(),
            segment_count,
        }
    }

    /// Write the full-session recording as a mono 16-bit PCM WAV.
    /// `Ok(None)` when nothing was recorded.
    pub fn export_wav(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>, SessionError> {
        self.recording
            .export_wav(path.as_ref(), self.config.sample_rate)
            .map_err(SessionError::Export)
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}
