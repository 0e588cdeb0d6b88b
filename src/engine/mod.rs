//! Recognition-engine boundary.
//!
//! The engine is an external collaborator: injected into the session as a
//! trait object so tests (and hosts with their own model management) can
//! substitute implementations without global state.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Knobs passed with every window.
#[derive(Debug, Clone, Default)]
pub struct TranscribeOptions {
    /// ISO 639-1 language hint; `None` asks the engine to detect.
    pub language: Option<String>,
    /// Prefer latency over accuracy (greedy decoding, aggressive VAD).
    /// Always set on the realtime path.
    pub fast: bool,
}

/// One timestamped span of recognized text, offsets in seconds relative
/// to the start of the submitted window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TranscribeOutput {
    pub segments: Vec<EngineSegment>,
    /// Language the engine detected for this window, if any.
    pub language: Option<String>,
}

/// A speech-recognition engine. Must be safe to call repeatedly and from
/// background tasks.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Transcribe one window of mono samples in [-1, 1] at the session
    /// sample rate.
    async fn transcribe(
        &self,
        window: &[f32],
        options: &TranscribeOptions,
    ) -> Result<TranscribeOutput>;

    fn name(&self) -> &str {
        "speech engine"
    }
}

/// Engine that recognizes nothing. Lets capture, level metering, and WAV
/// export run without a model loaded.
pub struct NullEngine;

#[async_trait]
impl SpeechEngine for NullEngine {
    async fn transcribe(
        &self,
        _window: &[f32],
        _options: &TranscribeOptions,
    ) -> Result<TranscribeOutput> {
        Ok(TranscribeOutput::default())
    }

    fn name(&self) -> &str {
        "null"
    }
}
