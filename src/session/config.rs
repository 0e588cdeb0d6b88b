use serde::{Deserialize, Serialize};

use crate::audio::SilenceGate;

/// What to do with sub-segments that re-transcribe audio already covered
/// by a previous window (consecutive windows overlap by
/// `chunk_duration - stride` seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Keep only sub-segments that extend past previously appended audio.
    #[default]
    DropOverlap,
    /// Append every returned sub-segment, duplicated overlap included.
    Append,
}

/// Tuning knobs for a realtime session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Session identifier (e.g. "session-2026-08-05-standup").
    pub session_id: String,

    /// Capture and inference sample rate in Hz.
    pub sample_rate: u32,

    /// Seconds of recent audio retained in the ring buffer.
    pub buffer_duration_secs: u32,

    /// Seconds of trailing audio submitted per inference window.
    pub chunk_duration_secs: u32,

    /// Seconds of new audio required before the next window is submitted.
    /// Controls the engine call rate independently of device buffering.
    pub stride_secs: u32,

    /// RMS threshold below which a window skips the engine.
    pub silence_threshold: f32,

    /// "auto" for engine detection, or an ISO 639-1 code to pin.
    pub language: String,

    /// Device callback block size in samples.
    pub block_size: u32,

    /// Frame queue capacity between capture and processing, in blocks.
    /// When inference lags this far behind, the newest blocks are dropped
    /// from live transcription (the recording log is unaffected).
    pub queue_capacity: usize,

    /// Input device index; `None` uses the platform default.
    pub device_index: Option<usize>,

    pub overlap_policy: OverlapPolicy,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            sample_rate: 16000,
            buffer_duration_secs: 30,
            chunk_duration_secs: 5,
            stride_secs: 1,
            silence_threshold: SilenceGate::DEFAULT_THRESHOLD,
            language: "auto".to_string(),
            block_size: 4096,
            queue_capacity: 256,
            device_index: None,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl RealtimeConfig {
    pub fn buffer_samples(&self) -> usize {
        (self.sample_rate * self.buffer_duration_secs) as usize
    }

    pub fn chunk_samples(&self) -> usize {
        (self.sample_rate * self.chunk_duration_secs) as usize
    }

    pub fn stride_samples(&self) -> usize {
        (self.sample_rate * self.stride_secs) as usize
    }

    /// Language hint for the engine; "auto" means none.
    pub fn language_hint(&self) -> Option<String> {
        if self.language == "auto" {
            None
        } else {
            Some(self.language.clone())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample_rate must be non-zero".to_string());
        }
        if self.buffer_duration_secs == 0 {
            return Err("buffer_duration_secs must be non-zero".to_string());
        }
        if self.chunk_duration_secs == 0 {
            return Err("chunk_duration_secs must be non-zero".to_string());
        }
        if self.stride_secs == 0 {
            return Err("stride_secs must be non-zero".to_string());
        }
        if self.stride_secs > self.chunk_duration_secs {
            return Err(format!(
                "stride_secs ({}) must not exceed chunk_duration_secs ({})",
                self.stride_secs, self.chunk_duration_secs
            ));
        }
        if self.chunk_duration_secs > self.buffer_duration_secs {
            return Err(format!(
                "chunk_duration_secs ({}) must not exceed buffer_duration_secs ({})",
                self.chunk_duration_secs, self.buffer_duration_secs
            ));
        }
        if self.silence_threshold < 0.0 {
            return Err("silence_threshold must not be negative".to_string());
        }
        if self.block_size == 0 {
            return Err("block_size must be non-zero".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be non-zero".to_string());
        }
        Ok(())
    }
}
