use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hot-path counters shared between the capture callback thread and the
/// processor task. Relaxed ordering: these are monitoring numbers, not
/// synchronization.
#[derive(Debug, Default)]
pub struct SessionCounters {
    frames_captured: AtomicU64,
    frames_dropped: AtomicU64,
    windows_transcribed: AtomicU64,
}

impl SessionCounters {
    pub fn frame_captured(&self) {
        self.frames_captured.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn window_transcribed(&self) {
        self.windows_transcribed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    pub fn windows_transcribed(&self) -> u64 {
        self.windows_transcribed.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.frames_captured.store(0, Ordering::Relaxed);
        self.frames_dropped.store(0, Ordering::Relaxed);
        self.windows_transcribed.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether capture is currently active.
    pub is_active: bool,

    /// When the current (or last) run started.
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the run started.
    pub duration_secs: f64,

    /// Blocks delivered by the device callback.
    pub frames_captured: u64,

    /// Blocks dropped from live transcription because the queue was full.
    pub frames_dropped: u64,

    /// Inference windows actually submitted to the engine.
    pub windows_transcribed: u64,

    /// Transcript segments accumulated so far.
    pub segment_count: usize,
}
