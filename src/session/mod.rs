//! Realtime session orchestration
//!
//! This module provides the `RealtimeSession` abstraction that manages:
//! - Audio capture through a pluggable source
//! - The stream processor (ring buffer + stride-triggered inference)
//! - Transcript accumulation and language detection
//! - Full-session recording and WAV export
//! - Session statistics and lifecycle state

mod config;
mod inference;
mod processor;
mod session;
mod state;
mod stats;

pub use config::{OverlapPolicy, RealtimeConfig};
pub use session::{RealtimeSession, SessionError, SessionStatus};
pub use state::{Segment, SessionState, Transcript};
pub use stats::{SessionCounters, SessionStats};

/// Events a session delivers to subscribers.
///
/// Fired from the processor task (`Text`) and the capture callback thread
/// (`Level`); callers with a UI re-dispatch onto their own thread.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// New transcript text, once per non-silent inference window that
    /// produced it.
    Text(String),
    /// Normalized input level in [0, 1], once per captured block.
    Level(f32),
}
