//! Capture-side types: audio frames, the per-block callback work, and the
//! producer interface implemented by real and synthetic sources.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use super::gate::rms;
use super::recording::RecordingLog;
use crate::session::{SessionCounters, SessionEvent};

/// RMS treated as full scale when normalizing the level meter; a typical
/// speaking level pins the meter at 1.0.
pub const LEVEL_FULL_SCALE_RMS: f32 = 0.15;

/// One block of mono samples, amplitude in [-1, 1], produced once per
/// device callback and consumed exactly once by the stream processor.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Everything the device callback needs, bundled so implementations of
/// [`CaptureSource`] share one non-blocking ingest path.
#[derive(Clone)]
pub struct CaptureSink {
    frames: mpsc::Sender<AudioFrame>,
    events: broadcast::Sender<SessionEvent>,
    recording: Arc<RecordingLog>,
    counters: Arc<SessionCounters>,
    sample_rate: u32,
}

impl CaptureSink {
    pub fn new(
        frames: mpsc::Sender<AudioFrame>,
        events: broadcast::Sender<SessionEvent>,
        recording: Arc<RecordingLog>,
        counters: Arc<SessionCounters>,
        sample_rate: u32,
    ) -> Self {
        Self {
            frames,
            events,
            recording,
            counters,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Accept one block from the device callback thread.
    ///
    /// Runs on the audio subsystem's real-time thread: never blocks and
    /// never lets an error escape (an escaped panic there can silently
    /// kill the stream). The three duties per block: report a normalized
    /// level, enqueue the frame for the processor, append to the
    /// full-session recording log.
    pub fn ingest(&self, block: &[f32]) {
        if block.is_empty() {
            return;
        }

        let level = (rms(block) / LEVEL_FULL_SCALE_RMS).min(1.0);
        // No subscribers is fine; the send only fails then.
        let _ = self.events.send(SessionEvent::Level(level));

        let frame = AudioFrame {
            samples: block.to_vec(),
            sample_rate: self.sample_rate,
        };
        self.recording.push(frame.clone());
        self.counters.frame_captured();

        match self.frames.try_send(frame) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                // Inference is lagging behind capture. Drop the newest
                // frame rather than grow without bound; the recording log
                // above already kept it, so only live transcription loses
                // this block.
                self.counters.frame_dropped();
                warn!(
                    "frame queue full, dropping block ({} samples)",
                    block.len()
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("frame arrived after processor exit, ignoring");
            }
        }
    }
}

/// Minimal producer interface over the audio-device input stream.
///
/// The device callback runs on a thread outside this crate's control, so
/// the surface is just open/close: `open` wires the callback to `sink`
/// and must report device failures synchronously; `close` tears the
/// stream down before returning. Tests substitute a synthetic producer.
pub trait CaptureSource: Send {
    fn open(&mut self, sink: CaptureSink) -> Result<()>;
    fn close(&mut self);
    fn is_capturing(&self) -> bool;
    fn name(&self) -> &str;
}
