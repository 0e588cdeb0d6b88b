use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

use super::inference::InferenceAdapter;
use crate::audio::{AudioFrame, RingBuffer};

/// Upper bound on one queue wait, so the stop flag stays observable.
const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessorState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Consumer half of the capture pipeline: drains the frame queue into the
/// ring buffer and triggers an inference window every stride's worth of
/// new audio.
///
/// Owns the ring buffer outright — single writer and single reader on one
/// task, so the buffer needs no locking.
pub struct StreamProcessor {
    frames: mpsc::Receiver<AudioFrame>,
    ring: RingBuffer,
    adapter: InferenceAdapter,
    stop: Arc<AtomicBool>,
    stride_samples: usize,
    state: ProcessorState,
}

impl StreamProcessor {
    pub fn new(
        frames: mpsc::Receiver<AudioFrame>,
        ring: RingBuffer,
        adapter: InferenceAdapter,
        stop: Arc<AtomicBool>,
        stride_samples: usize,
    ) -> Self {
        Self {
            frames,
            ring,
            adapter,
            stop,
            stride_samples,
            state: ProcessorState::Idle,
        }
    }

    /// Run until the stop flag is raised or every producer hangs up, then
    /// drain residual frames in a single final pass.
    pub async fn run(mut self) {
        self.state = ProcessorState::Running;
        debug!("stream processor entering {:?}", self.state);

        // New samples accumulated since the last inference trigger.
        let mut stride_filled = 0usize;

        while !self.stop.load(Ordering::SeqCst) {
            match timeout(QUEUE_POLL_INTERVAL, self.frames.recv()).await {
                Ok(Some(frame)) => {
                    self.ring.write(&frame.samples);
                    stride_filled += frame.samples.len();
                    if stride_filled >= self.stride_samples {
                        self.adapter.run(&self.ring).await;
                        stride_filled = 0;
                    }
                }
                Ok(None) => break, // all producers gone
                Err(_) => {}       // timeout; recheck the stop flag
            }
        }

        self.state = ProcessorState::Draining;
        debug!("stream processor entering {:?}", self.state);

        let mut drained = 0usize;
        while let Ok(frame) = self.frames.try_recv() {
            self.ring.write(&frame.samples);
            drained += frame.samples.len();
        }
        if drained > 0 || stride_filled > 0 {
            // At most one trigger for whatever audio the stop cut off.
            self.adapter.run(&self.ring).await;
        }

        self.state = ProcessorState::Stopped;
        info!(
            "stream processor {:?} after {} samples",
            self.state,
            self.ring.total_written()
        );
    }
}
