//! Scripted capture source for tests and offline runs.

use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use super::capture::{AudioFrame, CaptureSink, CaptureSource};

/// Capture source that plays a prepared frame sequence through the sink
/// from its own thread, then hangs up. No hardware involved, which is the
/// point: the whole pipeline downstream of the device callback can be
/// exercised deterministically.
pub struct SyntheticSource {
    frames: Vec<AudioFrame>,
    pacing: Option<Duration>,
    worker: Option<JoinHandle<()>>,
}

impl SyntheticSource {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            pacing: None,
            worker: None,
        }
    }

    /// Like [`new`](Self::new), but sleeps `interval` between blocks to
    /// mimic a real-time device.
    pub fn paced(frames: Vec<AudioFrame>, interval: Duration) -> Self {
        Self {
            frames,
            pacing: Some(interval),
            worker: None,
        }
    }

    /// Build all-zero frames totaling `total_samples`, split into blocks
    /// of `block_size` (last block partial).
    pub fn silence_frames(
        total_samples: usize,
        block_size: usize,
        sample_rate: u32,
    ) -> Vec<AudioFrame> {
        let mut frames = Vec::new();
        let mut remaining = total_samples;
        while remaining > 0 {
            let n = remaining.min(block_size);
            frames.push(AudioFrame {
                samples: vec![0.0; n],
                sample_rate,
            });
            remaining -= n;
        }
        frames
    }

    /// Build a phase-continuous sine tone totaling `total_samples`, split
    /// into blocks of `block_size` (last block partial).
    pub fn tone_frames(
        freq_hz: f32,
        amplitude: f32,
        total_samples: usize,
        block_size: usize,
        sample_rate: u32,
    ) -> Vec<AudioFrame> {
        let step = 2.0 * std::f32::consts::PI * freq_hz / sample_rate as f32;
        let mut frames = Vec::new();
        let mut produced = 0usize;
        while produced < total_samples {
            let n = (total_samples - produced).min(block_size);
            let samples = (produced..produced + n)
                .map(|i| amplitude * (step * i as f32).sin())
                .collect();
            frames.push(AudioFrame {
                samples,
                sample_rate,
            });
            produced += n;
        }
        frames
    }
}

impl CaptureSource for SyntheticSource {
    fn open(&mut self, sink: CaptureSink) -> Result<()> {
        let frames = std::mem::take(&mut self.frames);
        let pacing = self.pacing;

        let handle = std::thread::spawn(move || {
            let count = frames.len();
            for frame in frames {
                sink.ingest(&frame.samples);
                if let Some(interval) = pacing {
                    std::thread::sleep(interval);
                }
            }
            debug!("synthetic source finished after {} blocks", count);
            // Dropping the sink hangs up the frame channel, which the
            // processor treats as end of input.
        });

        self.worker = Some(handle);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    fn is_capturing(&self) -> bool {
        self.worker.is_some()
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_frames_cover_exact_total() {
        let frames = SyntheticSource::silence_frames(10000, 4096, 16000);
        let total: usize = frames.iter().map(|f| f.samples.len()).sum();
        assert_eq!(total, 10000);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].samples.len(), 10000 - 2 * 4096);
    }

    #[test]
    fn tone_frames_are_phase_continuous() {
        let joined: Vec<f32> = SyntheticSource::tone_frames(440.0, 0.5, 8192, 1000, 16000)
            .into_iter()
            .flat_map(|f| f.samples)
            .collect();
        let reference: Vec<f32> = SyntheticSource::tone_frames(440.0, 0.5, 8192, 8192, 16000)
            .into_iter()
            .flat_map(|f| f.samples)
            .collect();
        assert_eq!(joined, reference);
    }
}
