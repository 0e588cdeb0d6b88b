//! Full-session recording log and WAV export.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;

use super::capture::AudioFrame;

/// Append-only log of every captured frame, kept for the whole session so
/// the raw recording can be exported after the fact.
///
/// Pushed from the capture callback thread, drained only at export; grows
/// with session length by design.
#[derive(Debug, Default)]
pub struct RecordingLog {
    frames: Mutex<Vec<AudioFrame>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, frame: AudioFrame) {
        self.frames.lock().unwrap().push(frame);
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().unwrap().is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.samples.len())
            .sum()
    }

    /// Write the whole log as a mono 16-bit PCM WAV at `sample_rate`.
    ///
    /// Returns `Ok(None)` when nothing was recorded. The lock is held for
    /// the duration of the write; exports normally happen after capture
    /// has stopped.
    pub fn export_wav(&self, path: &Path, sample_rate: u32) -> Result<Option<PathBuf>> {
        let frames = self.frames.lock().unwrap();
        if frames.is_empty() {
            return Ok(None);
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {}", path.display()))?;

        for frame in frames.iter() {
            for &sample in &frame.samples {
                let value = (sample * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
                writer
                    .write_sample(value)
                    .context("failed to write sample to WAV")?;
            }
        }

        writer.finalize().context("failed to finalize WAV file")?;

        info!("exported recording to {}", path.display());
        Ok(Some(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_exports_nothing() {
        let log = RecordingLog::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");

        let result = log.export_wav(&path, 16000).unwrap();
        assert!(result.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn total_samples_sums_frames() {
        let log = RecordingLog::new();
        log.push(AudioFrame {
            samples: vec![0.0; 100],
            sample_rate: 16000,
        });
        log.push(AudioFrame {
            samples: vec![0.0; 50],
            sample_rate: 16000,
        });
        assert_eq!(log.total_samples(), 150);

        log.clear();
        assert!(log.is_empty());
    }
}
