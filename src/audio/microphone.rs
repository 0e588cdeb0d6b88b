//! cpal-backed microphone capture.
//!
//! The cpal stream is not `Send`, so a dedicated thread owns it for the
//! lifetime of the capture; open/close talk to that thread over channels.

use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tracing::{info, warn};

use super::capture::{CaptureSink, CaptureSource};

/// An input device as presented to device pickers.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    pub index: usize,
    pub name: String,
}

/// Enumerate input devices on the default host.
pub fn list_input_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .context("failed to enumerate input devices")?;
    Ok(devices
        .enumerate()
        .filter_map(|(index, device)| {
            device.name().ok().map(|name| AudioDevice { index, name })
        })
        .collect())
}

/// Microphone capture source on a device index, or the platform default
/// when no index is given.
pub struct MicrophoneSource {
    device_index: Option<usize>,
    block_size: u32,
    worker: Option<(std_mpsc::Sender<()>, JoinHandle<()>)>,
}

impl MicrophoneSource {
    pub fn new(device_index: Option<usize>, block_size: u32) -> Self {
        Self {
            device_index,
            block_size,
            worker: None,
        }
    }

    fn select_device(device_index: Option<usize>) -> Result<cpal::Device> {
        let host = cpal::default_host();
        match device_index {
            Some(index) => host
                .input_devices()
                .context("failed to enumerate input devices")?
                .nth(index)
                .ok_or_else(|| anyhow!("no input device at index {}", index)),
            None => host
                .default_input_device()
                .ok_or_else(|| anyhow!("no default input device")),
        }
    }

    /// Open the device and start the stream. Runs on the stream-owning
    /// thread; the returned stream must stay alive there.
    fn open_stream(
        device_index: Option<usize>,
        sample_rate: u32,
        block_size: u32,
        sink: CaptureSink,
    ) -> Result<(cpal::Stream, String)> {
        let device = Self::select_device(device_index)?;
        let name = device
            .name()
            .unwrap_or_else(|_| "unknown input".to_string());

        let supported = device
            .default_input_config()
            .map_err(|e| anyhow!("no supported input config on {}: {}", name, e))?;

        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Fixed(block_size),
        };

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        sink.ingest(data);
                    },
                    |err| warn!("audio stream error: {}", err),
                    None,
                )
                .map_err(|e| anyhow!("failed to open input stream on {}: {}", name, e))?,
            SampleFormat::I16 => device
                .build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let samples: Vec<f32> =
                            data.iter().map(|&s| s as f32 / 32768.0).collect();
                        sink.ingest(&samples);
                    },
                    |err| warn!("audio stream error: {}", err),
                    None,
                )
                .map_err(|e| anyhow!("failed to open input stream on {}: {}", name, e))?,
            other => {
                return Err(anyhow!(
                    "unsupported sample format {:?} on {} (need f32 or i16)",
                    other,
                    name
                ))
            }
        };

        stream
            .play()
            .map_err(|e| anyhow!("failed to start input stream on {}: {}", name, e))?;

        Ok((stream, name))
    }
}

impl CaptureSource for MicrophoneSource {
    fn open(&mut self, sink: CaptureSink) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let device_index = self.device_index;
        let block_size = self.block_size;
        let sample_rate = sink.sample_rate();

        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<String>>();

        let handle = std::thread::spawn(move || {
            match Self::open_stream(device_index, sample_rate, block_size, sink) {
                Ok((stream, name)) => {
                    if ready_tx.send(Ok(name)).is_err() {
                        return;
                    }
                    // Park until close() drops the stop sender, keeping the
                    // stream alive; recv returns Err on disconnect.
                    let _ = stop_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        // Synchronous handshake: device-open failures surface here, from
        // the caller's start(), not later from the stream thread.
        match ready_rx.recv() {
            Ok(Ok(name)) => {
                info!("microphone capture started on '{}'", name);
                self.worker = Some((stop_tx, handle));
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(anyhow!("capture thread exited before reporting ready"))
            }
        }
    }

    fn close(&mut self) {
        if let Some((stop_tx, handle)) = self.worker.take() {
            drop(stop_tx);
            if handle.join().is_err() {
                warn!("capture thread panicked during shutdown");
            }
            info!("microphone capture stopped");
        }
    }

    fn is_capturing(&self) -> bool {
        self.worker.is_some()
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

impl Drop for MicrophoneSource {
    fn drop(&mut self) {
        self.close();
    }
}
