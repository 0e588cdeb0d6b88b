pub mod capture;
pub mod gate;
pub mod microphone;
pub mod recording;
pub mod ring;
pub mod synthetic;

pub use capture::{AudioFrame, CaptureSink, CaptureSource, LEVEL_FULL_SCALE_RMS};
pub use gate::{rms, SilenceGate};
pub use microphone::{list_input_devices, AudioDevice, MicrophoneSource};
pub use recording::RecordingLog;
pub use ring::RingBuffer;
pub use synthetic::SyntheticSource;
