pub mod audio;
pub mod config;
pub mod engine;
pub mod session;

pub use audio::{
    list_input_devices, AudioDevice, AudioFrame, CaptureSink, CaptureSource, MicrophoneSource,
    RecordingLog, RingBuffer, SilenceGate, SyntheticSource,
};
pub use config::Config;
pub use engine::{EngineSegment, NullEngine, SpeechEngine, TranscribeOptions, TranscribeOutput};
pub use session::{
    OverlapPolicy, RealtimeConfig, RealtimeSession, Segment, SessionError, SessionEvent,
    SessionStats, SessionStatus, Transcript,
};
