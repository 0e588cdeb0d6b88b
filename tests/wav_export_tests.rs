// Integration tests for full-session WAV export: duration and header
// fidelity, sample conversion, and the empty/error paths.

mod common;

use std::sync::Arc;

use common::FakeEngine;
use scrivo::{
    AudioFrame, NullEngine, RealtimeConfig, RealtimeSession, SessionError, SyntheticSource,
};

fn capture_config() -> RealtimeConfig {
    RealtimeConfig {
        sample_rate: 16000,
        buffer_duration_secs: 2,
        chunk_duration_secs: 1,
        stride_secs: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn exported_tone_matches_duration_and_header() {
    let frames = SyntheticSource::tone_frames(440.0, 0.5, 2 * 16000, 4096, 16000);
    let mut session = RealtimeSession::new(
        capture_config(),
        Box::new(SyntheticSource::new(frames)),
        Arc::new(NullEngine),
    );

    session.start().await.unwrap();
    session.stop().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    let exported = session.export_wav(&path).unwrap();
    assert_eq!(exported, Some(path.clone()));

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.len(), 2 * 16000);

    // Peak of a 0.5-amplitude tone lands near half of full scale.
    let samples: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    assert!((16000..=16384).contains(&peak), "peak was {}", peak);
}

#[tokio::test]
async fn empty_session_exports_nothing() {
    let mut session = RealtimeSession::new(
        capture_config(),
        Box::new(SyntheticSource::new(Vec::new())),
        FakeEngine::empty(),
    );

    session.start().await.unwrap();
    session.stop().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.wav");
    assert_eq!(session.export_wav(&path).unwrap(), None);
    assert!(!path.exists());
}

#[tokio::test]
async fn samples_are_rounded_and_clamped_to_i16() {
    let frame = AudioFrame {
        samples: vec![1.0, -1.0, 0.5, 0.25, 0.0, 2.0, -2.0],
        sample_rate: 16000,
    };
    let mut session = RealtimeSession::new(
        capture_config(),
        Box::new(SyntheticSource::new(vec![frame])),
        FakeEngine::empty(),
    );

    session.start().await.unwrap();
    session.stop().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conversion.wav");
    session.export_wav(&path).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let samples: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, vec![32767, -32767, 16384, 8192, 0, 32767, -32768]);
}

#[tokio::test]
async fn export_to_unwritable_path_reports_error() {
    let frame = AudioFrame {
        samples: vec![0.1; 100],
        sample_rate: 16000,
    };
    let mut session = RealtimeSession::new(
        capture_config(),
        Box::new(SyntheticSource::new(vec![frame])),
        FakeEngine::empty(),
    );

    session.start().await.unwrap();
    session.stop().await;

    let err = session
        .export_wav("/nonexistent-dir/recording.wav")
        .unwrap_err();
    assert!(matches!(err, SessionError::Export(_)), "got {:?}", err);
}
