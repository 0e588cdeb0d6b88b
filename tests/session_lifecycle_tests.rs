// Integration tests for session lifecycle: clean failure on device open,
// idempotent stop, no-op double start, and restartability.

mod common;

use std::time::Duration;

use common::{FailingSource, FakeEngine};
use scrivo::{RealtimeConfig, RealtimeSession, SessionError, SessionStatus, SyntheticSource};

fn small_config() -> RealtimeConfig {
    RealtimeConfig {
        sample_rate: 8000,
        buffer_duration_secs: 2,
        chunk_duration_secs: 1,
        stride_secs: 1,
        block_size: 2000,
        ..Default::default()
    }
}

#[tokio::test]
async fn device_open_failure_reverts_to_idle() {
    let mut session = RealtimeSession::new(
        small_config(),
        Box::new(FailingSource),
        FakeEngine::empty(),
    );

    let err = session.start().await.unwrap_err();
    assert!(matches!(err, SessionError::Device(_)), "got {:?}", err);
    assert_eq!(session.status().await, SessionStatus::Idle);

    // A failed start leaves nothing half-initialized; stop is still safe.
    session.stop().await;
    assert_eq!(session.status().await, SessionStatus::Idle);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let mut session = RealtimeSession::new(
        small_config(),
        Box::new(SyntheticSource::new(Vec::new())),
        FakeEngine::empty(),
    );

    // Stop before any start is a no-op.
    session.stop().await;
    assert_eq!(session.status().await, SessionStatus::Idle);

    session.start().await.unwrap();
    session.stop().await;
    assert_eq!(session.status().await, SessionStatus::Idle);

    session.stop().await;
    assert_eq!(session.status().await, SessionStatus::Idle);
}

#[tokio::test]
async fn second_start_is_a_noop_while_active() {
    let mut session = RealtimeSession::new(
        small_config(),
        Box::new(SyntheticSource::new(Vec::new())),
        FakeEngine::empty(),
    );

    session.start().await.unwrap();
    assert_eq!(session.status().await, SessionStatus::Active);

    session.start().await.unwrap();
    assert_eq!(session.status().await, SessionStatus::Active);

    session.stop().await;
}

#[tokio::test]
async fn session_restarts_after_stop() {
    let frames = SyntheticSource::tone_frames(440.0, 0.5, 4 * 2000, 2000, 8000);
    let mut session = RealtimeSession::new(
        small_config(),
        Box::new(SyntheticSource::new(frames)),
        FakeEngine::empty(),
    );

    session.start().await.unwrap();
    for _ in 0..500 {
        if session.stats().await.frames_captured == 4 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    session.stop().await;
    assert_eq!(session.stats().await.frames_captured, 4);

    // Restart resets counters and state; the synthetic script is spent,
    // so the second run captures nothing.
    session.start().await.unwrap();
    assert_eq!(session.status().await, SessionStatus::Active);
    assert_eq!(session.stats().await.frames_captured, 0);
    assert_eq!(session.transcript().await.text, "");

    session.stop().await;
    assert_eq!(session.status().await, SessionStatus::Idle);
}

#[tokio::test]
async fn invalid_config_is_rejected_at_start() {
    let config = RealtimeConfig {
        stride_secs: 6,
        chunk_duration_secs: 5,
        ..Default::default()
    };
    let mut session = RealtimeSession::new(
        config,
        Box::new(SyntheticSource::new(Vec::new())),
        FakeEngine::empty(),
    );

    let err = session.start().await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidConfig(_)), "got {:?}", err);
    assert_eq!(session.status().await, SessionStatus::Idle);
}
