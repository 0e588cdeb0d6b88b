// Shared test doubles for the integration suite: a scripted engine, a
// failing engine, and a capture source that cannot open.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use scrivo::{
    CaptureSink, CaptureSource, EngineSegment, SpeechEngine, TranscribeOptions, TranscribeOutput,
};

pub fn seg(start: f64, end: f64, text: &str) -> EngineSegment {
    EngineSegment {
        start,
        end,
        text: text.to_string(),
    }
}

pub fn output(segments: Vec<EngineSegment>, language: Option<&str>) -> TranscribeOutput {
    TranscribeOutput {
        segments,
        language: language.map(str::to_string),
    }
}

/// Engine double that records every submitted window and replays scripted
/// outputs front-first (empty output once the script runs out).
pub struct FakeEngine {
    outputs: Mutex<Vec<TranscribeOutput>>,
    windows: Mutex<Vec<Vec<f32>>>,
    delay: Option<Duration>,
}

impl FakeEngine {
    pub fn new(outputs: Vec<TranscribeOutput>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs),
            windows: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }

    /// Engine that takes `delay` per window, for backpressure tests.
    pub fn with_delay(outputs: Vec<TranscribeOutput>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs),
            windows: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub fn call_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }

    pub fn windows(&self) -> Vec<Vec<f32>> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechEngine for FakeEngine {
    async fn transcribe(
        &self,
        window: &[f32],
        _options: &TranscribeOptions,
    ) -> Result<TranscribeOutput> {
        self.windows.lock().unwrap().push(window.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut outputs = self.outputs.lock().unwrap();
        if outputs.is_empty() {
            Ok(TranscribeOutput::default())
        } else {
            Ok(outputs.remove(0))
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Engine that fails every window.
pub struct FailingEngine;

#[async_trait]
impl SpeechEngine for FailingEngine {
    async fn transcribe(
        &self,
        _window: &[f32],
        _options: &TranscribeOptions,
    ) -> Result<TranscribeOutput> {
        Err(anyhow!("model exploded"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Capture source whose device can never be opened.
pub struct FailingSource;

impl CaptureSource for FailingSource {
    fn open(&mut self, _sink: CaptureSink) -> Result<()> {
        Err(anyhow!("device unavailable"))
    }

    fn close(&mut self) {}

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Poll `cond` every 10ms until it holds, panicking after ~5s.
pub async fn wait_until(mut cond: impl FnMut() -> bool, what: &str) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}
