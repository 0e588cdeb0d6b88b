use serde::{Deserialize, Serialize};

use super::config::OverlapPolicy;

/// A timestamped span of recognized text. Offsets are seconds on the
/// logical session timeline (not ring-buffer positions); immutable once
/// appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Point-in-time view of everything recognized so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Segment texts joined in arrival order.
    pub text: String,
    /// Detected language, falling back to the configured one.
    pub language: Option<String>,
    pub segments: Vec<Segment>,
}

/// Accumulated recognition results for one session run.
///
/// Written only by the processor task; read by the caller under the
/// session's lock. Survives `stop()` so transcripts stay queryable until
/// the next `start()` resets it.
#[derive(Debug, Default)]
pub struct SessionState {
    segments: Vec<Segment>,
    detected_language: Option<String>,
}

impl SessionState {
    pub fn reset(&mut self) {
        self.segments.clear();
        self.detected_language = None;
    }

    /// Append the segments from one inference window, subject to the
    /// overlap policy. Returns the newly appended text, joined — empty
    /// when everything was blank or de-duplicated away.
    pub fn append_segments(
        &mut self,
        incoming: impl IntoIterator<Item = Segment>,
        policy: OverlapPolicy,
    ) -> String {
        let mut appended: Vec<String> = Vec::new();
        for segment in incoming {
            let text = segment.text.trim();
            if text.is_empty() {
                continue;
            }
            if policy == OverlapPolicy::DropOverlap {
                // Re-transcribed overlap shows up as spans ending at or
                // before audio we already covered.
                if let Some(last) = self.segments.last() {
                    if segment.end <= last.end {
                        continue;
                    }
                }
            }
            appended.push(text.to_string());
            self.segments.push(Segment {
                start: segment.start,
                end: segment.end,
                text: text.to_string(),
            });
        }
        appended.join(" ")
    }

    /// Record the engine-detected language. First writer wins; later
    /// windows never overwrite it.
    pub fn note_language(&mut self, language: Option<String>) {
        if self.detected_language.is_some() {
            return;
        }
        if let Some(language) = language {
            if !language.is_empty() {
                self.detected_language = Some(language);
            }
        }
    }

    pub fn detected_language(&self) -> Option<&str> {
        self.detected_language.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn transcript(&self, configured_language: &str) -> Transcript {
        let text = self
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let language = self.detected_language.clone().or_else(|| {
            if configured_language == "auto" {
                None
            } else {
                Some(configured_language.to_string())
            }
        });
        Transcript {
            text,
            language,
            segments: self.segments.clone(),
        }
    }
}
