//! RMS energy helpers and the silence gate.

/// Root-mean-square energy of a sample block.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Decides whether a window is worth sending to the recognition engine.
///
/// A cheap energy heuristic, not voice activity detection: it only exists
/// to skip engine calls on near-silent windows. What gets recorded is
/// unaffected.
#[derive(Debug, Clone, Copy)]
pub struct SilenceGate {
    threshold: f32,
}

impl SilenceGate {
    /// Default RMS threshold on the [-1, 1] amplitude scale.
    pub const DEFAULT_THRESHOLD: f32 = 0.015;

    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn is_silent(&self, window: &[f32]) -> bool {
        rms(window) < self.threshold
    }
}

impl Default for SilenceGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_square_wave() {
        let samples = vec![0.5, -0.5, 0.5, -0.5];
        assert!((rms(&samples) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rms_of_empty_block_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn near_zero_window_is_silent() {
        let gate = SilenceGate::default();
        let quiet = vec![0.001; 1024];
        assert!(gate.is_silent(&quiet));
    }

    #[test]
    fn tone_above_threshold_is_not_silent() {
        let gate = SilenceGate::default();
        let loud: Vec<f32> = (0..1024)
            .map(|i| 0.5 * (i as f32 * 0.1).sin())
            .collect();
        assert!(!gate.is_silent(&loud));
    }
}
