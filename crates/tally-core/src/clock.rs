//! Frame clock for animation-frame callbacks.
//!
//! Converts host timestamps into an elapsed-time ratio against a 60fps
//! baseline, so per-frame velocities stay frame-rate independent.

/// Baseline frame duration in milliseconds (60fps).
pub const BASELINE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Default cap on the ratio, so a stalled tab does not teleport the card.
pub const DEFAULT_MAX_FRAME_RATIO: f32 = 3.0;

/// Turns successive frame timestamps into elapsed-time ratios.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous frame
    last_frame_ms: Option<f64>,
    /// Upper clamp for the returned ratio
    max_ratio: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_RATIO)
    }
}

impl FrameClock {
    /// Create a clock with the given ratio cap (non-finite or negative caps fall back to 1).
    #[must_use]
    pub fn new(max_ratio: f32) -> Self {
        let max_ratio = if max_ratio.is_finite() && max_ratio > 0.0 {
            max_ratio
        } else {
            1.0
        };
        Self {
            last_frame_ms: None,
            max_ratio,
        }
    }

    /// Record a frame at `now_ms` and return `elapsed / baseline`, clamped to
    /// `[0, max_ratio]`.
    ///
    /// The first frame returns 1.0.
    /// Timestamps going backwards yield 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let ratio = match self.last_frame_ms {
            Some(last) => {
                let elapsed = (now_ms - last).max(0.0);
                (elapsed / BASELINE_FRAME_MS) as f32
            }
            None => 1.0,
        };
        self.last_frame_ms = Some(now_ms);
        if ratio.is_finite() {
            ratio.clamp(0.0, self.max_ratio)
        } else {
            0.0
        }
    }

    /// Get the ratio cap.
    #[must_use]
    pub const fn max_ratio(&self) -> f32 {
        self.max_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_one_baseline() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(1234.0), 1.0);
    }

    #[test]
    fn test_ratio_tracks_elapsed_time() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        let r = clock.tick(BASELINE_FRAME_MS);
        assert!((r - 1.0).abs() < 1e-4);
        let r = clock.tick(BASELINE_FRAME_MS * 1.5);
        assert!((r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_ratio_clamped_after_stall() {
        let mut clock = FrameClock::new(3.0);
        clock.tick(0.0);
        assert_eq!(clock.tick(10_000.0), 3.0);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::default();
        clock.tick(500.0);
        assert_eq!(clock.tick(100.0), 0.0);
    }

    #[test]
    fn test_bad_cap_falls_back() {
        assert_eq!(FrameClock::new(f32::NAN).max_ratio(), 1.0);
        assert_eq!(FrameClock::new(-2.0).max_ratio(), 1.0);
    }
}
