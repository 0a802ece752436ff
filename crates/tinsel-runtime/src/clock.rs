//! Frame clock driven by the wall clock or by explicit steps

use std::time::Instant;

/// Longest frame the clock will report, in seconds
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks frame time from the wall clock, or from explicit steps when the
/// host drives it headless
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Frames ticked or advanced so far
    pub frame: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame += 1;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit delta. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        // Clamp so a stalled host does not fast-forward the whole scene
        self.delta_time = dt.min(MAX_FRAME_TIME);
        self.total_time += self.delta_time;
        self.frame += 1;
    }

    /// Delta as the engine consumes it
    pub fn delta_seconds(&self) -> f32 {
        self.delta_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.frame, 0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 1);
    }

    #[test]
    fn test_advance_clamps() {
        let mut clock = FrameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, MAX_FRAME_TIME);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, MAX_FRAME_TIME);
        assert_eq!(clock.frame, 3);
    }

    #[test]
    fn test_advance_accumulates_total() {
        let mut clock = FrameClock::new();
        for _ in 0..30 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.total_time - 0.5).abs() < 1e-9);
        assert!((clock.delta_seconds() - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(clock.frame, 30);
    }
}
