//! Frame clock that supplies the per-frame delta time

use std::time::Instant;

/// Largest delta a real-time tick may report, in seconds
const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks elapsed time and hands out one delta per frame.
///
/// In real-time mode the delta comes from a monotonic `Instant` and is
/// clamped so a stalled frame cannot spawn a huge burst. In fixed-step mode
/// every tick advances by the same amount, which keeps headless runs
/// deterministic.
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Frame counter, incremented on every tick
    pub frame: u64,
    fixed_step: Option<f64>,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            fixed_step: None,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    /// Create a real-time clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that advances by exactly `dt` seconds per tick
    pub fn fixed(dt: f64) -> Self {
        Self {
            fixed_step: Some(dt),
            ..Self::default()
        }
    }

    /// Advance the clock. Call once per frame; returns the new delta.
    pub fn tick(&mut self) -> f32 {
        self.frame += 1;

        if let Some(step) = self.fixed_step {
            self.delta_time = step;
            self.total_time += step;
            return step as f32;
        }

        let now = Instant::now();
        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return 0.0;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        self.delta_time = elapsed.min(MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.delta_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame, 1);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut clock = FrameClock::fixed(0.5);
        for _ in 0..4 {
            assert!((clock.tick() - 0.5).abs() < 1e-6);
        }
        assert!((clock.total_time - 2.0).abs() < 1e-10);
        assert_eq!(clock.frame, 4);
    }

    #[test]
    fn test_realtime_delta_is_clamped() {
        let mut clock = FrameClock::new();
        clock.tick();
        if let Some(earlier) = clock
            .last_instant
            .checked_sub(std::time::Duration::from_secs(3))
        {
            clock.last_instant = earlier;
        }
        let dt = clock.tick();
        assert!(dt as f64 <= MAX_FRAME_DELTA + 1e-6);
    }
}
