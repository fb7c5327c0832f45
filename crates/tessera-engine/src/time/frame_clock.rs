use std::time::{Duration, Instant};

/// Timing of one loop iteration, handed to every loop hook.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Zero-based frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Timing for a frame that has not been ticked yet.
    pub const ZERO: Self = Self { dt: 0.0, elapsed: 0.0, frame_index: 0 };
}

/// Produces one [`FrameTime`] per loop iteration.
///
/// Delta time is clamped so a stall (debugger pause, minimized window) does
/// not hand a huge step to the hooks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement without touching `elapsed` or the counter.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f64(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_up_from_zero() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        for i in 0..4u64 {
            let t = clock.tick_at(base + Duration::from_millis(16 * (i + 1)));
            assert_eq!(t.frame_index, i);
        }
    }

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::new();
        let base = clock.start;
        let t = clock.tick_at(base);
        assert!((t.dt - 0.0001).abs() < 1e-6);

        let t = clock.tick_at(base + Duration::from_secs(10));
        assert!((t.dt - 0.25).abs() < 1e-6);
        assert!((t.elapsed - 10.0).abs() < 1e-9);
    }
}
