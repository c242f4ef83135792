//! Frame pacing at the active room's speed

use std::time::{Duration, Instant};

/// Longest wall-clock gap credited in one tick
const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// Accumulates wall-clock time and tells the host loop when the next
/// simulation frame is due
pub struct GameClock {
    /// Total simulated frames
    pub frame_count: u64,
    /// Time between frames at the current speed
    frame_interval: Duration,
    /// Accumulated time not yet consumed by frames
    accumulator: Duration,
    /// Last tick instant, `None` before the first tick
    last_instant: Option<Instant>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::with_speed(30)
    }
}

impl GameClock {
    /// Create a clock running at `speed` frames per second (minimum 1)
    pub fn with_speed(speed: u32) -> Self {
        Self {
            frame_count: 0,
            frame_interval: interval_for(speed),
            accumulator: Duration::ZERO,
            last_instant: None,
        }
    }

    /// Change speed, e.g. after switching rooms. Banked time is kept.
    pub fn set_speed(&mut self, speed: u32) {
        self.frame_interval = interval_for(speed);
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Advance the clock. Call once per host loop iteration.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let Some(last) = self.last_instant.replace(now) else {
            return;
        };
        // Clamp to avoid a spiral of catch-up frames after a stall
        let elapsed = now.saturating_duration_since(last).min(MAX_CATCH_UP);
        self.accumulator += elapsed;
    }

    /// Returns true if a frame should run now
    pub fn should_step(&self) -> bool {
        self.accumulator >= self.frame_interval
    }

    /// Consume one frame interval from the accumulator
    pub fn consume_step(&mut self) {
        self.accumulator = self.accumulator.saturating_sub(self.frame_interval);
        self.frame_count += 1;
    }

    /// Discard whole frame intervals still banked after a step, keeping the
    /// partial remainder. Returns how many frames were skipped.
    pub fn drop_backlog(&mut self) -> u32 {
        let mut skipped = 0;
        while self.accumulator >= self.frame_interval {
            self.accumulator -= self.frame_interval;
            skipped += 1;
        }
        skipped
    }

    /// Wall-clock instant at which the next frame becomes due
    pub fn next_frame_at(&self) -> Option<Instant> {
        let last = self.last_instant?;
        Some(last + self.frame_interval.saturating_sub(self.accumulator))
    }
}

fn interval_for(speed: u32) -> Duration {
    Duration::from_secs_f64(1.0 / speed.max(1) as f64)
}
