//! Fixed-timestep accumulator.
//!
//! Wall-clock frame time feeds an accumulator that is drained in whole
//! simulation steps, so the number of ticks per second is independent of the
//! display rate. Drawing happens once per frame, after the ticks.

use std::time::Instant;
use tracing::warn;

/// One simulation tick: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame the accumulator accepts. Anything slower runs the game in
/// slow motion rather than queueing a burst of catch-up ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure the time since the previous call and run `update` once per
    /// whole fixed step that fits.
    pub fn tick(&mut self, update: impl FnMut()) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update)
    }

    /// Feed an explicit frame time. Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f64, mut update: impl FnMut()) -> u32 {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame took {:.1}ms, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            update();
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        self.update_count += u64::from(steps);
        self.frame_count += 1;
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / FIXED_DT
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
