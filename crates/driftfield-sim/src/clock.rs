//! Simulation time, advanced one fixed step per tick.

/// Default tick length, in seconds.
pub const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// Elapsed simulation time. Derived from the tick count so it never drifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    step: f32,
    ticks: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl SimulationClock {
    pub fn new(step: f32) -> Self {
        Self { step, ticks: 0 }
    }

    /// Advance one step and return the new elapsed time.
    pub fn advance(&mut self) -> f32 {
        self.ticks += 1;
        self.elapsed()
    }

    /// Seconds simulated so far.
    pub fn elapsed(&self) -> f32 {
        (self.ticks as f64 * self.step as f64) as f32
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}
