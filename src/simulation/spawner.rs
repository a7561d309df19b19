//! Rate-driven spawn scheduling
//!
//! Two independent accumulators, one per lane class. The scheduler only
//! decides *when* a vehicle is due; the world performs the actual spawn.

use log::debug;

/// Default through-lane spawn rate, in vehicles per minute
pub const DEFAULT_THROUGH_RATE: u32 = 60;

/// Default on-ramp spawn rate, in vehicles per minute
pub const DEFAULT_MERGE_RATE: u32 = 30;

/// Lowest spawn rate either lane may be configured to
pub const MIN_SPAWN_RATE: u32 = 5;

/// Increment applied by every rate adjustment
pub const RATE_STEP: u32 = 5;

/// Lanes due for a spawn after advancing the scheduler
#[derive(Debug, Default, Clone, Copy)]
pub struct SpawnRequests {
    pub through: bool,
    pub merging: bool,
}

/// Rate-driven spawn timers for both lanes
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    through_rate: u32,
    merge_rate: u32,
    through_timer: f32,
    merge_timer: f32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_THROUGH_RATE, DEFAULT_MERGE_RATE)
    }
}

impl SpawnScheduler {
    /// Create a scheduler with the given rates, clamped to the floor.
    pub fn new(through_rate: u32, merge_rate: u32) -> Self {
        Self {
            through_rate: through_rate.max(MIN_SPAWN_RATE),
            merge_rate: merge_rate.max(MIN_SPAWN_RATE),
            through_timer: 0.0,
            merge_timer: 0.0,
        }
    }

    /// Advance both accumulators by `dt` seconds and report which lanes are
    /// due for a spawn. An accumulator that fires resets to zero rather than
    /// carrying the remainder, so rate drift stays bounded by one
    /// inter-arrival period.
    pub fn tick(&mut self, dt: f32) -> SpawnRequests {
        let mut requests = SpawnRequests::default();

        self.through_timer += dt;
        if self.through_timer >= 60.0 / self.through_rate as f32 {
            self.through_timer = 0.0;
            requests.through = true;
        }

        self.merge_timer += dt;
        if self.merge_timer >= 60.0 / self.merge_rate as f32 {
            self.merge_timer = 0.0;
            requests.merging = true;
        }

        requests
    }

    pub fn through_rate(&self) -> u32 {
        self.through_rate
    }

    pub fn merge_rate(&self) -> u32 {
        self.merge_rate
    }

    /// Raise the through-lane rate by one step. There is no upper bound.
    pub fn increase_through_rate(&mut self) {
        self.through_rate += RATE_STEP;
    }

    /// Lower the through-lane rate by one step.
    /// Returns false, leaving the rate untouched, when already at the floor.
    pub fn decrease_through_rate(&mut self) -> bool {
        if self.through_rate <= MIN_SPAWN_RATE {
            debug!(
                "through rate already at floor of {} vehicles/min",
                MIN_SPAWN_RATE
            );
            return false;
        }
        self.through_rate -= RATE_STEP;
        true
    }

    /// Raise the on-ramp rate by one step. There is no upper bound.
    pub fn increase_merge_rate(&mut self) {
        self.merge_rate += RATE_STEP;
    }

    /// Lower the on-ramp rate by one step.
    /// Returns false, leaving the rate untouched, when already at the floor.
    pub fn decrease_merge_rate(&mut self) -> bool {
        if self.merge_rate <= MIN_SPAWN_RATE {
            debug!(
                "merge rate already at floor of {} vehicles/min",
                MIN_SPAWN_RATE
            );
            return false;
        }
        self.merge_rate -= RATE_STEP;
        true
    }
}
