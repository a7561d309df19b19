//! Merge outcomes and aggregate speed statistics
//!
//! The aggregator copies scalar values out of the registry; it never
//! retains vehicle references. Derived ratios return `None` instead of
//! dividing by an empty sample set.

use std::collections::VecDeque;

use super::types::LaneClass;
use super::vehicle::SimVehicle;

/// Interval between mean-speed samples, in simulated seconds
pub const SPEED_SAMPLE_INTERVAL: f32 = 0.5;

/// Most recent mean-speed samples retained per lane class
pub const SPEED_HISTORY_LIMIT: usize = 100;

/// Aggregated outcomes of a simulation run
#[derive(Debug, Clone, Default)]
pub struct SimStats {
    pub total_spawned: u32,
    pub total_merging_spawned: u32,
    pub successful_merges: u32,
    /// Time-to-merge of every successful merge, in seconds
    pub merge_durations: Vec<f32>,
    through_speed_history: VecDeque<f32>,
    merge_speed_history: VecDeque<f32>,
    sample_timer: f32,
}

impl SimStats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a freshly spawned vehicle.
    pub fn record_spawn(&mut self, lane_class: LaneClass) {
        self.total_spawned += 1;
        if lane_class == LaneClass::Merging {
            self.total_merging_spawned += 1;
        }
    }

    /// Record a merged vehicle exiting the segment.
    pub fn record_successful_merge(&mut self, merge_duration: f32) {
        self.successful_merges += 1;
        self.merge_durations.push(merge_duration);
    }

    /// Advance the sampling timer and, once per interval, append the mean
    /// speed of each lane class to its bounded history. A lane class with no
    /// live vehicles contributes no sample that period.
    pub fn sample_speeds<'a>(&mut self, dt: f32, vehicles: impl Iterator<Item = &'a SimVehicle>) {
        self.sample_timer += dt;
        if self.sample_timer < SPEED_SAMPLE_INTERVAL {
            return;
        }
        self.sample_timer = 0.0;

        let mut through = (0.0f32, 0u32);
        let mut merging = (0.0f32, 0u32);
        for vehicle in vehicles {
            match vehicle.lane_class {
                LaneClass::Through => {
                    through.0 += vehicle.speed;
                    through.1 += 1;
                }
                LaneClass::Merging => {
                    merging.0 += vehicle.speed;
                    merging.1 += 1;
                }
            }
        }

        if through.1 > 0 {
            push_sample(&mut self.through_speed_history, through.0 / through.1 as f32);
        }
        if merging.1 > 0 {
            push_sample(&mut self.merge_speed_history, merging.0 / merging.1 as f32);
        }
    }

    /// Fraction of spawned merging vehicles that completed their merge.
    /// `None` until the first merging vehicle has spawned.
    pub fn success_rate(&self) -> Option<f32> {
        if self.total_merging_spawned == 0 {
            return None;
        }
        Some(self.successful_merges as f32 / self.total_merging_spawned as f32)
    }

    /// Mean time-to-merge across recorded merges.
    /// `None` until the first merge has been recorded.
    pub fn average_merge_duration(&self) -> Option<f32> {
        if self.merge_durations.is_empty() {
            return None;
        }
        Some(self.merge_durations.iter().sum::<f32>() / self.merge_durations.len() as f32)
    }

    /// Mean-speed history of through-lane vehicles, oldest sample first
    pub fn through_speed_history(&self) -> &VecDeque<f32> {
        &self.through_speed_history
    }

    /// Mean-speed history of merging vehicles, oldest sample first
    pub fn merge_speed_history(&self) -> &VecDeque<f32> {
        &self.merge_speed_history
    }
}

fn push_sample(history: &mut VecDeque<f32>, value: f32) {
    if history.len() == SPEED_HISTORY_LIMIT {
        history.pop_front();
    }
    history.push_back(value);
}
