//! Vehicle kinematics and the merge state machine
//!
//! A vehicle knows nothing about the rest of the traffic; the speed it
//! should use each tick is resolved beforehand by the collision-avoidance
//! model and passed into [`SimVehicle::update`].

use super::types::{
    LaneClass, MergePhase, VehicleId, MERGE_TRIGGER_X, THROUGH_LANE_Y, VEHICLE_WIDTH,
};

/// A vehicle in the merge simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    /// Longitudinal progress along the segment
    pub x: f32,
    /// Lane offset; smaller values are closer to the through lane
    pub y: f32,
    /// Current longitudinal speed, never negative
    pub speed: f32,
    /// The lane the vehicle spawned in; immutable for its lifetime
    pub lane_class: LaneClass,
    pub merge_phase: MergePhase,
    /// Simulation clock reading at creation, in seconds
    pub spawn_time: f32,
    /// Elapsed time from spawn to completing the merge; zero until set
    pub merge_duration: f32,
}

impl SimVehicle {
    pub fn new(id: VehicleId, lane_class: LaneClass, y: f32, speed: f32, spawn_time: f32) -> Self {
        Self {
            id,
            x: 0.0,
            y,
            speed: speed.max(0.0),
            lane_class,
            merge_phase: MergePhase::NotMerging,
            spawn_time,
            merge_duration: 0.0,
        }
    }

    /// Whether the vehicle still has lane-change work ahead of it.
    /// A vehicle that has completed its merge behaves like through traffic.
    pub fn is_actively_merging(&self) -> bool {
        self.lane_class == LaneClass::Merging && self.merge_phase != MergePhase::Merged
    }

    /// Longitudinal position of the front of the vehicle
    pub fn front(&self) -> f32 {
        self.x + VEHICLE_WIDTH
    }

    /// Advance the vehicle by one tick using the speed already resolved by
    /// the collision-avoidance model.
    ///
    /// `now` is the simulation clock after this tick's time advance; it is
    /// only read when a merge completes, to record the merge duration.
    pub fn update(&mut self, dt: f32, resolved_speed: f32, now: f32) {
        self.speed = resolved_speed.max(0.0);

        match (self.lane_class, self.merge_phase) {
            (LaneClass::Merging, MergePhase::NotMerging) => {
                self.x += self.speed * dt;
                // Trigger check happens once per tick, after advancing.
                if self.x > MERGE_TRIGGER_X {
                    self.merge_phase = MergePhase::MergeInitiated;
                }
            }
            (LaneClass::Merging, MergePhase::MergeInitiated) => {
                if self.y > THROUGH_LANE_Y {
                    // Half of the forward motion is redirected into the lane
                    // change, halving effective progress while merging.
                    self.y -= self.speed * 0.5 * dt;
                    self.x += self.speed * 0.5 * dt;
                } else {
                    self.merge_phase = MergePhase::Merged;
                    self.merge_duration = now - self.spawn_time;
                    self.y = THROUGH_LANE_Y;
                }
            }
            // Through traffic, and merging traffic that has settled.
            _ => {
                self.x += self.speed * dt;
            }
        }
    }
}
