//! Core types and road geometry for the merge simulation
//!
//! These are standalone types shared by every component of the simulation.

use std::ops::Range;

/// A unique identifier for a vehicle
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub usize);

/// The lane a vehicle belongs to for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneClass {
    /// Main roadway traffic, not involved in merging
    Through,
    /// On-ramp traffic that must transition into the through lane
    Merging,
}

/// Discrete stage of a merging vehicle's lane-change progress
///
/// Phases only ever advance in declaration order, which is why the enum
/// derives `Ord`. Through vehicles stay in `NotMerging` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergePhase {
    /// Travelling longitudinally in its spawn lane
    NotMerging,
    /// Past the trigger point and moving diagonally toward the through lane
    MergeInitiated,
    /// Settled on the through-lane centerline
    Merged,
}

/// Length of the simulated roadway segment; vehicles past this point exit
pub const SEGMENT_LENGTH: f32 = 800.0;

/// Centerline of the through lane
pub const THROUGH_LANE_Y: f32 = 225.0;

/// Centerline of the merge lane (the on-ramp)
pub const MERGE_LANE_Y: f32 = 375.0;

/// Vehicle extent along the direction of travel
pub const VEHICLE_WIDTH: f32 = 40.0;

/// Vehicle extent across the lane
pub const VEHICLE_HEIGHT: f32 = 20.0;

/// Safe following distance multiplier for VEHICLE_WIDTH
pub const SAFE_FOLLOWING_MULTIPLIER: f32 = 2.5;

/// Gap below which the car-following model begins to decelerate
pub const SAFE_FOLLOWING_DISTANCE: f32 = VEHICLE_WIDTH * SAFE_FOLLOWING_MULTIPLIER;

/// Longitudinal progress at which a merging vehicle starts its lane change
pub const MERGE_TRIGGER_X: f32 = 200.0;

/// Gap at or below which a follower is forced to a hard stop
pub const NEAR_CONTACT_GAP: f32 = 1.0;

/// Spawn speed range for through-lane vehicles, in units per second
pub const THROUGH_SPEED_RANGE: Range<f32> = 80.0..120.0;

/// Spawn speed range for on-ramp vehicles; slower than the through lane
pub const MERGE_SPEED_RANGE: Range<f32> = 60.0..90.0;
