//! Standalone merge simulation module
//!
//! This module contains the core simulation logic: per-tick vehicle
//! kinematics, the car-following model, the merge state machine, spawning,
//! and statistics. It runs without any rendering layer and can be driven
//! tick by tick from a console runner or an embedding host.

mod collision;
mod spawner;
mod stats;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use collision::resolve_speed;
#[allow(unused_imports)]
pub use spawner::{
    SpawnRequests, SpawnScheduler, DEFAULT_MERGE_RATE, DEFAULT_THROUGH_RATE, MIN_SPAWN_RATE,
    RATE_STEP,
};
#[allow(unused_imports)]
pub use stats::{SimStats, SPEED_HISTORY_LIMIT, SPEED_SAMPLE_INTERVAL};
#[allow(unused_imports)]
pub use types::{
    LaneClass, MergePhase, VehicleId, MERGE_LANE_Y, MERGE_TRIGGER_X, NEAR_CONTACT_GAP,
    SAFE_FOLLOWING_DISTANCE, SEGMENT_LENGTH, THROUGH_LANE_Y, VEHICLE_HEIGHT, VEHICLE_WIDTH,
};
#[allow(unused_imports)]
pub use vehicle::SimVehicle;
pub use world::SimWorld;
