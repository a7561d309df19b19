//! Car-following and collision avoidance
//!
//! A simplified car-following rule: deceleration grows as the gap to a
//! relevant leader closes, with a floor set by the leader's speed scaled by
//! the remaining gap fraction, and a hard stop at near-zero gap. There is no
//! acceleration back toward a cruising speed once a leader pulls away; a
//! slowed vehicle only speeds up when a fresh comparison raises its target.

use ordered_float::OrderedFloat;

use super::types::{MergePhase, NEAR_CONTACT_GAP, SAFE_FOLLOWING_DISTANCE, VEHICLE_HEIGHT};
use super::vehicle::SimVehicle;

/// Deceleration applied as the gap closes entirely, in units per second squared
const PROXIMITY_DECELERATION: f32 = 50.0;

/// Bounds on the leader-speed scaling factor
const SLOWDOWN_FACTOR_MIN: f32 = 0.1;
const SLOWDOWN_FACTOR_MAX: f32 = 0.9;

/// Resolve the speed `vehicle` should use for this tick's update, given
/// every other live vehicle (read-only).
///
/// A near-contact gap to any relevant leader forces a hard stop, overriding
/// any weaker adjustment. Otherwise the most restrictive follow constraint
/// wins, and with no relevant leader in range the speed is left unchanged.
pub fn resolve_speed<'a>(
    vehicle: &SimVehicle,
    others: impl Iterator<Item = &'a SimVehicle>,
    dt: f32,
) -> f32 {
    let mut most_restrictive: Option<OrderedFloat<f32>> = None;

    for other in others {
        if other.id == vehicle.id || !is_relevant_leader(vehicle, other) {
            continue;
        }

        let gap = other.x - vehicle.front();
        if gap <= NEAR_CONTACT_GAP {
            return 0.0;
        }
        if gap < SAFE_FOLLOWING_DISTANCE {
            let fraction = gap / SAFE_FOLLOWING_DISTANCE;
            let slowdown = fraction.clamp(SLOWDOWN_FACTOR_MIN, SLOWDOWN_FACTOR_MAX);
            let target_speed = other.speed * slowdown;
            let deceleration = PROXIMITY_DECELERATION * (1.0 - fraction);
            let candidate = OrderedFloat(target_speed.max(vehicle.speed - deceleration * dt));
            most_restrictive = Some(match most_restrictive {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        }
    }

    match most_restrictive {
        Some(speed) => speed.into_inner().max(0.0),
        None => vehicle.speed,
    }
}

/// Lane-aware check for whether `other` is a leader `vehicle` must react to
fn is_relevant_leader(vehicle: &SimVehicle, other: &SimVehicle) -> bool {
    if other.x <= vehicle.x {
        return false;
    }

    let same_lane = (other.y - vehicle.y).abs() < VEHICLE_HEIGHT / 2.0;

    // Settled traffic sharing a lane.
    if !vehicle.is_actively_merging() && !other.is_actively_merging() && same_lane {
        return true;
    }
    // On-ramp traffic converging on the same lane.
    if vehicle.is_actively_merging() && other.is_actively_merging() && same_lane {
        return true;
    }
    // A merging vehicle yields to traffic in the lane it is crossing into.
    if vehicle.is_actively_merging() && !other.is_actively_merging() && other.y < vehicle.y {
        return true;
    }
    // A vehicle mid lane change occupies shared space for everyone.
    other.merge_phase == MergePhase::MergeInitiated
}
