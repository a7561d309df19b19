//! Vehicle kinematics, merge state machine, and car-following tests

use merge_sim::simulation::{
    resolve_speed, LaneClass, MergePhase, SimVehicle, VehicleId, MERGE_LANE_Y, MERGE_TRIGGER_X,
    SAFE_FOLLOWING_DISTANCE, THROUGH_LANE_Y, VEHICLE_WIDTH,
};

const DT: f32 = 1.0 / 60.0;

fn vehicle(id: usize, lane_class: LaneClass, x: f32, speed: f32) -> SimVehicle {
    let y = match lane_class {
        LaneClass::Through => THROUGH_LANE_Y,
        LaneClass::Merging => MERGE_LANE_Y,
    };
    let mut v = SimVehicle::new(VehicleId(id), lane_class, y, speed, 0.0);
    v.x = x;
    v
}

#[test]
fn test_through_vehicle_never_changes_phase() {
    let mut v = vehicle(0, LaneClass::Through, 0.0, 100.0);
    let mut now = 0.0;

    for _ in 0..600 {
        let prev_x = v.x;
        now += DT;
        v.update(DT, v.speed, now);
        assert_eq!(v.merge_phase, MergePhase::NotMerging);
        assert_eq!(v.y, THROUGH_LANE_Y);
        assert!(v.x >= prev_x, "x must be non-decreasing");
    }
}

#[test]
fn test_merge_trigger_fires_only_past_offset() {
    let mut v = vehicle(0, LaneClass::Merging, 0.0, 60.0);
    let mut now = 0.0;
    let mut transition_seen = false;

    for _ in 0..600 {
        let phase_before = v.merge_phase;
        now += DT;
        v.update(DT, v.speed, now);

        if v.merge_phase == MergePhase::NotMerging {
            assert!(
                v.x <= MERGE_TRIGGER_X,
                "still NotMerging at x={} past the trigger",
                v.x
            );
        }
        if phase_before == MergePhase::NotMerging && v.merge_phase == MergePhase::MergeInitiated {
            assert!(!transition_seen, "trigger fired twice");
            transition_seen = true;
            assert!(v.x > MERGE_TRIGGER_X);
        }
    }
    assert!(transition_seen, "vehicle never initiated its merge");
}

#[test]
fn test_merge_converges_and_snaps_to_centerline() {
    let mut v = vehicle(0, LaneClass::Merging, 0.0, 80.0);
    let mut now = 0.0;

    for _ in 0..3600 {
        let phase_before = v.merge_phase;
        let y_before = v.y;
        now += DT;
        v.update(DT, v.speed, now);

        if phase_before == MergePhase::MergeInitiated && v.merge_phase == MergePhase::MergeInitiated
        {
            assert!(v.y < y_before, "y must move strictly toward the target");
        }
        assert!(v.merge_phase >= phase_before, "phase regressed");

        if v.merge_phase == MergePhase::Merged {
            break;
        }
    }

    assert_eq!(v.merge_phase, MergePhase::Merged);
    assert_eq!(v.y, THROUGH_LANE_Y, "y must snap exactly to the centerline");
    assert!(v.merge_duration > 0.0);
    assert!((v.merge_duration - now).abs() < 1e-3);
}

#[test]
fn test_lane_change_halves_forward_progress() {
    let mut v = vehicle(0, LaneClass::Merging, 0.0, 80.0);
    let mut now = 0.0;

    // Drive until the lane change is underway.
    while v.merge_phase != MergePhase::MergeInitiated {
        now += DT;
        v.update(DT, v.speed, now);
    }

    let (x_before, y_before) = (v.x, v.y);
    now += DT;
    v.update(DT, v.speed, now);

    let dx = v.x - x_before;
    let dy = y_before - v.y;
    assert!((dx - v.speed * 0.5 * DT).abs() < 1e-4);
    assert!((dy - dx).abs() < 1e-4, "lateral and forward motion split evenly");
}

#[test]
fn test_near_contact_forces_hard_stop() {
    let follower = vehicle(0, LaneClass::Through, 0.0, 100.0);
    let leader = vehicle(1, LaneClass::Through, VEHICLE_WIDTH + 0.5, 100.0);

    let resolved = resolve_speed(&follower, [&leader].into_iter(), DT);
    assert_eq!(resolved, 0.0, "gap of 0.5 must force an exact stop");
}

#[test]
fn test_hard_stop_overrides_weaker_leaders() {
    let follower = vehicle(0, LaneClass::Through, 0.0, 100.0);
    let far_leader = vehicle(1, LaneClass::Through, VEHICLE_WIDTH + 50.0, 40.0);
    let near_leader = vehicle(2, LaneClass::Through, VEHICLE_WIDTH + 0.5, 100.0);

    let resolved = resolve_speed(&follower, [&far_leader, &near_leader].into_iter(), DT);
    assert_eq!(resolved, 0.0);
}

#[test]
fn test_most_restrictive_leader_wins() {
    let follower = vehicle(0, LaneClass::Through, 0.0, 100.0);
    let slow_leader = vehicle(1, LaneClass::Through, VEHICLE_WIDTH + 50.0, 30.0);
    let fast_leader = vehicle(2, LaneClass::Through, VEHICLE_WIDTH + 80.0, 110.0);

    let expected = |leader: &SimVehicle| {
        let gap = leader.x - (follower.x + VEHICLE_WIDTH);
        let fraction = gap / SAFE_FOLLOWING_DISTANCE;
        let target = leader.speed * fraction.clamp(0.1, 0.9);
        target.max(follower.speed - 50.0 * (1.0 - fraction) * DT)
    };

    let resolved = resolve_speed(&follower, [&slow_leader, &fast_leader].into_iter(), DT);
    let most_restrictive = expected(&slow_leader).min(expected(&fast_leader));
    assert!((resolved - most_restrictive).abs() < 1e-4);
}

#[test]
fn test_no_relevant_leader_leaves_speed_unchanged() {
    let v = vehicle(0, LaneClass::Through, 100.0, 95.0);

    // A vehicle behind is never a leader.
    let behind = vehicle(1, LaneClass::Through, 50.0, 120.0);
    assert_eq!(resolve_speed(&v, [&behind].into_iter(), DT), 95.0);

    // An on-ramp vehicle that has not begun its lane change is in another lane.
    let on_ramp = vehicle(2, LaneClass::Merging, 120.0, 60.0);
    assert_eq!(resolve_speed(&v, [&on_ramp].into_iter(), DT), 95.0);
}

#[test]
fn test_merging_vehicle_yields_to_through_traffic() {
    let mut merger = vehicle(0, LaneClass::Merging, 250.0, 80.0);
    merger.merge_phase = MergePhase::MergeInitiated;
    merger.y = 300.0;

    let through = vehicle(1, LaneClass::Through, 250.0 + VEHICLE_WIDTH + 60.0, 90.0);
    let resolved = resolve_speed(&merger, [&through].into_iter(), DT);
    assert!(
        resolved < merger.speed,
        "merging vehicle must slow for the lane it is crossing into"
    );
}

#[test]
fn test_lane_changer_is_an_obstacle_for_everyone() {
    let mut changer = vehicle(0, LaneClass::Merging, 300.0, 70.0);
    changer.merge_phase = MergePhase::MergeInitiated;
    changer.y = 300.0;

    // A through-lane vehicle right behind the lane changer must hard stop
    // even though their lane offsets differ.
    let through = vehicle(1, LaneClass::Through, 300.0 - VEHICLE_WIDTH - 0.5, 100.0);
    assert_eq!(resolve_speed(&through, [&changer].into_iter(), DT), 0.0);
}

#[test]
fn test_follower_never_exceeds_leader_within_safe_distance() {
    // Leader spawned first and driven alone for 0.1s; follower starts at the
    // origin with the same speed.
    let mut leader = vehicle(0, LaneClass::Through, 0.0, 100.0);
    let mut now = 0.1;
    leader.x = leader.speed * 0.1;
    let mut follower = vehicle(1, LaneClass::Through, 0.0, 100.0);

    for _ in 0..600 {
        let gap = leader.x - (follower.x + VEHICLE_WIDTH);
        let resolved = resolve_speed(&follower, [&leader].into_iter(), DT);

        assert!(resolved >= 0.0);
        if gap < SAFE_FOLLOWING_DISTANCE {
            assert!(
                resolved <= leader.speed,
                "follower at {} outpaces leader at {} with gap {}",
                resolved,
                leader.speed,
                gap
            );
        }

        now += DT;
        leader.update(DT, leader.speed, now);
        follower.update(DT, resolved, now);
    }
}
