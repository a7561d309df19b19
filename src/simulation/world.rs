//! Main simulation world that ties everything together
//!
//! The world owns every live vehicle along with the spawn scheduler, the
//! statistics aggregator, and the simulation clock, so multiple independent
//! simulations can run side by side. All mutation happens inside
//! [`SimWorld::tick`]; everything else is a read-only query.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use super::collision::resolve_speed;
use super::spawner::{SpawnScheduler, MIN_SPAWN_RATE};
use super::stats::SimStats;
use super::types::{
    LaneClass, MergePhase, VehicleId, MERGE_LANE_Y, MERGE_SPEED_RANGE, SEGMENT_LENGTH,
    THROUGH_LANE_Y, THROUGH_SPEED_RANGE,
};
use super::vehicle::SimVehicle;

/// The merge simulation world
pub struct SimWorld {
    /// All live vehicles
    vehicles: HashMap<VehicleId, SimVehicle>,

    /// Spawn timers and rates for both lanes
    scheduler: SpawnScheduler,

    /// Aggregated merge outcomes and speed samples
    stats: SimStats,

    /// Next vehicle ID to assign
    next_id: usize,

    /// Simulation time in seconds
    time: f32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>) -> Self {
        Self {
            vehicles: HashMap::new(),
            scheduler: SpawnScheduler::default(),
            stats: SimStats::new(),
            next_id: 0,
            time: 0.0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    /// Set both spawn rates in vehicles per minute, clamped to the floor.
    pub fn configure_rates(&mut self, through_rate: u32, merge_rate: u32) {
        self.scheduler = SpawnScheduler::new(
            through_rate.max(MIN_SPAWN_RATE),
            merge_rate.max(MIN_SPAWN_RATE),
        );
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative time steps are rejected: the core does not infer intent
    /// from a clock running backwards.
    pub fn tick(&mut self, dt: f32) {
        if dt < 0.0 {
            warn!("rejecting negative time step: {dt}");
            return;
        }
        self.time += dt;

        self.spawn_vehicles(dt);
        self.update_vehicles(dt);
        self.remove_exited();
        self.stats.sample_speeds(dt, self.vehicles.values());
    }

    /// Spawn vehicles due according to the scheduler's rates.
    fn spawn_vehicles(&mut self, dt: f32) {
        let requests = self.scheduler.tick(dt);
        if requests.through {
            let speed = self.random_range(THROUGH_SPEED_RANGE);
            self.spawn_vehicle(LaneClass::Through, speed);
        }
        if requests.merging {
            let speed = self.random_range(MERGE_SPEED_RANGE);
            self.spawn_vehicle(LaneClass::Merging, speed);
        }
    }

    /// Add a vehicle at the start of the segment in its lane's centerline.
    ///
    /// The scheduler drives this during [`SimWorld::tick`]; embedders and
    /// tests can also call it directly for deterministic setups.
    pub fn spawn_vehicle(&mut self, lane_class: LaneClass, speed: f32) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;

        let y = match lane_class {
            LaneClass::Through => THROUGH_LANE_Y,
            LaneClass::Merging => MERGE_LANE_Y,
        };
        let vehicle = SimVehicle::new(id, lane_class, y, speed, self.time);
        self.vehicles.insert(id, vehicle);
        self.stats.record_spawn(lane_class);
        id
    }

    /// Resolve every vehicle's speed against the state at the start of the
    /// tick, then apply all position updates. The two-phase pass keeps the
    /// outcome independent of update order: no vehicle reacts to a leader
    /// that has already advanced this tick.
    fn update_vehicles(&mut self, dt: f32) {
        let resolved: Vec<(VehicleId, f32)> = self
            .vehicles
            .values()
            .map(|vehicle| (vehicle.id, resolve_speed(vehicle, self.vehicles.values(), dt)))
            .collect();

        let now = self.time;
        for (id, speed) in resolved {
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.update(dt, speed, now);
            }
        }
    }

    /// Sweep vehicles that have left the segment, after the update pass has
    /// fully completed. Merged vehicles count as successful merges; every
    /// other exit is simply discarded.
    fn remove_exited(&mut self) {
        let exited: Vec<VehicleId> = self
            .vehicles
            .values()
            .filter(|vehicle| vehicle.x > SEGMENT_LENGTH)
            .map(|vehicle| vehicle.id)
            .collect();

        for id in exited {
            if let Some(vehicle) = self.vehicles.remove(&id) {
                if vehicle.merge_phase == MergePhase::Merged {
                    self.stats.record_successful_merge(vehicle.merge_duration);
                    debug!(
                        "vehicle {:?} merged in {:.2}s and exited",
                        vehicle.id, vehicle.merge_duration
                    );
                } else {
                    debug!("vehicle {:?} exited", vehicle.id);
                }
            }
        }
    }

    /// Current simulation time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns an iterator over all live vehicles
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &SimVehicle> {
        self.vehicles.values()
    }

    /// Number of live vehicles
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Gets a reference to the vehicle with the given ID, if it is live
    pub fn get_vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&id)
    }

    /// Aggregated merge outcomes and speed histories
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn through_rate(&self) -> u32 {
        self.scheduler.through_rate()
    }

    pub fn merge_rate(&self) -> u32 {
        self.scheduler.merge_rate()
    }

    pub fn increase_through_rate(&mut self) {
        self.scheduler.increase_through_rate();
    }

    /// Returns false when the rate is already at the floor.
    pub fn decrease_through_rate(&mut self) -> bool {
        self.scheduler.decrease_through_rate()
    }

    pub fn increase_merge_rate(&mut self) {
        self.scheduler.increase_merge_rate();
    }

    /// Returns false when the rate is already at the floor.
    pub fn decrease_merge_rate(&mut self) -> bool {
        self.scheduler.decrease_merge_rate()
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Merge Simulation Summary ===");
        println!("Time: {:.2}s", self.time);
        println!(
            "Rates: through={}/min, merge={}/min",
            self.scheduler.through_rate(),
            self.scheduler.merge_rate()
        );

        let through_live = self
            .vehicles
            .values()
            .filter(|v| v.lane_class == LaneClass::Through)
            .count();
        let merging_live = self.vehicles.len() - through_live;
        println!(
            "Vehicles: {} live ({} through, {} merging)",
            self.vehicles.len(),
            through_live,
            merging_live
        );

        println!(
            "Spawned: {} total, {} merging",
            self.stats.total_spawned, self.stats.total_merging_spawned
        );
        println!("Successful merges: {}", self.stats.successful_merges);
        match self.stats.success_rate() {
            Some(rate) => println!("Success rate: {:.1}%", rate * 100.0),
            None => println!("Success rate: no data"),
        }
        match self.stats.average_merge_duration() {
            Some(avg) => println!("Average merge time: {:.2}s", avg),
            None => println!("Average merge time: no data"),
        }
        if let Some(speed) = self.stats.through_speed_history().back() {
            println!("Mean through speed: {:.1}", speed);
        }
        if let Some(speed) = self.stats.merge_speed_history().back() {
            println!("Mean merge-lane speed: {:.1}", speed);
        }
    }
}
