use super::{Direction, PhaseController, Vehicle, VehicleId, DEFAULT_MAX_SPEED};
use crate::config::{Scenario, SpawnMode};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// What happened to the population during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: Option<VehicleId>,
    pub evicted: usize,
}

/// Owns every vehicle in the simulation, spawns new ones and drives the
/// per-tick update.
pub struct TrafficManager {
    vehicles: Vec<Vehicle>,
    next_vehicle_id: u64,
    spawn_timer: u32,
    max_speed: f32,
    max_vehicles: Option<usize>,
    total_spawned: u64,
    total_exited: u64,
    rng: StdRng,
}

impl TrafficManager {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        Self {
            vehicles: Vec::new(),
            next_vehicle_id: 1,
            spawn_timer: 0,
            max_speed: DEFAULT_MAX_SPEED,
            max_vehicles: None,
            total_spawned: 0,
            total_exited: 0,
            rng,
        }
    }

    /// Drops spawn requests once `limit` vehicles are alive.
    pub fn with_max_vehicles(mut self, limit: Option<usize>) -> Self {
        self.max_vehicles = limit;
        self
    }

    /// Adds a vehicle at the spawn point of `direction`, or of a uniformly
    /// random direction when none is given.
    pub fn spawn(&mut self, direction: Option<Direction>) -> Option<VehicleId> {
        let direction = match direction {
            Some(direction) => direction,
            None => *Direction::ALL.choose(&mut self.rng)?,
        };

        self.spawn_at(direction, direction.spawn_position())
    }

    /// Adds a vehicle part-way along an approach instead of at its spawn point.
    pub fn spawn_at(&mut self, direction: Direction, position: f32) -> Option<VehicleId> {
        if let Some(limit) = self.max_vehicles {
            if self.vehicles.len() >= limit {
                warn!("Spawn skipped: population limit of {} vehicles reached", limit);
                return None;
            }
        }

        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        self.vehicles.push(Vehicle::at(id, direction, position, self.max_speed));
        self.total_spawned += 1;

        debug!("Spawned vehicle {} heading {} at {:.1}", id, direction, position);
        Some(id)
    }

    /// Counts one tick towards the scenario's spawn interval and spawns when
    /// it is reached. A suppressed scenario never spawns.
    pub fn auto_spawn(&mut self, scenario: &Scenario) -> Option<VehicleId> {
        let direction = match scenario.spawn_mode {
            SpawnMode::Suppressed => return None,
            SpawnMode::Random => None,
            SpawnMode::Fixed(direction) => Some(direction),
        };

        self.spawn_timer += 1;
        if self.spawn_timer < scenario.spawn_interval_ticks {
            return None;
        }

        self.spawn_timer = 0;
        self.spawn(direction)
    }

    /// One simulation step for the whole population: spawn, then for every
    /// vehicle signal check, leader following and movement, then eviction.
    ///
    /// Vehicles are visited in spawn order and each one sees the speeds
    /// of the others as they stand at that moment. Vehicles earlier in the
    /// list have already been updated this tick, later ones have not.
    pub fn tick(&mut self, controller: &PhaseController, scenario: &Scenario) -> TickReport {
        let spawned = self.auto_spawn(scenario);

        for index in 0..self.vehicles.len() {
            let (before, rest) = self.vehicles.split_at_mut(index);
            let Some((vehicle, after)) = rest.split_first_mut() else {
                break;
            };

            if !vehicle.is_active() {
                continue;
            }

            let direction = vehicle.direction();
            vehicle.apply_signal(
                controller.signal_state_for(direction),
                controller.stop_line_for(direction),
            );
            vehicle.apply_leader_following(before.iter().chain(after.iter()));
            vehicle.move_forward();
        }

        let evicted = self.evict_inactive();

        TickReport { spawned, evicted }
    }

    fn evict_inactive(&mut self) -> usize {
        let before = self.vehicles.len();
        self.vehicles.retain(|vehicle| {
            if !vehicle.is_active() {
                debug!("Vehicle {} left the area heading {}", vehicle.id(), vehicle.direction());
            }
            vehicle.is_active()
        });

        let evicted = before - self.vehicles.len();
        self.total_exited += evicted as u64;
        evicted
    }

    pub fn active_count(&self) -> usize {
        self.vehicles.iter().filter(|vehicle| vehicle.is_active()).count()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id() == id)
    }

    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn total_exited(&self) -> u64 {
        self.total_exited
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.next_vehicle_id = 1;
        self.spawn_timer = 0;
        self.total_spawned = 0;
        self.total_exited = 0;
    }
}
