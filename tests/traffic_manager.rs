use crossroads_sim::{
    config::{PhaseDurations, Scenario, SpawnMode},
    simulation::{Direction, PhaseController, TrafficManager, VehicleId},
};

fn scenario_with(spawn_mode: SpawnMode, spawn_interval_ticks: u32) -> Scenario {
    Scenario {
        spawn_mode,
        spawn_interval_ticks,
        ..Scenario::normal()
    }
}

fn quiet() -> Scenario {
    scenario_with(SpawnMode::Suppressed, 1)
}

#[test]
fn test_spawn_assigns_increasing_ids() {
    let mut traffic = TrafficManager::new(Some(7));

    let ids: Vec<_> = (0..5).filter_map(|_| traffic.spawn(None)).collect();

    assert_eq!(ids, (1..=5).map(VehicleId).collect::<Vec<_>>());
    assert_eq!(traffic.active_count(), 5);
    assert_eq!(traffic.total_spawned(), 5);
}

#[test]
fn test_spawn_in_fixed_direction_uses_spawn_point() {
    let mut traffic = TrafficManager::new(Some(7));

    let id = traffic.spawn(Some(Direction::West)).expect("spawn should succeed");
    let vehicle = traffic.get_vehicle(id).expect("vehicle should exist");

    assert_eq!(vehicle.direction(), Direction::West);
    assert_eq!(vehicle.position(), 600.0);
    assert_eq!(vehicle.world_position().y, 35.0);
}

#[test]
fn test_random_spawns_are_reproducible_with_seed() {
    let mut first = TrafficManager::new(Some(1234));
    let mut second = TrafficManager::new(Some(1234));

    for _ in 0..40 {
        first.spawn(None);
        second.spawn(None);
    }

    let directions = |traffic: &TrafficManager| -> Vec<Direction> {
        traffic.vehicles().iter().map(|v| v.direction()).collect()
    };
    assert_eq!(directions(&first), directions(&second));
}

#[test]
fn test_auto_spawn_cadence() {
    for mode in [SpawnMode::Random, SpawnMode::Fixed(Direction::North)] {
        let scenario = scenario_with(mode, 5);
        let mut traffic = TrafficManager::new(Some(3));

        let spawned: Vec<_> = (0..20).filter_map(|_| traffic.auto_spawn(&scenario)).collect();

        assert_eq!(spawned.len(), 4, "Wrong spawn count under {:?}", mode);
        assert_eq!(traffic.spawn_timer(), 0);
    }

    let scenario = scenario_with(SpawnMode::Fixed(Direction::North), 5);
    let mut traffic = TrafficManager::new(Some(3));
    for _ in 0..5 {
        traffic.auto_spawn(&scenario);
    }
    assert!(traffic.vehicles().iter().all(|v| v.direction() == Direction::North));
}

#[test]
fn test_suppressed_scenario_never_spawns() {
    let scenario = scenario_with(SpawnMode::Suppressed, 1);
    let mut traffic = TrafficManager::new(Some(3));

    for _ in 0..100 {
        assert_eq!(traffic.auto_spawn(&scenario), None);
    }

    assert_eq!(traffic.active_count(), 0);
    assert_eq!(traffic.spawn_timer(), 0);
}

#[test]
fn test_tick_spawns_on_interval() {
    let scenario = scenario_with(SpawnMode::Fixed(Direction::East), 3);
    let controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(3));

    let reports: Vec<_> = (0..6).map(|_| traffic.tick(&controller, &scenario)).collect();

    assert_eq!(reports[2].spawned, Some(VehicleId(1)));
    assert_eq!(reports[5].spawned, Some(VehicleId(2)));
    assert_eq!(reports.iter().filter(|r| r.spawned.is_some()).count(), 2);
}

#[test]
fn test_vehicle_leaving_area_is_evicted() {
    let scenario = quiet();
    let controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(3));
    traffic.spawn_at(Direction::East, 598.0);
    traffic.spawn_at(Direction::East, 0.0);

    let report = traffic.tick(&controller, &scenario);

    assert_eq!(report.evicted, 1);
    assert_eq!(traffic.vehicles().len(), 1);
    assert_eq!(traffic.get_vehicle(VehicleId(1)), None);
    assert!(traffic.vehicles().iter().all(|v| v.is_active()));
    assert_eq!(traffic.total_exited(), 1);
}

#[test]
fn test_queue_forms_at_red_light() {
    let scenario = quiet();
    let controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(3));
    // North/South starts on red.
    let leader = traffic.spawn_at(Direction::North, -120.0).expect("spawn");
    let follower = traffic.spawn_at(Direction::North, -160.0).expect("spawn");

    for _ in 0..50 {
        traffic.tick(&controller, &scenario);
    }

    let leader = traffic.get_vehicle(leader).expect("leader");
    let follower = traffic.get_vehicle(follower).expect("follower");
    assert_eq!(leader.speed(), 0.0);
    assert_eq!(leader.position(), -116.0);
    assert!(leader.distance_to(Direction::North.stop_line()) > 0.0);
    assert_eq!(follower.speed(), 0.0);
    assert_eq!(follower.position(), -156.0);
}

#[test]
fn test_queue_releases_on_green() {
    let scenario = quiet();
    let fast_signals = Scenario {
        phase_durations: PhaseDurations::new(1, 1, 1, 1),
        ..Scenario::normal()
    };
    let mut controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(3));
    let leader = traffic.spawn_at(Direction::North, -120.0).expect("spawn");
    let follower = traffic.spawn_at(Direction::North, -160.0).expect("spawn");
    for _ in 0..10 {
        traffic.tick(&controller, &scenario);
    }

    controller.advance(&fast_signals);
    controller.advance(&fast_signals);
    traffic.tick(&controller, &scenario);

    let leader = traffic.get_vehicle(leader).expect("leader");
    let follower = traffic.get_vehicle(follower).expect("follower");
    assert_eq!(leader.position(), -112.0);
    assert_eq!(follower.position(), -152.0);
    assert_eq!(follower.speed(), leader.speed());
}

#[test]
fn test_vehicles_never_overtake() {
    let scenario = Scenario::rush_hour();
    let mut controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(99));

    for tick in 0..5000 {
        controller.advance(&scenario);
        traffic.tick(&controller, &scenario);

        for direction in Direction::ALL {
            let progress: Vec<f32> = traffic.vehicles().iter()
                .filter(|v| v.direction() == direction)
                .map(|v| direction.sign() * v.position())
                .collect();
            assert!(
                progress.windows(2).all(|pair| pair[0] >= pair[1]),
                "Vehicles heading {} out of order at tick {}: {:?}", direction, tick, progress
            );
        }
    }

    assert!(traffic.total_exited() > 0);
}

#[test]
fn test_population_limit_drops_spawns() {
    let mut traffic = TrafficManager::new(Some(3)).with_max_vehicles(Some(2));

    assert!(traffic.spawn(None).is_some());
    assert!(traffic.spawn(None).is_some());
    assert_eq!(traffic.spawn(None), None);
    assert_eq!(traffic.active_count(), 2);
}

#[test]
fn test_reset_clears_population_and_counters() {
    let scenario = scenario_with(SpawnMode::Random, 2);
    let controller = PhaseController::new();
    let mut traffic = TrafficManager::new(Some(3));
    for _ in 0..11 {
        traffic.tick(&controller, &scenario);
    }
    assert!(traffic.active_count() > 0);

    traffic.reset();

    assert_eq!(traffic.active_count(), 0);
    assert_eq!(traffic.spawn_timer(), 0);
    assert_eq!(traffic.total_spawned(), 0);
    assert_eq!(traffic.spawn(None), Some(VehicleId(1)));
}
