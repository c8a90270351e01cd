use super::{Direction, Phase, PhaseController, SimulationClock, TrafficManager, VehicleId};
use crate::config::{Scenario, ScenarioCatalog};
use crate::error::SimError;
use log::info;
use std::fmt;
use std::str::FromStr;

/// Operator actions available while the simulation is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Play,
    Pause,
    Stop,
    Reset,
    Scenario(String),
    /// Manual signal change; only accepted by manual-control scenarios.
    Flip,
    Spawn(Option<Direction>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    Resumed,
    Paused,
    Stopped,
    Reset,
    ScenarioChanged(String),
    PhaseChanged(Phase),
    Spawned(Option<VehicleId>),
}

impl FromStr for ControlCommand {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        match (verb.as_str(), argument) {
            ("play" | "run" | "resume", None) => Ok(ControlCommand::Play),
            ("pause", None) => Ok(ControlCommand::Pause),
            ("stop" | "abort" | "quit", None) => Ok(ControlCommand::Stop),
            ("reset", None) => Ok(ControlCommand::Reset),
            ("scenario", Some(name)) => Ok(ControlCommand::Scenario(name.to_string())),
            ("flip", None) => Ok(ControlCommand::Flip),
            ("spawn", None) => Ok(ControlCommand::Spawn(None)),
            ("spawn", Some(direction)) => Ok(ControlCommand::Spawn(Some(direction.parse()?))),
            _ => Err(SimError::UnknownCommand(s.trim().to_string())),
        }
    }
}

/// What one call to [`Simulation::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub phase_change: Option<Phase>,
    pub spawned: Option<VehicleId>,
    pub evicted: usize,
}

/// Operator dashboard contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    pub scenario: String,
    pub phase: Phase,
    pub active_vehicles: usize,
    pub paused: bool,
    pub tick: u64,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID_SCNR :: {} | ID_PHASE :: {} | ID_VTF :: {:02} UNITS | TICK :: {} | STATUS: {}",
            self.scenario,
            self.phase,
            self.active_vehicles,
            self.tick,
            if self.paused { "PAUSED" } else { "OPERATIONAL" }
        )
    }
}

/// Whole intersection: signals, vehicles, the active scenario and the clock.
/// Everything runs on the caller's thread; commands are applied between steps.
pub struct Simulation {
    catalog: ScenarioCatalog,
    scenario_key: String,
    scenario: Scenario,
    controller: PhaseController,
    traffic: TrafficManager,
    clock: SimulationClock,
    paused: bool,
    running: bool,
}

impl Simulation {
    pub fn new(catalog: ScenarioCatalog) -> Result<Self, SimError> {
        let scenario_key = catalog.default.clone();
        let scenario = catalog.default_scenario()?.clone();
        let traffic = TrafficManager::new(catalog.seed).with_max_vehicles(catalog.max_vehicles);

        info!("Simulation ready with scenario {} ({})", scenario_key, scenario.name);

        Ok(Self {
            catalog,
            scenario_key,
            scenario,
            controller: PhaseController::new(),
            traffic,
            clock: SimulationClock::new(),
            paused: false,
            running: true,
        })
    }

    /// Advances signals and traffic by one tick. Returns `None` while paused
    /// or stopped, leaving all state untouched.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.paused || !self.running {
            return None;
        }

        let phase_change = self.controller.advance(&self.scenario);
        if let Some(phase) = phase_change {
            info!("Phase changed to {} at tick {}", phase, self.clock.ticks());
        }

        let report = self.traffic.tick(&self.controller, &self.scenario);
        self.clock.advance();

        Some(StepReport {
            tick: self.clock.ticks(),
            phase_change,
            spawned: report.spawned,
            evicted: report.evicted,
        })
    }

    pub fn apply(&mut self, command: ControlCommand) -> Result<ControlOutcome, SimError> {
        info!("Operator command: {:?}", command);

        match command {
            ControlCommand::Play => {
                self.resume();
                Ok(ControlOutcome::Resumed)
            }
            ControlCommand::Pause => {
                self.pause();
                Ok(ControlOutcome::Paused)
            }
            ControlCommand::Stop => {
                self.stop();
                Ok(ControlOutcome::Stopped)
            }
            ControlCommand::Reset => {
                self.reset();
                Ok(ControlOutcome::Reset)
            }
            ControlCommand::Scenario(key) => {
                self.select_scenario(&key)?;
                Ok(ControlOutcome::ScenarioChanged(key))
            }
            ControlCommand::Flip => self.manual_flip().map(ControlOutcome::PhaseChanged),
            ControlCommand::Spawn(direction) => Ok(ControlOutcome::Spawned(self.traffic.spawn(direction))),
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("Simulation stopped at tick {}", self.clock.ticks());
    }

    /// Empties the intersection and restarts the signal cycle. The
    /// simulation is left paused.
    pub fn reset(&mut self) {
        self.traffic.reset();
        self.controller.reset();
        self.clock.reset();
        self.paused = true;
        info!("Simulation reset");
    }

    pub fn select_scenario(&mut self, key: &str) -> Result<(), SimError> {
        let scenario = self.catalog.get(key)?.clone();
        info!("Scenario changed from {} to {} ({})", self.scenario_key, key, scenario.name);
        self.scenario_key = key.to_string();
        self.scenario = scenario;
        Ok(())
    }

    pub fn manual_flip(&mut self) -> Result<Phase, SimError> {
        self.controller.force_advance(&self.scenario)
    }

    pub fn snapshot(&self) -> Telemetry {
        Telemetry {
            scenario: self.scenario.name.clone(),
            phase: self.controller.phase(),
            active_vehicles: self.traffic.active_count(),
            paused: self.paused,
            tick: self.clock.ticks(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_key(&self) -> &str {
        &self.scenario_key
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn traffic(&self) -> &TrafficManager {
        &self.traffic
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }
}
