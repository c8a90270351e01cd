use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use crate::simulation::{Direction, Phase};
use super::Validate;

/// Everything the core needs to know about the active traffic scenario.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    pub name: String,
    pub phase_durations: PhaseDurations,
    pub spawn_interval_ticks: u32,
    #[serde(default)]
    pub spawn_mode: SpawnMode,
    /// Operator drives the signals; automatic phase timing is suspended.
    #[serde(default)]
    pub manual_control: bool,
}

/// Ticks each phase is held before the controller moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhaseDurations {
    pub green_east_west: u64,
    pub yellow_east_west: u64,
    pub green_north_south: u64,
    pub yellow_north_south: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    #[default]
    Random,
    Fixed(Direction),
    Suppressed,
}

impl PhaseDurations {
    pub const fn new(green_east_west: u64, yellow_east_west: u64, green_north_south: u64, yellow_north_south: u64) -> Self {
        Self {
            green_east_west,
            yellow_east_west,
            green_north_south,
            yellow_north_south,
        }
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::GreenEastWest => self.green_east_west,
            Phase::YellowEastWest => self.yellow_east_west,
            Phase::GreenNorthSouth => self.green_north_south,
            Phase::YellowNorthSouth => self.yellow_north_south,
        }
    }

    /// Length of one full signal cycle in ticks.
    pub fn cycle_length(&self) -> u64 {
        Phase::ALL.iter().map(|phase| self.for_phase(*phase)).sum()
    }
}

impl Scenario {
    pub fn normal() -> Self {
        Self {
            name: "SYNC_NORM".to_string(),
            phase_durations: PhaseDurations::new(200, 50, 200, 50),
            spawn_interval_ticks: 80,
            spawn_mode: SpawnMode::Random,
            manual_control: false,
        }
    }

    pub fn rush_hour() -> Self {
        Self {
            name: "RUSH_HOUR".to_string(),
            phase_durations: PhaseDurations::new(120, 40, 120, 40),
            spawn_interval_ticks: 30,
            spawn_mode: SpawnMode::Random,
            manual_control: false,
        }
    }

    pub fn night() -> Self {
        Self {
            name: "NIGHT_CMD".to_string(),
            phase_durations: PhaseDurations::new(300, 60, 300, 60),
            spawn_interval_ticks: 160,
            spawn_mode: SpawnMode::Random,
            manual_control: false,
        }
    }

    pub fn manual() -> Self {
        Self {
            name: "MNL_OVERRIDE".to_string(),
            phase_durations: PhaseDurations::new(200, 50, 200, 50),
            spawn_interval_ticks: 80,
            spawn_mode: SpawnMode::Random,
            manual_control: true,
        }
    }
}

impl Validate for Scenario {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("Scenario name must not be empty"));
        }

        for phase in Phase::ALL {
            if self.phase_durations.for_phase(phase) == 0 {
                return Err(anyhow!(
                    "Duration of phase {} in scenario '{}' must be greater than zero",
                    phase, self.name
                ));
            }
        }

        if self.spawn_interval_ticks == 0 {
            return Err(anyhow!("Spawn interval of scenario '{}' must be greater than zero", self.name));
        }

        Ok(())
    }
}
