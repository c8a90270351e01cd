use super::{Direction, DirectionGroup, SignalState};
use crate::config::Scenario;
use crate::error::SimError;
use log::{debug, info};
use std::fmt;

/// One entry of the fixed signal cycle. Each phase is a key into a small
/// table of per-direction signal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    GreenEastWest,
    YellowEastWest,
    GreenNorthSouth,
    YellowNorthSouth,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::GreenEastWest,
        Phase::YellowEastWest,
        Phase::GreenNorthSouth,
        Phase::YellowNorthSouth,
    ];

    pub fn next(self) -> Phase {
        match self {
            Phase::GreenEastWest => Phase::YellowEastWest,
            Phase::YellowEastWest => Phase::GreenNorthSouth,
            Phase::GreenNorthSouth => Phase::YellowNorthSouth,
            Phase::YellowNorthSouth => Phase::GreenEastWest,
        }
    }

    pub fn signal_for_group(self, group: DirectionGroup) -> SignalState {
        match (self, group) {
            (Phase::GreenEastWest, DirectionGroup::EastWest) => SignalState::Green,
            (Phase::YellowEastWest, DirectionGroup::EastWest) => SignalState::Yellow,
            (Phase::GreenNorthSouth, DirectionGroup::NorthSouth) => SignalState::Green,
            (Phase::YellowNorthSouth, DirectionGroup::NorthSouth) => SignalState::Yellow,
            _ => SignalState::Red,
        }
    }

    /// Short identifier shown on the operator HUD.
    pub fn label(self) -> &'static str {
        match self {
            Phase::GreenEastWest => "A",
            Phase::YellowEastWest => "A->B",
            Phase::GreenNorthSouth => "B",
            Phase::YellowNorthSouth => "B->A",
        }
    }

    fn signal_plan(self) -> [SignalState; 4] {
        let mut plan = [SignalState::Red; 4];
        for direction in Direction::ALL {
            plan[direction.index()] = self.signal_for_group(direction.group());
        }
        plan
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Timer-driven right-of-way assignment for the four approaches.
#[derive(Debug, Clone)]
pub struct PhaseController {
    phase: Phase,
    timer: u64,
    signals: [SignalState; 4],
}

impl PhaseController {
    pub fn new() -> Self {
        let phase = Phase::GreenEastWest;
        Self {
            phase,
            timer: 0,
            signals: phase.signal_plan(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> u64 {
        self.timer
    }

    /// Counts one tick and moves to the next phase once the scenario's
    /// duration for the current one has elapsed. Returns the phase entered,
    /// if any. Under manual control the timer runs but never triggers.
    pub fn advance(&mut self, scenario: &Scenario) -> Option<Phase> {
        self.timer += 1;

        if scenario.manual_control {
            return None;
        }

        if self.timer >= scenario.phase_durations.for_phase(self.phase) {
            self.transition();
            debug!("Phase {} entered on timer ({})", self.phase, scenario.name);
            return Some(self.phase);
        }

        None
    }

    /// Operator-triggered phase change. Only honoured under manual control so
    /// that automatic timing cannot be desynchronised.
    pub fn force_advance(&mut self, scenario: &Scenario) -> Result<Phase, SimError> {
        if !scenario.manual_control {
            return Err(SimError::ManualControlDisabled {
                scenario: scenario.name.clone(),
            });
        }

        self.transition();
        info!("Manual signal change to phase {}", self.phase);
        Ok(self.phase)
    }

    pub fn signal_state_for(&self, direction: Direction) -> SignalState {
        self.signals[direction.index()]
    }

    pub fn stop_line_for(&self, direction: Direction) -> f32 {
        direction.stop_line()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn transition(&mut self) {
        self.timer = 0;
        self.phase = self.phase.next();
        self.signals = self.phase.signal_plan();
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}
