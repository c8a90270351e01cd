use super::{Direction, Point, SignalState, Vec2, VehicleId};

/// Distance from a vehicle's reference point to its front bumper.
pub const FRONT_OFFSET: f32 = 22.0;
/// How far ahead of the front bumper a stop line is noticed.
pub const STOP_MARGIN: f32 = 15.0;
/// Gap below which a vehicle matches the speed of the one ahead.
pub const SAFETY_DISTANCE: f32 = 60.0;
pub const DEFAULT_MAX_SPEED: f32 = 4.0;

/// A single vehicle travelling along one approach. Motion is one-dimensional:
/// `position` is the coordinate along the direction's axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: VehicleId,
    direction: Direction,
    position: f32,
    speed: f32,
    max_speed: f32,
    active: bool,
}

impl Vehicle {
    pub fn new(id: VehicleId, direction: Direction, max_speed: f32) -> Self {
        Self::at(id, direction, direction.spawn_position(), max_speed)
    }

    /// Places a vehicle at an arbitrary axis coordinate, moving at full speed.
    pub fn at(id: VehicleId, direction: Direction, position: f32, max_speed: f32) -> Self {
        Self {
            id,
            direction,
            position,
            speed: max_speed,
            max_speed,
            active: true,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn heading_degrees(&self) -> f32 {
        self.direction.heading_degrees()
    }

    pub fn world_position(&self) -> Point {
        self.direction.to_world(self.position)
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction.unit_vector() * self.speed
    }

    pub fn front_bumper(&self) -> f32 {
        self.position + self.direction.sign() * FRONT_OFFSET
    }

    /// Signed gap from the front bumper to `stop_line`; positive while the
    /// line is still ahead.
    pub fn distance_to(&self, stop_line: f32) -> f32 {
        self.direction.sign() * (stop_line - self.front_bumper())
    }

    /// Stops just short of a red or yellow line; a green light restores full
    /// speed. Vehicles already past the line are never held by the signal.
    pub fn apply_signal(&mut self, signal: SignalState, stop_line: f32) {
        if !self.active {
            return;
        }

        let distance = self.distance_to(stop_line);
        let should_stop = signal.requires_stop() && distance > 0.0 && distance < STOP_MARGIN;

        if should_stop {
            self.speed = 0.0;
        } else if signal == SignalState::Green {
            self.speed = self.max_speed;
        }
    }

    /// Slowest speed among active same-direction vehicles within the safety
    /// distance ahead, if any.
    pub fn leader_speed<'a, I>(&self, population: I) -> Option<f32>
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let sign = self.direction.sign();

        population
            .into_iter()
            .filter(|other| other.id != self.id && other.active && other.direction == self.direction)
            .filter(|other| {
                let gap = sign * (other.position - self.position);
                gap > 0.0 && gap < SAFETY_DISTANCE
            })
            .map(|other| other.speed)
            .reduce(f32::min)
    }

    /// Clamps the speed to that of any vehicle close ahead. Must run after
    /// `apply_signal` in the same tick so a green light never overrides a
    /// slow leader. Reads the others' speeds as they are right now, so
    /// vehicles already updated this tick contribute their new speed.
    pub fn apply_leader_following<'a, I>(&mut self, population: I)
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        if !self.active {
            return;
        }

        if let Some(limit) = self.leader_speed(population) {
            self.speed = self.speed.min(limit);
        }
    }

    /// Advances by the current speed; leaving the simulated area is terminal.
    pub fn move_forward(&mut self) {
        if !self.active {
            return;
        }

        self.position += self.direction.sign() * self.speed;
        if self.direction.has_left_bounds(self.position) {
            self.deactivate();
        }
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}
