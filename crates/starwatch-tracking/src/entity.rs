//! A single tracked object and its position prediction.

use starwatch_core::constants::{DEFAULT_RADIUS, MICROS_PER_SEC};
use starwatch_core::enums::EntityKind;
use starwatch_core::protocol::Snapshot;
use starwatch_core::types::{Acceleration, EntityKey, Position, Velocity};

/// Result of applying a snapshot to an existing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// State replaced and acceleration re-derived.
    Applied,
    /// Snapshot was not newer than the stored state; nothing changed.
    Stale,
}

/// Kinematic state of one object, keyed by `(kind, id)`.
///
/// Position and velocity are always the server's last word. Acceleration
/// is derived from consecutive velocities and stays zero until a second
/// snapshot has been seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    id: u64,
    position: Position,
    velocity: Velocity,
    acceleration: Acceleration,
    last_update_us: u64,
    radius: f64,
}

impl Entity {
    /// Create an entity from its first snapshot.
    pub fn new(snapshot: &Snapshot, time_us: u64) -> Self {
        Self {
            kind: snapshot.kind,
            id: snapshot.id,
            position: snapshot.position,
            velocity: snapshot.velocity,
            acceleration: Acceleration::default(),
            last_update_us: time_us,
            radius: snapshot.radius.unwrap_or(DEFAULT_RADIUS),
        }
    }

    /// Apply a newer snapshot in place.
    ///
    /// Snapshots stamped at or before the stored timestamp are dropped
    /// whole, so duplicates and reordered deliveries never divide by a
    /// zero or negative interval.
    pub fn update(&mut self, snapshot: &Snapshot, new_time_us: u64) -> UpdateOutcome {
        if new_time_us <= self.last_update_us {
            return UpdateOutcome::Stale;
        }

        let dt_sec = (new_time_us - self.last_update_us) as f64 / MICROS_PER_SEC;
        self.acceleration = Acceleration::new(
            (snapshot.velocity.x - self.velocity.x) / dt_sec,
            (snapshot.velocity.y - self.velocity.y) / dt_sec,
        );
        self.position = snapshot.position;
        self.velocity = snapshot.velocity;
        self.last_update_us = new_time_us;
        if let Some(radius) = snapshot.radius {
            self.radius = radius;
        }

        UpdateOutcome::Applied
    }

    /// Second-order extrapolation of the position at `at_us`.
    ///
    /// Pure arithmetic: instants before the last update extrapolate
    /// backwards. At `at_us == last_update_us` this is the stored position.
    pub fn predict(&self, at_us: u64) -> Position {
        let dt_sec = (at_us as f64 - self.last_update_us as f64) / MICROS_PER_SEC;
        let dt_half_sqr = dt_sec * dt_sec / 2.0;
        Position::new(
            self.position.x + self.velocity.x * dt_sec + self.acceleration.x * dt_half_sqr,
            self.position.y + self.velocity.y * dt_sec + self.acceleration.y * dt_half_sqr,
        )
    }

    /// Direction of travel (radians from +x), `None` when stationary.
    pub fn heading(&self) -> Option<f64> {
        self.velocity.heading()
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind, self.id)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    pub fn last_update_us(&self) -> u64 {
        self.last_update_us
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}
