//! Episode state and entity types
//!
//! Everything one episode mutates lives here. The obstacle layout is shared
//! behind an `Arc` and never mutated.

use std::str::FromStr;
use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, Shape};
use super::layout::Layout;
use crate::consts::*;
use crate::error::SimError;
use crate::{heading_to_direction, normalize_degrees, sign};

/// Phase of an episode, derived from the vehicle's age and reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Freshly reset, no step taken yet
    Reset,
    /// Steps are being applied
    Running,
    /// Age or reward limit crossed; waiting for a reset
    Done,
}

/// Whether a point lies inside the world rectangle (right/bottom edges excluded)
#[inline]
pub fn in_world(p: DVec2) -> bool {
    p.x >= 0.0 && p.x < WORLD_WIDTH && p.y >= 0.0 && p.y < WORLD_HEIGHT
}

/// The agent-controlled car
#[derive(Debug, Clone)]
pub struct Vehicle {
    position: DVec2,
    /// Heading in degrees, kept in [0, 360)
    heading: f64,
    direction: DVec2,
    /// Signed speed, kept within [MAX_REVERSE, MAX_FORWARD]
    speed: f64,
    /// Steps taken this episode
    pub age: u64,
    /// Reward accumulated since reset
    pub reward: f64,
    shape: Shape,
}

impl Vehicle {
    pub fn new(position: DVec2, heading: f64) -> Self {
        let heading = normalize_degrees(heading);
        let direction = heading_to_direction(heading);
        Self {
            position,
            heading,
            direction,
            speed: 0.0,
            age: 0,
            reward: 0.0,
            shape: Shape::oriented_rect(position, direction, VEHICLE_LENGTH, VEHICLE_WIDTH),
        }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current silhouette (40x30 rectangle along the heading)
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    fn refresh_shape(&mut self) {
        self.shape =
            Shape::oriented_rect(self.position, self.direction, VEHICLE_LENGTH, VEHICLE_WIDTH);
    }

    /// Turn by `delta` degrees. A zero delta leaves everything untouched.
    ///
    /// The heading wraps into [0, 360) so any finite delta keeps it finite.
    pub fn rotate(&mut self, delta: f64) {
        if delta != 0.0 {
            self.heading = normalize_degrees(self.heading + delta);
            self.direction = heading_to_direction(self.heading);
            self.refresh_shape();
        }
    }

    /// Change speed by `delta`, which must lie in [-1, 1]
    pub fn accelerate(&mut self, delta: f64) -> Result<(), SimError> {
        if !(-MAX_ACCEL_DELTA..=MAX_ACCEL_DELTA).contains(&delta) {
            return Err(SimError::InvalidAcceleration(delta));
        }
        self.speed = (self.speed + delta).clamp(MAX_REVERSE, MAX_FORWARD);
        Ok(())
    }

    /// Bounce back along the heading and nearly stop, reversing direction
    pub fn crash(&mut self) {
        let s = sign(self.speed);
        self.position -= self.direction * (CRASH_BOUNCE * s);
        self.speed = -CRASH_DAMPING * s;
        self.refresh_shape();
    }

    /// Move one step along the heading. A move that would leave the world
    /// is replaced by a crash. The step cost applies either way.
    ///
    /// Returns false when the move was rejected.
    pub fn advance(&mut self) -> bool {
        let target = self.position + self.direction * self.speed;
        let moved = in_world(target);
        if moved {
            self.position = target;
            self.refresh_shape();
        } else {
            log::debug!(
                "Vehicle left the world at ({:.1}, {:.1}), crashing",
                target.x,
                target.y
            );
            self.crash();
        }
        self.reward -= STEP_COST;
        moved
    }
}

/// Static axis-aligned wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Reward lost per unit of speed on contact
    #[serde(default = "default_penalty")]
    pub penalty: f64,
}

fn default_penalty() -> f64 {
    OBSTACLE_PENALTY
}

impl Obstacle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            penalty: OBSTACLE_PENALTY,
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::rect(DVec2::new(self.x, self.y), self.width, self.height)
    }

    /// Sides in the order right, bottom, left, top
    pub fn sides(&self) -> [Segment; 4] {
        self.shape().edges()
    }
}

/// Axis an actor walks back and forth along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkAxis {
    /// Starts walking toward -y
    UpDown,
    /// Starts walking toward -x
    LeftRight,
}

impl WalkAxis {
    pub fn initial_direction(self) -> DVec2 {
        match self {
            WalkAxis::UpDown => DVec2::new(0.0, -1.0),
            WalkAxis::LeftRight => DVec2::new(-1.0, 0.0),
        }
    }
}

impl FromStr for WalkAxis {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "updown" => Ok(WalkAxis::UpDown),
            "leftright" => Ok(WalkAxis::LeftRight),
            other => Err(SimError::InvalidDirection(other.to_string())),
        }
    }
}

/// Actor life state. Dead actors stay in the arena at their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Life {
    #[default]
    Alive,
    Dead,
}

/// A moving body that oscillates along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub axis: WalkAxis,
    /// Point the current leg started from
    pub pivot: DVec2,
    pub position: DVec2,
    pub direction: DVec2,
    /// Length of one leg
    pub distance: f64,
    pub speed: f64,
    /// Reward lost by the vehicle that hits this actor
    pub reward: f64,
    pub life: Life,
}

impl Actor {
    pub fn new(position: DVec2, axis: WalkAxis, distance: f64, speed: f64) -> Self {
        Self {
            axis,
            pivot: position,
            position,
            direction: axis.initial_direction(),
            distance,
            speed,
            reward: ACTOR_REWARD,
            life: Life::Alive,
        }
    }

    /// Build an actor from an axis name (`"updown"` or `"leftright"`)
    pub fn with_axis_name(
        position: DVec2,
        axis: &str,
        distance: f64,
        speed: f64,
    ) -> Result<Self, SimError> {
        Ok(Self::new(position, axis.parse()?, distance, speed))
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }

    /// Current silhouette (32x32 square centred on the position)
    pub fn shape(&self) -> Shape {
        Shape::centered_rect(self.position, ACTOR_SIZE, ACTOR_SIZE)
    }

    /// Walk one step; turn around once a full leg has been covered
    pub fn advance(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.position += self.direction * self.speed;
        if (self.position - self.pivot).dot(self.direction) >= self.distance {
            self.pivot = self.position;
            self.direction = -self.direction;
        }
    }

    pub fn kill(&mut self) {
        self.life = Life::Dead;
    }
}

/// One-shot reward pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: DVec2,
    value: f64,
    collected: bool,
}

impl Marker {
    pub fn new(position: DVec2, value: f64) -> Self {
        Self {
            position,
            value,
            collected: false,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Take the marker's value. Only the first call pays out; afterwards 0.
    pub fn collect(&mut self) -> f64 {
        let value = self.value;
        self.value = 0.0;
        self.collected = true;
        value
    }

    /// Current silhouette (30x30 square centred on the position)
    pub fn shape(&self) -> Shape {
        Shape::centered_rect(self.position, MARKER_SIZE, MARKER_SIZE)
    }
}

/// Everything one episode owns
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub vehicle: Vehicle,
    /// Shared, read-only obstacle set
    pub layout: Arc<Layout>,
    /// Actor arena (indices are stable for the whole episode)
    pub actors: Vec<Actor>,
    pub markers: Vec<Marker>,
}

impl EpisodeState {
    pub fn new(
        layout: Arc<Layout>,
        vehicle: Vehicle,
        actors: Vec<Actor>,
        markers: Vec<Marker>,
    ) -> Self {
        Self {
            vehicle,
            layout,
            actors,
            markers,
        }
    }

    /// Age limit exceeded or reward below the floor (both strict)
    pub fn is_done(&self) -> bool {
        self.vehicle.age > MAX_AGE || self.vehicle.reward < REWARD_FLOOR
    }

    pub fn phase(&self) -> EpisodePhase {
        if self.is_done() {
            EpisodePhase::Done
        } else if self.vehicle.age == 0 {
            EpisodePhase::Reset
        } else {
            EpisodePhase::Running
        }
    }

    /// Advance every live actor by one step
    pub fn advance_actors(&mut self) {
        for actor in self.actors.iter_mut() {
            actor.advance();
        }
    }
}
