//! Simulation step
//!
//! One `tick` applies an action and advances the episode by exactly one
//! step: rotate, accelerate, resolve collisions, move, walk actors, age,
//! observe. `Simulation` wraps the episode state with reset/step/snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionReport, resolve_collisions};
use super::layout::Layout;
use super::sensor::{Observation, SensorConfig, sense};
use super::state::{Actor, EpisodePhase, EpisodeState, Marker, Obstacle};
use crate::config::{EnvConfig, Spawn};
use crate::consts::*;
use crate::error::SimError;

/// Steering change of the discrete turn actions (degrees)
pub const TURN_STEP: f64 = 10.0;
/// Speed change of the discrete throttle actions
pub const THROTTLE_STEP: f64 = 0.5;

/// (angle, accel) for each discrete action index
pub const DISCRETE_ACTIONS: [(f64, f64); 5] = [
    (0.0, THROTTLE_STEP),
    (0.0, -THROTTLE_STEP),
    (TURN_STEP, 0.0),
    (-TURN_STEP, 0.0),
    (0.0, 0.0),
];

/// An agent's control input for one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Index into [`DISCRETE_ACTIONS`]
    Discrete(usize),
    /// Direct control: steering in degrees, throttle in [-1, 1]
    Continuous { angle: f64, accel: f64 },
}

impl Action {
    pub const ACCELERATE: Action = Action::Discrete(0);
    pub const BRAKE: Action = Action::Discrete(1);
    pub const TURN_RIGHT: Action = Action::Discrete(2);
    pub const TURN_LEFT: Action = Action::Discrete(3);
    pub const NOOP: Action = Action::Discrete(4);

    /// Resolve to a validated (angle, accel) pair
    pub fn controls(self) -> Result<(f64, f64), SimError> {
        let (angle, accel) = match self {
            Action::Discrete(index) => *DISCRETE_ACTIONS
                .get(index)
                .ok_or(SimError::UnknownAction(index))?,
            Action::Continuous { angle, accel } => (angle, accel),
        };
        if !angle.is_finite() {
            return Err(SimError::InvalidAngle(angle));
        }
        if !(-MAX_ACCEL_DELTA..=MAX_ACCEL_DELTA).contains(&accel) {
            return Err(SimError::InvalidAcceleration(accel));
        }
        Ok((angle, accel))
    }
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Action::Discrete(index)
    }
}

impl From<(f64, f64)> for Action {
    fn from((angle, accel): (f64, f64)) -> Self {
        Action::Continuous { angle, accel }
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    /// Reward accumulated since the last reset
    pub reward: f64,
    pub done: bool,
    /// Auxiliary info; always empty
    pub info: HashMap<String, f64>,
    /// Contacts resolved during this step
    pub collisions: CollisionReport,
}

/// Advance the episode by one step.
///
/// An invalid action is rejected before anything is touched.
pub fn tick(
    state: &mut EpisodeState,
    action: Action,
    sensor: &SensorConfig,
) -> Result<StepOutcome, SimError> {
    let (angle, accel) = action.controls()?;

    if state.is_done() {
        log::warn!(
            "Stepping a finished episode (age {}, reward {:.2})",
            state.vehicle.age,
            state.vehicle.reward
        );
    }

    state.vehicle.rotate(angle);
    state.vehicle.accelerate(accel)?;

    let collisions = resolve_collisions(
        &mut state.vehicle,
        &state.layout.obstacles,
        &mut state.actors,
        &mut state.markers,
    );

    state.vehicle.advance();
    state.advance_actors();
    state.vehicle.age += 1;

    let observation = sense(sensor, &state.vehicle, &state.layout.obstacles, &state.actors);
    let done = state.is_done();

    log::trace!(
        "age {} pos ({:.2}, {:.2}) heading {:.1} speed {:.2} reward {:.2}",
        state.vehicle.age,
        state.vehicle.position().x,
        state.vehicle.position().y,
        state.vehicle.heading(),
        state.vehicle.speed(),
        state.vehicle.reward
    );

    Ok(StepOutcome {
        observation,
        reward: state.vehicle.reward,
        done,
        info: HashMap::new(),
        collisions,
    })
}

/// Vehicle pose for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub position: DVec2,
    pub heading: f64,
    pub speed: f64,
    pub age: u64,
    pub reward: f64,
    /// Silhouette corners
    pub outline: [DVec2; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub position: DVec2,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub position: DVec2,
    pub collected: bool,
}

/// Read-only picture of the world, for anything that draws or records it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub episode: u64,
    pub phase: EpisodePhase,
    pub vehicle: VehicleView,
    pub obstacles: Vec<Obstacle>,
    pub actors: Vec<ActorView>,
    pub markers: Vec<MarkerView>,
}

/// A driving environment: one episode at a time over a fixed layout
#[derive(Debug, Clone)]
pub struct Simulation {
    layout: Arc<Layout>,
    spawn: Spawn,
    sensor: SensorConfig,
    /// Pristine actors and markers, cloned into each episode
    actors: Vec<Actor>,
    markers: Vec<Marker>,
    state: EpisodeState,
    episode: u64,
}

impl Simulation {
    /// Build from a config and start the first episode.
    ///
    /// Fails if an actor has an unknown axis.
    pub fn new(config: &EnvConfig) -> Result<Self, SimError> {
        Self::with_shared_layout(Arc::new(config.layout.clone()), config)
    }

    /// Build over an existing shared layout (`config.layout` is ignored)
    pub fn with_shared_layout(layout: Arc<Layout>, config: &EnvConfig) -> Result<Self, SimError> {
        let actors = config.build_actors()?;
        let markers = config.build_markers();
        let state = EpisodeState::new(
            Arc::clone(&layout),
            config.spawn.vehicle(),
            actors.clone(),
            markers.clone(),
        );
        let mut sim = Self {
            layout,
            spawn: config.spawn,
            sensor: config.sensor,
            actors,
            markers,
            state,
            episode: 0,
        };
        sim.reset();
        Ok(sim)
    }

    /// Start a new episode and return its first observation
    pub fn reset(&mut self) -> Observation {
        if self.state.vehicle.age > 0 {
            log::info!(
                "Episode {} ended after {} steps with reward {:.2}",
                self.episode,
                self.state.vehicle.age,
                self.state.vehicle.reward
            );
        }
        self.episode += 1;
        self.state = EpisodeState::new(
            Arc::clone(&self.layout),
            self.spawn.vehicle(),
            self.actors.clone(),
            self.markers.clone(),
        );
        log::debug!(
            "Episode {} reset at ({:.1}, {:.1}) heading {:.1}",
            self.episode,
            self.spawn.position.x,
            self.spawn.position.y,
            self.spawn.heading
        );
        self.observe()
    }

    /// Apply one action
    pub fn step(&mut self, action: impl Into<Action>) -> Result<StepOutcome, SimError> {
        let was_done = self.state.is_done();
        let outcome = tick(&mut self.state, action.into(), &self.sensor)?;
        if outcome.done && !was_done {
            log::info!(
                "Episode {} done at age {} (reward {:.2})",
                self.episode,
                self.state.vehicle.age,
                outcome.reward
            );
        }
        Ok(outcome)
    }

    /// Observation of the current state
    pub fn observe(&self) -> Observation {
        sense(
            &self.sensor,
            &self.state.vehicle,
            &self.layout.obstacles,
            &self.state.actors,
        )
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn phase(&self) -> EpisodePhase {
        self.state.phase()
    }

    /// Episodes started so far, counting the one started by `new`
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Direct access for scripted setups; the layout stays shared
    pub fn state_mut(&mut self) -> &mut EpisodeState {
        &mut self.state
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn snapshot(&self) -> Snapshot {
        let v = &self.state.vehicle;
        Snapshot {
            episode: self.episode,
            phase: self.state.phase(),
            vehicle: VehicleView {
                position: v.position(),
                heading: v.heading(),
                speed: v.speed(),
                age: v.age,
                reward: v.reward,
                outline: v.shape().vertices,
            },
            obstacles: self.layout.obstacles.clone(),
            actors: self
                .state
                .actors
                .iter()
                .map(|a| ActorView {
                    position: a.position,
                    alive: a.is_alive(),
                })
                .collect(),
            markers: self
                .state
                .markers
                .iter()
                .map(|m| MarkerView {
                    position: m.position,
                    collected: m.is_collected(),
                })
                .collect(),
        }
    }
}
