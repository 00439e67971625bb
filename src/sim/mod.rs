//! Driving sandbox core
//!
//! Geometry, entities, the ray sensor and collision response, composed into
//! [`Simulation`]. A step depends only on the episode state and the action:
//! obstacles are scanned in layout order and actors and markers in arena
//! order, and nothing here draws, reads the clock or owns an RNG. Agents
//! bring their own randomness.

pub mod collision;
pub mod geometry;
pub mod layout;
pub mod sensor;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve_collisions};
pub use geometry::{
    NoIntersection, Segment, Shape, distance, intersection_point, intersects, segment_intersection,
};
pub use layout::Layout;
pub use sensor::{Observation, SensorConfig, observe, observe_with_actors, sense};
pub use state::{
    Actor, EpisodePhase, EpisodeState, Life, Marker, Obstacle, Vehicle, WalkAxis, in_world,
};
pub use tick::{
    Action, ActorView, DISCRETE_ACTIONS, MarkerView, Simulation, Snapshot, StepOutcome,
    VehicleView, tick,
};
