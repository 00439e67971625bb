//! Car Drive - A 2D driving sandbox for reinforcement learning
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, sensing, episode state)
//! - `config`: Scenario configuration (spawn pose, obstacle layout, actors, markers)
//! - `leaderboard`: Best episode returns, kept by the driver
//! - `error`: Error types surfaced by the simulation and file handling

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod sim;

pub use config::EnvConfig;
pub use error::{FileError, SimError};
pub use leaderboard::Leaderboard;

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// World bounds (source units, origin at top-left, y grows downward)
    pub const WORLD_WIDTH: f64 = 400.0;
    pub const WORLD_HEIGHT: f64 = 400.0;

    /// Vehicle speed limits
    pub const MAX_FORWARD: f64 = 5.0;
    pub const MAX_REVERSE: f64 = -3.0;
    /// Largest acceleration accepted in a single step (either sign)
    pub const MAX_ACCEL_DELTA: f64 = 1.0;

    /// Vehicle silhouette (long side along the heading)
    pub const VEHICLE_LENGTH: f64 = 40.0;
    pub const VEHICLE_WIDTH: f64 = 30.0;

    /// Distance pushed back along the heading on a crash
    pub const CRASH_BOUNCE: f64 = 3.0;
    /// Speed magnitude left after a crash (direction reversed)
    pub const CRASH_DAMPING: f64 = 0.1;
    /// Reward lost on every move, crash or not
    pub const STEP_COST: f64 = 0.1;

    /// Sensor fan
    pub const RAY_COUNT: usize = 72;
    pub const SENSOR_RANGE: f64 = 100.0;
    pub const RAY_SPACING_DEG: f64 = 360.0 / RAY_COUNT as f64;

    /// Obstacle penalty weight (multiplied by |speed| on contact)
    pub const OBSTACLE_PENALTY: f64 = 50.0;

    /// Actor defaults
    pub const ACTOR_REWARD: f64 = 500.0;
    pub const ACTOR_SIZE: f64 = 32.0;
    pub const ACTOR_DISTANCE: f64 = 60.0;
    pub const ACTOR_SPEED: f64 = 0.5;

    /// Marker defaults
    pub const MARKER_SIZE: f64 = 30.0;
    pub const MARKER_VALUE: f64 = -1.0;

    /// Episode termination
    pub const MAX_AGE: u64 = 10_000;
    pub const REWARD_FLOOR: f64 = -1000.0;

    /// Default spawn pose
    pub const SPAWN_X: f64 = 100.0;
    pub const SPAWN_Y: f64 = 30.0;
    pub const SPAWN_HEADING: f64 = 0.0;
}

/// Sign of `value` with zero mapping to zero (unlike `f64::signum`)
#[inline]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wrap an angle in degrees into [0, 360). Any finite input stays finite.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees.
///
/// Positive angles turn +x toward +y, which on a y-down screen is clockwise.
#[inline]
pub fn heading_to_direction(degrees: f64) -> DVec2 {
    DVec2::from_angle(degrees.to_radians())
}

/// Rotate `v` by `degrees`, same sense as [`heading_to_direction`]
#[inline]
pub fn rotate_degrees(v: DVec2, degrees: f64) -> DVec2 {
    heading_to_direction(degrees).rotate(v)
}
