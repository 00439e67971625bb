//! Scenario configuration
//!
//! Describes what varies between scenarios: where the vehicle spawns, the
//! obstacle layout, and the actors and markers placed in it. Physical
//! constants stay in [`crate::consts`]. Stored as JSON.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{FileError, SimError};
use crate::sim::layout::Layout;
use crate::sim::sensor::SensorConfig;
use crate::sim::state::{Actor, Marker, Vehicle};

/// Vehicle pose at the start of every episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub position: DVec2,
    /// Degrees
    pub heading: f64,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            position: DVec2::new(SPAWN_X, SPAWN_Y),
            heading: SPAWN_HEADING,
        }
    }
}

impl Spawn {
    pub fn vehicle(&self) -> Vehicle {
        Vehicle::new(self.position, self.heading)
    }
}

fn default_actor_distance() -> f64 {
    ACTOR_DISTANCE
}

fn default_actor_speed() -> f64 {
    ACTOR_SPEED
}

fn default_marker_value() -> f64 {
    MARKER_VALUE
}

/// An actor placement. `axis` is `"updown"` or `"leftright"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorConfig {
    pub position: DVec2,
    pub axis: String,
    #[serde(default = "default_actor_distance")]
    pub distance: f64,
    #[serde(default = "default_actor_speed")]
    pub speed: f64,
}

impl ActorConfig {
    pub fn new(position: DVec2, axis: impl Into<String>) -> Self {
        Self {
            position,
            axis: axis.into(),
            distance: ACTOR_DISTANCE,
            speed: ACTOR_SPEED,
        }
    }

    pub fn build(&self) -> Result<Actor, SimError> {
        Actor::with_axis_name(self.position, &self.axis, self.distance, self.speed)
    }
}

/// A marker placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub position: DVec2,
    #[serde(default = "default_marker_value")]
    pub value: f64,
}

impl MarkerConfig {
    pub fn build(&self) -> Marker {
        Marker::new(self.position, self.value)
    }
}

/// Complete scenario description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnvConfig {
    #[serde(default)]
    pub spawn: Spawn,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
    #[serde(default)]
    pub markers: Vec<MarkerConfig>,
    #[serde(default)]
    pub sensor: SensorConfig,
}

impl EnvConfig {
    /// Default spawn and sensor with the given obstacles and nothing else
    pub fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// Validate actor placements and build the actor arena
    pub fn build_actors(&self) -> Result<Vec<Actor>, SimError> {
        self.actors.iter().map(ActorConfig::build).collect()
    }

    pub fn build_markers(&self) -> Vec<Marker> {
        self.markers.iter().map(MarkerConfig::build).collect()
    }

    pub fn from_json(json: &str) -> Result<Self, FileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, FileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!(
            "Loaded config from {} ({} obstacles, {} actors, {} markers)",
            path.display(),
            config.layout.len(),
            config.actors.len(),
            config.markers.len()
        );
        Ok(config)
    }

    /// Write a config file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Read a config file, falling back to the default track on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({}: {})", path.as_ref().display(), e);
                Self::default()
            }
        }
    }
}
