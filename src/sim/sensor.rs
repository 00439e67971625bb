//! Ray-fan proximity sensor
//!
//! 72 rays spaced 5° apart, starting at the vehicle heading and turning the
//! same way as a positive rotation. Each ray reports the distance to the
//! nearest obstacle edge it crosses, normalized by the sensor range.

use std::ops::Index;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, distance, segment_intersection};
use super::state::{Actor, Obstacle, Vehicle};
use crate::consts::*;
use crate::rotate_degrees;

/// Sensor options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Also cast against live actors. Off in the standard observation.
    #[serde(default)]
    pub sense_actors: bool,
}

/// Normalized ray readings in `[0, 1]`, one per ray, in ray order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation(Vec<f64>);

impl Observation {
    /// All rays at max range
    pub fn clear() -> Self {
        Self(vec![1.0; RAY_COUNT])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for Observation {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Ray `index` of the fan cast from `origin` with heading `direction`
pub fn ray(origin: DVec2, direction: DVec2, index: usize) -> Segment {
    let dir = rotate_degrees(direction, RAY_SPACING_DEG * index as f64);
    Segment::new(origin, origin + dir * SENSOR_RANGE)
}

/// Shortest distance along `ray` to any of `edges`, capped at `reading`.
///
/// Parallel or degenerate pairs contribute nothing.
fn nearest_hit(ray: Segment, edges: impl IntoIterator<Item = Segment>, mut reading: f64) -> f64 {
    for edge in edges {
        if let Ok(hit) = segment_intersection(ray, edge) {
            let d = distance(ray.start, hit);
            if d < reading {
                reading = d;
            }
        }
    }
    reading
}

/// Raw ray distances (not normalized) against obstacle sides
pub fn cast(vehicle: &Vehicle, obstacles: &[Obstacle]) -> Vec<f64> {
    (0..RAY_COUNT)
        .map(|i| {
            let r = ray(vehicle.position(), vehicle.direction(), i);
            nearest_hit(r, obstacles.iter().flat_map(|o| o.sides()), SENSOR_RANGE)
        })
        .collect()
}

/// The standard observation: obstacles only
pub fn observe(vehicle: &Vehicle, obstacles: &[Obstacle]) -> Observation {
    Observation(cast(vehicle, obstacles).into_iter().map(|d| d / SENSOR_RANGE).collect())
}

/// Observation that also senses the silhouettes of live actors
pub fn observe_with_actors(
    vehicle: &Vehicle,
    obstacles: &[Obstacle],
    actors: &[Actor],
) -> Observation {
    let readings = cast(vehicle, obstacles)
        .into_iter()
        .enumerate()
        .map(|(i, reading)| {
            let r = ray(vehicle.position(), vehicle.direction(), i);
            let edges = actors
                .iter()
                .filter(|a| a.is_alive())
                .flat_map(|a| a.shape().edges());
            nearest_hit(r, edges, reading) / SENSOR_RANGE
        })
        .collect();
    Observation(readings)
}

/// Observe according to `config`
pub fn sense(
    config: &SensorConfig,
    vehicle: &Vehicle,
    obstacles: &[Obstacle],
    actors: &[Actor],
) -> Observation {
    if config.sense_actors {
        observe_with_actors(vehicle, obstacles, actors)
    } else {
        observe(vehicle, obstacles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::WalkAxis;

    fn vehicle_at(x: f64, y: f64, heading: f64) -> Vehicle {
        Vehicle::new(DVec2::new(x, y), heading)
    }

    #[test]
    fn test_empty_world_reads_max() {
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[]);
        assert_eq!(obs.len(), RAY_COUNT);
        assert!(obs.iter().all(|r| r == 1.0));
    }

    #[test]
    fn test_wall_ahead() {
        // Left face of the wall is 50 units in front of the vehicle
        let wall = Obstacle::new(250.0, 150.0, 10.0, 100.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[wall]);
        assert!((obs[0] - 0.5).abs() < 1e-12);
        // Directly behind sees nothing
        assert_eq!(obs[RAY_COUNT / 2], 1.0);
    }

    #[test]
    fn test_ray_order_follows_rotation() {
        // Wall below the vehicle (+y). Ray 18 is +90° from heading 0.
        let wall = Obstacle::new(150.0, 230.0, 100.0, 10.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[wall]);
        assert!((obs[18] - 0.3).abs() < 1e-9);
        assert_eq!(obs[54], 1.0);

        // Turning the vehicle by +90° brings the wall to ray 0
        let obs = observe(&vehicle_at(200.0, 200.0, 90.0), &[wall]);
        assert!((obs[0] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_edge_wins() {
        let near = Obstacle::new(230.0, 190.0, 5.0, 20.0);
        let far = Obstacle::new(270.0, 190.0, 5.0, 20.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[far, near]);
        assert!((obs[0] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_edge_at_exact_range_reads_clear() {
        // Left face exactly 100 units ahead: the ray touches it at its tip
        let wall = Obstacle::new(300.0, 150.0, 10.0, 100.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[wall]);
        assert_eq!(obs[0], 1.0);

        let wall = Obstacle::new(299.999, 150.0, 10.0, 100.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[wall]);
        assert!(obs[0] < 1.0);
        assert!((obs[0] - 0.99999).abs() < 1e-9);
    }

    #[test]
    fn test_wall_beyond_range_is_ignored() {
        let wall = Obstacle::new(301.0, 150.0, 10.0, 100.0);
        let obs = observe(&vehicle_at(200.0, 200.0, 0.0), &[wall]);
        assert_eq!(obs[0], 1.0);
    }

    #[test]
    fn test_actors_only_sensed_when_enabled() {
        let actor = Actor::new(DVec2::new(260.0, 200.0), WalkAxis::UpDown, 60.0, 0.5);
        let v = vehicle_at(200.0, 200.0, 0.0);

        let plain = sense(&SensorConfig::default(), &v, &[], std::slice::from_ref(&actor));
        assert_eq!(plain[0], 1.0);

        let aware = sense(
            &SensorConfig { sense_actors: true },
            &v,
            &[],
            std::slice::from_ref(&actor),
        );
        assert!((aware[0] - 0.44).abs() < 1e-12);

        let mut dead = actor.clone();
        dead.kill();
        let aware = observe_with_actors(&v, &[], &[dead]);
        assert_eq!(aware[0], 1.0);
    }
}
