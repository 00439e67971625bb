//! Collision detection and response
//!
//! The vehicle is tested against obstacles, then live actors, then markers,
//! using exact silhouette overlap. Every contact applies on its own: several
//! walls hit in one step each charge their penalty and each bounce the
//! vehicle back.

use super::state::{Actor, Marker, Obstacle, Vehicle};

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Indices of obstacles hit, in layout order
    pub obstacle_hits: Vec<usize>,
    /// Indices of actors killed
    pub actors_killed: Vec<usize>,
    /// (marker index, value paid) for every overlapping marker
    pub markers_collected: Vec<(usize, f64)>,
    /// Net reward change from this pass
    pub reward_delta: f64,
}

impl CollisionReport {
    /// True if the vehicle crashed into anything
    pub fn crashed(&self) -> bool {
        !self.obstacle_hits.is_empty() || !self.actors_killed.is_empty()
    }
}

/// Apply every contact between the vehicle and the world
pub fn resolve_collisions(
    vehicle: &mut Vehicle,
    obstacles: &[Obstacle],
    actors: &mut [Actor],
    markers: &mut [Marker],
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let start_reward = vehicle.reward;

    for (i, obstacle) in obstacles.iter().enumerate() {
        if vehicle.shape().overlaps(&obstacle.shape()) {
            let penalty = obstacle.penalty * vehicle.speed().abs();
            vehicle.reward -= penalty;
            vehicle.crash();
            log::debug!("Hit obstacle {} (penalty {:.2})", i, penalty);
            report.obstacle_hits.push(i);
        }
    }

    for (i, actor) in actors.iter_mut().enumerate() {
        if actor.is_alive() && vehicle.shape().overlaps(&actor.shape()) {
            vehicle.reward -= actor.reward;
            vehicle.crash();
            actor.kill();
            log::debug!("Ran over actor {} (penalty {:.0})", i, actor.reward);
            report.actors_killed.push(i);
        }
    }

    for (i, marker) in markers.iter_mut().enumerate() {
        if vehicle.shape().overlaps(&marker.shape()) {
            let value = marker.collect();
            vehicle.reward += value;
            if value != 0.0 {
                log::debug!("Collected marker {} ({:+.2})", i, value);
            }
            report.markers_collected.push((i, value));
        }
    }

    report.reward_delta = vehicle.reward - start_reward;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::WalkAxis;
    use glam::DVec2;

    /// Vehicle at (200, 200) facing +x, front bumper at x = 220
    fn vehicle_with_speed(speed_steps: usize) -> Vehicle {
        let mut v = Vehicle::new(DVec2::new(200.0, 200.0), 0.0);
        for _ in 0..speed_steps {
            v.accelerate(1.0).unwrap();
        }
        v
    }

    #[test]
    fn test_obstacle_penalty_scales_with_speed() {
        let mut v = vehicle_with_speed(2);
        let wall = Obstacle::new(215.0, 150.0, 10.0, 100.0);
        let report = resolve_collisions(&mut v, &[wall], &mut [], &mut []);

        assert_eq!(report.obstacle_hits, vec![0]);
        assert!((v.reward + 100.0).abs() < 1e-12);
        assert_eq!(v.position(), DVec2::new(197.0, 200.0));
        assert!((v.speed() + CRASH_DAMPING).abs() < 1e-12);
    }

    #[test]
    fn test_each_overlapping_obstacle_applies() {
        let mut v = vehicle_with_speed(2);
        let a = Obstacle::new(215.0, 150.0, 10.0, 100.0);
        let b = Obstacle::new(150.0, 210.0, 100.0, 10.0);
        let report = resolve_collisions(&mut v, &[a, b], &mut [], &mut []);

        assert_eq!(report.obstacle_hits, vec![0, 1]);
        // First hit at speed 2, second at the damped speed 0.1
        let expected = -(OBSTACLE_PENALTY * 2.0 + OBSTACLE_PENALTY * CRASH_DAMPING);
        assert!((v.reward - expected).abs() < 1e-9);
        // Second crash reverses the reversed speed again
        assert!((v.speed() - CRASH_DAMPING).abs() < 1e-12);
    }

    #[test]
    fn test_touching_is_not_a_hit() {
        // Vehicle silhouette spans x 180..220, y 185..215
        let mut v = vehicle_with_speed(1);
        let corner = Obstacle::new(220.0, 215.0, 10.0, 10.0);
        let edge = Obstacle::new(220.0, 150.0, 10.0, 100.0);
        let report = resolve_collisions(&mut v, &[corner, edge], &mut [], &mut []);
        assert!(report.obstacle_hits.is_empty());
        assert_eq!(v.reward, 0.0);

        let mut v = vehicle_with_speed(1);
        let corner = Obstacle::new(219.5, 214.5, 10.0, 10.0);
        let report = resolve_collisions(&mut v, &[corner], &mut [], &mut []);
        assert_eq!(report.obstacle_hits, vec![0]);
    }

    #[test]
    fn test_reversing_onto_track_wall_edge() {
        // Rear bumper of a vehicle at (80, 30) sits exactly on the wall's right face
        let wall = Obstacle::new(50.0, 0.0, 10.0, 80.0);
        let mut v = Vehicle::new(DVec2::new(80.0, 30.0), 0.0);
        v.accelerate(-1.0).unwrap();
        let report = resolve_collisions(&mut v, &[wall], &mut [], &mut []);
        assert!(report.obstacle_hits.is_empty());
        assert_eq!(v.position(), DVec2::new(80.0, 30.0));

        v.advance();
        let report = resolve_collisions(&mut v, &[wall], &mut [], &mut []);
        assert_eq!(report.obstacle_hits, vec![0]);
        assert!((report.reward_delta + OBSTACLE_PENALTY).abs() < 1e-12);
        assert_eq!(v.position(), DVec2::new(82.0, 30.0));
    }

    #[test]
    fn test_rotated_vehicle_misses_bounding_box_corner() {
        // At 45° the silhouette's bounding box spans 175.3..224.7 on both axes,
        // but the silhouette itself stays clear of the box's top-right corner.
        let mut v = Vehicle::new(DVec2::new(200.0, 200.0), 45.0);
        let wall = Obstacle::new(221.0, 178.0, 2.0, 2.0);
        let report = resolve_collisions(&mut v, &[wall], &mut [], &mut []);
        assert!(report.obstacle_hits.is_empty());
        assert_eq!(v.reward, 0.0);
    }

    #[test]
    fn test_actor_killed_once() {
        let mut v = vehicle_with_speed(1);
        let mut actors = vec![Actor::new(
            DVec2::new(225.0, 200.0),
            WalkAxis::UpDown,
            60.0,
            0.5,
        )];

        let report = resolve_collisions(&mut v, &[], &mut actors, &mut []);
        assert_eq!(report.actors_killed, vec![0]);
        assert!((v.reward + ACTOR_REWARD).abs() < 1e-12);
        assert!(!actors[0].is_alive());

        // Still overlapping, but dead actors are ignored
        let mut v = vehicle_with_speed(1);
        let report = resolve_collisions(&mut v, &[], &mut actors, &mut []);
        assert!(report.actors_killed.is_empty());
        assert_eq!(v.reward, 0.0);
    }

    #[test]
    fn test_obstacle_and_actor_both_apply() {
        let mut v = vehicle_with_speed(1);
        let wall = Obstacle::new(219.0, 150.0, 10.0, 100.0);
        let mut actors = vec![Actor::new(DVec2::new(200.0, 225.0), WalkAxis::LeftRight, 60.0, 0.5)];
        let report = resolve_collisions(&mut v, &[wall], &mut actors, &mut []);

        assert_eq!(report.obstacle_hits, vec![0]);
        assert_eq!(report.actors_killed, vec![0]);
        assert!(report.crashed());
        let expected = -(OBSTACLE_PENALTY * 1.0 + ACTOR_REWARD);
        assert!((v.reward - expected).abs() < 1e-9);
    }

    #[test]
    fn test_marker_pays_once() {
        let mut markers = vec![Marker::new(DVec2::new(210.0, 200.0), 20.0)];

        let mut v = vehicle_with_speed(0);
        let report = resolve_collisions(&mut v, &[], &mut [], &mut markers);
        assert_eq!(report.markers_collected, vec![(0, 20.0)]);
        assert_eq!(v.reward, 20.0);
        assert!(!report.crashed());

        let report = resolve_collisions(&mut v, &[], &mut [], &mut markers);
        assert_eq!(report.markers_collected, vec![(0, 0.0)]);
        assert_eq!(v.reward, 20.0);
        assert_eq!(report.reward_delta, 0.0);
    }
}
