//! End-to-end episode scenarios

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use car_drive::config::{ActorConfig, EnvConfig, Spawn};
use car_drive::consts::*;
use car_drive::sim::{Action, EpisodePhase, Layout, Obstacle, Simulation};

/// Vehicle at the world centre facing +x, with the given walls
fn centre_sim(obstacles: Vec<Obstacle>) -> Simulation {
    let mut config = EnvConfig::with_layout(Layout::new(obstacles));
    config.spawn = Spawn {
        position: DVec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
        heading: 0.0,
    };
    Simulation::new(&config).unwrap()
}

#[test]
fn test_first_step_toward_wall() {
    // Wall face 50 units ahead
    let mut sim = centre_sim(vec![Obstacle::new(250.0, 150.0, 10.0, 100.0)]);
    let first = sim.reset();
    assert!((first[0] - 0.5).abs() < 1e-12);

    let out = sim.step((0.0, 1.0)).unwrap();
    assert_eq!(sim.state().vehicle.position(), DVec2::new(201.0, 200.0));
    assert!(out.collisions.obstacle_hits.is_empty());
    assert!((out.reward + 0.1).abs() < 1e-12);
    assert!((out.observation[0] - 0.49).abs() < 1e-12);
}

#[test]
fn test_crash_at_speed_two() {
    // Silhouette front is at x = 220 at spawn and x = 221 after one step
    let mut sim = centre_sim(vec![Obstacle::new(220.5, 150.0, 10.0, 100.0)]);
    sim.reset();

    let first = sim.step((0.0, 1.0)).unwrap();
    assert!(first.collisions.obstacle_hits.is_empty());
    assert_eq!(sim.state().vehicle.position(), DVec2::new(201.0, 200.0));

    let second = sim.step((0.0, 1.0)).unwrap();
    assert_eq!(second.collisions.obstacle_hits, vec![0]);
    assert!((second.reward - first.reward + 100.1).abs() < 1e-9);

    // Bounced back 3 units, then drifted back 0.1 at the damped speed
    let v = &sim.state().vehicle;
    assert!((v.position().x - 197.9).abs() < 1e-9);
    assert!((v.speed() + 0.1).abs() < 1e-12);
    assert!(!second.done);
}

#[test]
fn test_huge_steering_keeps_sensing() {
    // Closed box around the vehicle: every ray hits a wall within 100 units
    let mut sim = centre_sim(vec![
        Obstacle::new(140.0, 140.0, 120.0, 10.0),
        Obstacle::new(140.0, 250.0, 120.0, 10.0),
        Obstacle::new(140.0, 140.0, 10.0, 120.0),
        Obstacle::new(250.0, 140.0, 10.0, 120.0),
    ]);
    sim.reset();

    let turn = Action::Continuous {
        angle: 1.7e308,
        accel: 0.0,
    };
    sim.step(turn).unwrap();
    let out = sim.step(turn).unwrap();

    let v = &sim.state().vehicle;
    assert!((0.0..360.0).contains(&v.heading()));
    assert_eq!(v.position(), DVec2::new(200.0, 200.0));
    assert!((out.reward + 0.2).abs() < 1e-12);
    assert!(out.observation.iter().all(|r| r > 0.0 && r < 1.0));
}

#[test]
fn test_age_limit_ends_episode() {
    let mut sim = centre_sim(Vec::new());
    sim.reset();
    sim.state_mut().vehicle.age = MAX_AGE;
    let out = sim.step(Action::NOOP).unwrap();
    assert_eq!(sim.state().vehicle.age, MAX_AGE + 1);
    assert!(out.reward >= REWARD_FLOOR);
    assert!(out.done);
    assert_eq!(sim.phase(), EpisodePhase::Done);

    // Stepping past the end is allowed and stays done
    assert!(sim.step(Action::NOOP).unwrap().done);

    sim.reset();
    assert!(!sim.is_done());
}

#[test]
fn test_reward_floor_is_strict() {
    let mut sim = centre_sim(Vec::new());
    sim.reset();
    sim.state_mut().vehicle.reward = -1000.0;
    assert!(!sim.is_done());
    sim.state_mut().vehicle.reward = -1000.01;
    assert!(sim.is_done());
}

#[test]
fn test_dead_actor_is_passed_through() {
    let mut config = EnvConfig::with_layout(Layout::empty());
    config.spawn = Spawn {
        position: DVec2::new(200.0, 200.0),
        heading: 0.0,
    };
    // Stationary actor whose silhouette starts at x = 224
    let mut actor = ActorConfig::new(DVec2::new(240.0, 200.0), "updown");
    actor.speed = 0.0;
    config.actors.push(actor);
    let mut sim = Simulation::new(&config).unwrap();

    let mut kills = 0;
    let steps = 12;
    for _ in 0..steps {
        let out = sim.step((0.0, 1.0)).unwrap();
        kills += out.collisions.actors_killed.len();
    }
    assert_eq!(kills, 1);
    // Front bumper is now well inside the dead actor's silhouette
    assert!(sim.state().vehicle.position().x > 230.0);
    assert!(!sim.snapshot().actors[0].alive);

    let expected = -ACTOR_REWARD - STEP_COST * steps as f64;
    assert!((sim.state().vehicle.reward - expected).abs() < 1e-9);
}

#[test]
fn test_runs_are_reproducible() {
    let config = EnvConfig::default();
    let mut a = Simulation::new(&config).unwrap();
    let mut b = Simulation::new(&config).unwrap();
    let mut rng = Pcg32::seed_from_u64(42);

    assert_eq!(a.reset(), b.reset());
    for _ in 0..500 {
        let action = Action::Continuous {
            angle: rng.random_range(-10.0..=10.0),
            accel: rng.random_range(-1.0..=1.0),
        };
        let out_a = a.step(action).unwrap();
        let out_b = b.step(action).unwrap();
        assert_eq!(out_a, out_b);
        if out_a.done {
            a.reset();
            b.reset();
        }
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_snapshot_serializes() {
    let sim = Simulation::new(&EnvConfig::default()).unwrap();
    let json = serde_json::to_string(&sim.snapshot()).unwrap();
    assert!(json.contains("\"obstacles\""));
    assert_eq!(sim.snapshot().obstacles.len(), 27);
}
