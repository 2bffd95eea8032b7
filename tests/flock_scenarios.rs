use nannou::prelude::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use terrain_boids::rules::{alignment, cohesion, separation};
use terrain_boids::{
    Agent, FlatTerrain, FloorBiasTiming, FlockingParams, HeightOracle, RollingTerrain,
    Simulation, SimulationConfig, SteeringForces, UpdateOrder,
};

const EPS: f32 = 1e-4;

fn config() -> SimulationConfig {
    SimulationConfig {
        world_bound: 300.0,
        seed: Some(0x5EED),
        ..SimulationConfig::default()
    }
}

// Ground rising one unit for every ten along X
struct Ramp;

impl HeightOracle for Ramp {
    fn elevation_at(&self, x: f32, _z: f32) -> f32 {
        x * 0.1
    }
}

fn still(x: f32, y: f32, z: f32) -> Agent {
    Agent::new(vec3(x, y, z), Vec3::ZERO)
}

fn three_agent_params(separation_weight: f32) -> FlockingParams {
    FlockingParams {
        separation_weight,
        alignment_weight: 1.0,
        cohesion_weight: 1.0,
        separation_radius: 30.0,
        alignment_radius: 50.0,
        cohesion_radius: 50.0,
    }
}

fn three_agents() -> Vec<Agent> {
    vec![
        still(0.0, 50.0, 0.0),
        still(5.0, 50.0, 0.0),
        still(60.0, 50.0, 0.0),
    ]
}

#[test]
fn speed_never_exceeds_max_speed() {
    let sim_config = SimulationConfig {
        population: 80,
        ..config()
    };
    let mut sim = Simulation::new(sim_config, RollingTerrain::new(99)).unwrap();
    let mut params = FlockingParams::default();
    let mut rng = StdRng::seed_from_u64(1);

    for tick in 0..300 {
        if tick % 50 == 0 {
            params.separation_weight = rng.gen_range(0.0..3.0);
            params.cohesion_radius = rng.gen_range(5.0..150.0);
        }
        sim.step(1.0 / 60.0, &params);
        for agent in sim.agents() {
            assert!(
                agent.speed() <= agent.max_speed + EPS,
                "tick {tick}: speed {} over {}",
                agent.speed(),
                agent.max_speed
            );
            assert!(agent.position.to_array().iter().all(|c| c.is_finite()));
        }
    }
}

#[test]
fn rule_outputs_are_bounded_by_max_force() {
    let mut sim = Simulation::new(
        SimulationConfig {
            population: 60,
            spawn_extent: 40.0,
            ..config()
        },
        FlatTerrain::default(),
    )
    .unwrap();
    sim.step(0.05, &FlockingParams::default());

    let flock = sim.flock();
    for agent in flock.iter() {
        for force in [
            separation(agent, flock, 25.0),
            alignment(agent, flock, 50.0),
            cohesion(agent, flock, 50.0),
        ] {
            assert!(force.length() <= agent.max_force + 1e-6);
        }
    }
}

#[test]
fn equal_weights_balance_separation_against_cohesion() {
    // Agents 0 and 1 are 5 apart: separation pushes them apart exactly as
    // hard as cohesion pulls them together, and alignment has nothing to
    // average because nobody is moving yet. Agent 2 is 55 and 60 away,
    // outside every radius.
    let mut sim =
        Simulation::with_agents(config(), FlatTerrain::new(0.0), three_agents()).unwrap();

    let far = sim.agents()[2];
    assert!(SteeringForces::evaluate(&far, sim.flock(), &three_agent_params(1.0)).is_zero());

    sim.step(0.1, &three_agent_params(1.0));

    for (before, after) in three_agents().iter().zip(sim.agents()) {
        assert!((after.position - before.position).length() < 1e-6);
        assert!(after.velocity.length() < 1e-6);
    }
    assert_eq!(sim.last_stats().isolated, 1);
}

#[test]
fn heavier_separation_pushes_close_pair_apart() {
    let mut sim =
        Simulation::with_agents(config(), FlatTerrain::new(0.0), three_agents()).unwrap();
    sim.step(0.1, &three_agent_params(2.0));

    // Agent 0 backs off first. By the time agent 1 is evaluated, agent 0 is
    // already moving away, so alignment and cohesion cancel agent 1's push.
    let agents = sim.agents();
    assert!(agents[0].position.x < -0.04);
    assert!(agents[1].position.x > 5.0 - 1e-5);
    assert!(agents[1].position.x - agents[0].position.x > 5.04);

    // Nothing reaches the far agent
    assert_eq!(agents[2].position, vec3(60.0, 50.0, 0.0));
    assert_eq!(agents[2].velocity, Vec3::ZERO);
}

#[test]
fn sequential_order_sees_agents_moved_earlier_in_the_tick() {
    let params = FlockingParams {
        separation_weight: 1.0,
        alignment_weight: 0.0,
        cohesion_weight: 0.0,
        separation_radius: 5.02,
        alignment_radius: 5.02,
        cohesion_radius: 5.02,
    };
    let agents = vec![still(0.0, 50.0, 0.0), still(5.0, 50.0, 0.0)];

    // Agent 0 steps away first, which takes it out of agent 1's radius
    let mut sequential =
        Simulation::with_agents(config(), FlatTerrain::new(0.0), agents.clone()).unwrap();
    sequential.step(0.1, &params);
    assert!(sequential.agents()[0].position.x < -0.04);
    assert_eq!(sequential.agents()[1].position.x, 5.0);

    // From a frozen snapshot both agents react to each other
    let snapshot_config = SimulationConfig {
        update_order: UpdateOrder::Snapshot,
        ..config()
    };
    let mut snapshot =
        Simulation::with_agents(snapshot_config, FlatTerrain::new(0.0), agents).unwrap();
    snapshot.step(0.1, &params);
    assert!(snapshot.agents()[0].position.x < -0.04);
    assert!(snapshot.agents()[1].position.x > 5.04);
}

#[test]
fn snapshot_order_is_independent_of_flock_order() {
    let snapshot_config = SimulationConfig {
        update_order: UpdateOrder::Snapshot,
        ..config()
    };
    let forward = vec![
        Agent::new(vec3(0.0, 60.0, 0.0), vec3(1.0, 0.0, 0.5)),
        Agent::new(vec3(8.0, 62.0, 3.0), vec3(-0.5, 0.2, 1.0)),
        Agent::new(vec3(-6.0, 58.0, 9.0), vec3(0.0, 0.0, -2.0)),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let params = FlockingParams::default();
    let mut a = Simulation::with_agents(snapshot_config.clone(), FlatTerrain::new(0.0), forward)
        .unwrap();
    let mut b =
        Simulation::with_agents(snapshot_config, FlatTerrain::new(0.0), reversed).unwrap();
    for _ in 0..5 {
        a.step(0.05, &params);
        b.step(0.05, &params);
    }

    for (x, y) in a.agents().iter().zip(b.agents().iter().rev()) {
        assert!((x.position - y.position).length() < 1e-4);
        assert!((x.velocity - y.velocity).length() < 1e-4);
    }
}

#[test]
fn floor_bias_lands_on_the_following_tick_by_default() {
    let mut sim =
        Simulation::with_agents(config(), FlatTerrain::new(0.0), vec![still(0.0, 5.0, 0.0)])
            .unwrap();
    let params = FlockingParams::default();

    sim.step(0.1, &params);
    let agent = sim.agents()[0];
    assert_eq!(agent.position.y, 5.0);
    assert_eq!(agent.velocity, Vec3::ZERO);
    assert!((agent.acceleration.y - 0.8).abs() < 1e-6);

    sim.step(0.1, &params);
    let agent = sim.agents()[0];
    assert!((agent.velocity.y - 0.8).abs() < 1e-6);
    assert!((agent.position.y - 5.8).abs() < EPS);
    // Still under the floor, so the next bias is already queued
    assert!((agent.acceleration.y - 0.8).abs() < 1e-6);
}

#[test]
fn same_tick_floor_bias_is_consumed_immediately() {
    let same_tick = SimulationConfig {
        floor_bias_timing: FloorBiasTiming::SameTick,
        ..config()
    };
    let mut sim =
        Simulation::with_agents(same_tick, FlatTerrain::new(0.0), vec![still(0.0, 5.0, 0.0)])
            .unwrap();

    sim.step(0.1, &FlockingParams::default());
    let agent = sim.agents()[0];
    assert!((agent.velocity.y - 0.8).abs() < 1e-6);
    assert!((agent.position.y - 5.8).abs() < EPS);
    assert_eq!(agent.acceleration, Vec3::ZERO);
}

#[test]
fn same_tick_ceiling_drop_uses_the_floor_sampled_before_moving() {
    let same_tick = SimulationConfig {
        floor_bias_timing: FloorBiasTiming::SameTick,
        ..config()
    };
    let ceiling = same_tick.world_bound + same_tick.ceiling_margin;
    let agents = vec![
        Agent::new(vec3(100.0, ceiling - 1.0, 0.0), vec3(2.0, 3.0, 0.0)),
        Agent::new(vec3(-150.0, ceiling - 1.0, 299.0), vec3(0.0, 3.0, 2.0)),
        Agent::new(vec3(299.0, ceiling - 1.0, -150.0), vec3(2.0, 3.0, 0.0)),
    ];
    let ramp = Ramp;
    let mut sim = Simulation::with_agents(same_tick, &ramp, agents).unwrap();
    sim.step(0.1, &FlockingParams::default());

    let agents = sim.agents();

    // Moved from x=100 to x=102, dropped to the floor at x=100
    assert_eq!(agents[0].position.x, 102.0);
    assert!((agents[0].position.y - 20.0).abs() < EPS);

    // Wrapped across Z; the floor comes from the same column
    assert_eq!(agents[1].position.z, -300.0);
    assert!((agents[1].position.y - (ramp.elevation_at(-150.0, 0.0) + 10.0)).abs() < EPS);

    // Wrapped across X; the drop height is still the pre-wrap column's
    assert_eq!(agents[2].position.x, -300.0);
    assert!((agents[2].position.y - 39.9).abs() < EPS);

    for agent in agents {
        assert_eq!(agent.acceleration, Vec3::ZERO);
    }
    assert_eq!(sim.last_stats().ceiling_drops, 3);
    assert_eq!(sim.last_stats().edge_wraps, 2);
}

#[test]
fn edges_wrap_during_step() {
    let bound = config().world_bound;
    let ceiling = bound + config().ceiling_margin;
    let agents = vec![
        Agent::new(vec3(bound - 1.0, 50.0, 0.0), vec3(4.0, 0.0, 0.0)),
        Agent::new(vec3(0.0, 50.0, -bound + 1.0), vec3(0.0, 0.0, -4.0)),
        Agent::new(vec3(150.0, ceiling - 1.0, 150.0), vec3(0.0, 4.0, 0.0)),
    ];
    let mut sim = Simulation::with_agents(config(), FlatTerrain::new(2.0), agents).unwrap();
    sim.step(0.1, &FlockingParams::default());

    let agents = sim.agents();
    assert_eq!(agents[0].position.x, -bound);
    assert_eq!(agents[1].position.z, bound);
    assert_eq!(agents[2].position.y, 12.0);

    let stats = sim.last_stats();
    assert_eq!(stats.edge_wraps, 2);
    assert_eq!(stats.ceiling_drops, 1);
}

#[test]
fn params_are_read_fresh_every_step() {
    let agents = vec![still(0.0, 50.0, 0.0), still(40.0, 50.0, 0.0)];
    let mut sim = Simulation::with_agents(config(), FlatTerrain::new(0.0), agents).unwrap();

    let mut params = FlockingParams {
        separation_radius: 30.0,
        alignment_radius: 30.0,
        cohesion_radius: 30.0,
        ..FlockingParams::default()
    };
    sim.step(0.1, &params);
    assert_eq!(sim.last_stats().isolated, 2);
    assert_eq!(sim.agents()[0].velocity, Vec3::ZERO);

    params.cohesion_radius = 60.0;
    sim.step(0.1, &params);
    assert_eq!(sim.last_stats().isolated, 0);
    assert!(sim.agents()[0].velocity.x > 0.0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut sim = Simulation::new(
            SimulationConfig {
                population: 30,
                ..config()
            },
            RollingTerrain::new(5),
        )
        .unwrap();
        for _ in 0..20 {
            sim.step(1.0 / 30.0, &FlockingParams::default());
        }
        sim.agents().to_vec()
    };
    assert_eq!(run(), run());
}
