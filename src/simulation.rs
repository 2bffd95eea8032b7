/*
 * Simulation Module
 *
 * Drives one tick of the flock. For every agent, in flock order:
 *   rules -> combiner -> integrator -> boundary policy
 * and once everyone has moved, the render poses are refreshed.
 *
 * FlockingParams are passed into every `step` call, so whatever the host
 * changed since the previous frame is what this tick uses.
 *
 * Two settings from SimulationConfig change the order of operations:
 * - UpdateOrder::Sequential lets later agents see the already moved state
 *   of earlier agents in the same tick; UpdateOrder::Snapshot steers every
 *   agent from a copy of the flock taken before the tick.
 * - FloorBiasTiming::NextTick checks the floor after integrating, so the
 *   bias is consumed on the following tick; SameTick checks before.
 */

use nannou::prelude::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::boundary::BoundaryPolicy;
use crate::debug::StepStats;
use crate::flock::Flock;
use crate::params::{ConfigError, FlockingParams, FloorBiasTiming, SimulationConfig, UpdateOrder};
use crate::rules::SteeringForces;
use crate::terrain::HeightOracle;

/// Where an agent is and which way it faces, for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    /// Unit facing direction. Holds the last known heading while the
    /// agent's velocity is zero.
    pub heading: Vec3,
}

impl AgentPose {
    pub fn look_at(&self) -> Vec3 {
        self.position + self.heading
    }
}

pub struct Simulation<O: HeightOracle> {
    flock: Flock,
    oracle: O,
    config: SimulationConfig,
    rng: StdRng,
    poses: Vec<AgentPose>,
    stats: StepStats,
    tick: u64,
}

impl<O: HeightOracle> Simulation<O> {
    /// Validates `config` and spawns `config.population` agents.
    pub fn new(config: SimulationConfig, oracle: O) -> Result<Self, ConfigError> {
        let mut sim = Self::with_agents(config, oracle, Vec::new())?;
        let population = sim.config.population;
        sim.respawn(population);
        Ok(sim)
    }

    /// A simulation over a caller-supplied population; nothing is spawned.
    pub fn with_agents(
        config: SimulationConfig,
        oracle: O,
        agents: Vec<Agent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Self {
            flock: Flock::from_agents(agents),
            oracle,
            config,
            rng,
            poses: Vec::new(),
            stats: StepStats::default(),
            tick: 0,
        };
        sim.refresh_poses();
        sim.stats.agents = sim.flock.len();

        info!(
            agents = sim.flock.len(),
            world_bound = sim.config.world_bound,
            order = ?sim.config.update_order,
            floor_timing = ?sim.config.floor_bias_timing,
            "simulation created"
        );
        Ok(sim)
    }

    /// Grow or shrink the flock to `population`. Existing agents keep their
    /// state; new ones are spawned at random.
    pub fn respawn(&mut self, population: usize) {
        if population < self.flock.len() {
            self.flock.truncate(population);
        } else {
            for _ in self.flock.len()..population {
                let agent = Agent::spawn(&mut self.rng, &self.config, &self.oracle);
                self.flock.push(agent);
            }
        }
        self.refresh_poses();
        info!(agents = self.flock.len(), "flock respawned");
    }

    // Throw away the current flock and spawn a new one of the same size
    pub fn reset(&mut self) {
        let population = self.flock.len();
        self.flock = Flock::new();
        self.poses.clear();
        self.respawn(population);
    }

    /// Advance every agent by one tick of `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f32, params: &FlockingParams) {
        let dt = if delta_seconds.is_finite() && delta_seconds >= 0.0 {
            delta_seconds
        } else {
            warn!(delta_seconds, "ignoring invalid time step, advancing by zero");
            0.0
        };

        let policy = BoundaryPolicy::from_config(&self.config);
        let mut stats = StepStats {
            tick: self.tick + 1,
            agents: self.flock.len(),
            ..StepStats::default()
        };

        match self.config.update_order {
            UpdateOrder::Sequential => {
                for i in 0..self.flock.len() {
                    let agent = self.flock.as_slice()[i];
                    let steering = steering_for(&agent, &self.flock, params, &mut stats);
                    if let Some(agent) = self.flock.get_mut(i) {
                        advance(agent, steering, dt, &self.oracle, &policy, &self.config, &mut stats);
                    }
                }
            }
            UpdateOrder::Snapshot => {
                let snapshot = self.flock.clone();
                let steering: Vec<Vec3> = snapshot
                    .iter()
                    .map(|agent| steering_for(agent, &snapshot, params, &mut stats))
                    .collect();
                for (agent, steering) in self.flock.iter_mut().zip(steering) {
                    advance(agent, steering, dt, &self.oracle, &policy, &self.config, &mut stats);
                }
            }
        }

        if !self.flock.is_empty() {
            let total: f32 = self.flock.iter().map(Agent::speed).sum();
            stats.mean_speed = total / self.flock.len() as f32;
        }

        self.refresh_poses();
        self.tick += 1;
        self.stats = stats;

        debug!(
            tick = stats.tick,
            agents = stats.agents,
            isolated = stats.isolated,
            floor = stats.floor_corrections,
            wraps = stats.edge_wraps,
            ceiling = stats.ceiling_drops,
            mean_speed = stats.mean_speed,
            "step"
        );
    }

    fn refresh_poses(&mut self) {
        self.poses.truncate(self.flock.len());
        for (i, agent) in self.flock.iter().enumerate() {
            let previous = self.poses.get(i).map_or(Vec3::Z, |pose| pose.heading);
            let pose = AgentPose {
                position: agent.position,
                heading: agent.heading().unwrap_or(previous),
            };
            match self.poses.get_mut(i) {
                Some(slot) => *slot = pose,
                None => self.poses.push(pose),
            }
        }
    }

    pub fn agents(&self) -> &[Agent] {
        self.flock.as_slice()
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn poses(&self) -> &[AgentPose] {
        &self.poses
    }

    pub fn last_stats(&self) -> StepStats {
        self.stats
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

// Rule combiner output for one agent, noting whether it had any neighbor
fn steering_for(agent: &Agent, flock: &Flock, params: &FlockingParams, stats: &mut StepStats) -> Vec3 {
    let (forces, neighbors) = SteeringForces::evaluate_counted(agent, flock, params);
    if neighbors == 0 {
        stats.isolated += 1;
    }
    forces.weighted(params)
}

// Combiner output in, integrated and boundary-corrected agent out
fn advance<O: HeightOracle + ?Sized>(
    agent: &mut Agent,
    steering: Vec3,
    dt: f32,
    oracle: &O,
    policy: &BoundaryPolicy,
    config: &SimulationConfig,
    stats: &mut StepStats,
) {
    agent.apply_force(steering);

    let (floored, wrap) = match config.floor_bias_timing {
        FloorBiasTiming::NextTick => {
            agent.integrate(dt, config.distance_scale);
            policy.apply(agent, oracle)
        }
        FloorBiasTiming::SameTick => {
            // One terrain sample serves the floor check and any ceiling drop
            let min_y = policy.floor_min_y(agent.position, oracle);
            let floored = policy.apply_floor(agent, min_y);
            agent.integrate(dt, config.distance_scale);
            (floored, policy.wrap(agent, min_y))
        }
    };

    if floored {
        stats.floor_corrections += 1;
    }
    if wrap.edge_wrapped() {
        stats.edge_wraps += 1;
    }
    if wrap.ceiling {
        stats.ceiling_drops += 1;
    }
}
