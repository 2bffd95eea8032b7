/*
 * Steering Rules Module
 *
 * The three classic flocking rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Each rule is a pure function of (agent, flock, radius). Separation and
 * alignment finish through `steer` (Reynolds: steering = desired - velocity,
 * clamped to max_force); cohesion hands its target to `seek`, which does the
 * same thing for a point instead of a direction.
 */

use nannou::prelude::Vec3;

use crate::agent::{limit, normalize_or_none, Agent};
use crate::flock::Flock;
use crate::params::FlockingParams;

/// Raw (unweighted) output of each rule for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
}

impl SteeringForces {
    pub fn evaluate(agent: &Agent, flock: &Flock, params: &FlockingParams) -> Self {
        Self::evaluate_counted(agent, flock, params).0
    }

    /// Like `evaluate`, also returning how many neighbors fell inside the
    /// largest of the three radii.
    pub fn evaluate_counted(agent: &Agent, flock: &Flock, params: &FlockingParams) -> (Self, usize) {
        let (separation, near) = separation_counted(agent, flock, params.separation_radius);
        let (alignment, aligned) = alignment_counted(agent, flock, params.alignment_radius);
        let (cohesion, cohering) = cohesion_counted(agent, flock, params.cohesion_radius);

        // Radii nest, so the widest rule saw every neighbor the others did
        let neighbors = near.max(aligned).max(cohering);
        (
            Self {
                separation,
                alignment,
                cohesion,
            },
            neighbors,
        )
    }

    // Weighted sum, not clamped to max_force
    pub fn weighted(&self, params: &FlockingParams) -> Vec3 {
        self.separation * params.separation_weight
            + self.alignment * params.alignment_weight
            + self.cohesion * params.cohesion_weight
    }

    pub fn is_zero(&self) -> bool {
        self.separation == Vec3::ZERO && self.alignment == Vec3::ZERO && self.cohesion == Vec3::ZERO
    }
}

/// Rule combiner: the weighted steering this agent should add to its
/// acceleration this tick.
pub fn combine(agent: &Agent, flock: &Flock, params: &FlockingParams) -> Vec3 {
    SteeringForces::evaluate(agent, flock, params).weighted(params)
}

// Calculate separation force (avoid crowding neighbors)
pub fn separation(agent: &Agent, flock: &Flock, radius: f32) -> Vec3 {
    separation_counted(agent, flock, radius).0
}

fn separation_counted(agent: &Agent, flock: &Flock, radius: f32) -> (Vec3, usize) {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for neighbor in flock.neighbors_within(agent, radius) {
        // Vector pointing away from the neighbor, stronger when closer
        let away = agent.position - neighbor.agent.position;
        sum += (away / neighbor.distance) / neighbor.distance;
        count += 1;
    }

    if count == 0 {
        return (Vec3::ZERO, 0);
    }

    (steer(agent, sum / count as f32), count)
}

// Calculate alignment force (steer towards average heading of neighbors)
pub fn alignment(agent: &Agent, flock: &Flock, radius: f32) -> Vec3 {
    alignment_counted(agent, flock, radius).0
}

fn alignment_counted(agent: &Agent, flock: &Flock, radius: f32) -> (Vec3, usize) {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for neighbor in flock.neighbors_within(agent, radius) {
        sum += neighbor.agent.velocity;
        count += 1;
    }

    if count == 0 {
        return (Vec3::ZERO, 0);
    }

    (steer(agent, sum / count as f32), count)
}

// Calculate cohesion force (steer towards average position of neighbors)
pub fn cohesion(agent: &Agent, flock: &Flock, radius: f32) -> Vec3 {
    cohesion_counted(agent, flock, radius).0
}

fn cohesion_counted(agent: &Agent, flock: &Flock, radius: f32) -> (Vec3, usize) {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for neighbor in flock.neighbors_within(agent, radius) {
        sum += neighbor.agent.position;
        count += 1;
    }

    if count == 0 {
        return (Vec3::ZERO, 0);
    }

    (seek(agent, sum / count as f32), count)
}

/// Steering that turns `agent` toward `target` at full speed.
pub fn seek(agent: &Agent, target: Vec3) -> Vec3 {
    steer(agent, target - agent.position)
}

/// Shared finishing step: full speed along `direction`, minus current
/// velocity, clamped to the agent's max force. A zero direction gives no
/// steering at all.
pub fn steer(agent: &Agent, direction: Vec3) -> Vec3 {
    match normalize_or_none(direction) {
        Some(unit) => limit(unit * agent.max_speed - agent.velocity, agent.max_force),
        None => Vec3::ZERO,
    }
}
