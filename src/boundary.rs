/*
 * Boundary Policy Module
 *
 * Keeps agents above the terrain and inside the world cube:
 * - Terrain floor: below `elevation + floor_clearance` an upward bias is
 *   added to the acceleration accumulator.
 * - Edge wrap: X and Z teleport to the opposite edge. Y only wraps at the
 *   top, where the agent is dropped back to the floor height.
 *
 * The terrain is queried once per agent per tick (`floor_min_y`); the
 * resulting height is shared by the floor check and the ceiling drop.
 */

use nannou::prelude::Vec3;

use crate::agent::Agent;
use crate::params::SimulationConfig;
use crate::terrain::HeightOracle;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryPolicy {
    pub world_bound: f32,
    pub floor_clearance: f32,
    pub floor_bias: f32,
    pub ceiling_margin: f32,
}

/// What the edge wrap did to one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WrapOutcome {
    pub x: bool,
    pub z: bool,
    pub ceiling: bool,
}

impl WrapOutcome {
    pub fn edge_wrapped(&self) -> bool {
        self.x || self.z
    }
}

impl BoundaryPolicy {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            world_bound: config.world_bound,
            floor_clearance: config.floor_clearance,
            floor_bias: config.floor_bias,
            ceiling_margin: config.ceiling_margin,
        }
    }

    /// Lowest comfortable altitude at the agent's horizontal position.
    pub fn floor_min_y<O: HeightOracle + ?Sized>(&self, position: Vec3, oracle: &O) -> f32 {
        oracle.elevation_at(position.x, position.z) + self.floor_clearance
    }

    /// Adds the upward bias when the agent is under `min_y`. Returns whether
    /// it did.
    pub fn apply_floor(&self, agent: &mut Agent, min_y: f32) -> bool {
        if agent.position.y < min_y {
            agent.acceleration.y += self.floor_bias;
            true
        } else {
            false
        }
    }

    pub fn wrap(&self, agent: &mut Agent, min_y: f32) -> WrapOutcome {
        let bound = self.world_bound;
        let mut outcome = WrapOutcome::default();

        if agent.position.x > bound {
            agent.position.x = -bound;
            outcome.x = true;
        } else if agent.position.x < -bound {
            agent.position.x = bound;
            outcome.x = true;
        }

        if agent.position.z > bound {
            agent.position.z = -bound;
            outcome.z = true;
        } else if agent.position.z < -bound {
            agent.position.z = bound;
            outcome.z = true;
        }

        // No lower Y wrap; the floor bias is all that keeps agents up
        if agent.position.y > bound + self.ceiling_margin {
            agent.position.y = min_y;
            outcome.ceiling = true;
        }

        outcome
    }

    /// Floor check followed by edge wrap, both against one terrain query.
    pub fn apply<O: HeightOracle + ?Sized>(
        &self,
        agent: &mut Agent,
        oracle: &O,
    ) -> (bool, WrapOutcome) {
        let min_y = self.floor_min_y(agent.position, oracle);
        let floored = self.apply_floor(agent, min_y);
        (floored, self.wrap(agent, min_y))
    }
}
