/*
 * Terrain Boids - Module Definitions
 *
 * The flocking kernel (agent, flock, rules, boundary, terrain, params,
 * simulation) has no rendering dependencies beyond the shared vector type.
 * The remaining modules are the nannou host that drives and draws it.
 */

// Re-export key components for easier access
pub use agent::Agent;
pub use boundary::{BoundaryPolicy, WrapOutcome};
pub use debug::{DebugInfo, StepStats};
pub use flock::{Flock, Neighbor};
pub use params::{
    ConfigError, FloorBiasTiming, FlockingParams, Settings, SimulationConfig, UpdateOrder,
};
pub use rules::SteeringForces;
pub use simulation::{AgentPose, Simulation};
pub use terrain::{FlatTerrain, HeightOracle, RollingTerrain};

// Define modules
pub mod agent;
pub mod boundary;
pub mod debug;
pub mod flock;
pub mod params;
pub mod rules;
pub mod simulation;
pub mod terrain;

pub mod app;
pub mod camera;
pub mod input;
pub mod renderer;
pub mod ui;

// Constants
pub const DEFAULT_MAX_FORCE: f32 = 0.05;
pub const DEFAULT_MAX_SPEED: f32 = 4.0;
