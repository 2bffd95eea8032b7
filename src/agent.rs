/*
 * Agent Module
 *
 * This module defines the Agent struct: one boid's kinematic state.
 * Steering rules only ever add into `acceleration`; `integrate` is the
 * single place where velocity and position change from those forces.
 */

use nannou::prelude::{vec3, Vec3};
use rand::Rng;

use crate::params::SimulationConfig;
use crate::terrain::HeightOracle;
use crate::{DEFAULT_MAX_FORCE, DEFAULT_MAX_SPEED};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub max_force: f32,
    pub max_speed: f32,
}

impl Agent {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self::with_limits(position, velocity, DEFAULT_MAX_SPEED, DEFAULT_MAX_FORCE)
    }

    pub fn with_limits(position: Vec3, velocity: Vec3, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_force,
            max_speed,
        }
    }

    /// A fresh agent somewhere in the spawn volume, above the terrain,
    /// heading in a random direction.
    pub fn spawn<R, O>(rng: &mut R, config: &SimulationConfig, oracle: &O) -> Self
    where
        R: Rng + ?Sized,
        O: HeightOracle + ?Sized,
    {
        let extent = config.spawn_extent;
        let x = sample(rng, -extent, extent);
        let z = sample(rng, -extent, extent);
        let altitude = sample(rng, config.spawn_altitude_min, config.spawn_altitude_max);
        let y = oracle.elevation_at(x, z) + config.floor_clearance + altitude;

        // Random initial heading
        let mut heading = vec3(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-0.25..0.25),
            rng.gen_range(-1.0..1.0),
        );
        if heading.length_squared() < 1.0e-6 {
            heading = Vec3::X;
        }
        let speed = config.spawn_speed.min(config.max_speed);

        Self::with_limits(
            vec3(x, y, z),
            heading.normalize() * speed,
            config.max_speed,
            config.max_force,
        )
    }

    // Apply a force to the agent
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Euler step: the accumulated acceleration is added to velocity as-is,
    /// speed is clamped, then the position advances by
    /// `velocity * delta_seconds * distance_scale`.
    pub fn integrate(&mut self, delta_seconds: f32, distance_scale: f32) {
        self.velocity += self.acceleration;
        self.velocity = limit(self.velocity, self.max_speed);

        self.position += self.velocity * (delta_seconds * distance_scale);

        self.acceleration = Vec3::ZERO;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Unit direction of travel, `None` while the agent is not moving.
    pub fn heading(&self) -> Option<Vec3> {
        normalize_or_none(self.velocity)
    }

    /// Point one unit ahead along the heading, for look-at style orientation.
    pub fn look_target(&self) -> Option<Vec3> {
        self.heading().map(|h| self.position + h)
    }
}

// Clamp a vector's magnitude to `max`
pub fn limit(v: Vec3, max: f32) -> Vec3 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        let length = length_squared.sqrt();
        v * (max / length)
    } else {
        v
    }
}

pub fn normalize_or_none(v: Vec3) -> Option<Vec3> {
    let length_squared = v.length_squared();
    if length_squared > 0.0 && length_squared.is_finite() {
        Some(v / length_squared.sqrt())
    } else {
        None
    }
}

// gen_range panics on an empty range; a zero-width range is a fixed value
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn integrate_clamps_speed_and_clears_acceleration() {
        let mut agent = Agent::new(Vec3::ZERO, vec3(3.0, 0.0, 0.0));
        agent.apply_force(vec3(5.0, 0.0, 0.0));
        agent.integrate(0.1, 10.0);

        assert!((agent.speed() - agent.max_speed).abs() < 1e-5);
        assert_eq!(agent.acceleration, Vec3::ZERO);
        // 4.0 units/tick * 0.1 s * 10 scale
        assert!((agent.position.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn acceleration_is_not_scaled_by_time() {
        let mut agent = Agent::new(Vec3::ZERO, Vec3::ZERO);
        agent.apply_force(vec3(0.0, 0.8, 0.0));
        agent.integrate(0.016, 10.0);
        assert!((agent.velocity.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_velocity_has_no_heading() {
        let agent = Agent::new(vec3(1.0, 2.0, 3.0), Vec3::ZERO);
        assert_eq!(agent.heading(), None);
        assert_eq!(agent.look_target(), None);
    }

    #[test]
    fn look_target_is_one_unit_ahead() {
        let agent = Agent::new(vec3(1.0, 2.0, 3.0), vec3(0.0, 0.0, -2.5));
        let target = agent.look_target().unwrap();
        assert!((target - vec3(1.0, 2.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn spawn_respects_volume_and_limits() {
        let config = SimulationConfig::default();
        let terrain = FlatTerrain::new(5.0);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let agent = Agent::spawn(&mut rng, &config, &terrain);
            assert!(agent.position.x.abs() <= config.spawn_extent);
            assert!(agent.position.z.abs() <= config.spawn_extent);
            assert!(agent.position.y >= 5.0 + config.floor_clearance + config.spawn_altitude_min);
            assert!(agent.speed() <= config.max_speed + 1e-5);
            assert!(agent.speed() > 0.0);
            assert_eq!(agent.acceleration, Vec3::ZERO);
        }
    }

    #[test]
    fn limit_leaves_short_vectors_alone() {
        let v = vec3(0.01, 0.02, 0.0);
        assert_eq!(limit(v, 1.0), v);
        assert!((limit(vec3(10.0, 0.0, 0.0), 0.05).length() - 0.05).abs() < 1e-7);
    }
}
