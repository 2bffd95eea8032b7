/*
 * Simulation Parameters Module
 *
 * Two kinds of knobs live here:
 * - FlockingParams: rule weights and neighbor radii. The host may change
 *   these between any two ticks, so the simulation takes them by reference
 *   on every step instead of holding a copy.
 * - SimulationConfig: everything fixed for the lifetime of a Simulation
 *   (world size, limits, spawn volume, integrator and boundary tunables).
 *
 * Both can be loaded from a JSON settings file; any field left out falls
 * back to its default.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{DEFAULT_MAX_FORCE, DEFAULT_MAX_SPEED};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

// Weights and radii for the three steering rules
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingParams {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_radius: 25.0,
            alignment_radius: 50.0,
            cohesion_radius: 50.0,
        }
    }
}

impl FlockingParams {
    /// Same weight for every rule, radii left at their defaults.
    pub fn max_radius(&self) -> f32 {
        self.separation_radius
            .max(self.alignment_radius)
            .max(self.cohesion_radius)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite"));
            }
        }

        let radii = [
            ("separation_radius", self.separation_radius),
            ("alignment_radius", self.alignment_radius),
            ("cohesion_radius", self.cohesion_radius),
        ];
        for (field, value) in radii {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative finite distance, got {value}"),
                ));
            }
        }

        Ok(())
    }

    // Parameter ranges for UI sliders
    pub fn weight_range() -> RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn radius_range() -> RangeInclusive<f32> {
        5.0..=150.0
    }
}

/// Order in which agents observe each other within one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// Agents are updated in flock order and later agents see the already
    /// moved state of earlier ones.
    #[default]
    Sequential,
    /// Every agent steers from a frozen copy of the pre-tick flock.
    Snapshot,
}

/// When the terrain floor bias reaches the velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorBiasTiming {
    /// Floor checked after integration; the bias sits in the acceleration
    /// accumulator and moves the agent on the following tick.
    #[default]
    NextTick,
    /// Floor checked before integration so the bias is consumed this tick.
    ///
    /// The terrain is still sampled once, at the pre-integration position.
    /// A ceiling drop therefore lands at that column's floor height, even
    /// when the same tick also wrapped the agent across an X or Z edge.
    SameTick,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub population: usize,
    /// Half extent of the world cube used for edge wrapping.
    pub world_bound: f32,
    pub max_speed: f32,
    pub max_force: f32,
    /// Converts simulation distance units to world units per second.
    pub distance_scale: f32,
    /// Minimum height above the terrain before the floor bias kicks in.
    pub floor_clearance: f32,
    /// Upward acceleration added while an agent is below the floor clearance.
    pub floor_bias: f32,
    /// Extra headroom above `world_bound` before an agent is dropped back down.
    pub ceiling_margin: f32,
    pub spawn_extent: f32,
    pub spawn_altitude_min: f32,
    pub spawn_altitude_max: f32,
    pub spawn_speed: f32,
    pub seed: Option<u64>,
    pub update_order: UpdateOrder,
    pub floor_bias_timing: FloorBiasTiming,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 150,
            world_bound: 300.0,
            max_speed: DEFAULT_MAX_SPEED,
            max_force: DEFAULT_MAX_FORCE,
            distance_scale: 10.0,
            floor_clearance: 10.0,
            floor_bias: 0.8,
            ceiling_margin: 50.0,
            spawn_extent: 150.0,
            spawn_altitude_min: 20.0,
            spawn_altitude_max: 120.0,
            spawn_speed: 2.0,
            seed: None,
            update_order: UpdateOrder::Sequential,
            floor_bias_timing: FloorBiasTiming::NextTick,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_bound", self.world_bound),
            ("max_speed", self.max_speed),
            ("distance_scale", self.distance_scale),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }

        let non_negative = [
            ("max_force", self.max_force),
            ("floor_clearance", self.floor_clearance),
            ("ceiling_margin", self.ceiling_margin),
            ("spawn_extent", self.spawn_extent),
            ("spawn_speed", self.spawn_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }

        if !self.floor_bias.is_finite() {
            return Err(ConfigError::invalid("floor_bias", "must be finite"));
        }
        if self.spawn_extent > self.world_bound {
            return Err(ConfigError::invalid(
                "spawn_extent",
                format!(
                    "{} exceeds world_bound {}",
                    self.spawn_extent, self.world_bound
                ),
            ));
        }
        if !self.spawn_altitude_min.is_finite()
            || !self.spawn_altitude_max.is_finite()
            || self.spawn_altitude_min > self.spawn_altitude_max
        {
            return Err(ConfigError::invalid(
                "spawn_altitude_min",
                format!(
                    "range {}..{} is empty",
                    self.spawn_altitude_min, self.spawn_altitude_max
                ),
            ));
        }

        Ok(())
    }

    // Population range for the respawn slider
    pub fn population_range() -> RangeInclusive<usize> {
        1..=1000
    }
}

/// Everything a settings file can carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub flocking: FlockingParams,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        info!(path = %path.display(), population = settings.simulation.population, "loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.flocking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings = Settings::from_json_str(
            r#"{
                "simulation": { "population": 12, "update_order": "snapshot" },
                "flocking": { "cohesion_weight": 0.25 }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.simulation.population, 12);
        assert_eq!(settings.simulation.update_order, UpdateOrder::Snapshot);
        assert_eq!(
            settings.simulation.floor_bias_timing,
            FloorBiasTiming::NextTick
        );
        assert_eq!(settings.simulation.world_bound, 300.0);
        assert_eq!(settings.flocking.cohesion_weight, 0.25);
        assert_eq!(settings.flocking.separation_radius, 25.0);
    }

    #[test]
    fn rejects_negative_radius() {
        let err = Settings::from_json_str(r#"{ "flocking": { "alignment_radius": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "alignment_radius",
                ..
            }
        ));
    }

    #[test]
    fn rejects_spawn_outside_world() {
        let config = SimulationConfig {
            world_bound: 100.0,
            spawn_extent: 150.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "spawn_extent",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Settings::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn max_radius_picks_largest() {
        let params = FlockingParams {
            separation_radius: 30.0,
            alignment_radius: 10.0,
            cohesion_radius: 20.0,
            ..FlockingParams::default()
        };
        assert_eq!(params.max_radius(), 30.0);
    }
}
