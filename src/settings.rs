//! Simulation settings
//!
//! Defaults mirror [`crate::consts`]; a JSON file can override any subset.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{BroadPhaseKind, CollisionModel};

/// Configuration failure (bad file, bad values, malformed bounds)
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid(String),
    /// Partition bounds must be exactly (x, y, width, height)
    Bounds { len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
            ConfigError::Bounds { len } => write!(
                f,
                "bounds should be (x, y, width, height), got {} values",
                len
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Random perturbation bounds applied during collision handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jitter {
    /// Max radians added to the collision angle
    pub angle: f32,
    /// Max deviation of the energy-loss factor
    pub energy: f32,
    /// Max integer offset added to the contact distance threshold
    pub threshold: i32,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            angle: ANGLE_JITTER,
            energy: ENERGY_JITTER,
            threshold: 0,
        }
    }
}

impl Jitter {
    pub const NONE: Jitter = Jitter {
        angle: 0.0,
        energy: 0.0,
        threshold: 0,
    };
}

/// Initial particle grid layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub columns: u32,
    pub rows: u32,
    /// Spacing divisor per axis
    pub partitions: (u32, u32),
    pub margin: (f32, f32),
    /// Initial velocity on both axes
    pub speed: f32,
    pub radius: f32,
    pub color: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: PARTICLE_COUNT.1,
            rows: PARTICLE_COUNT.0,
            partitions: PARTITIONS,
            margin: MARGIN,
            speed: PARTICLE_SPEED,
            radius: PARTICLE_RADIUS,
            color: PARTICLE_COLOR,
        }
    }
}

/// Initial particle arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// `layout.rows` x `layout.columns` particles in a regular grid
    #[default]
    Grid,
    /// Two disks approaching each other horizontally
    TwoBody,
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub scene: Scene,
    pub layout: Layout,
    pub broad_phase: BroadPhaseKind,
    pub collision_model: CollisionModel,
    /// Uniform grid cell edge length
    pub cell_size: f32,
    pub energy_loss: f32,
    pub jitter: Jitter,
    pub quadtree_max_objects: usize,
    pub quadtree_max_levels: u32,
    pub tick_rate: u32,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            gravity: GRAVITY,
            scene: Scene::Grid,
            layout: Layout::default(),
            broad_phase: BroadPhaseKind::Quadtree,
            collision_model: CollisionModel::Rotational,
            cell_size: GRID_SIZE,
            energy_loss: ENERGY_LOSS,
            jitter: Jitter::default(),
            quadtree_max_objects: QUADTREE_MAX_OBJECTS,
            quadtree_max_levels: QUADTREE_MAX_LEVELS,
            tick_rate: TICK_RATE,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    /// Two disks approaching head-on, resolved by plain velocity exchange
    pub fn two_body() -> Self {
        Self {
            gravity: 0.0,
            scene: Scene::TwoBody,
            layout: Layout {
                radius: 20.0,
                speed: 5.0,
                color: 0xFFFFFF,
                ..Layout::default()
            },
            broad_phase: BroadPhaseKind::BruteForce,
            collision_model: CollisionModel::Exchange,
            energy_loss: 1.0,
            jitter: Jitter::NONE,
            ..Self::default()
        }
    }

    /// Starting positions and velocity of the two-body scene
    pub fn two_body_starts(&self) -> [(Vec2, Vec2); 2] {
        let speed = self.layout.speed;
        [
            (
                Vec2::new((self.width / 4.0).floor(), (self.height / 2.0).floor()),
                Vec2::new(speed, 0.0),
            ),
            (
                Vec2::new((3.0 * self.width / 4.0).floor(), (self.height / 2.0).floor()),
                Vec2::new(-speed, 0.0),
            ),
        ]
    }

    /// Same configuration with every random perturbation disabled
    pub fn without_jitter(&self) -> Self {
        Self {
            jitter: Jitter::NONE,
            ..self.clone()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.layout.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "particle radius must be positive, got {}",
                self.layout.radius
            )));
        }
        if 2.0 * self.layout.radius > self.width.min(self.height) {
            return Err(ConfigError::Invalid(
                "particle diameter exceeds the arena".to_string(),
            ));
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        let max_cells = (i32::MAX / 2) as f32;
        if self.width / self.cell_size > max_cells || self.height / self.cell_size > max_cells {
            return Err(ConfigError::Invalid(format!(
                "cell size {} is too small for a {}x{} arena",
                self.cell_size, self.width, self.height
            )));
        }
        let count = self.layout.rows as u64 * self.layout.columns as u64;
        if count > MAX_PARTICLES as u64 {
            return Err(ConfigError::Invalid(format!(
                "layout asks for {} particles, at most {} allowed",
                count, MAX_PARTICLES
            )));
        }
        if !(self.energy_loss > 0.0 && self.energy_loss <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "energy loss must be in (0, 1], got {}",
                self.energy_loss
            )));
        }
        if self.jitter.angle < 0.0 || self.jitter.energy < 0.0 || self.jitter.threshold < 0 {
            return Err(ConfigError::Invalid(
                "jitter bounds must be non-negative".to_string(),
            ));
        }
        if self.layout.partitions.0 == 0 || self.layout.partitions.1 == 0 {
            return Err(ConfigError::Invalid(
                "layout partitions must be non-zero".to_string(),
            ));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick rate must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quadtree_max_objects, 10);
        assert_eq!(config.quadtree_max_levels, 5);
        assert!(SimConfig::two_body().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "broad_phase": "uniform_grid", "cell_size": 25.0 }"#)
            .unwrap();
        assert_eq!(config.broad_phase, BroadPhaseKind::UniformGrid);
        assert_eq!(config.cell_size, 25.0);
        assert_eq!(config.width, WIDTH);
        assert_eq!(config.layout.columns, 35);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimConfig::from_json(r#"{ "energy_loss": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimConfig::from_json(r#"{ "cell_size": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimConfig::from_json(r#"{ "layout": { "rows": 70000, "columns": 70000 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimConfig::from_json(r#"{ "broad_phase": "uniform_grid", "cell_size": 1e-7 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_without_jitter() {
        let config = SimConfig::default().without_jitter();
        assert_eq!(config.jitter, Jitter::NONE);
        assert_eq!(config.energy_loss, ENERGY_LOSS);
    }

    #[test]
    fn test_two_body_starts() {
        let config = SimConfig::two_body();
        let [(p1, v1), (p2, v2)] = config.two_body_starts();
        assert_eq!(p1, Vec2::new(200.0, 300.0));
        assert_eq!(p2, Vec2::new(600.0, 300.0));
        assert_eq!(v1.x, 5.0);
        assert_eq!(v2.x, -5.0);
    }
}
