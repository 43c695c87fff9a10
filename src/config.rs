//! Runtime scene configuration.
//!
//! Defaults come from [`crate::constants`]; any field can be overridden with a
//! `FORAGER_`-prefixed environment variable (e.g. `FORAGER_FORAGABLE_COUNT=12`).

use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{forage, input, mechanics, quest};
use crate::error::ConfigError;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Foragables scattered at scene start.
    pub foragable_count: usize,
    /// Minimum Manhattan distance between the player's start and any foragable.
    pub foragable_distance: u32,
    pub inventory_capacity: usize,
    pub stick_dead_zone: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Seed for foragable placement; a fresh one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            foragable_count: forage::INITIAL_COUNT,
            foragable_distance: forage::INITIAL_DISTANCE,
            inventory_capacity: quest::INVENTORY_CAPACITY,
            stick_dead_zone: input::STICK_DEAD_ZONE,
            walk_speed: mechanics::WALK_SPEED,
            run_speed: mechanics::RUN_SPEED,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Loads the configuration from defaults merged with `FORAGER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed("FORAGER_")))
    }

    /// Extracts and validates a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: SceneConfig = figment.extract().map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()
    }

    /// Checks that every value is usable, returning the configuration unchanged.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.inventory_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "inventory_capacity",
                reason: "must hold at least one item".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.stick_dead_zone) {
            return Err(ConfigError::Invalid {
                field: "stick_dead_zone",
                reason: format!("{} is outside [0, 1)", self.stick_dead_zone),
            });
        }
        if !(self.walk_speed.is_finite() && self.walk_speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "walk_speed",
                reason: format!("{} is not a positive finite speed", self.walk_speed),
            });
        }
        if !(self.run_speed.is_finite() && self.run_speed >= self.walk_speed) {
            return Err(ConfigError::Invalid {
                field: "run_speed",
                reason: format!("{} must be finite and at least walk_speed {}", self.run_speed, self.walk_speed),
            });
        }
        Ok(self)
    }
}
