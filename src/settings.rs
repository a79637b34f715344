//! Game configuration
//!
//! Persisted in LocalStorage on the web; native builds always use defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How `GameState::set_scene` treats requests outside the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Accept every request, logging the ones outside the table
    #[default]
    Permissive,
    /// Reject requests outside the table
    Strict,
}

impl TransitionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Permissive => "permissive",
            TransitionPolicy::Strict => "strict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "permissive" => Some(TransitionPolicy::Permissive),
            "strict" => Some(TransitionPolicy::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("eggs_per_level must be at least 1")]
    NoEggs,
    #[error("egg_stages must be at least 1")]
    NoStages,
    #[error("starting_lives must be at least 1")]
    NoLives,
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidNumber { field: &'static str, value: f32 },
    #[error("malformed config: {0}")]
    Parse(String),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Eggs spawned at the start of every level
    pub eggs_per_level: usize,
    /// Lives restored by a new game
    pub starting_lives: u32,
    /// Taps needed to send an egg flying
    pub egg_stages: u8,
    /// Added to the speed multiplier on level completion
    pub speed_step: f32,

    // === Launch timing ===
    pub intermission_secs: f32,
    pub base_fall_speed: f32,
    pub fall_speed_jitter: f32,

    /// Scene transition validation
    pub transition_policy: TransitionPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            eggs_per_level: EGGS_PER_LEVEL,
            starting_lives: STARTING_LIVES,
            egg_stages: EGG_STAGES,
            speed_step: SPEED_STEP,

            intermission_secs: INTERMISSION_SECS,
            base_fall_speed: BASE_FALL_SPEED,
            fall_speed_jitter: FALL_SPEED_JITTER,

            transition_policy: TransitionPolicy::Permissive,
        }
    }
}

impl GameConfig {
    /// Reject values the session cannot run with.
    ///
    /// A zero egg count would complete every level on spawn and loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eggs_per_level == 0 {
            return Err(ConfigError::NoEggs);
        }
        if self.egg_stages == 0 {
            return Err(ConfigError::NoStages);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        for (field, value) in [
            ("speed_step", self.speed_step),
            ("intermission_secs", self.intermission_secs),
            ("base_fall_speed", self.base_fall_speed),
            ("fall_speed_jitter", self.fall_speed_jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "egg_flight_config";

    /// Stored config, or defaults if missing or invalid (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(config)) => {
                log::info!("Loaded config from LocalStorage");
                config
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored config: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Browser LocalStorage, if the page may use it
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
