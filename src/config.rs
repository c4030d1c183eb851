//! Engine configuration.
//!
//! Configurations serialize to JSON. Every field has a default, so a config
//! file only needs the values it changes:
//!
//! ```json
//! {
//!   "end_scale": 1.5,
//!   "confetti": { "start_delay_ms": 0, "duration_ms": 2000 },
//!   "seed": 7
//! }
//! ```

use crate::error::ConfigError;
use crate::field::{COLUMN_COUNT, END_SCALE};
use crate::trajectory::{is_valid_window, TrajectoryGenerator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Start delay and duration of one explosion mode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingConfig {
    pub start_delay_ms: u64,
    pub duration_ms: u64,
}

impl TimingConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn default_confetti() -> TimingConfig {
    TimingConfig {
        start_delay_ms: 25,
        duration_ms: 1200,
    }
}

fn default_explosion() -> TimingConfig {
    TimingConfig {
        start_delay_ms: 150,
        duration_ms: 1024,
    }
}

fn default_column_count() -> u32 {
    COLUMN_COUNT
}

fn default_end_scale() -> f32 {
    END_SCALE
}

fn default_expand_inset() -> [f32; 2] {
    [32.0, 32.0]
}

/// Complete engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Target tile columns per snapshot.
    #[serde(default = "default_column_count")]
    pub column_count: u32,
    /// Scale of a shattered field at the end of its animation.
    #[serde(default = "default_end_scale")]
    pub end_scale: f32,
    /// Fraction of progress before particles appear.
    #[serde(default)]
    pub life: f32,
    /// Fraction of progress after which particles are gone.
    #[serde(default)]
    pub overflow: f32,
    /// Horizontal and vertical growth of a snapshot's bound before it explodes.
    #[serde(default = "default_expand_inset")]
    pub expand_inset: [f32; 2],
    #[serde(default = "default_confetti")]
    pub confetti: TimingConfig,
    #[serde(default = "default_explosion")]
    pub explosion: TimingConfig,
    /// Seed for trajectory randomness. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            end_scale: default_end_scale(),
            life: 0.0,
            overflow: 0.0,
            expand_inset: default_expand_inset(),
            confetti: default_confetti(),
            explosion: default_explosion(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_count == 0 {
            return Err(ConfigError::Invalid("column_count must be at least 1".into()));
        }
        if !(self.end_scale.is_finite() && self.end_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "end_scale must be positive, got {}",
                self.end_scale
            )));
        }
        if !is_valid_window(self.life, self.overflow) {
            return Err(ConfigError::Invalid(format!(
                "life ({}) and overflow ({}) must be non-negative and sum to less than 1",
                self.life, self.overflow
            )));
        }
        if self.expand_inset.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("expand_inset must be finite".into()));
        }
        Ok(())
    }

    /// Trajectory generator for this config.
    pub fn generator(&self, gravity: bool) -> TrajectoryGenerator {
        TrajectoryGenerator::new(self.end_scale)
            .with_gravity(gravity)
            .with_window(self.life, self.overflow)
    }
}
