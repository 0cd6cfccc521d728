//! Sunlight policy configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Configuration is always handed to
//! the policy explicitly; nothing in the core reads it from a global.

use crate::core::error::{Result, UmbraError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the sunlight avoidance systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunlightConfig {
    // === CLOCK MODEL ===
    /// Illumination percent at which sunlight becomes lethal
    ///
    /// Daylight is declared once illumination reaches this level.
    pub hazard_threshold_percent: i32,

    /// Ticks between one-percent rises of illumination at dawn
    ///
    /// Measured from the host's dawn curve: about 9700 ticks pass between
    /// full darkness and 60% light, so 9700 / 60 ~ 161 ticks per step.
    pub ticks_between_light_changes: u32,

    // === EXPOSURE ===
    /// Ticks of continuous sunlight an unharmed agent survives
    ///
    /// At the default (1800), roughly thirty real seconds in the open.
    pub ticks_of_surviving_exposure: u32,

    /// Fraction of survivable exposure already spent per damage stage
    ///
    /// An agent at stage N is treated as having been in the sun for
    /// `N * fraction * ticks_of_surviving_exposure` ticks.
    pub stage_budget_fraction: f64,

    /// Extra travel time required by the "arrive before dawn" estimate
    ///
    /// At 0.5 the agent must be able to cover the distance 1.5x over
    /// before sunrise for the estimate to pass.
    pub arrival_leeway_factor: f64,

    // === SEARCH CAPS ===
    /// Maximum regions examined while looking for the nearest shelter
    pub region_search_cap: usize,

    /// Radius around the agent searched for an emergency dig spot
    pub hideout_search_radius: i32,

    /// Random attempts when choosing a fallback home point
    pub safe_cell_attempts: usize,
}

impl Default for SunlightConfig {
    fn default() -> Self {
        Self {
            hazard_threshold_percent: 60,
            ticks_between_light_changes: 161,
            ticks_of_surviving_exposure: 1800,
            stage_budget_fraction: 0.75,
            arrival_leeway_factor: 0.5,
            region_search_cap: 9999,
            hideout_search_radius: 8,
            safe_cell_attempts: 1000,
        }
    }
}

impl SunlightConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks charged for each damage stage the agent has already reached
    pub fn ticks_per_stage(&self) -> f64 {
        self.ticks_of_surviving_exposure as f64 * self.stage_budget_fraction
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=100).contains(&self.hazard_threshold_percent) {
            return Err(format!(
                "hazard_threshold_percent ({}) must be within 1..=100",
                self.hazard_threshold_percent
            ));
        }

        if self.ticks_between_light_changes == 0 {
            return Err("ticks_between_light_changes must be positive".into());
        }

        if self.ticks_of_surviving_exposure == 0 {
            return Err("ticks_of_surviving_exposure must be positive".into());
        }

        for (name, value) in [
            ("stage_budget_fraction", self.stage_budget_fraction),
            ("arrival_leeway_factor", self.arrival_leeway_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} ({}) must be a non-negative number", name, value));
            }
        }

        if self.region_search_cap == 0 {
            return Err("region_search_cap must be positive".into());
        }

        if self.hideout_search_radius < 0 {
            return Err(format!(
                "hideout_search_radius ({}) must not be negative",
                self.hideout_search_radius
            ));
        }

        Ok(())
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SunlightConfig = toml::from_str(content)?;
        config.validate().map_err(UmbraError::Config)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
