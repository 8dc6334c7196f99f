//! Run configuration
//!
//! Everything the host may tune without touching the content tables. Parsed
//! from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for the run
    pub seed: u64,

    // === Playfield ===
    /// Visible playfield width (world units)
    pub playfield_width: f32,
    /// Visible playfield height (world units)
    pub playfield_height: f32,
    /// Non-boss enemies farther than `playfield_width * despawn_factor` are dropped
    pub despawn_factor: f32,

    // === Pickups ===
    /// Distance at which a pickup is consumed
    pub collect_radius: f32,
    /// Health granted by a health pickup
    pub health_pickup_value: f32,

    // === Leveling ===
    /// Experience needed for the first level-up
    pub first_level_threshold: f32,
    /// Threshold increase per level-up
    pub level_threshold_step: f32,
    /// Flat heal granted on level-up
    pub level_up_heal: f32,

    // === Spawning ===
    /// Length of one spawn period (seconds)
    pub period_duration: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            playfield_width: 400.0,
            playfield_height: 400.0,
            despawn_factor: 3.0,

            collect_radius: 10.0,
            health_pickup_value: 10.0,

            first_level_threshold: 5.0,
            level_threshold_step: 10.0,
            level_up_heal: 5.0,

            period_duration: 30.0,
        }
    }
}

impl SimConfig {
    /// Default configuration with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.playfield_width > 0.0) {
            log::warn!("playfield_width {} invalid, using default", self.playfield_width);
            self.playfield_width = defaults.playfield_width;
        }
        if !(self.playfield_height > 0.0) {
            log::warn!("playfield_height {} invalid, using default", self.playfield_height);
            self.playfield_height = defaults.playfield_height;
        }
        if !(self.period_duration > 0.0) {
            log::warn!("period_duration {} invalid, using default", self.period_duration);
            self.period_duration = defaults.period_duration;
        }
        if !(self.first_level_threshold > 0.0) {
            log::warn!(
                "first_level_threshold {} invalid, using default",
                self.first_level_threshold
            );
            self.first_level_threshold = defaults.first_level_threshold;
        }
        self.despawn_factor = self.despawn_factor.max(1.0);
        self.collect_radius = self.collect_radius.max(0.0);
        self.level_threshold_step = self.level_threshold_step.max(0.0);
        self.level_up_heal = self.level_up_heal.max(0.0);
        self.health_pickup_value = self.health_pickup_value.max(0.0);
        self
    }

    /// Radius of the ring just outside the visible playfield
    pub fn spawn_ring_radius(&self) -> f32 {
        self.playfield_width.max(self.playfield_height) / 2.0
    }

    /// Distance beyond which non-boss enemies are dropped
    pub fn despawn_radius(&self) -> f32 {
        self.playfield_width * self.despawn_factor
    }
}
