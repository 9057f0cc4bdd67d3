//! Data-driven game balance
//!
//! The knobs most often adjusted during balancing live here so a JSON
//! file can override them without a rebuild. Defaults mirror `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub run_speed: f32,
    pub run_speed_min: f32,
    pub run_speed_max: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub pursuer_base_speed: f32,
    pub pursuer_scaling: f32,
    pub obstacle_min_gap: f32,
    pub obstacle_extra_gap: f32,
    pub swing_min_gap: f32,
    pub swing_extra_gap: f32,
    pub checkpoint_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_speed: RUN_SPEED,
            run_speed_min: RUN_SPEED_MIN,
            run_speed_max: RUN_SPEED_MAX,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            pursuer_base_speed: PURSUER_BASE_SPEED,
            pursuer_scaling: PURSUER_SCALING,
            obstacle_min_gap: OBSTACLE_MIN_GAP,
            obstacle_extra_gap: OBSTACLE_EXTRA_GAP,
            swing_min_gap: SWING_MIN_GAP,
            swing_extra_gap: SWING_EXTRA_GAP,
            checkpoint_distance: CHECKPOINT_DISTANCE,
        }
    }
}

impl Tuning {
    /// Load balance overrides from a JSON file; missing or malformed
    /// files fall back to defaults with a log line
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
