//! Core configuration for folio-motion-core.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;

/// Frame-time handling and authoring defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A frame longer than this (seconds) is treated as a stall, e.g. a
    /// backgrounded tab, and replaced by `lag_adjusted_dt`.
    pub lag_threshold: f32,
    pub lag_adjusted_dt: f32,

    /// Used by authored steps that omit `duration` / `ease`.
    pub default_duration: f32,
    pub default_ease: Ease,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lag_threshold: 0.5,
            lag_adjusted_dt: 1.0 / 30.0,
            default_duration: 0.5,
            default_ease: Ease::default(),
        }
    }
}

impl Config {
    /// Sanitize a host frame delta: negative or non-finite deltas become 0,
    /// stalls are replaced by the lag-adjusted step.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        if dt > self.lag_threshold {
            self.lag_adjusted_dt
        } else {
            dt
        }
    }
}
