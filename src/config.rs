//! Runtime configuration.
//!
//! Every knob has a default matching the reference demo, so an empty JSON
//! object is a valid configuration file.

use crate::error::TraceError;
use crate::layout::{TreeLayout, Viewport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub bounds: PointBounds,
    pub tree: TreeLayout,
    pub viewport: Viewport,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        if self.playback.karatsuba_interval_ms == 0 || self.playback.closest_pair_interval_ms == 0
        {
            return Err(TraceError::InvalidConfig(
                "playback intervals must be positive".into(),
            ));
        }
        self.bounds.validate()?;
        if self.tree.node_width <= 0.0 || self.tree.level_height <= 0.0 {
            return Err(TraceError::InvalidConfig(
                "tree node width and level height must be positive".into(),
            ));
        }
        if self.viewport.width <= 2.0 * self.viewport.padding
            || self.viewport.height <= 2.0 * self.viewport.padding
        {
            return Err(TraceError::InvalidConfig(
                "viewport must be larger than twice its padding".into(),
            ));
        }
        Ok(())
    }
}

/// Delay between revealed steps during playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub karatsuba_interval_ms: u64,
    pub closest_pair_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            karatsuba_interval_ms: 1000,
            closest_pair_interval_ms: 800,
        }
    }
}

impl PlaybackConfig {
    pub fn karatsuba_interval(&self) -> Duration {
        Duration::from_millis(self.karatsuba_interval_ms)
    }

    pub fn closest_pair_interval(&self) -> Duration {
        Duration::from_millis(self.closest_pair_interval_ms)
    }
}

/// Rectangle random points are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for PointBounds {
    // A [-10, 10] x [-7.5, 7.5] canvas less a one-unit margin.
    fn default() -> Self {
        Self {
            min_x: -9.0,
            max_x: 9.0,
            min_y: -6.5,
            max_y: 6.5,
        }
    }
}

impl PointBounds {
    pub fn validate(&self) -> Result<(), TraceError> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(TraceError::InvalidConfig(format!(
                "point bounds must be finite and non-empty: {self:?}"
            )));
        }
        Ok(())
    }
}
