//! Layout and state configuration.
//!
//! Every tunable of the generator lives in [`LayoutConfig`]; the window the
//! generator iterates is a separate [`GridWindow`] chosen per call site.
//! [`StateConfig`] holds the knobs of the traffic-owning state container.
//!
//! ```
//! use labyrinth_logic::config::{validate_config, Accumulation, LayoutConfig};
//!
//! let config = LayoutConfig {
//!     accumulation: Accumulation::Max,
//!     ..LayoutConfig::default()
//! };
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::GridPos;

/// How traffic from several rasterized paths combines on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accumulation {
    /// Contributions add up, then clamp to 1.0.
    #[default]
    Additive,
    /// The strongest single contribution wins, clamped to 1.0.
    Max,
}

impl Accumulation {
    pub fn combine(self, existing: f32, contribution: f32) -> f32 {
        let v = match self {
            Accumulation::Additive => existing + contribution,
            Accumulation::Max => existing.max(contribution),
        };
        v.min(1.0)
    }
}

/// Generator tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Edges with less traffic than this leave no trace.
    pub noise_floor: f32,
    /// Per-cell traffic contributed by an edge is `traffic * raster_weight`.
    pub raster_weight: f32,
    pub accumulation: Accumulation,
    /// Cells within this king-move radius of the origin are always active.
    pub safe_zone_radius: Option<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            noise_floor: 0.1,
            raster_weight: 0.1,
            accumulation: Accumulation::Additive,
            safe_zone_radius: None,
        }
    }
}

impl LayoutConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, Vec<ConfigError>> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| vec![ConfigError::Parse(e.to_string())])?;
        let errors = validate_config(&config);
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }

    /// Every cell within the safe-zone radius of the origin; empty when disabled.
    pub fn safe_zone_cells(&self) -> impl Iterator<Item = GridPos> {
        let r = self.safe_zone_radius.map_or(-1, |r| r.min(i32::MAX as u32 / 2) as i32);
        (-r..=r).flat_map(move |x| (-r..=r).map(move |y| GridPos::new(x, y)))
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("noise floor {0} must be finite and non-negative")]
    InvalidNoiseFloor(f32),
    #[error("raster weight {0} must be finite and positive")]
    InvalidRasterWeight(f32),
    #[error("grid window size must be positive")]
    EmptyWindow,
    #[error("grid window size {0} exceeds {}", MAX_WINDOW_SIZE)]
    WindowTooLarge(u32),
    #[error("traffic cap {0} must be finite and positive")]
    InvalidTrafficCap(f32),
    #[error("step delta {0} must be finite and positive")]
    InvalidStepDelta(f32),
    #[error("decay rate {0} must be finite and non-negative")]
    InvalidDecayRate(f32),
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Validate a layout configuration, returning all errors found.
pub fn validate_config(config: &LayoutConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !config.noise_floor.is_finite() || config.noise_floor < 0.0 {
        errors.push(ConfigError::InvalidNoiseFloor(config.noise_floor));
    }
    if !config.raster_weight.is_finite() || config.raster_weight <= 0.0 {
        errors.push(ConfigError::InvalidRasterWeight(config.raster_weight));
    }

    errors
}

/// Which coordinates a window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowMode {
    /// `[0, N) × [0, N)`
    #[default]
    ZeroBased,
    /// `[-N/2, N/2) × [-N/2, N/2)`; odd sizes keep the extra cell on the positive side.
    Centered,
}

/// Largest window side whose bounds fit in `i32`.
pub const MAX_WINDOW_SIZE: u32 = i32::MAX as u32;

/// The square of coordinates a layout is emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWindow {
    pub mode: WindowMode,
    pub size: u32,
}

impl GridWindow {
    pub fn new(mode: WindowMode, size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if size > MAX_WINDOW_SIZE {
            return Err(ConfigError::WindowTooLarge(size));
        }
        Ok(Self { mode, size })
    }

    pub fn zero_based(size: u32) -> Self {
        Self {
            mode: WindowMode::ZeroBased,
            size,
        }
    }

    pub fn centered(size: u32) -> Self {
        Self {
            mode: WindowMode::Centered,
            size,
        }
    }

    /// First coordinate on each axis.
    pub fn start(&self) -> i32 {
        match self.mode {
            WindowMode::ZeroBased => 0,
            WindowMode::Centered => -((self.size.min(MAX_WINDOW_SIZE) / 2) as i32),
        }
    }

    /// One past the last coordinate on each axis. Oversized windows stop at
    /// `i32::MAX` so the bounds never wrap.
    pub fn end(&self) -> i32 {
        let end = i64::from(self.start()) + i64::from(self.size.min(MAX_WINDOW_SIZE));
        end.min(i64::from(i32::MAX)) as i32
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        let range = self.start()..self.end();
        range.contains(&pos.x) && range.contains(&pos.y)
    }

    /// Number of cells covered, matching [`GridWindow::coords`].
    pub fn area(&self) -> usize {
        let side = (i64::from(self.end()) - i64::from(self.start())) as usize;
        side * side
    }

    /// Every coordinate, x-major then y.
    pub fn coords(&self) -> impl Iterator<Item = GridPos> {
        let (start, end) = (self.start(), self.end());
        (start..end).flat_map(move |x| (start..end).map(move |y| GridPos::new(x, y)))
    }
}

/// Tunables of the state container's traffic bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateConfig {
    /// Ceiling on a single edge's traffic.
    pub traffic_cap: f32,
    /// Traffic added per observed cell-to-cell transition.
    pub step_delta: f32,
    /// Traffic removed per edge per second of decay.
    pub decay_rate: f32,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            traffic_cap: 1.0,
            step_delta: 0.05,
            decay_rate: 0.01,
        }
    }
}

/// Validate a state configuration, returning all errors found.
pub fn validate_state_config(config: &StateConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !config.traffic_cap.is_finite() || config.traffic_cap <= 0.0 {
        errors.push(ConfigError::InvalidTrafficCap(config.traffic_cap));
    }
    if !config.step_delta.is_finite() || config.step_delta <= 0.0 {
        errors.push(ConfigError::InvalidStepDelta(config.step_delta));
    }
    if !config.decay_rate.is_finite() || config.decay_rate < 0.0 {
        errors.push(ConfigError::InvalidDecayRate(config.decay_rate));
    }

    errors
}
