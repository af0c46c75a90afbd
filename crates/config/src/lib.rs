//! Shared configuration for brushtrail
//!
//! Every tunable constant of the game core (curve shape, drag speed,
//! scoring thresholds, surface size, brush motion) lives in one of the
//! structs below and is passed explicitly to the component that uses it.
//! All structs deserialize from partial JSON: missing fields keep their
//! default values.

mod easing;
mod gradient;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

pub use easing::Easing;
pub use gradient::{ColorGradient, GradientStop};

/// Default canvas width in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 342;

/// Default canvas height in pixels
pub const DEFAULT_CANVAS_HEIGHT: u32 = 342;

/// Default number of curve samples per segment
pub const DEFAULT_STEPS_PER_SEGMENT: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be a positive finite number" })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be a non-negative finite number" })
    }
}

/// Shape of the generated path curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct CurveConfig {
    /// Scale of the handle point's offset from the anchor chord midpoint
    pub v1: f32,
    /// Blend between linear and smoothstep weighting of the second lerp stage
    pub v2: f32,
    /// Samples per segment used for rendering, arc length and scoring
    pub steps_per_segment: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            v1: 1.4,
            v2: 0.35,
            steps_per_segment: DEFAULT_STEPS_PER_SEGMENT,
        }
    }
}

impl CurveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.v1.is_finite() {
            return Err(ConfigError::Invalid { field: "curve.v1", reason: "must be finite" });
        }
        if !(0.0..=1.0).contains(&self.v2) {
            return Err(ConfigError::Invalid { field: "curve.v2", reason: "must be within 0..=1" });
        }
        if self.steps_per_segment == 0 {
            return Err(ConfigError::Invalid {
                field: "curve.steps_per_segment",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Drag-to-progress conversion and line visibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct TrackerConfig {
    /// World distance advanced per unit of aligned drag
    pub move_speed: f32,
    /// Duration of the line fade in/out in seconds (0 = instantaneous)
    pub fade_duration: f32,
    pub fade_easing: Easing,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            fade_duration: 0.35,
            fade_easing: Easing::QuadOut,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("tracker.move_speed", self.move_speed)?;
        require_non_negative("tracker.fade_duration", self.fade_duration)
    }
}

/// Accuracy scoring thresholds and multipliers for both modes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct ScorerConfig {
    /// Hard mode: score for a new farthest point painted exactly on the path
    pub max_score_per_point: f32,
    /// Hard mode: distance at which a painted point stops earning score
    pub max_accuracy_distance: f32,
    pub close_path_multiplier: f32,
    /// Hard mode: penalty per world unit beyond `max_accuracy_distance`
    pub far_penalty_multiplier: f32,
    /// Hard mode: painted points closer than this to the previous one are ignored
    pub min_sample_distance: f32,
    /// Nearest-point search: minimum window radius in samples
    pub base_search_range: usize,
    /// Nearest-point search: samples added to the window per world unit travelled
    pub search_speed_multiplier: f32,
    /// Weight of the newest measurement in the traversal speed average
    pub speed_smoothing: f32,
    /// Achievable score per world unit of path in hard mode
    pub hard_score_per_unit: f32,
    /// Achievable score per world unit of path in light mode
    pub light_score_per_unit: f32,
    /// Light mode: minimum drag/tangent alignment that earns score
    pub light_alignment_threshold: f32,
    pub light_multiplier: f32,
    /// Light mode: penalty per unit of backwards alignment
    pub light_penalty: f32,
    /// Light mode: score never drops below this floor
    pub light_min_score: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            max_score_per_point: 1.0,
            max_accuracy_distance: 0.5,
            close_path_multiplier: 1.0,
            far_penalty_multiplier: 0.5,
            min_sample_distance: 0.02,
            base_search_range: 8,
            search_speed_multiplier: 10.0,
            speed_smoothing: 0.2,
            hard_score_per_unit: 10.0,
            light_score_per_unit: 10.0,
            light_alignment_threshold: 0.3,
            light_multiplier: 1.0,
            light_penalty: 0.05,
            light_min_score: 0.0,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("scorer.max_accuracy_distance", self.max_accuracy_distance)?;
        require_non_negative("scorer.max_score_per_point", self.max_score_per_point)?;
        require_non_negative("scorer.far_penalty_multiplier", self.far_penalty_multiplier)?;
        require_non_negative("scorer.min_sample_distance", self.min_sample_distance)?;
        require_non_negative("scorer.light_penalty", self.light_penalty)?;
        require_non_negative("scorer.light_min_score", self.light_min_score)?;
        if self.base_search_range == 0 {
            return Err(ConfigError::Invalid {
                field: "scorer.base_search_range",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.speed_smoothing) || self.speed_smoothing == 0.0 {
            return Err(ConfigError::Invalid {
                field: "scorer.speed_smoothing",
                reason: "must be within (0, 1]",
            });
        }
        if !(-1.0..=1.0).contains(&self.light_alignment_threshold) {
            return Err(ConfigError::Invalid {
                field: "scorer.light_alignment_threshold",
                reason: "must be within -1..=1",
            });
        }
        Ok(())
    }

    /// Achievable score per world unit for the given mode
    pub fn score_per_unit(&self, is_light_mode: bool) -> f32 {
        if is_light_mode {
            self.light_score_per_unit
        } else {
            self.hard_score_per_unit
        }
    }
}

/// Raster canvas dimensions and world/texture mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// Colour the canvas is cleared to at the start of each path
    pub base_color: [f32; 4],
    /// Tile size for dirty tracking and batched commits
    pub tile_size: u32,
    /// Seconds between surface normal refreshes
    pub normal_refresh_interval: f32,
    /// Distance above the surface from which texture-lookup rays start
    pub probe_offset: f32,
    pub max_ray_distance: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            base_color: [1.0, 1.0, 1.0, 1.0],
            tile_size: 128,
            normal_refresh_interval: 0.5,
            probe_offset: 0.05,
            max_ray_distance: 1.0,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid { field: "surface.size", reason: "must be non-zero" });
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid {
                field: "surface.tile_size",
                reason: "must be non-zero",
            });
        }
        require_non_negative("surface.normal_refresh_interval", self.normal_refresh_interval)?;
        require_positive("surface.probe_offset", self.probe_offset)?;
        require_positive("surface.max_ray_distance", self.max_ray_distance)
    }
}

/// Brush footprint, motion and colour cycling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct BrushConfig {
    /// Stamp diameter in texture pixels
    pub diameter: u32,
    /// Mask exponent along the brush x axis
    pub scale_x: f32,
    /// Mask exponent along the brush y axis
    pub scale_y: f32,
    /// Seconds to glide to a new paint point
    pub move_duration: f32,
    pub move_easing: Easing,
    /// How strongly the surface normal tilts the brush away from the canvas
    pub normal_power: f32,
    /// Blend weight of the secondary look rotation's roll
    pub tilt_blend: f32,
    /// Seconds without paint points before the brush lifts off the canvas
    pub idle_timeout: f32,
    pub return_duration: f32,
    pub return_easing: Easing,
    /// Seconds at the home point before painting is allowed again
    pub cooldown: f32,
    /// Gradient phase advanced per texture pixel travelled
    pub gradient_speed: f32,
    pub gradient: ColorGradient,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            diameter: 25,
            scale_x: 2.0,
            scale_y: 2.0,
            move_duration: 0.08,
            move_easing: Easing::QuadOut,
            normal_power: 0.5,
            tilt_blend: 0.5,
            idle_timeout: 0.6,
            return_duration: 0.3,
            return_easing: Easing::QuadInOut,
            cooldown: 0.25,
            gradient_speed: 0.002,
            gradient: ColorGradient::default(),
        }
    }
}

impl BrushConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diameter == 0 {
            return Err(ConfigError::Invalid { field: "brush.diameter", reason: "must be non-zero" });
        }
        require_positive("brush.scale_x", self.scale_x)?;
        require_positive("brush.scale_y", self.scale_y)?;
        require_non_negative("brush.move_duration", self.move_duration)?;
        require_non_negative("brush.return_duration", self.return_duration)?;
        require_positive("brush.idle_timeout", self.idle_timeout)?;
        require_non_negative("brush.cooldown", self.cooldown)?;
        require_non_negative("brush.gradient_speed", self.gradient_speed)?;
        if !(0.0..=1.0).contains(&self.tilt_blend) {
            return Err(ConfigError::Invalid {
                field: "brush.tilt_blend",
                reason: "must be within 0..=1",
            });
        }
        if self.gradient.stops().is_empty() {
            return Err(ConfigError::Invalid {
                field: "brush.gradient",
                reason: "needs at least one stop",
            });
        }
        Ok(())
    }
}

/// Aggregate configuration for the whole game core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct GameConfig {
    pub curve: CurveConfig,
    pub tracker: TrackerConfig,
    pub scorer: ScorerConfig,
    pub surface: SurfaceConfig,
    pub brush: BrushConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.curve.validate()?;
        self.tracker.validate()?;
        self.scorer.validate()?;
        self.surface.validate()?;
        self.brush.validate()
    }
}
