//! Application configuration read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bevy::log::Level;
use bevy::prelude::*;
use brushtrail_path::ScoreMode;

/// Parse `key` from the environment, falling back to `default`
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Scoring mode from BRUSHTRAIL_MODE ("hard" or "light")
fn mode_from_env() -> ScoreMode {
    match std::env::var("BRUSHTRAIL_MODE").as_deref() {
        Ok("light") => ScoreMode::Light,
        _ => ScoreMode::Hard,
    }
}

/// Application configuration resource
#[derive(Resource, Clone, Debug)]
pub struct AppConfig {
    /// Optional JSON game configuration (BRUSHTRAIL_CONFIG)
    pub config_path: Option<PathBuf>,
    /// PNG written after the last path (BRUSHTRAIL_OUTPUT)
    pub output_path: PathBuf,
    /// BRUSHTRAIL_LOG, e.g. "debug"
    pub log_level: String,
    /// Number of paths to trace before exiting
    pub paths: usize,
    pub mode: ScoreMode,
    /// Seed for path placement choices
    pub seed: u64,
    /// Variable-rate frame tick
    pub frame_hz: f64,
    /// Fixed-rate scoring tick
    pub fixed_hz: f64,
    /// Hard stop for the headless loop
    pub max_frames: u32,
    /// Frames a path generation takes to complete
    pub generation_frames: u32,
    /// Scripted player speed in world units per second
    pub player_speed: f32,
    /// Sideways wobble of the scripted player in world units
    pub player_wobble: f32,
    /// Edge length of the square canvas in world units
    pub surface_extent: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            output_path: PathBuf::from("brushtrail.png"),
            log_level: "info".to_string(),
            paths: 3,
            mode: ScoreMode::Hard,
            seed: 1,
            frame_hz: 60.0,
            fixed_hz: 50.0,
            max_frames: 20_000,
            generation_frames: 5,
            player_speed: 0.8,
            player_wobble: 0.02,
            surface_extent: 2.0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            config_path: std::env::var("BRUSHTRAIL_CONFIG").ok().map(PathBuf::from),
            output_path: std::env::var("BRUSHTRAIL_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            log_level: std::env::var("BRUSHTRAIL_LOG").unwrap_or(defaults.log_level),
            paths: env_or("BRUSHTRAIL_PATHS", defaults.paths).max(1),
            mode: mode_from_env(),
            seed: env_or("BRUSHTRAIL_SEED", defaults.seed),
            ..defaults
        }
    }

    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_hz.max(1.0))
    }
}
