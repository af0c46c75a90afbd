//! Brushtrail - headless trace-the-path game
//!
//! Runs a scripted player through a number of generated paths on a fixed
//! clock, paints each stroke onto the canvas, and writes the final canvas
//! as a PNG plus a JSON score summary.

use std::process::ExitCode;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use brushtrail_config::GameConfig;
use brushtrail_path::TraceSession;
use glam::{Quat, Vec2, Vec3};
use painting::{look_rotation, BrushActuator, RasterPaintSurface, SurfaceCorners};

mod config;
mod error;
mod export;
mod generator;
mod player;
mod trace;

use config::AppConfig;
use error::AppError;
use generator::PathGenerator;
use trace::{Brush, Canvas, MatchStats, Session, TracePlugin};

/// Distance the brush rests in front of the canvas centre
const BRUSH_HOME_LIFT: f32 = 0.5;

fn load_game_config(config: &AppConfig) -> Result<GameConfig, AppError> {
    let game = match &config.config_path {
        Some(path) => {
            info!("Loading game configuration from {}", path.display());
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };
    game.validate()?;
    Ok(game)
}

/// Insert the canvas, brush and session built from `game`
fn setup_world(app: &mut App, config: &AppConfig, game: GameConfig) -> Result<(), AppError> {
    let half = config.surface_extent.max(f32::EPSILON) * 0.5;
    let corners = SurfaceCorners::xy_rect(Vec2::splat(-half), Vec2::splat(half), 0.0);
    let canvas = RasterPaintSurface::flat(game.surface.clone(), corners)?;

    let normal = corners.normal();
    let home_rotation: Quat = look_rotation(-normal, Vec3::Y);
    let brush = BrushActuator::new(
        game.brush.clone(),
        corners.center() + normal * BRUSH_HOME_LIFT,
        home_rotation,
    );
    let session = TraceSession::new(game.tracker.clone(), game.scorer.clone());

    app.insert_resource(Canvas(canvas))
        .insert_resource(Brush(brush))
        .insert_resource(Session(session))
        .insert_resource(PathGenerator::new(config.seed, config.generation_frames))
        .insert_resource(game)
        .insert_resource(TimeUpdateStrategy::ManualDuration(config.frame_duration()))
        .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz));
    Ok(())
}

/// Drive the app until every path is traced or the frame limit is reached
fn run(app: &mut App, config: &AppConfig) -> Result<MatchStats, AppError> {
    let game = load_game_config(config)?;
    setup_world(app, config, game)?;
    app.add_plugins(TracePlugin);

    app.finish();
    app.cleanup();

    let mut frames = 0;
    while frames < config.max_frames {
        app.update();
        frames += 1;
        if app.world().resource::<MatchStats>().finished {
            break;
        }
    }

    let stats = app.world().resource::<MatchStats>().clone();
    if !stats.finished {
        warn!("Stopped after {} frames with {} paths traced", frames, stats.paths_completed);
    }

    export::export_png(app.world().resource::<Canvas>().0.committed(), &config.output_path)?;
    Ok(stats)
}

fn main() -> ExitCode {
    let config = AppConfig::from_env();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::log::LogPlugin {
            level: config.level(),
            ..default()
        },
    ))
    .insert_resource(config.clone());

    info!(
        "Starting Brushtrail: {} paths in {:?} mode",
        config.paths, config.mode
    );

    match run(&mut app, &config).and_then(|stats| Ok(serde_json::to_string_pretty(&stats)?)) {
        Ok(summary) => {
            info!("Summary:\n{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Brushtrail failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
