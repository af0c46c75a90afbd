//! Trace-the-path game loop
//!
//! Frame systems run chained in Update: finish path generation, read the
//! scripted pointer, glide the brush, stamp the canvas, then advance the
//! session. Scoring runs on its own in FixedUpdate and consumes the drag
//! accumulated by the frames since the previous tick.

use bevy::prelude::*;
use brushtrail_config::GameConfig;
use brushtrail_path::{CurveModel, ScoreTick, SessionEvent, TraceSession};
use glam::{Vec2, Vec3};
use painting::{BrushActuator, BrushEvent, RasterPaintSurface};
use serde::Serialize;

use crate::config::AppConfig;
use crate::generator::PathGenerator;
use crate::player::ScriptedPlayer;

/// Distance in front of the surface the pointer ray starts from
const POINTER_RAY_LIFT: f32 = 1.0;

#[derive(Resource)]
pub struct Canvas(pub RasterPaintSurface);

#[derive(Resource)]
pub struct Brush(pub BrushActuator);

#[derive(Resource)]
pub struct Session(pub TraceSession);

/// Where the pointer met the canvas this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Pixel coordinate of the hit
    pub tex_coord: Vec2,
}

#[derive(Resource, Default)]
pub struct PointerSample {
    pub hit: Option<PointerHit>,
    pub drag_delta: Vec2,
}

/// Stroke state shared between frame and fixed ticks
#[derive(Resource, Default)]
pub struct StrokeState {
    pub painted_point: Option<Vec3>,
    pub is_drawing: bool,
    /// Drag accumulated since the last fixed tick
    pub pending_drag: Vec2,
}

/// Results of the whole run
#[derive(Resource, Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    pub paths_completed: usize,
    pub total_score: f32,
    pub max_score: f32,
    pub stamps: u64,
    pub finished: bool,
}

pub struct TracePlugin;

impl Plugin for TracePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerSample>()
            .init_resource::<StrokeState>()
            .init_resource::<MatchStats>()
            .init_resource::<ScriptedPlayer>()
            .add_systems(Startup, request_first_path)
            .add_systems(
                Update,
                (
                    complete_path_generation,
                    drive_player,
                    move_brush,
                    stamp_canvas,
                    advance_session,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, score_fixed_tick);

        info!("Trace plugin initialized");
    }
}

fn request_first_path(mut generator: ResMut<PathGenerator>, canvas: Res<Canvas>) {
    generator.request(canvas.0.corners());
}

/// Bind a freshly generated path and start a new stroke on a clean canvas
fn complete_path_generation(
    mut generator: ResMut<PathGenerator>,
    mut canvas: ResMut<Canvas>,
    mut session: ResMut<Session>,
    mut player: ResMut<ScriptedPlayer>,
    mut stroke: ResMut<StrokeState>,
    game: Res<GameConfig>,
    config: Res<AppConfig>,
) {
    let corners = *canvas.0.corners();
    let Some(control_points) = generator.tick(&corners) else {
        return;
    };

    let curve = CurveModel::new(control_points, corners.center(), game.curve.clone());
    if let Err(e) = session.0.bind_path(curve, config.mode) {
        warn!("Generated path rejected: {}", e);
        generator.request(&corners);
        return;
    }

    let normal = canvas.0.surface_normal();
    session.0.set_surface_normal(normal);
    session.0.activate(true);
    session.0.start_drag();

    canvas.0.clear_texture(game.surface.base_color);
    *stroke = StrokeState { is_drawing: true, ..default() };
    player.begin();
}

fn drive_player(
    time: Res<Time>,
    mut player: ResMut<ScriptedPlayer>,
    mut canvas: ResMut<Canvas>,
    session: Res<Session>,
    config: Res<AppConfig>,
    mut pointer: ResMut<PointerSample>,
    mut stroke: ResMut<StrokeState>,
) {
    *pointer = PointerSample::default();
    let Some(step) = player.step(
        time.delta_secs(),
        session.0.tracker(),
        config.player_speed,
        config.player_wobble,
    ) else {
        return;
    };

    let normal = canvas.0.surface_normal();
    let origin = step.world_target + normal * POINTER_RAY_LIFT;
    pointer.hit = canvas
        .0
        .raycast_texture(origin, -normal)
        .map(|(hit, tex_coord)| PointerHit { point: hit.point, normal: hit.normal, tex_coord });
    pointer.drag_delta = step.drag_delta;
    stroke.pending_drag += step.drag_delta;
}

fn move_brush(
    time: Res<Time>,
    mut brush: ResMut<Brush>,
    pointer: Res<PointerSample>,
    stroke: Res<StrokeState>,
) {
    if stroke.is_drawing
        && let Some(hit) = pointer.hit
    {
        brush.0.move_to_paint_point(hit.point, hit.normal);
    }
    brush.0.update(time.delta_secs());

    for event in brush.0.take_events() {
        match event {
            BrushEvent::ColorChanged(color) => debug!("Brush colour {:?}", color),
            BrushEvent::Lifted => debug!("Brush lifted"),
            BrushEvent::Landed => debug!("Brush landed"),
        }
    }
}

fn stamp_canvas(
    time: Res<Time>,
    mut canvas: ResMut<Canvas>,
    mut brush: ResMut<Brush>,
    pointer: Res<PointerSample>,
    mut stroke: ResMut<StrokeState>,
    mut stats: ResMut<MatchStats>,
) {
    if stroke.is_drawing
        && brush.0.is_on_canvas()
        && let Some(hit) = pointer.hit
    {
        let tex_coord = canvas.0.world_to_texture_coord(hit.point);
        let color = brush.0.process_gradient_and_get_color(hit.tex_coord);
        let rotation = brush.0.rotation_z_degrees();
        let cfg = brush.0.config();
        let (diameter, scale_x, scale_y) = (cfg.diameter, cfg.scale_x, cfg.scale_y);

        if canvas
            .0
            .paint_circle_additive(tex_coord, diameter, color, rotation, scale_x, scale_y)
            .is_some()
        {
            stats.stamps += 1;
        }
        stroke.painted_point = Some(hit.point);
    }

    canvas.0.apply_paint();
    canvas.0.update(time.delta_secs());
}

/// Drag progress, completion bookkeeping and next-path requests
fn advance_session(
    time: Res<Time>,
    mut session: ResMut<Session>,
    pointer: Res<PointerSample>,
    mut generator: ResMut<PathGenerator>,
    canvas: Res<Canvas>,
    mut player: ResMut<ScriptedPlayer>,
    mut stroke: ResMut<StrokeState>,
    mut stats: ResMut<MatchStats>,
    config: Res<AppConfig>,
) {
    session.0.frame_update(time.delta_secs(), pointer.drag_delta);

    for event in session.0.take_events() {
        match event {
            SessionEvent::ScoreUpdated(score) => debug!("Score {:.3}", score),
            SessionEvent::PathCompleted => {
                let max_score = session.0.scorer().calculate_max_score();
                let score = session.0.get_score_and_reset();
                session.0.stop_drag();
                session.0.activate(false);
                player.stop();
                stroke.is_drawing = false;

                stats.paths_completed += 1;
                stats.total_score += score;
                stats.max_score += max_score;
                info!(
                    "Path {} traced: {:.2} / {:.2}",
                    stats.paths_completed, score, max_score
                );
            }
            SessionEvent::NewPathNeeded => {
                if stats.paths_completed >= config.paths {
                    session.0.clear_path();
                    stats.finished = true;
                } else {
                    generator.request(canvas.0.corners());
                }
            }
        }
    }
}

fn score_fixed_tick(time: Res<Time>, mut session: ResMut<Session>, mut stroke: ResMut<StrokeState>) {
    let tick = ScoreTick {
        dt: time.delta_secs(),
        is_drawing: stroke.is_drawing,
        painted_point: stroke.painted_point,
        drag_delta: std::mem::take(&mut stroke.pending_drag),
    };
    session.0.fixed_update(&tick);
}
