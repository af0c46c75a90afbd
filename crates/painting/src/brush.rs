//! Brush actuator: the physical brush gliding over the canvas
//!
//! The actuator follows paint points supplied by the input layer, faces
//! away from its travel direction, lifts off the canvas after an idle
//! timeout and derives its colour from the distance it has travelled.

use brushtrail_config::BrushConfig;
use glam::{EulerRot, Mat3, Quat, Vec2, Vec3};
use tracing::debug;

use crate::constants::SAME_POINT_EPSILON;
use crate::tween::MotionTween;
use crate::validation::{is_finite_vec2, is_finite_vec3};

/// Motion phase of the brush
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushPhase {
    /// Resting on the canvas (or at home, ready to paint)
    Idle,
    /// Gliding toward the latest paint point
    Moving,
    /// Lifted, travelling back to the home point
    Returning,
    /// At home, waiting before painting is permitted again
    Cooldown { remaining: f32 },
}

/// Signals raised by the actuator, drained with [`BrushActuator::take_events`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    ColorChanged([f32; 4]),
    /// Idle timeout elapsed, the brush left the canvas
    Lifted,
    /// Cooldown elapsed, painting is permitted again
    Landed,
}

/// Snapshot of the brush for renderers and the stamp step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    pub world_position: Vec3,
    /// Roll in degrees, used as the stamp rotation
    pub rotation_z: f32,
    pub color_gradient_phase: f32,
    pub is_on_canvas: bool,
    pub is_moving: bool,
}

/// Rotation whose +Z axis points along `forward` with +Y as close to `up`
/// as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO || !is_finite_vec3(f) {
        return Quat::IDENTITY;
    }
    let mut r = up.cross(f).normalize_or_zero();
    if r == Vec3::ZERO {
        // up parallel to forward
        r = f.any_orthonormal_vector();
    }
    let u = f.cross(r);
    Quat::from_mat3(&Mat3::from_cols(r, u, f))
}

pub struct BrushActuator {
    config: BrushConfig,
    home_position: Vec3,
    home_rotation: Quat,
    position: Vec3,
    rotation: Quat,
    phase: BrushPhase,
    motion: Option<MotionTween>,
    /// Seconds left before the brush lifts; only counts while away from home
    idle_remaining: f32,
    last_paint_point: Option<Vec3>,
    last_gradient_point: Option<Vec2>,
    gradient_phase: f32,
    last_color: Option<[f32; 4]>,
    events: Vec<BrushEvent>,
}

impl BrushActuator {
    pub fn new(config: BrushConfig, home_position: Vec3, home_rotation: Quat) -> Self {
        Self {
            idle_remaining: config.idle_timeout,
            config,
            home_position,
            home_rotation,
            position: home_position,
            rotation: home_rotation,
            phase: BrushPhase::Idle,
            motion: None,
            last_paint_point: None,
            last_gradient_point: None,
            gradient_phase: 0.0,
            last_color: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn phase(&self) -> BrushPhase {
        self.phase
    }

    /// Roll of the current rotation in degrees
    pub fn rotation_z_degrees(&self) -> f32 {
        let (_, _, z) = self.rotation.to_euler(EulerRot::YXZ);
        z.to_degrees()
    }

    pub fn gradient_phase(&self) -> f32 {
        self.gradient_phase
    }

    /// Painting is permitted only while this is true
    pub fn is_on_canvas(&self) -> bool {
        matches!(self.phase, BrushPhase::Idle | BrushPhase::Moving)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, BrushPhase::Moving | BrushPhase::Returning)
    }

    pub fn state(&self) -> BrushState {
        BrushState {
            world_position: self.position,
            rotation_z: self.rotation_z_degrees(),
            color_gradient_phase: self.gradient_phase,
            is_on_canvas: self.is_on_canvas(),
            is_moving: self.is_moving(),
        }
    }

    /// Rotation facing away from `direction`, tilted by the surface normal
    pub fn target_rotation(&self, direction: Vec3, normal: Vec3) -> Quat {
        let primary = look_rotation(-direction - normal * self.config.normal_power, Vec3::Y);
        let secondary = look_rotation(-normal, direction);

        let (yaw, pitch, roll) = primary.to_euler(EulerRot::YXZ);
        let (_, _, secondary_roll) = secondary.to_euler(EulerRot::YXZ);
        let blended_roll = roll + (secondary_roll - roll) * self.config.tilt_blend;

        Quat::from_euler(EulerRot::YXZ, yaw, pitch, blended_roll)
    }

    /// Start gliding toward a new paint point.
    ///
    /// Returns false when the input is malformed or the brush is lifted.
    pub fn move_to_paint_point(&mut self, position: Vec3, normal: Vec3) -> bool {
        if !is_finite_vec3(position) || !is_finite_vec3(normal) {
            debug!("BrushActuator: skipped non-finite paint point");
            return false;
        }
        if !self.is_on_canvas() {
            return false;
        }

        self.idle_remaining = self.config.idle_timeout;

        let previous = self.last_paint_point.unwrap_or(self.position);
        if self.last_paint_point.is_some() && previous.distance(position) < SAME_POINT_EPSILON {
            return true;
        }

        let direction = (position - previous).normalize_or_zero();
        let target = self.target_rotation(direction, normal);
        self.motion = Some(MotionTween::new(
            (self.position, self.rotation),
            (position, target),
            self.config.move_duration,
            self.config.move_easing,
        ));
        self.phase = BrushPhase::Moving;
        self.last_paint_point = Some(position);
        true
    }

    /// Advance motion, idle countdown and cooldown by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        match self.phase {
            BrushPhase::Moving => {
                self.advance_motion(dt);
                if self.motion.is_none() {
                    self.phase = BrushPhase::Idle;
                }
                self.tick_idle(dt);
            }
            BrushPhase::Idle => self.tick_idle(dt),
            BrushPhase::Returning => {
                self.advance_motion(dt);
                if self.motion.is_none() {
                    if self.config.cooldown > 0.0 {
                        self.phase = BrushPhase::Cooldown { remaining: self.config.cooldown };
                    } else {
                        self.land();
                    }
                }
            }
            BrushPhase::Cooldown { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.land();
                } else {
                    self.phase = BrushPhase::Cooldown { remaining };
                }
            }
        }
    }

    fn advance_motion(&mut self, dt: f32) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        let (position, rotation) = motion.advance(dt);
        self.position = position;
        self.rotation = rotation;
        if motion.is_finished() {
            self.motion = None;
        }
    }

    fn tick_idle(&mut self, dt: f32) {
        if self.last_paint_point.is_none() {
            return;
        }
        self.idle_remaining -= dt;
        if self.idle_remaining <= 0.0 {
            self.lift();
        }
    }

    fn lift(&mut self) {
        debug!("BrushActuator: idle timeout, returning home");
        self.motion = Some(MotionTween::new(
            (self.position, self.rotation),
            (self.home_position, self.home_rotation),
            self.config.return_duration,
            self.config.return_easing,
        ));
        self.phase = BrushPhase::Returning;
        self.last_paint_point = None;
        self.last_gradient_point = None;
        self.events.push(BrushEvent::Lifted);
    }

    fn land(&mut self) {
        debug!("BrushActuator: landed");
        self.phase = BrushPhase::Idle;
        self.idle_remaining = self.config.idle_timeout;
        self.events.push(BrushEvent::Landed);
    }

    /// Advance the gradient phase by the distance travelled since the last
    /// paint coordinate and return the colour at the new phase.
    pub fn process_gradient_and_get_color(&mut self, paint_coord: Vec2) -> [f32; 4] {
        if !is_finite_vec2(paint_coord) {
            return self
                .last_color
                .unwrap_or_else(|| self.config.gradient.evaluate(self.gradient_phase));
        }

        let distance = self
            .last_gradient_point
            .map(|last| last.distance(paint_coord))
            .unwrap_or(0.0);
        let mut phase = (self.gradient_phase + distance * self.config.gradient_speed).rem_euclid(1.0);
        if phase >= 1.0 {
            phase = 0.0;
        }
        self.gradient_phase = phase;
        self.last_gradient_point = Some(paint_coord);

        let color = self.config.gradient.evaluate(phase);
        if self.last_color != Some(color) {
            self.last_color = Some(color);
            self.events.push(BrushEvent::ColorChanged(color));
        }
        color
    }

    pub fn take_events(&mut self) -> Vec<BrushEvent> {
        std::mem::take(&mut self.events)
    }
}
