//! Scripted pointer input for the headless loop
//!
//! Stands in for a human dragging along the path: each frame it pushes
//! along the path tangent at the tracker's progress, swaying sideways a
//! little so the accuracy score has something to measure.

use bevy::prelude::*;
use glam::{Vec2, Vec3};
use brushtrail_path::ProgressTracker;

/// Sideways sway frequency in Hz
const WOBBLE_FREQUENCY: f32 = 1.5;

/// One frame of scripted input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    /// World point the pointer is over
    pub world_target: Vec3,
    /// Screen-space drag since the previous step
    pub drag_delta: Vec2,
}

#[derive(Resource, Default)]
pub struct ScriptedPlayer {
    active: bool,
    phase: f32,
    last_offset: Vec3,
}

impl ScriptedPlayer {
    pub fn begin(&mut self) {
        self.active = true;
        self.phase = 0.0;
        self.last_offset = Vec3::ZERO;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance by `dt`; None when idle or no path is bound
    pub fn step(
        &mut self,
        dt: f32,
        tracker: &ProgressTracker,
        speed: f32,
        wobble: f32,
    ) -> Option<PlayerStep> {
        if !self.active || dt <= 0.0 {
            return None;
        }
        let curve = tracker.curve()?;
        let direction = tracker.current_direction();
        if direction == Vec3::ZERO {
            return None;
        }

        let normal = tracker.surface_rotation() * Vec3::NEG_Z;
        let side = normal.cross(direction).normalize_or_zero();
        self.phase += dt * WOBBLE_FREQUENCY * std::f32::consts::TAU;
        let offset = side * wobble * self.phase.sin();

        let along = direction * speed * dt;
        let world_delta = along + (offset - self.last_offset);
        self.last_offset = offset;

        // Past the end the tangent is held, so the push still completes
        let world_target = curve.point_at(tracker.current_progress()) + along + offset;
        let drag_delta = (tracker.surface_rotation().inverse() * world_delta).truncate();

        Some(PlayerStep { world_target, drag_delta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brushtrail_config::{CurveConfig, TrackerConfig};
    use brushtrail_path::CurveModel;

    fn straight_tracker() -> ProgressTracker {
        let points = (0..5).map(|i| Vec3::new(i as f32 * 0.5, 0.0, 0.0)).collect();
        let curve = CurveModel::new(points, Vec3::ZERO, CurveConfig::default());
        let mut tracker = ProgressTracker::new(TrackerConfig::default());
        tracker.bind_path(curve).unwrap();
        tracker.set_surface_normal(Vec3::NEG_Z);
        tracker
    }

    #[test]
    fn test_idle_player_yields_nothing() {
        let tracker = straight_tracker();
        let mut player = ScriptedPlayer::default();
        assert!(player.step(0.016, &tracker, 1.0, 0.0).is_none());
    }

    #[test]
    fn test_steps_drive_tracker_to_completion() {
        let mut tracker = straight_tracker();
        let mut player = ScriptedPlayer::default();
        player.begin();
        tracker.start_drag();

        for _ in 0..600 {
            let Some(step) = player.step(1.0 / 60.0, &tracker, 1.0, 0.01) else {
                break;
            };
            tracker.update_progress(step.drag_delta);
            if tracker.is_completed() {
                break;
            }
        }
        assert!(tracker.is_completed());
    }

    #[test]
    fn test_target_stays_near_path() {
        let tracker = straight_tracker();
        let mut player = ScriptedPlayer::default();
        player.begin();
        let step = player.step(0.1, &tracker, 1.0, 0.05).unwrap();
        assert!(step.world_target.y.abs() <= 0.05 + 1e-5);
        assert!(step.world_target.z.abs() < 1e-5);
    }
}
