//! Drag-driven progress along the bound path
//!
//! The tracker turns screen-space drag deltas into parametric progress:
//! deltas are rotated into the surface plane, projected onto the path
//! tangent and scaled by the physical length of the current segment, so the
//! marker advances at the same world speed on short and long segments.

use brushtrail_config::{Easing, TrackerConfig};
use glam::{Quat, Vec2, Vec3};
use painting::Tween;
use tracing::{debug, info};

use crate::curve::CurveModel;
use crate::error::PathError;
use crate::sample::PathSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    DragStarted,
    DragStopped,
    /// Progress reached the end of the path; raised once per bound path
    Completed,
}

/// Opacity animation for a line renderer
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    from: f32,
    to: f32,
    tween: Tween,
    duration: f32,
    easing: Easing,
}

impl Fade {
    /// Starts hidden
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            tween: Tween::new(0.0, easing),
            duration,
            easing,
        }
    }

    pub fn fade_in(&mut self) {
        self.retarget(1.0);
    }

    pub fn fade_out(&mut self) {
        self.retarget(0.0);
    }

    fn retarget(&mut self, to: f32) {
        if self.to == to {
            return;
        }
        self.from = self.opacity();
        self.to = to;
        self.tween = Tween::new(self.duration, self.easing);
    }

    pub fn update(&mut self, dt: f32) {
        self.tween.advance(dt);
    }

    pub fn opacity(&self) -> f32 {
        self.from + (self.to - self.from) * self.tween.eased()
    }

    /// Renderers skip all work while this is false
    pub fn is_visible(&self) -> bool {
        self.opacity() > 0.0
    }

    pub fn is_fading(&self) -> bool {
        !self.tween.is_finished()
    }
}

/// Static (whole path) and progressive (travelled prefix) polylines
#[derive(Debug, Clone)]
pub struct PathPolyline {
    static_line: Vec<Vec3>,
    progressive_line: Vec<Vec3>,
    fade: Fade,
    /// Static line must be rebuilt on the next visible refresh
    static_stale: bool,
}

impl PathPolyline {
    pub fn new(fade: Fade) -> Self {
        Self {
            static_line: Vec::new(),
            progressive_line: Vec::new(),
            fade,
            static_stale: true,
        }
    }

    pub fn static_line(&self) -> &[Vec3] {
        &self.static_line
    }

    pub fn progressive_line(&self) -> &[Vec3] {
        &self.progressive_line
    }

    pub fn fade(&self) -> &Fade {
        &self.fade
    }

    pub fn is_visible(&self) -> bool {
        self.fade.is_visible()
    }

    fn clear(&mut self) {
        self.static_line.clear();
        self.progressive_line.clear();
        self.static_stale = true;
    }

    /// Rebuild both lines for `progress`; no-op while hidden
    fn refresh(&mut self, curve: &CurveModel, sample: &PathSample, progress: f32) {
        if !self.fade.is_visible() {
            return;
        }
        if self.static_stale {
            self.static_line.clear();
            self.static_line.extend_from_slice(sample.points());
            self.static_stale = false;
        }

        let x = progress.max(0.0) * sample.steps_per_segment() as f32;
        let whole = (x.floor() as usize).min(sample.len().saturating_sub(1));
        self.progressive_line.clear();
        self.progressive_line.extend_from_slice(&sample.points()[..(whole + 1).min(sample.len())]);
        if x > whole as f32 && whole + 1 < sample.len() {
            self.progressive_line.push(curve.point_at(progress));
        }
    }
}

pub struct ProgressTracker {
    config: TrackerConfig,
    curve: Option<CurveModel>,
    sample: Option<PathSample>,
    /// Physical length of each segment, computed once per bound path
    segment_lengths: Vec<f32>,
    current_progress: f32,
    max_progress: f32,
    dragging: bool,
    completed: bool,
    surface_rotation: Quat,
    polyline: PathPolyline,
    events: Vec<TrackerEvent>,
}

impl ProgressTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let fade = Fade::new(config.fade_duration, config.fade_easing);
        Self {
            config,
            curve: None,
            sample: None,
            segment_lengths: Vec::new(),
            current_progress: 0.0,
            max_progress: 0.0,
            dragging: false,
            completed: false,
            surface_rotation: Quat::IDENTITY,
            polyline: PathPolyline::new(fade),
            events: Vec::new(),
        }
    }

    /// Bind a freshly generated path and reset progress to its start
    pub fn bind_path(&mut self, curve: CurveModel) -> Result<(), PathError> {
        let steps = curve.config().steps_per_segment;
        let sample = PathSample::build(&curve, steps)?;
        self.segment_lengths = curve.segment_lengths(steps)?;
        self.max_progress = curve.segment_count() as f32;
        info!(
            "ProgressTracker: bound path with {} segments, {} samples",
            curve.segment_count(),
            sample.len()
        );

        self.curve = Some(curve);
        self.sample = Some(sample);
        self.polyline.clear();
        self.reset_progress();
        Ok(())
    }

    pub fn clear_path(&mut self) {
        self.curve = None;
        self.sample = None;
        self.segment_lengths.clear();
        self.max_progress = 0.0;
        self.current_progress = 0.0;
        self.completed = false;
        self.polyline.clear();
    }

    /// Rewind to the path start; safe to call repeatedly
    pub fn reset_progress(&mut self) {
        self.current_progress = 0.0;
        self.completed = false;
        self.refresh_lines();
    }

    /// Set the canvas normal used to rotate drag deltas into surface space
    pub fn set_surface_normal(&mut self, normal: Vec3) {
        let normal = normal.normalize_or_zero();
        if !normal.is_finite() {
            return;
        }
        self.surface_rotation = if normal == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::NEG_Z, normal)
        };
    }

    pub fn surface_rotation(&self) -> Quat {
        self.surface_rotation
    }

    /// Screen-space drag delta expressed in surface space
    pub fn rotate_delta(&self, delta: Vec2) -> Vec3 {
        self.surface_rotation * Vec3::new(delta.x, delta.y, 0.0)
    }

    pub fn start_drag(&mut self) {
        if self.dragging {
            return;
        }
        self.dragging = true;
        self.events.push(TrackerEvent::DragStarted);
    }

    pub fn stop_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.events.push(TrackerEvent::DragStopped);
    }

    /// Path tangent at the current progress (zero without a path)
    pub fn current_direction(&self) -> Vec3 {
        self.curve
            .as_ref()
            .and_then(|curve| curve.direction_at(self.current_progress).ok())
            .unwrap_or(Vec3::ZERO)
    }

    fn current_segment_length(&self) -> f32 {
        let index = (self.current_progress.floor() as usize).min(self.segment_lengths.len().saturating_sub(1));
        self.segment_lengths.get(index).copied().unwrap_or(0.0)
    }

    /// Advance progress by an aligned drag; returns the progress added.
    ///
    /// Backward or malformed drags are ignored.
    pub fn update_progress(&mut self, drag_delta: Vec2) -> f32 {
        if !self.dragging || self.max_progress <= 0.0 {
            return 0.0;
        }
        if !drag_delta.is_finite() {
            debug!("ProgressTracker: skipped non-finite drag delta");
            return 0.0;
        }

        let rotated = self.rotate_delta(drag_delta);
        let magnitude = rotated.length();
        if magnitude <= 0.0 {
            return 0.0;
        }
        let alignment = self.current_direction().dot(rotated / magnitude);
        if alignment <= 0.0 {
            return 0.0;
        }

        let segment_length = self.current_segment_length().max(f32::EPSILON);
        let progress_add = (alignment * magnitude * self.config.move_speed / segment_length).max(0.0);
        let previous = self.current_progress;
        self.current_progress = (self.current_progress + progress_add).clamp(0.0, self.max_progress);

        if self.current_progress >= self.max_progress && !self.completed {
            self.completed = true;
            info!("ProgressTracker: path completed");
            self.events.push(TrackerEvent::Completed);
        }
        self.refresh_lines();
        self.current_progress - previous
    }

    /// Advance line fades and rebuild visible lines
    pub fn update(&mut self, dt: f32) {
        self.polyline.fade.update(dt);
        self.refresh_lines();
    }

    pub fn show_lines(&mut self) {
        self.polyline.fade.fade_in();
        self.refresh_lines();
    }

    pub fn hide_lines(&mut self) {
        self.polyline.fade.fade_out();
    }

    fn refresh_lines(&mut self) {
        if let (Some(curve), Some(sample)) = (&self.curve, &self.sample) {
            self.polyline.refresh(curve, sample, self.current_progress);
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn current_progress(&self) -> f32 {
        self.current_progress
    }

    pub fn max_progress(&self) -> f32 {
        self.max_progress
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn curve(&self) -> Option<&CurveModel> {
        self.curve.as_ref()
    }

    pub fn sample(&self) -> Option<&PathSample> {
        self.sample.as_ref()
    }

    pub fn segment_lengths(&self) -> &[f32] {
        &self.segment_lengths
    }

    pub fn polyline(&self) -> &PathPolyline {
        &self.polyline
    }

    pub fn take_events(&mut self) -> Vec<TrackerEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use brushtrail_config::CurveConfig;

    use super::*;

    fn straight_curve() -> CurveModel {
        let points = (0..7).map(|i| Vec3::new(i as f32 * 0.5, 0.0, 0.0)).collect();
        CurveModel::new(points, Vec3::ZERO, CurveConfig { steps_per_segment: 10, ..Default::default() })
    }

    fn tracker() -> ProgressTracker {
        let config = TrackerConfig { fade_duration: 0.0, ..Default::default() };
        let mut tracker = ProgressTracker::new(config);
        tracker.set_surface_normal(Vec3::NEG_Z);
        tracker.bind_path(straight_curve()).unwrap();
        tracker
    }

    #[test]
    fn test_drag_state_machine_events() {
        let mut tracker = tracker();
        tracker.start_drag();
        tracker.start_drag();
        tracker.stop_drag();
        tracker.stop_drag();
        assert_eq!(
            tracker.take_events(),
            vec![TrackerEvent::DragStarted, TrackerEvent::DragStopped]
        );
    }

    #[test]
    fn test_clear_path_drops_path_state() {
        let mut tracker = tracker();
        tracker.start_drag();
        tracker.update_progress(Vec2::new(0.5, 0.0));
        assert!(tracker.current_progress() > 0.0);

        tracker.clear_path();
        assert!(tracker.curve().is_none());
        assert!(tracker.sample().is_none());
        assert!(tracker.segment_lengths().is_empty());
        assert_eq!(tracker.max_progress(), 0.0);
        assert_eq!(tracker.current_progress(), 0.0);
        assert!(!tracker.is_completed());
        assert_eq!(tracker.update_progress(Vec2::new(0.5, 0.0)), 0.0);
    }

    #[test]
    fn test_progress_requires_drag() {
        let mut tracker = tracker();
        assert_eq!(tracker.update_progress(Vec2::new(0.5, 0.0)), 0.0);
        assert_eq!(tracker.current_progress(), 0.0);
    }

    #[test]
    fn test_aligned_drag_advances_by_world_distance() {
        let mut tracker = tracker();
        tracker.start_drag();

        // Segments are 1 unit long, move_speed 1
        let added = tracker.update_progress(Vec2::new(0.25, 0.0));
        assert!((added - 0.25).abs() < 1e-3);
        assert!((tracker.current_progress() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_backward_and_malformed_drags_are_ignored() {
        let mut tracker = tracker();
        tracker.start_drag();
        tracker.update_progress(Vec2::new(0.5, 0.0));
        let before = tracker.current_progress();

        assert_eq!(tracker.update_progress(Vec2::new(-0.5, 0.0)), 0.0);
        assert_eq!(tracker.update_progress(Vec2::new(0.0, 1.0)), 0.0);
        assert_eq!(tracker.update_progress(Vec2::new(f32::NAN, 0.0)), 0.0);
        assert_eq!(tracker.current_progress(), before);
    }

    #[test]
    fn test_completion_fires_once_and_clamps() {
        let mut tracker = tracker();
        tracker.start_drag();
        tracker.take_events();

        for _ in 0..20 {
            tracker.update_progress(Vec2::new(0.7, 0.0));
        }
        assert_eq!(tracker.current_progress(), 3.0);
        assert!(tracker.is_completed());
        assert_eq!(tracker.take_events(), vec![TrackerEvent::Completed]);

        tracker.reset_progress();
        assert_eq!(tracker.current_progress(), 0.0);
        assert!(!tracker.is_completed());
    }

    #[test]
    fn test_surface_rotation_maps_screen_to_plane() {
        let mut tracker = ProgressTracker::new(TrackerConfig::default());
        tracker.set_surface_normal(Vec3::Y);
        let rotated = tracker.rotate_delta(Vec2::new(0.0, 1.0));
        // Drag stays in the plane perpendicular to the normal
        assert!(rotated.dot(Vec3::Y).abs() < 1e-5);
        assert!((rotated.length() - 1.0).abs() < 1e-5);

        tracker.set_surface_normal(Vec3::ZERO);
        assert_eq!(tracker.surface_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_lines_only_rebuild_while_visible() {
        let mut tracker = tracker();
        assert!(!tracker.polyline().is_visible());
        assert!(tracker.polyline().static_line().is_empty());

        tracker.show_lines();
        assert_eq!(tracker.polyline().static_line().len(), 31);
        assert_eq!(tracker.polyline().progressive_line().len(), 1);

        tracker.start_drag();
        tracker.update_progress(Vec2::new(0.25, 0.0));
        let travelled = tracker.polyline().progressive_line().len();
        assert!(travelled > 1);

        tracker.update_progress(Vec2::new(0.25, 0.0));
        assert!(tracker.polyline().progressive_line().len() >= travelled);

        tracker.hide_lines();
        let frozen = tracker.polyline().progressive_line().to_vec();
        tracker.update_progress(Vec2::new(0.5, 0.0));
        assert_eq!(tracker.polyline().progressive_line(), frozen.as_slice());
    }

    #[test]
    fn test_fade_timing() {
        let mut fade = Fade::new(1.0, Easing::Linear);
        assert!(!fade.is_visible());
        fade.fade_in();
        fade.update(0.5);
        assert!((fade.opacity() - 0.5).abs() < 1e-5);
        assert!(fade.is_fading());
        fade.update(0.5);
        assert_eq!(fade.opacity(), 1.0);

        fade.fade_out();
        fade.update(1.0);
        assert!(!fade.is_visible());
    }
}
