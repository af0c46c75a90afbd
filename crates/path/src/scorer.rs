//! Accuracy scoring on the fixed tick
//!
//! Hard mode rates painted points by their distance to the path and only
//! pays for new farthest progress. Light mode rates the drag direction
//! against the path tangent. `max_progress_achieved` is a distance from the
//! path start in both modes.

use brushtrail_config::ScorerConfig;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sample::PathSample;
use crate::search::{exhaustive_nearest, NearestPointSearch};
use crate::tracker::ProgressTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    #[default]
    Hard,
    Light,
}

/// Inputs for one fixed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTick {
    pub dt: f32,
    pub is_drawing: bool,
    /// Latest painted world point (post-stamp)
    pub painted_point: Option<Vec3>,
    /// Screen-space drag delta since the previous tick
    pub drag_delta: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreEvent {
    ScoreUpdated(f32),
}

pub struct AccuracyScorer {
    config: ScorerConfig,
    sample: Option<PathSample>,
    mode: ScoreMode,
    active: bool,
    calculations_stopped: bool,
    score: f32,
    max_progress_achieved: f32,
    search: NearestPointSearch,
    last_sample_point: Option<Vec3>,
    last_distance: Option<f32>,
    events: Vec<ScoreEvent>,
}

impl AccuracyScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            sample: None,
            mode: ScoreMode::Hard,
            active: false,
            calculations_stopped: false,
            score: 0.0,
            max_progress_achieved: 0.0,
            search: NearestPointSearch::new(),
            last_sample_point: None,
            last_distance: None,
            events: Vec::new(),
        }
    }

    /// Bind the sample of a new path and select the scoring mode
    pub fn bind(&mut self, sample: PathSample, mode: ScoreMode) {
        info!("AccuracyScorer: bound {:?} path with {} samples", mode, sample.len());
        self.sample = Some(sample);
        self.mode = mode;
        self.reset_state();
    }

    /// Drop the bound sample; ticks are ignored until the next bind
    pub fn unbind(&mut self) {
        self.sample = None;
        self.reset_state();
    }

    /// Clear per-path state; idempotent
    pub fn reset_state(&mut self) {
        self.max_progress_achieved = 0.0;
        self.search.reset();
        self.last_sample_point = None;
        self.last_distance = None;
    }

    /// Activation resets the score; deactivation also drops light mode
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.reset_state();
            self.set_score(0.0);
        } else {
            self.mode = ScoreMode::Hard;
        }
        self.active = active;
        debug!("AccuracyScorer: active = {}", active);
    }

    /// Pause scoring without resetting anything
    pub fn set_calculations_stopped(&mut self, stopped: bool) {
        self.calculations_stopped = stopped;
    }

    pub fn set_mode(&mut self, mode: ScoreMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ScoreMode {
        self.mode
    }

    pub fn is_light_mode(&self) -> bool {
        self.mode == ScoreMode::Light
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn calculations_stopped(&self) -> bool {
        self.calculations_stopped
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn max_progress_achieved(&self) -> f32 {
        self.max_progress_achieved
    }

    /// Distance of the last evaluated hard-mode point to the path
    pub fn search(&self) -> &NearestPointSearch {
        &self.search
    }

    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn sample(&self) -> Option<&PathSample> {
        self.sample.as_ref()
    }

    /// Read the score and clear it
    pub fn get_score_and_reset(&mut self) -> f32 {
        let score = self.score;
        self.score = 0.0;
        score
    }

    /// Best achievable score for the bound path in the current mode
    pub fn calculate_max_score(&self) -> f32 {
        self.sample
            .as_ref()
            .map_or(0.0, |sample| sample.total_length() * self.config.score_per_unit(self.is_light_mode()))
    }

    /// Euclidean distance from `point` to the closest path sample
    pub fn get_min_distance(&self, point: Vec3) -> f32 {
        self.sample
            .as_ref()
            .and_then(|sample| exhaustive_nearest(sample.points(), point))
            .map_or(f32::INFINITY, |hit| hit.distance_squared.sqrt())
    }

    /// Evaluate one fixed tick
    pub fn fixed_update(&mut self, tick: &ScoreTick, tracker: &ProgressTracker) {
        if !self.active || self.calculations_stopped || self.sample.is_none() {
            return;
        }
        if !tick.dt.is_finite() || tick.dt < 0.0 {
            return;
        }

        let before = self.score;
        match self.mode {
            ScoreMode::Hard => self.hard_tick(tick, tracker),
            ScoreMode::Light => self.light_tick(tick, tracker),
        }
        if self.score != before {
            self.events.push(ScoreEvent::ScoreUpdated(self.score));
        }
    }

    fn hard_tick(&mut self, tick: &ScoreTick, tracker: &ProgressTracker) {
        self.search.advance_time(tick.dt);
        if !tick.is_drawing || !tracker.is_dragging() {
            return;
        }
        let Some(point) = tick.painted_point else {
            return;
        };
        if !point.is_finite() {
            debug!("AccuracyScorer: skipped non-finite painted point");
            return;
        }
        if let Some(last) = self.last_sample_point
            && last.distance(point) < self.config.min_sample_distance
        {
            return;
        }
        let Some(sample) = self.sample.as_ref() else {
            return;
        };

        let Some(hit) = self.search.find(sample, point, &self.config) else {
            return;
        };
        let distance = hit.distance_squared.sqrt();
        let progress = sample.progress_at_index(hit.index, point);

        let config = &self.config;
        let mut score = self.score;
        if progress > self.max_progress_achieved {
            self.max_progress_achieved = progress;
            let closeness = 1.0 - (distance / config.max_accuracy_distance).clamp(0.0, 1.0);
            score += config.max_score_per_point * closeness * config.close_path_multiplier;
        } else if distance > config.max_accuracy_distance {
            score -= config.far_penalty_multiplier * (distance - config.max_accuracy_distance);
        }

        self.last_sample_point = Some(point);
        self.last_distance = Some(distance);
        self.set_score(score.max(0.0));
    }

    fn light_tick(&mut self, tick: &ScoreTick, tracker: &ProgressTracker) {
        if !tick.is_drawing {
            return;
        }
        if !tick.drag_delta.is_finite() {
            debug!("AccuracyScorer: skipped non-finite drag delta");
            return;
        }

        let rotated = tracker.rotate_delta(tick.drag_delta);
        let alignment = tracker.current_direction().dot(rotated.normalize_or_zero());

        let config = &self.config;
        let mut score = self.score;
        if alignment > config.light_alignment_threshold {
            score += alignment
                * rotated.length()
                * tracker.config().move_speed
                * config.light_score_per_unit
                * config.light_multiplier;
            if let Some(sample) = self.sample.as_ref() {
                let reached = sample.arc_length_at_progress(tracker.current_progress());
                self.max_progress_achieved = self.max_progress_achieved.max(reached);
            }
        } else {
            score -= config.light_penalty * (-alignment).max(0.0);
        }
        self.set_score(score.max(self.config.light_min_score));
    }

    fn set_score(&mut self, score: f32) {
        self.score = score;
    }

    pub fn take_events(&mut self) -> Vec<ScoreEvent> {
        std::mem::take(&mut self.events)
    }
}
