//! Match-layer facade over one tracker and one scorer
//!
//! The session is what a game mode talks to: it binds generated paths,
//! forwards frame and fixed ticks in the right order and folds the
//! component signals into [`SessionEvent`]s.

use brushtrail_config::{ScorerConfig, TrackerConfig};
use glam::{Vec2, Vec3};
use tracing::info;

use crate::curve::CurveModel;
use crate::error::PathError;
use crate::sample::PathSample;
use crate::scorer::{AccuracyScorer, ScoreEvent, ScoreMode, ScoreTick};
use crate::tracker::{ProgressTracker, TrackerEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ScoreUpdated(f32),
    /// The bound path was traced to its end
    PathCompleted,
    /// The match layer should generate and bind the next path
    NewPathNeeded,
}

pub struct TraceSession {
    tracker: ProgressTracker,
    scorer: AccuracyScorer,
    completion_reported: bool,
    paths_completed: usize,
    events: Vec<SessionEvent>,
}

impl TraceSession {
    pub fn new(tracker_config: TrackerConfig, scorer_config: ScorerConfig) -> Self {
        Self {
            tracker: ProgressTracker::new(tracker_config),
            scorer: AccuracyScorer::new(scorer_config),
            completion_reported: false,
            paths_completed: 0,
            events: Vec::new(),
        }
    }

    /// Bind a new path in the given mode and show its lines
    pub fn bind_path(&mut self, curve: CurveModel, mode: ScoreMode) -> Result<(), PathError> {
        self.tracker.bind_path(curve)?;
        let sample = self.tracker.sample().cloned().unwrap_or_else(|| PathSample::from_points(Vec::new(), 1));
        self.scorer.bind(sample, mode);
        self.scorer.set_calculations_stopped(false);
        self.completion_reported = false;
        self.tracker.show_lines();
        info!("TraceSession: path bound in {:?} mode", mode);
        Ok(())
    }

    /// Tear down the bound path: stop dragging and scoring, hide the lines
    pub fn clear_path(&mut self) {
        self.tracker.stop_drag();
        self.tracker.hide_lines();
        self.tracker.clear_path();
        self.scorer.set_active(false);
        self.scorer.unbind();
        self.completion_reported = false;
        info!("TraceSession: path cleared");
    }

    /// Start or stop scoring; activation resets the score
    pub fn activate(&mut self, active: bool) {
        self.scorer.set_active(active);
        if active {
            self.tracker.reset_progress();
        }
    }

    pub fn set_calculations_stopped(&mut self, stopped: bool) {
        self.scorer.set_calculations_stopped(stopped);
    }

    pub fn set_surface_normal(&mut self, normal: Vec3) {
        self.tracker.set_surface_normal(normal);
    }

    pub fn start_drag(&mut self) {
        self.tracker.start_drag();
    }

    pub fn stop_drag(&mut self) {
        self.tracker.stop_drag();
    }

    /// Variable-rate tick: drag progress and line fades
    pub fn frame_update(&mut self, dt: f32, drag_delta: Vec2) {
        if self.tracker.is_dragging() {
            self.tracker.update_progress(drag_delta);
        }
        self.tracker.update(dt);
        self.collect_events();
    }

    /// Fixed-rate tick: accuracy scoring
    pub fn fixed_update(&mut self, tick: &ScoreTick) {
        self.scorer.fixed_update(tick, &self.tracker);
        self.collect_events();
    }

    pub fn get_score_and_reset(&mut self) -> f32 {
        self.scorer.get_score_and_reset()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn scorer(&self) -> &AccuracyScorer {
        &self.scorer
    }

    pub fn paths_completed(&self) -> usize {
        self.paths_completed
    }

    fn collect_events(&mut self) {
        for event in self.scorer.take_events() {
            match event {
                ScoreEvent::ScoreUpdated(score) => self.events.push(SessionEvent::ScoreUpdated(score)),
            }
        }
        for event in self.tracker.take_events() {
            if event == TrackerEvent::Completed && !self.completion_reported {
                self.completion_reported = true;
                self.paths_completed += 1;
                self.scorer.set_calculations_stopped(true);
                self.tracker.hide_lines();
                info!(
                    "TraceSession: path completed with score {:.2} of {:.2}",
                    self.scorer.score(),
                    self.scorer.calculate_max_score()
                );
                self.events.push(SessionEvent::PathCompleted);
                self.events.push(SessionEvent::NewPathNeeded);
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
