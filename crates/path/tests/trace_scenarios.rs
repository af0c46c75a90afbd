//! End-to-end tracing scenarios through the public API

use brushtrail_config::{CurveConfig, ScorerConfig, TrackerConfig};
use brushtrail_path::{
    exhaustive_nearest, AccuracyScorer, CurveModel, NearestPointSearch, PathError, PathSample,
    ProgressTracker, ScoreMode, ScoreTick, SessionEvent, TraceSession, TrackerEvent,
};
use glam::{Vec2, Vec3};

/// Three segments: four anchors on the x axis with handles between them
fn three_segment_curve() -> CurveModel {
    let points = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.5, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.5, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
    ];
    CurveModel::new(points, Vec3::ZERO, CurveConfig { steps_per_segment: 10, ..Default::default() })
}

/// Deterministic pseudo-random values in [0, 1)
fn lcg(seed: &mut u64) -> f32 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    ((*seed >> 40) as f32) / (1u64 << 24) as f32
}

#[test]
fn test_three_segment_path_samples_31_points() {
    let curve = three_segment_curve();
    assert_eq!(curve.segment_count(), 3);
    assert_eq!(curve.sample(10).unwrap().len(), 31);
    assert_eq!(curve.sample(0), Err(PathError::InvalidStepCount(0)));
}

#[test]
fn test_aligned_drag_completes_path_exactly_once() {
    let mut tracker = ProgressTracker::new(TrackerConfig::default());
    tracker.set_surface_normal(Vec3::NEG_Z);
    tracker.bind_path(three_segment_curve()).unwrap();
    tracker.start_drag();

    let tangent = tracker.current_direction();
    let delta = Vec2::new(tangent.x, tangent.y) * 0.1;

    let mut previous = 0.0;
    for _ in 0..100 {
        tracker.update_progress(delta);
        assert!(tracker.current_progress() >= previous);
        assert!(tracker.current_progress() <= tracker.max_progress());
        previous = tracker.current_progress();
    }

    assert_eq!(tracker.current_progress(), 3.0);
    let completions = tracker
        .take_events()
        .into_iter()
        .filter(|e| *e == TrackerEvent::Completed)
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn test_adaptive_search_matches_exhaustive_scan() {
    let config = ScorerConfig::default();
    let mut seed = 7;

    for _ in 0..20 {
        let count = 20 + (lcg(&mut seed) * 300.0) as usize;
        let points: Vec<Vec3> = (0..count)
            .map(|_| Vec3::new(lcg(&mut seed) * 4.0, lcg(&mut seed) * 4.0, lcg(&mut seed) * 0.5))
            .collect();
        let sample = PathSample::from_points(points, 10);
        let mut search = NearestPointSearch::new();

        for _ in 0..40 {
            search.advance_time(lcg(&mut seed) * 0.05);
            let query = Vec3::new(lcg(&mut seed) * 5.0 - 0.5, lcg(&mut seed) * 5.0 - 0.5, 0.0);
            let adaptive = search.find(&sample, query, &config);
            let exhaustive = exhaustive_nearest(sample.points(), query);
            assert_eq!(adaptive.map(|h| h.index), exhaustive.map(|h| h.index));
        }
    }
}

#[test]
fn test_hard_score_never_negative() {
    let curve = three_segment_curve();
    let mut tracker = ProgressTracker::new(TrackerConfig::default());
    tracker.bind_path(curve.clone()).unwrap();
    tracker.start_drag();

    let mut scorer = AccuracyScorer::new(ScorerConfig::default());
    scorer.bind(PathSample::build(&curve, 10).unwrap(), ScoreMode::Hard);
    scorer.set_active(true);

    let mut seed = 11;
    for _ in 0..200 {
        let point = Vec3::new(lcg(&mut seed) * 6.0 - 1.5, lcg(&mut seed) * 6.0 - 3.0, 0.0);
        scorer.fixed_update(
            &ScoreTick { dt: 0.02, is_drawing: true, painted_point: Some(point), drag_delta: Vec2::ZERO },
            &tracker,
        );
        assert!(scorer.score() >= 0.0);
    }
}

#[test]
fn test_light_score_respects_floor() {
    let curve = three_segment_curve();
    let mut tracker = ProgressTracker::new(TrackerConfig::default());
    tracker.set_surface_normal(Vec3::NEG_Z);
    tracker.bind_path(curve.clone()).unwrap();

    let config = ScorerConfig { light_min_score: 2.0, ..Default::default() };
    let mut scorer = AccuracyScorer::new(config);
    scorer.bind(PathSample::build(&curve, 10).unwrap(), ScoreMode::Light);
    scorer.set_active(true);

    let mut seed = 3;
    for _ in 0..200 {
        let angle = lcg(&mut seed) * std::f32::consts::TAU;
        let delta = Vec2::new(angle.cos(), angle.sin()) * 0.05;
        scorer.fixed_update(
            &ScoreTick { dt: 0.02, is_drawing: true, painted_point: None, drag_delta: delta },
            &tracker,
        );
        assert!(scorer.score() >= 2.0);
    }
}

#[test]
fn test_session_reports_completion_and_new_path() {
    let mut session = TraceSession::new(TrackerConfig::default(), ScorerConfig::default());
    session.set_surface_normal(Vec3::NEG_Z);
    session.bind_path(three_segment_curve(), ScoreMode::Hard).unwrap();
    session.activate(true);
    session.start_drag();

    let mut events = Vec::new();
    for i in 0..60 {
        session.frame_update(1.0 / 60.0, Vec2::new(0.06, 0.0));
        let x = (i as f32 + 1.0) * 0.06;
        session.fixed_update(&ScoreTick {
            dt: 1.0 / 50.0,
            is_drawing: true,
            painted_point: Some(Vec3::new(x.min(3.0), 0.0, 0.0)),
            drag_delta: Vec2::new(0.06, 0.0),
        });
        events.extend(session.take_events());
    }

    let completed = events.iter().position(|e| *e == SessionEvent::PathCompleted);
    let new_path = events.iter().position(|e| *e == SessionEvent::NewPathNeeded);
    assert!(completed.is_some());
    assert!(new_path > completed);
    assert_eq!(events.iter().filter(|e| **e == SessionEvent::PathCompleted).count(), 1);
    assert!(session.get_score_and_reset() > 0.0);
}
