//! Adaptive nearest-point search over a path sample
//!
//! Consecutive painted points are close to each other along the path, so
//! the search first scans a window around the last found index. The window
//! radius grows with the smoothed traversal speed. When the best hit lies on
//! the window boundary the rest of the sample is scanned linearly; otherwise
//! the remaining blocks are checked against their bounding spheres. Either
//! way the result equals an exhaustive scan (lowest index on ties).

use brushtrail_config::ScorerConfig;
use glam::Vec3;
use tracing::trace;

use crate::sample::PathSample;

/// Closest sample point found by a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    pub index: usize,
    pub distance_squared: f32,
}

impl NearestHit {
    /// Keep the smaller distance, or the lower index on equal distance
    #[inline]
    fn consider(best: &mut Option<NearestHit>, index: usize, distance_squared: f32) {
        let better = match best {
            None => true,
            Some(hit) => {
                distance_squared < hit.distance_squared
                    || (distance_squared == hit.distance_squared && index < hit.index)
            }
        };
        if better {
            *best = Some(NearestHit { index, distance_squared });
        }
    }
}

/// Linear scan of `points`, lowest index wins ties
pub fn exhaustive_nearest(points: &[Vec3], point: Vec3) -> Option<NearestHit> {
    let mut best = None;
    for (index, p) in points.iter().enumerate() {
        NearestHit::consider(&mut best, index, p.distance_squared(point));
    }
    best
}

/// Search state carried between fixed ticks
#[derive(Debug, Clone, Default)]
pub struct NearestPointSearch {
    last_index: usize,
    /// Smoothed world units per second
    traversal_speed: f32,
    time_since_update: f32,
    last_point: Option<Vec3>,
}

impl NearestPointSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn traversal_speed(&self) -> f32 {
        self.traversal_speed
    }

    /// Accumulate time between accepted samples
    pub fn advance_time(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.time_since_update += dt;
        }
    }

    /// Window radius in samples for a sample of `sample_len` points
    pub fn search_range(&self, config: &ScorerConfig, sample_len: usize) -> usize {
        let base = config.base_search_range as f32;
        let upper = ((sample_len / 2) as f32).max(base);
        let range = base + self.traversal_speed * self.time_since_update * config.search_speed_multiplier;
        if range.is_finite() {
            range.clamp(base, upper) as usize
        } else {
            upper as usize
        }
    }

    /// Find the sample closest to `point` and update the search state
    pub fn find(
        &mut self,
        sample: &PathSample,
        point: Vec3,
        config: &ScorerConfig,
    ) -> Option<NearestHit> {
        let points = sample.points();
        if points.is_empty() {
            return None;
        }

        let last = points.len() - 1;
        let range = self.search_range(config, points.len());
        let center = self.last_index.min(last);
        let lo = center.saturating_sub(range);
        let hi = (center + range).min(last);

        let mut best = None;
        for (offset, p) in points[lo..=hi].iter().enumerate() {
            NearestHit::consider(&mut best, lo + offset, p.distance_squared(point));
        }
        let window_best = best?;

        let on_boundary = (window_best.index == lo && lo > 0) || (window_best.index == hi && hi < last);
        if on_boundary {
            trace!("nearest point on window boundary, full scan");
            for (index, p) in points.iter().enumerate() {
                if index < lo || index > hi {
                    NearestHit::consider(&mut best, index, p.distance_squared(point));
                }
            }
        } else {
            for block in sample.blocks() {
                if block.start >= lo && block.end <= hi + 1 {
                    continue;
                }
                let bound = best.map_or(f32::INFINITY, |hit| hit.distance_squared);
                if block.min_distance_squared(point) > bound {
                    continue;
                }
                for index in block.start..block.end {
                    if index < lo || index > hi {
                        NearestHit::consider(&mut best, index, points[index].distance_squared(point));
                    }
                }
            }
        }

        let hit = best?;
        self.record(hit.index, point, config.speed_smoothing);
        Some(hit)
    }

    /// Fold the movement since the previous accepted point into the speed average
    fn record(&mut self, index: usize, point: Vec3, smoothing: f32) {
        if let Some(previous) = self.last_point
            && self.time_since_update > 0.0
        {
            let measured = previous.distance(point) / self.time_since_update;
            self.traversal_speed += (measured - self.traversal_speed) * smoothing.clamp(0.0, 1.0);
        }
        self.last_index = index;
        self.last_point = Some(point);
        self.time_since_update = 0.0;
    }
}
