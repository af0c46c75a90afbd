//! Dense path sample with arc-length and block bounds tables
//!
//! The sample is immutable for the lifetime of a bound path. Alongside the
//! points it stores the cumulative distance to every point (for converting
//! indices and parametric progress to distance) and a bounding sphere per
//! block of consecutive points (for pruning nearest-point scans).

use glam::Vec3;

use crate::curve::CurveModel;
use crate::error::PathError;

/// Consecutive points grouped under one bounding sphere
pub const SAMPLE_BLOCK_SIZE: usize = 16;

/// Bounding sphere over `points[start..end]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBlock {
    pub start: usize,
    pub end: usize,
    pub center: Vec3,
    pub radius: f32,
}

impl SampleBlock {
    fn build(points: &[Vec3], start: usize, end: usize) -> Self {
        let (min, max) = points[start..end].iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let center = (min + max) * 0.5;
        let radius = points[start..end]
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        // Pad so rounding never prunes a block that holds the true minimum
        Self { start, end, center, radius: radius * (1.0 + 1e-4) + 1e-6 }
    }

    /// Smallest possible squared distance from `p` to any point in the block
    pub fn min_distance_squared(&self, p: Vec3) -> f32 {
        let d = (p.distance(self.center) - self.radius).max(0.0);
        d * d
    }
}

#[derive(Debug, Clone)]
pub struct PathSample {
    points: Vec<Vec3>,
    /// `cumulative[i]` is the polyline distance from point 0 to point i
    cumulative: Vec<f32>,
    steps_per_segment: usize,
    blocks: Vec<SampleBlock>,
}

impl PathSample {
    /// Sample `curve` at `steps_per_segment` points per segment
    pub fn build(curve: &CurveModel, steps_per_segment: usize) -> Result<Self, PathError> {
        let points = curve.sample(steps_per_segment)?;
        Ok(Self::from_points(points, steps_per_segment))
    }

    /// Wrap an existing polyline.
    ///
    /// `steps_per_segment` maps parametric progress onto point indices.
    pub fn from_points(points: Vec<Vec3>, steps_per_segment: usize) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*point);
            }
            cumulative.push(total);
        }

        let blocks = (0..points.len())
            .step_by(SAMPLE_BLOCK_SIZE)
            .map(|start| SampleBlock::build(&points, start, (start + SAMPLE_BLOCK_SIZE).min(points.len())))
            .collect();

        Self {
            points,
            cumulative,
            steps_per_segment: steps_per_segment.max(1),
            blocks,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn cumulative(&self) -> &[f32] {
        &self.cumulative
    }

    pub fn blocks(&self) -> &[SampleBlock] {
        &self.blocks
    }

    pub fn steps_per_segment(&self) -> usize {
        self.steps_per_segment
    }

    pub fn total_length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Unit direction and length of the polyline edge starting at `index`
    pub fn edge(&self, index: usize) -> Option<(Vec3, f32)> {
        let start = *self.points.get(index)?;
        let end = *self.points.get(index + 1)?;
        let delta = end - start;
        Some((delta.normalize_or_zero(), delta.length()))
    }

    /// Distance along the path at `index`, plus the projection of `point`
    /// onto the following edge (clamped to that edge).
    pub fn progress_at_index(&self, index: usize, point: Vec3) -> f32 {
        let Some(&base) = self.cumulative.get(index) else {
            return self.total_length();
        };
        match self.edge(index) {
            Some((direction, length)) => {
                base + (point - self.points[index]).dot(direction).clamp(0.0, length)
            }
            None => base,
        }
    }

    /// Distance along the path at parametric `progress` (segments)
    pub fn arc_length_at_progress(&self, progress: f32) -> f32 {
        if self.points.len() < 2 || !progress.is_finite() || progress <= 0.0 {
            return 0.0;
        }
        let x = progress * self.steps_per_segment as f32;
        let index = x.floor() as usize;
        if index >= self.points.len() - 1 {
            return self.total_length();
        }
        let fraction = x - index as f32;
        let lo = self.cumulative[index];
        let hi = self.cumulative[index + 1];
        lo + (hi - lo) * fraction
    }
}
