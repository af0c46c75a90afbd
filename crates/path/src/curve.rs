//! Piecewise curve through alternating anchor and handle points.
//!
//! Control points alternate anchor, handle, anchor, handle, ... and segment
//! `s` spans anchors `2s` and `2s + 2`. Within a segment the position is a
//! two-stage lerp: first along anchor→handle and handle→anchor, then between
//! those two points with a weight that blends linear and smoothstep timing.
//! With `v1 = 1, v2 = 0` this is exactly a quadratic Bezier.

use brushtrail_config::CurveConfig;
use glam::Vec3;

use crate::error::PathError;

/// Step used for the finite-difference tangent
pub const DIRECTION_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct CurveModel {
    control_points: Vec<Vec3>,
    /// Fallback position for degenerate paths
    origin: Vec3,
    config: CurveConfig,
}

#[inline]
fn smoothstep(f: f32) -> f32 {
    f * f * (3.0 - 2.0 * f)
}

impl CurveModel {
    pub fn new(control_points: Vec<Vec3>, origin: Vec3, config: CurveConfig) -> Self {
        Self { control_points, origin, config }
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Fewer than three control points cannot form a segment
    pub fn is_degenerate(&self) -> bool {
        self.control_points.len() < 3
    }

    /// Number of anchor-to-anchor spans.
    ///
    /// `floor(n / 2)`, minus one when `n` is even: 5 and 6 points both give 2.
    pub fn segment_count(&self) -> usize {
        let n = self.control_points.len();
        if n < 3 {
            return 0;
        }
        let count = n / 2;
        if n % 2 == 0 { count - 1 } else { count }
    }

    /// Anchor at the start of segment `index` (`index == segment_count()` is the end)
    pub fn anchor(&self, index: usize) -> Vec3 {
        self.control_points
            .get(index * 2)
            .copied()
            .unwrap_or(self.origin)
    }

    /// Position at parameter `t`; integer `t` lands exactly on an anchor.
    ///
    /// `t` is clamped to `[0, segment_count]`, non-finite `t` maps to the
    /// first anchor.
    pub fn point_at(&self, t: f32) -> Vec3 {
        if self.is_degenerate() {
            return self.origin;
        }
        let count = self.segment_count();
        let t = if t.is_finite() { t.clamp(0.0, count as f32) } else { 0.0 };

        let segment = t.floor() as usize;
        if segment >= count {
            return self.anchor(count);
        }
        self.segment_point(segment, t - segment as f32)
    }

    /// Position at fraction `f` of segment `segment`
    fn segment_point(&self, segment: usize, f: f32) -> Vec3 {
        let i = segment * 2;
        if f <= 0.0 {
            return self.control_points[i];
        }
        if f >= 1.0 {
            return self.control_points[i + 2];
        }

        let start = self.control_points[i];
        let handle = self.control_points[i + 1];
        let end = self.control_points[i + 2];

        let mid = (start + end) * 0.5;
        let h = mid + (handle - mid) * self.config.v1;
        let a = start.lerp(h, f);
        let b = h.lerp(end, f);
        let w = f + (smoothstep(f) - f) * self.config.v2;
        a.lerp(b, w)
    }

    /// Points of one segment: its start anchor, `steps - 1` interior points
    /// and its end anchor.
    fn segment_points(&self, segment: usize, steps: usize) -> impl Iterator<Item = Vec3> + '_ {
        (0..=steps).map(move |k| {
            if k == 0 {
                self.anchor(segment)
            } else if k == steps {
                self.anchor(segment + 1)
            } else {
                self.segment_point(segment, k as f32 / steps as f32)
            }
        })
    }

    /// Dense sample of the whole path: `segment_count * steps + 1` points.
    ///
    /// Segment boundaries use the anchor positions themselves. A degenerate
    /// path samples to its origin only.
    pub fn sample(&self, steps_per_segment: usize) -> Result<Vec<Vec3>, PathError> {
        if steps_per_segment == 0 {
            return Err(PathError::InvalidStepCount(steps_per_segment));
        }
        if self.is_degenerate() {
            return Ok(vec![self.origin]);
        }

        let count = self.segment_count();
        let mut points = Vec::with_capacity(count * steps_per_segment + 1);
        for segment in 0..count {
            points.extend(self.segment_points(segment, steps_per_segment).take(steps_per_segment));
        }
        points.push(self.anchor(count));
        Ok(points)
    }

    /// Total length of the sampled polyline
    pub fn arc_length(&self, steps_per_segment: usize) -> Result<f32, PathError> {
        let points = self.sample(steps_per_segment)?;
        Ok(polyline_length(&points))
    }

    /// Sampled length of the single segment `segment_index`
    pub fn partial_arc_length(
        &self,
        segment_index: usize,
        steps_per_segment: usize,
    ) -> Result<f32, PathError> {
        if steps_per_segment == 0 {
            return Err(PathError::InvalidStepCount(steps_per_segment));
        }
        let count = self.segment_count();
        if segment_index >= count {
            return Err(PathError::SegmentOutOfRange { index: segment_index, count });
        }
        let points: Vec<Vec3> = self.segment_points(segment_index, steps_per_segment).collect();
        Ok(polyline_length(&points))
    }

    /// Sampled length of every segment, in order
    pub fn segment_lengths(&self, steps_per_segment: usize) -> Result<Vec<f32>, PathError> {
        (0..self.segment_count())
            .map(|segment| self.partial_arc_length(segment, steps_per_segment))
            .collect()
    }

    /// Distance along the path from the start to parametric `progress`
    pub fn prefix_arc_length(
        &self,
        progress: f32,
        steps_per_segment: usize,
    ) -> Result<f32, PathError> {
        if !progress.is_finite() || progress < 0.0 {
            return Err(PathError::InvalidParameter(progress));
        }
        let lengths = self.segment_lengths(steps_per_segment)?;
        let progress = progress.min(lengths.len() as f32);
        let whole = progress.floor() as usize;

        let mut total: f32 = lengths.iter().take(whole).sum();
        let fraction = progress - whole as f32;
        if fraction > 0.0 && whole < lengths.len() {
            let mut previous = self.anchor(whole);
            let steps = ((fraction * steps_per_segment as f32).ceil() as usize).max(1);
            for k in 1..=steps {
                let f = (k as f32 / steps_per_segment as f32).min(fraction);
                let point = self.segment_point(whole, f);
                total += previous.distance(point);
                previous = point;
            }
        }
        Ok(total)
    }

    /// Unit tangent at `t` by forward difference (backward near the end)
    pub fn direction_at(&self, t: f32) -> Result<Vec3, PathError> {
        if t.is_nan() || t < 0.0 {
            return Err(PathError::InvalidParameter(t));
        }
        let end = self.segment_count() as f32;
        let t = t.min(end);

        let delta = if t + DIRECTION_EPSILON > end {
            self.point_at(t) - self.point_at(t - DIRECTION_EPSILON)
        } else {
            self.point_at(t + DIRECTION_EPSILON) - self.point_at(t)
        };
        Ok(delta.normalize_or_zero())
    }
}

pub(crate) fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: Vec<Vec3>) -> CurveModel {
        CurveModel::new(points, Vec3::new(9.0, 9.0, 9.0), CurveConfig::default())
    }

    fn zigzag(count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| Vec3::new(i as f32 * 0.5, if i % 2 == 1 { 0.4 } else { 0.0 }, 0.0))
            .collect()
    }

    fn straight_line(anchors: usize) -> Vec<Vec3> {
        (0..anchors * 2 - 1)
            .map(|i| Vec3::new(i as f32 * 0.5, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_segment_count_parity() {
        assert_eq!(curve(zigzag(2)).segment_count(), 0);
        assert_eq!(curve(zigzag(3)).segment_count(), 1);
        assert_eq!(curve(zigzag(4)).segment_count(), 1);
        assert_eq!(curve(zigzag(5)).segment_count(), 2);
        assert_eq!(curve(zigzag(6)).segment_count(), 2);
        assert_eq!(curve(zigzag(7)).segment_count(), 3);
    }

    #[test]
    fn test_integer_parameter_hits_anchor() {
        let model = curve(zigzag(7));
        for s in 0..=3 {
            assert_eq!(model.point_at(s as f32), model.control_points()[s * 2]);
        }
        // Clamped past the end and before the start
        assert_eq!(model.point_at(10.0), model.control_points()[6]);
        assert_eq!(model.point_at(-1.0), model.control_points()[0]);
        assert_eq!(model.point_at(f32::NAN), model.control_points()[0]);
    }

    #[test]
    fn test_degenerate_returns_origin() {
        let model = curve(zigzag(2));
        assert_eq!(model.point_at(0.5), Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(model.sample(4).unwrap(), vec![Vec3::new(9.0, 9.0, 9.0)]);
    }

    #[test]
    fn test_unit_coefficients_match_quadratic_bezier() {
        let config = CurveConfig { v1: 1.0, v2: 0.0, ..Default::default() };
        let model = CurveModel::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            Vec3::ZERO,
            config,
        );
        assert!((model.point_at(0.5) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sample_length_and_boundaries() {
        let model = curve(zigzag(7));
        let points = model.sample(10).unwrap();
        assert_eq!(points.len(), 31);
        assert_eq!(points[0], model.anchor(0));
        assert_eq!(points[10], model.anchor(1));
        assert_eq!(points[20], model.anchor(2));
        assert_eq!(points[30], model.anchor(3));

        assert_eq!(model.sample(1).unwrap().len(), 4);
        assert_eq!(model.sample(0), Err(PathError::InvalidStepCount(0)));
    }

    #[test]
    fn test_arc_lengths_on_straight_line() {
        let model = curve(straight_line(4));
        assert!((model.arc_length(20).unwrap() - 3.0).abs() < 1e-4);
        assert!((model.partial_arc_length(1, 20).unwrap() - 1.0).abs() < 1e-4);
        assert!((model.prefix_arc_length(1.0, 20).unwrap() - 1.0).abs() < 1e-4);
        assert!((model.prefix_arc_length(3.0, 20).unwrap() - 3.0).abs() < 1e-4);

        assert_eq!(
            model.partial_arc_length(3, 20),
            Err(PathError::SegmentOutOfRange { index: 3, count: 3 })
        );
        assert!(model.prefix_arc_length(-0.5, 20).is_err());
    }

    #[test]
    fn test_prefix_arc_length_is_monotonic() {
        let model = curve(zigzag(7));
        let mut previous = 0.0;
        for i in 0..=30 {
            let length = model.prefix_arc_length(i as f32 * 0.1, 10).unwrap();
            assert!(length >= previous - 1e-5);
            previous = length;
        }
        assert!((previous - model.arc_length(10).unwrap()).abs() < 1e-4);
    }

    #[test]
    fn test_direction_at() {
        let model = curve(straight_line(4));
        assert!((model.direction_at(0.0).unwrap() - Vec3::X).length() < 1e-3);
        assert!((model.direction_at(1.5).unwrap() - Vec3::X).length() < 1e-3);
        // Backward difference at (and past) the end
        assert!((model.direction_at(3.0).unwrap() - Vec3::X).length() < 1e-3);
        assert!((model.direction_at(7.0).unwrap() - Vec3::X).length() < 1e-3);

        assert_eq!(model.direction_at(-0.1), Err(PathError::InvalidParameter(-0.1)));
        assert!(model.direction_at(f32::NAN).is_err());
    }
}
