//! Easing curves for timed interpolations (brush motion, line fades)

use serde::{Deserialize, Serialize};

/// Easing curve applied to a normalized interpolation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicOut,
    SineInOut,
}

impl Easing {
    /// Map linear progress (clamped to 0..=1) onto the eased curve.
    ///
    /// Every curve maps 0 to 0 and 1 to 1 exactly.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicOut,
        Easing::SineInOut,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        for easing in ALL {
            assert!(easing.apply(-3.0).abs() < 1e-6);
            assert!((easing.apply(7.5) - 1.0).abs() < 1e-6);
            assert!(easing.apply(f32::NAN).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quad_out_leads_linear() {
        assert!(Easing::QuadOut.apply(0.25) > Easing::Linear.apply(0.25));
        assert!(Easing::QuadIn.apply(0.25) < Easing::Linear.apply(0.25));
    }
}
