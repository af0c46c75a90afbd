//! Timed interpolation state machines
//!
//! Brush motion and line fades are driven by explicit tweens that the game
//! loop advances with its frame delta, instead of callback-chained
//! animations.

use brushtrail_config::Easing;
use glam::{Quat, Vec3};

/// Normalized progress over a fixed duration with an easing curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl Tween {
    /// A zero (or negative) duration tween is finished immediately.
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            elapsed: 0.0,
            duration: if duration.is_finite() { duration.max(0.0) } else { 0.0 },
            easing,
        }
    }

    /// Advance by `dt` seconds and return the eased progress
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.eased()
    }

    /// Linear progress in 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Eased progress in 0..=1
    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Position and rotation glide between two snapshots
#[derive(Debug, Clone, Copy)]
pub struct MotionTween {
    from_position: Vec3,
    to_position: Vec3,
    from_rotation: Quat,
    to_rotation: Quat,
    tween: Tween,
}

impl MotionTween {
    pub fn new(
        from: (Vec3, Quat),
        to: (Vec3, Quat),
        duration: f32,
        easing: Easing,
    ) -> Self {
        Self {
            from_position: from.0,
            to_position: to.0,
            from_rotation: from.1,
            to_rotation: to.1,
            tween: Tween::new(duration, easing),
        }
    }

    /// Advance by `dt` and return the interpolated (position, rotation)
    pub fn advance(&mut self, dt: f32) -> (Vec3, Quat) {
        self.tween.advance(dt);
        self.sample()
    }

    pub fn sample(&self) -> (Vec3, Quat) {
        let t = self.tween.eased();
        if self.tween.is_finished() {
            return (self.to_position, self.to_rotation);
        }
        (
            self.from_position.lerp(self.to_position, t),
            self.from_rotation.lerp(self.to_rotation, t),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }

    pub fn target(&self) -> (Vec3, Quat) {
        (self.to_position, self.to_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_progress() {
        let mut tween = Tween::new(1.0, Easing::Linear);
        assert_eq!(tween.progress(), 0.0);

        assert!((tween.advance(0.25) - 0.25).abs() < 1e-6);
        assert!(!tween.is_finished());

        tween.advance(5.0);
        assert!(tween.is_finished());
        assert_eq!(tween.eased(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let tween = Tween::new(0.0, Easing::QuadOut);
        assert!(tween.is_finished());
        assert_eq!(tween.eased(), 1.0);

        let tween = Tween::new(f32::NAN, Easing::Linear);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_tween_ignores_bad_dt() {
        let mut tween = Tween::new(1.0, Easing::Linear);
        tween.advance(f32::NAN);
        tween.advance(-1.0);
        assert_eq!(tween.progress(), 0.0);
    }

    #[test]
    fn test_motion_tween_reaches_target_exactly() {
        let target_rot = Quat::from_rotation_z(1.0);
        let mut motion = MotionTween::new(
            (Vec3::ZERO, Quat::IDENTITY),
            (Vec3::new(2.0, 0.0, 0.0), target_rot),
            0.5,
            Easing::Linear,
        );

        let (pos, _) = motion.advance(0.25);
        assert!((pos.x - 1.0).abs() < 1e-5);

        let (pos, rot) = motion.advance(0.25);
        assert!(motion.is_finished());
        assert_eq!(pos, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(rot, target_rot);
    }
}
