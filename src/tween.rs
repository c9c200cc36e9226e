//! Tween primitive: a stored target plus a live value stepped toward it.
//!
//! [`TweenVariable`] owns the value/target pair and applies normalized
//! advance steps; how a type interpolates and how its separation is
//! measured is supplied per type through [`Tweenable`].

use glam::{Quat, Vec2, Vec3};

/// Trait for values a follower can interpolate and measure.
pub trait Tweenable: Copy {
    /// Move `a` toward `b` by the normalized amount `t`.
    /// `t` should be 0.0 to 1.0, where 0.0 returns `a` and 1.0 returns `b`.
    fn step(a: Self, b: Self, t: f32) -> Self;

    /// Separation between two values in follow units: degrees for
    /// rotations, linear distance for vectors, absolute difference for
    /// scalars.
    fn offset(a: Self, b: Self) -> f32;
}

impl Tweenable for f32 {
    fn step(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn offset(a: Self, b: Self) -> f32 {
        (b - a).abs()
    }
}

impl Tweenable for Vec2 {
    fn step(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn offset(a: Self, b: Self) -> f32 {
        a.distance(b)
    }
}

impl Tweenable for Vec3 {
    fn step(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn offset(a: Self, b: Self) -> f32 {
        a.distance(b)
    }
}

impl Tweenable for Quat {
    /// Shortest-arc spherical interpolation; both quaternions must be
    /// normalized.
    fn step(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }

    /// Shortest-arc angle in degrees, range 0 to 180. `q` and `-q` measure
    /// as the same orientation.
    fn offset(a: Self, b: Self) -> f32 {
        a.angle_between(b).to_degrees()
    }
}

/// A value that is stepped toward a target by explicit advance calls.
///
/// This is the storage half of the follow system: it knows nothing about
/// thresholds or speeds, only how to hold a target and move the live value
/// a given fraction of the remaining way there.
#[derive(Debug, Clone)]
pub struct TweenVariable<T: Tweenable> {
    /// Live interpolated value
    value: T,
    /// Target the value is moving toward
    target: T,
}

impl<T: Tweenable> TweenVariable<T> {
    /// Create a tween variable resting at `initial` (value equals target).
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            target: initial,
        }
    }

    /// Get the live interpolated value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Get the current target.
    pub fn target(&self) -> T {
        self.target
    }

    /// Replace the target. The live value keeps interpolating from where
    /// it is.
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Snap both value and target to `value`, ending any motion.
    pub fn set_immediate(&mut self, value: T) {
        self.value = value;
        self.target = value;
    }

    /// Advance the live value toward the target by a normalized amount.
    ///
    /// `amount` is clamped into 0.0 to 1.0 before use, so oversized steps
    /// arrive exactly at the target and negative steps are a no-op.
    pub fn advance_by(&mut self, amount: f32) {
        self.value = T::step(self.value, self.target, amount.clamp(0.0, 1.0));
    }
}
