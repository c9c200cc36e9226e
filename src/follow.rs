//! Smart follow: tolerance-banded retargeting with distance-proportional
//! tween speed.
//!
//! A follower tracks a moving pose without chasing every input twitch:
//! candidate targets inside a tolerance band are ignored, and the band
//! widens the longer the follower has been at rest. Once a target is
//! accepted, the tween closes in fast while near the target and slow while
//! far from it, so a distant retarget glides instead of snapping.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tween::{TweenVariable, Tweenable};

/// Tolerance band that widens with time since the last accepted retarget.
///
/// Units follow the value type: degrees for rotation followers, world
/// units for position followers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToleranceBand {
    /// Allowance right after a retarget; deviations at or below it are
    /// ignored.
    pub min_allowed: f32,
    /// Allowance once the band has fully widened.
    pub max_allowed: f32,
    /// Seconds of rest for the allowance to ramp from min to max.
    /// Zero or negative means the band starts fully widened.
    pub min_to_max_delay_secs: f32,
}

impl ToleranceBand {
    /// Band for rotation followers: 0.1 degrees right after a retarget,
    /// widening to 5 degrees over three seconds of rest.
    pub fn rotation() -> Self {
        Self {
            min_allowed: 0.1,
            max_allowed: 5.0,
            min_to_max_delay_secs: 3.0,
        }
    }

    /// Band for position followers in world units (meter-scale scenes).
    pub fn position() -> Self {
        Self {
            min_allowed: 0.01,
            max_allowed: 0.25,
            min_to_max_delay_secs: 3.0,
        }
    }

    /// Allowed offset after `elapsed_secs` of rest.
    ///
    /// Ramps linearly from `min_allowed` to `max_allowed` over
    /// `min_to_max_delay_secs`. The ramp ratio is clamped into 0.0 to 1.0
    /// before use: negative elapsed reads as the minimum, anything past
    /// the delay as the maximum, and a non-positive delay yields
    /// `max_allowed` without dividing.
    #[inline]
    pub fn allowed_at(&self, elapsed_secs: f32) -> f32 {
        let ramp = if self.min_to_max_delay_secs <= 0.0 {
            1.0
        } else {
            (elapsed_secs / self.min_to_max_delay_secs).clamp(0.0, 1.0)
        };
        self.min_allowed + (self.max_allowed - self.min_allowed) * ramp
    }

    /// Log a warning for configurations the math tolerates but the caller
    /// probably did not intend. Never fails and never changes anything:
    /// a band with `max_allowed < min_allowed` still produces a defined
    /// (shrinking) ramp.
    pub fn warn_if_degenerate(&self, label: &str) {
        if self.max_allowed < self.min_allowed {
            log::warn!(
                "{}: max_allowed {} below min_allowed {}; tolerance band will shrink over time",
                label,
                self.max_allowed,
                self.min_allowed
            );
        }
        if self.max_allowed == 0.0 {
            log::warn!(
                "{}: zero max_allowed; smart tween will always run at lower speed",
                label
            );
        } else if self.max_allowed < 0.0 {
            log::warn!(
                "{}: negative max_allowed {}; smart tween will always run at upper speed",
                label,
                self.max_allowed
            );
        }
        if self.min_allowed < 0.0 {
            log::warn!(
                "{}: negative min_allowed {}; every candidate target will be accepted while the band is narrow",
                label,
                self.min_allowed
            );
        }
    }
}

impl Default for ToleranceBand {
    // Rotation defaults; position followers use ToleranceBand::position()
    fn default() -> Self {
        Self::rotation()
    }
}

/// Per-frame tween step for [`SmartFollow::handle_smart_tween`].
///
/// The speed multiplier falls off linearly with the offset: at zero offset
/// the tween runs at `upper_speed`, at `max_allowed` or beyond it runs at
/// `lower_speed`. A zero `max_allowed` takes the degenerate branch
/// (multiplier zero) instead of dividing; a negative one flips the ratio
/// negative, which clamps to zero, so the tween always runs at
/// `upper_speed`. For an ordered speed range the result always lies in
/// `delta_time * lower_speed` to `delta_time * upper_speed`.
#[inline]
pub fn variable_speed_step(
    delta_time: f32,
    offset: f32,
    max_allowed: f32,
    lower_speed: f32,
    upper_speed: f32,
) -> f32 {
    let ratio = if max_allowed == 0.0 {
        1.0
    } else {
        (offset / max_allowed).clamp(0.0, 1.0)
    };
    let multiplier = 1.0 - ratio;
    // min/max rather than clamp: a misordered speed range must resolve
    // quietly, not panic
    delta_time * (multiplier * upper_speed).min(upper_speed).max(lower_speed)
}

/// Follower that retargets through a widening tolerance band and tweens
/// toward the accepted target at distance-proportional speed.
///
/// The two halves cooperate over one frame tick: offer the candidate pose
/// to [`SmartFollow::set_target_within_threshold`], then advance with
/// [`SmartFollow::handle_smart_tween`]. A follower that has rested needs a
/// larger deviation to wake up than one that just moved.
///
/// Single-threaded by design: call it from one simulation thread, once per
/// tick, with a monotonic unscaled clock.
#[derive(Debug, Clone)]
pub struct SmartFollow<T: Tweenable> {
    tween: TweenVariable<T>,
    /// Threshold configuration; mutable between calls.
    pub tolerance: ToleranceBand,
    /// Clock reading (seconds) at the last accepted retarget.
    last_update_time: f32,
}

impl<T: Tweenable> SmartFollow<T> {
    /// Create a follower resting at `initial` with the given band.
    pub fn new(initial: T, tolerance: ToleranceBand) -> Self {
        Self {
            tween: TweenVariable::new(initial),
            tolerance,
            last_update_time: 0.0,
        }
    }

    /// Live interpolated value.
    pub fn value(&self) -> T {
        self.tween.value()
    }

    /// Current follow target.
    pub fn target(&self) -> T {
        self.tween.target()
    }

    /// Replace the target unconditionally, bypassing the threshold test.
    /// Does not count as an accepted retarget, so the band keeps widening.
    pub fn set_target(&mut self, target: T) {
        self.tween.set_target(target);
    }

    /// Snap value and target to `value`, ending any motion.
    pub fn set_immediate(&mut self, value: T) {
        self.tween.set_immediate(value);
    }

    /// Offset between the live value and the current target, in follow
    /// units (degrees for rotations).
    pub fn offset_to_target(&self) -> f32 {
        T::offset(self.tween.target(), self.tween.value())
    }

    /// Clock reading at the last accepted retarget; 0.0 before the first.
    pub fn last_update_time(&self) -> f32 {
        self.last_update_time
    }

    /// Test whether `new_target` deviates from the current target by more
    /// than the band allows at `now_secs`.
    ///
    /// Returns `true` when the offset exceeds the current allowance - the
    /// candidate is outside the tolerance zone and the caller should
    /// retarget. Callers depend on this polarity; a `true` means "accept".
    /// Pure read: repeated calls never change the follower.
    pub fn is_new_target_within_threshold(&self, new_target: T, now_secs: f32) -> bool {
        let offset = T::offset(self.tween.target(), new_target);
        let elapsed = now_secs - self.last_update_time;
        offset > self.tolerance.allowed_at(elapsed)
    }

    /// Accept `new_target` if it lies outside the tolerance band.
    ///
    /// On acceptance the target is replaced and the band ramp restarts
    /// from `now_secs`; rejection leaves the follower untouched. Returns
    /// the threshold test result either way.
    pub fn set_target_within_threshold(&mut self, new_target: T, now_secs: f32) -> bool {
        let outside = self.is_new_target_within_threshold(new_target, now_secs);
        if outside {
            self.tween.set_target(new_target);
            self.last_update_time = now_secs;
            log::trace!("retarget accepted at t={:.3}s", now_secs);
        }
        outside
    }

    /// Advance the live value toward the target with distance-proportional
    /// speed: `upper_speed` when the value sits on the target, falling to
    /// `lower_speed` at or beyond the band's `max_allowed`.
    ///
    /// Speeds are normalized tween fractions per second; the computed step
    /// is forwarded to the underlying [`TweenVariable`].
    pub fn handle_smart_tween(&mut self, delta_time: f32, lower_speed: f32, upper_speed: f32) {
        let offset = self.offset_to_target();
        let step = variable_speed_step(
            delta_time,
            offset,
            self.tolerance.max_allowed,
            lower_speed,
            upper_speed,
        );
        self.tween.advance_by(step);
    }
}

/// Rotation follower over unit quaternions; offsets are degrees.
pub type SmartRotationFollow = SmartFollow<Quat>;

/// Position follower over 3D points; offsets are world units.
pub type SmartPositionFollow = SmartFollow<Vec3>;

impl SmartFollow<Quat> {
    /// Rotation follower at the identity pose with the default band
    /// (0.1 degrees widening to 5 degrees over 3 seconds).
    pub fn new_rotation() -> Self {
        Self::new(Quat::IDENTITY, ToleranceBand::rotation())
    }
}

impl Default for SmartFollow<Quat> {
    fn default() -> Self {
        Self::new_rotation()
    }
}

impl SmartFollow<Vec3> {
    /// Position follower at the origin with the default band
    /// (0.01 widening to 0.25 world units over 3 seconds).
    pub fn new_position() -> Self {
        Self::new(Vec3::ZERO, ToleranceBand::position())
    }
}

impl Default for SmartFollow<Vec3> {
    fn default() -> Self {
        Self::new_position()
    }
}
