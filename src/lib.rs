//! # Smart Follow - tolerance-banded follow/tween toolkit
//!
//! Followers for XR-style interfaces: a reticle or UI panel tracks a moving
//! pose through a tolerance band that widens while the follower rests, then
//! tweens in at distance-proportional speed. Frame-tick driven and
//! single-threaded; the caller supplies delta time and a monotonic
//! unscaled clock.

pub mod clock;
pub mod follow;
pub mod tween;

// Layered demo/config loading (native only)
#[cfg(not(target_arch = "wasm32"))]
pub mod config;

pub use clock::UnscaledClock;
pub use follow::{
    variable_speed_step, SmartFollow, SmartPositionFollow, SmartRotationFollow, ToleranceBand,
};
pub use tween::{TweenVariable, Tweenable};

/// Common imports for frame loops
pub mod prelude {
    pub use crate::clock::UnscaledClock;
    pub use crate::follow::{SmartFollow, SmartPositionFollow, SmartRotationFollow, ToleranceBand};
    pub use crate::tween::{TweenVariable, Tweenable};
    pub use glam::{Quat, Vec2, Vec3};
}
