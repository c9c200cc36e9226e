//! Demo configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest
//! priority):
//! 1. Compiled defaults
//! 2. `smart_follow.ron` file (if exists)
//! 3. Environment variables prefixed with `SMART_FOLLOW_`
//!
//! Example environment variable: `SMART_FOLLOW_TWEEN__UPPER=12`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::follow::ToleranceBand;

/// Demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Tolerance band for the reticle (rotation) follower, in degrees
    #[serde(default = "ToleranceBand::rotation")]
    pub reticle: ToleranceBand,

    /// Tolerance band for the panel (position) follower, in world units
    #[serde(default = "ToleranceBand::position")]
    pub panel: ToleranceBand,

    #[serde(default)]
    pub tween: TweenSpeed,

    #[serde(default)]
    pub sim: SimConfig,
}

/// Tween speed range, in normalized tween fraction per second
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweenSpeed {
    /// Slowest advance, applied while far from the target
    pub lower: f32,
    /// Fastest advance, applied while close to the target
    pub upper: f32,
}

impl Default for TweenSpeed {
    fn default() -> Self {
        Self {
            lower: 1.0,
            upper: 8.0,
        }
    }
}

/// Simulated frame-loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulated run length in seconds
    pub seconds: f32,
    /// Simulated frame rate in Hz
    pub rate_hz: f32,
    /// Peak head-yaw wander amplitude in degrees
    pub wander_degrees: f32,
    /// Peak panel-anchor wander radius in world units
    pub wander_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seconds: 10.0,
            rate_hz: 90.0,
            wander_degrees: 25.0,
            wander_radius: 0.4,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            reticle: ToleranceBand::rotation(),
            panel: ToleranceBand::position(),
            tween: TweenSpeed::default(),
            sim: SimConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `smart_follow.ron` file (if exists)
    /// 3. Environment variables prefixed with `SMART_FOLLOW_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("reticle.min_allowed", 0.1)?
            .set_default("reticle.max_allowed", 5.0)?
            .set_default("reticle.min_to_max_delay_secs", 3.0)?
            .set_default("panel.min_allowed", 0.01)?
            .set_default("panel.max_allowed", 0.25)?
            .set_default("panel.min_to_max_delay_secs", 3.0)?
            .set_default("tween.lower", 1.0)?
            .set_default("tween.upper", 8.0)?
            .set_default("sim.seconds", 10.0)?
            .set_default("sim.rate_hz", 90.0)?
            .set_default("sim.wander_degrees", 25.0)?
            .set_default("sim.wander_radius", 0.4)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("smart_follow")
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SMART_FOLLOW_RETICLE__MAX_ALLOWED, etc.)
            .add_source(Environment::with_prefix("SMART_FOLLOW").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
