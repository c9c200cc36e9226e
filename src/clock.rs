//! Unscaled wall-clock time source for followers outside an engine loop.

use web_time::Instant;

/// Monotonic seconds since construction, unaffected by any simulation
/// time-scale (pause, slow motion).
///
/// Frame loops that already own an unscaled clock should feed that
/// instead; follower operations only consume plain `f32` seconds.
#[derive(Debug, Clone)]
pub struct UnscaledClock {
    epoch: Instant,
}

impl UnscaledClock {
    /// Start a clock; `elapsed_secs` reads 0.0 at this moment.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created or last restarted.
    /// Never decreases between calls.
    pub fn elapsed_secs(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }

    /// Re-arm the epoch so `elapsed_secs` restarts from 0.0.
    pub fn restart(&mut self) {
        self.epoch = Instant::now();
    }
}

impl Default for UnscaledClock {
    fn default() -> Self {
        Self::new()
    }
}
