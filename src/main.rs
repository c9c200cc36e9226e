use anyhow::Context;
use clap::Parser;
use glam::{EulerRot, Quat, Vec3};
use smart_follow::config::DemoConfig;
use smart_follow::{variable_speed_step, SmartFollow, UnscaledClock};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulated run length in seconds (overrides config)
    #[arg(long)]
    seconds: Option<f32>,

    /// Simulated frame rate in Hz (overrides config)
    #[arg(long)]
    rate: Option<f32>,

    /// Pace frames against the wall clock instead of synthetic time
    #[arg(long)]
    realtime: bool,

    /// Write a per-frame CSV trace to this path
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = DemoConfig::load()?;
    if let Some(seconds) = args.seconds {
        config.sim.seconds = seconds;
    }
    if let Some(rate) = args.rate {
        config.sim.rate_hz = rate;
    }
    anyhow::ensure!(config.sim.rate_hz > 0.0, "sim.rate_hz must be positive");

    config.reticle.warn_if_degenerate("reticle");
    config.panel.warn_if_degenerate("panel");

    let mut trace = match &args.trace_out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create trace file {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            writeln!(
                writer,
                "time_secs,reticle_offset_deg,reticle_accepted,reticle_step,panel_offset,panel_accepted,panel_step"
            )?;
            Some(writer)
        }
        None => None,
    };

    log::info!(
        "Simulating {:.1}s of head wander at {:.0}Hz{}",
        config.sim.seconds,
        config.sim.rate_hz,
        if args.realtime { " (realtime)" } else { "" }
    );

    // Reticle follows the head orientation, panel follows an anchor point
    // in front of it
    let mut reticle = SmartFollow::new(Quat::IDENTITY, config.reticle);
    let mut panel = SmartFollow::new(Vec3::ZERO, config.panel);

    let dt = 1.0 / config.sim.rate_hz;
    let frames = (config.sim.seconds * config.sim.rate_hz).ceil() as u64;
    let clock = UnscaledClock::new();

    let mut reticle_retargets = 0u64;
    let mut panel_retargets = 0u64;

    for frame in 0..frames {
        let now = if args.realtime {
            // Hold the frame cadence against the wall clock
            let due = frame as f32 * dt;
            let elapsed = clock.elapsed_secs();
            if elapsed < due {
                std::thread::sleep(std::time::Duration::from_secs_f32(due - elapsed));
            }
            clock.elapsed_secs()
        } else {
            frame as f32 * dt
        };

        let head = wander_pose(now, config.sim.wander_degrees);
        let anchor = wander_point(now, config.sim.wander_radius);

        let reticle_accepted = reticle.set_target_within_threshold(head, now);
        let panel_accepted = panel.set_target_within_threshold(anchor, now);
        if reticle_accepted {
            reticle_retargets += 1;
        }
        if panel_accepted {
            panel_retargets += 1;
        }

        if let Some(writer) = trace.as_mut() {
            // Recompute the step through the same pure helper the
            // followers use, so the trace shows what the frame applied
            let reticle_offset = reticle.offset_to_target();
            let panel_offset = panel.offset_to_target();
            let reticle_step = variable_speed_step(
                dt,
                reticle_offset,
                config.reticle.max_allowed,
                config.tween.lower,
                config.tween.upper,
            );
            let panel_step = variable_speed_step(
                dt,
                panel_offset,
                config.panel.max_allowed,
                config.tween.lower,
                config.tween.upper,
            );
            writeln!(
                writer,
                "{:.4},{:.4},{},{:.4},{:.4},{},{:.4}",
                now,
                reticle_offset,
                reticle_accepted as u8,
                reticle_step,
                panel_offset,
                panel_accepted as u8,
                panel_step
            )?;
        }

        reticle.handle_smart_tween(dt, config.tween.lower, config.tween.upper);
        panel.handle_smart_tween(dt, config.tween.lower, config.tween.upper);
    }

    log::info!(
        "Reticle: {} retargets over {} frames, final offset {:.3} deg",
        reticle_retargets,
        frames,
        reticle.offset_to_target()
    );
    log::info!(
        "Panel: {} retargets over {} frames, final offset {:.4} units",
        panel_retargets,
        frames,
        panel.offset_to_target()
    );

    if let Some(writer) = trace.as_mut() {
        writer.flush()?;
    }
    if let Some(path) = &args.trace_out {
        log::info!("Trace written to {}", path.display());
    }

    Ok(())
}

/// Deterministic head-pose wander: a yaw/pitch sinusoid mix, no RNG, so
/// runs are reproducible.
fn wander_pose(t: f32, amplitude_deg: f32) -> Quat {
    let yaw = amplitude_deg.to_radians() * (0.7 * t).sin();
    let pitch = 0.5 * amplitude_deg.to_radians() * (1.3 * t + 0.4).sin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Deterministic anchor-point wander for the panel follower.
fn wander_point(t: f32, radius: f32) -> Vec3 {
    Vec3::new(
        radius * (0.6 * t).sin(),
        0.3 * radius * (1.1 * t + 1.0).sin(),
        radius * (0.9 * t + 2.0).cos(),
    )
}
