// SPDX-License-Identifier: MIT OR Apache-2.0
//! Panoview motion sandbox
//!
//! Drives the motion engine headlessly with a simulated 60 Hz clock through
//! a scripted sequence: a camera move, an autorotate that is stopped, a zoom
//! step and a pair of chained fades, then a cancelled transition.
//!
//! Usage: `panoview_sandbox [settings.ron]`

use indexmap::IndexMap;
use panoview_motion::{
    FrameLoop, MotionError, MotionGroup, MotionSettings, SettingsError, TweenError,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Simulated display refresh interval
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Upper bound on frames for any one phase
const MAX_FRAMES: u64 = 60 * 60;

/// Sandbox errors
#[derive(Debug, Error)]
enum SandboxError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Motion error: {0}")]
    Motion(#[from] MotionError),

    #[error("Tween error: {0}")]
    Tween(#[from] TweenError),

    #[error("Missing {0} in frame loop")]
    Missing(&'static str),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("panoview_sandbox=info,panoview_motion=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Panoview motion sandbox v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args().nth(1).map(PathBuf::from)) {
        tracing::error!("Sandbox failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings_path: Option<PathBuf>) -> Result<(), SandboxError> {
    let settings = match settings_path {
        Some(path) => MotionSettings::load(&path)?,
        None => MotionSettings::default(),
    };

    let mut frame_loop = FrameLoop::new();
    frame_loop.add_group(
        "position",
        MotionGroup::new()
            .with_axis("yaw", settings.controller("yaw")?)
            .with_axis("pitch", settings.controller("pitch")?)
            .with_on_change(|values| tracing::trace!("Position {:?}", values)),
    );
    frame_loop.add_controller("zoom", settings.controller("zoom")?);
    tracing::info!(
        "Position axes: {}",
        position(&mut frame_loop)?.names().collect::<Vec<_>>().join(", ")
    );

    // Animated move to a new direction
    position(&mut frame_loop)?.goto(
        &IndexMap::from([
            ("yaw".to_string(), std::f64::consts::PI),
            ("pitch".to_string(), 0.5),
        ]),
        1.0,
    )?;
    run_until_idle(&mut frame_loop, "goto");

    // Autorotate for two seconds, then let it coast to rest
    position(&mut frame_loop)?.roll(&IndexMap::from([("yaw".to_string(), false)]), 1.0)?;
    run_for(&mut frame_loop, 2000.0);
    let group = position(&mut frame_loop)?;
    group.stop();
    tracing::debug!("Position moving after stop: {}", group.is_moving());
    run_until_idle(&mut frame_loop, "autorotate");

    frame_loop
        .controller_mut("zoom")
        .ok_or(SandboxError::Missing("zoom"))?
        .step(-20.0, 1.0);
    run_until_idle(&mut frame_loop, "zoom");

    // Fade in, then fade out once the first fade completed
    let fade_out = settings
        .transition
        .tween()
        .property("opacity", 1.0, 0.0)
        .build()?;
    let spawner = frame_loop.spawner();
    let fade_in = frame_loop.spawn(
        settings
            .transition
            .tween()
            .property("opacity", 0.0, 1.0)
            .on_tick(|values, progress| {
                tracing::trace!("Fade {:?} at {:.2}", values, progress);
            })
            .build()?,
    );
    fade_in.on_settled(move |completed| {
        if completed {
            spawner.spawn(fade_out);
        }
    });
    run_until_idle(&mut frame_loop, "fades");

    // A transition interrupted half-way
    let interrupted = frame_loop.spawn(
        settings
            .transition
            .tween()
            .property("zoom", 30.0, 80.0)
            .build()?,
    );
    run_for(&mut frame_loop, settings.transition.duration_ms / 2.0);
    interrupted.cancel();
    tracing::info!("Interrupted transition outcome: {:?}", interrupted.outcome());
    run_until_idle(&mut frame_loop, "cancel");

    let zoom = frame_loop
        .controller("zoom")
        .ok_or(SandboxError::Missing("zoom"))?
        .current();
    tracing::info!(
        "Finished after {} frames ({:.0} ms), position {:?}, zoom {}",
        frame_loop.frame_count(),
        frame_loop.elapsed_time(),
        frame_loop.group("position").map(MotionGroup::current),
        zoom
    );
    Ok(())
}

fn position(frame_loop: &mut FrameLoop) -> Result<&mut MotionGroup, SandboxError> {
    frame_loop
        .group_mut("position")
        .ok_or(SandboxError::Missing("position"))
}

fn run_for(frame_loop: &mut FrameLoop, duration_ms: f64) {
    let mut elapsed = 0.0;
    while elapsed < duration_ms {
        frame_loop.tick(FRAME_MS);
        elapsed += FRAME_MS;
    }
}

/// Tick until nothing moves, like a render loop that stops requesting frames
fn run_until_idle(frame_loop: &mut FrameLoop, phase: &str) {
    let mut frames = 0;
    let mut redraws = 0;
    while frames < MAX_FRAMES {
        let status = frame_loop.tick(FRAME_MS);
        frames += 1;
        if status.changed {
            redraws += 1;
        }
        if !status.active {
            break;
        }
    }

    if frames == MAX_FRAMES {
        tracing::warn!("Phase {phase} still active after {frames} frames");
    } else {
        tracing::info!("Phase {phase} settled after {frames} frames ({redraws} redraws)");
    }
}
