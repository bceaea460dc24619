use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use log::info;

use snailboss::app::{ArenaApp, SIM_DT};
use snailboss::config::ArenaConfig;
use snailboss::logging;

#[derive(Parser)]
#[command(name = "snailboss", about = "Headless boss arena")]
struct Args {
    /// Arena config (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wall-clock seconds to simulate
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,

    /// Fixed simulation step
    #[arg(long, default_value_t = SIM_DT)]
    dt: f32,

    /// Frame length fed into the fixed-step accumulator
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame_dt: f32,

    /// Start the player this far from the boss along +X
    #[arg(long)]
    distance: Option<f32>,

    /// Remove the player after this many seconds
    #[arg(long)]
    target_lifetime: Option<f32>,

    /// Spawn no player; the boss disables itself
    #[arg(long)]
    no_target: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path)
            .with_context(|| format!("loading arena config {}", path.display()))?,
        None => {
            let config = ArenaConfig::default();
            config.boss.validate().context("invalid boss tuning")?;
            config
        }
    };

    if let Some(distance) = args.distance {
        config.player_start = config.boss_start + Vec3::X * distance;
    }
    if args.target_lifetime.is_some() {
        config.player_lifetime = args.target_lifetime;
    }
    if args.no_target {
        config.spawn_player = false;
    }
    if !(args.frame_dt.is_finite() && args.frame_dt > 0.0) {
        bail!("--frame-dt must be positive");
    }

    info!(
        "[main] simulating {:.1}s at dt {:.4} (frames of {:.4})",
        args.seconds, args.dt, args.frame_dt
    );
    let mut app = ArenaApp::new(&config, args.dt).context("bad --dt")?;
    let summary = app.run(args.seconds, args.frame_dt);
    println!("{summary}");
    Ok(())
}
