//! Render a shatter animation of an image into a numbered PNG sequence.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use shatterfield::prelude::*;
use shatterfield::GridLayout;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Drop allowance, in tiles, reserved below the field when
/// gravity is on.
const GRAVITY_MARGIN_TILES: f32 = 7.5;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Confetti,
    Explosion,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Confetti => Mode::Confetti,
            ModeArg::Explosion => Mode::Explosion,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "shatterfield", version, about = "Shatter an image into tumbling confetti frames")]
struct Cli {
    /// Image to shatter
    input: PathBuf,

    /// Directory for the rendered frames
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Confetti)]
    mode: ModeArg,

    /// Let tiles droop as they fly
    #[arg(long)]
    gravity: bool,

    /// Frames per second of animation time
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for tile trajectories (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON engine config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let snapshot = Snapshot::from_file(&cli.input, Vec2::ZERO)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let mut canvas = canvas_for(&snapshot, &config, cli.gravity);

    fs::create_dir_all(&cli.out).with_context(|| format!("creating {}", cli.out.display()))?;

    let flags = if cli.gravity { Flags::SUPPORT_GRAVITY } else { Flags::empty() };
    let mut engine = ExplosionEngine::with_config(config);
    engine.explode(snapshot, cli.mode.into(), flags);

    let step = Duration::from_secs(1) / cli.fps.max(1);
    let mut clock = AnimationClock::fixed(step);
    let mut elapsed = Duration::ZERO;
    let mut written = 0usize;
    loop {
        canvas.clear();
        engine.frame(elapsed, &mut canvas);
        if engine.is_empty() {
            break;
        }
        let path = cli.out.join(format!("frame_{:04}.png", written));
        canvas
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        written += 1;
        elapsed = clock.update();
    }

    log::info!("wrote {} frames to {}", written, cli.out.display());
    Ok(())
}

/// A canvas large enough for the field at its end scale, plus room below
/// for falling tiles.
fn canvas_for(snapshot: &Snapshot, config: &EngineConfig, gravity: bool) -> Canvas {
    let [dx, dy] = config.expand_inset;
    let bound = snapshot.bound().inset(-dx, -dy);
    let mut area = bound.scaled_about(bound.center(), config.end_scale.max(1.0));
    if gravity {
        let layout = GridLayout::for_size(snapshot.width(), snapshot.height(), config.column_count);
        area.bottom += layout.radius as f32 * GRAVITY_MARGIN_TILES;
    }
    Canvas::covering(&area)
}
