//! Disk Collide entry point
//!
//! Headless runner: builds a world from defaults or a JSON config, runs it at
//! the configured tick rate and logs collision statistics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use disk_collide::SimConfig;
use disk_collide::sim::{
    BroadPhaseKind, FixedRatePacer, Pacer, Snapshot, StatsRenderer, TickLimit, Unpaced, World, run,
};

#[derive(Parser, Debug)]
#[command(version, about = "2D disk collision simulation")]
struct Args {
    /// JSON config file (missing fields fall back to defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// quadtree, grid or brute-force
    #[arg(short, long)]
    broad_phase: Option<BroadPhaseKind>,

    /// Stop after this many ticks (runs until killed if omitted)
    #[arg(short, long)]
    ticks: Option<u64>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Two-particle exchange demo instead of the particle grid
    #[arg(long, conflicts_with = "config")]
    two_body: bool,

    /// Disable collision jitter
    #[arg(long)]
    no_jitter: bool,

    /// Do not cap the tick rate
    #[arg(long)]
    unpaced: bool,

    /// Write the final state as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match (&args.config, args.two_body) {
        (Some(path), _) => SimConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, true) => SimConfig::two_body(),
        (None, false) => SimConfig::default(),
    };
    if let Some(kind) = args.broad_phase {
        config.broad_phase = kind;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_jitter {
        config = config.without_jitter();
    }
    Ok(config)
}

fn run_with(world: &mut World, args: &Args, pacer: &mut impl Pacer) {
    let report_every = u64::from(world.config().tick_rate);
    let mut renderer = StatsRenderer::default();
    let mut input = TickLimit::new(args.ticks);

    let summary = run(world, &mut renderer, &mut input, pacer, |world, stats| {
        if world.time_ticks() % report_every == 0 {
            log::info!(
                "tick {}: {} candidates, {} collisions, kinetic energy {:.2}",
                world.time_ticks(),
                stats.candidates,
                stats.collisions,
                world.kinetic_energy()
            );
        }
    });
    log::info!(
        "{} frames drawn, {} skipped coincident pairs, last frame spanned {:?}..{:?}",
        renderer.frames,
        summary.skipped_coincident,
        renderer.min,
        renderer.max
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    log::info!("Disk Collide starting ({} broad-phase)", config.broad_phase);

    let tick_rate = config.tick_rate;
    let mut world = World::new(config).context("building world")?;

    if args.unpaced {
        run_with(&mut world, &args, &mut Unpaced);
    } else {
        run_with(&mut world, &args, &mut FixedRatePacer::new(tick_rate));
    }

    if let Some(path) = &args.dump {
        let json = Snapshot::capture(&world).to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Final state written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_body_conflicts_with_config() {
        let err = Args::try_parse_from(["disk-collide", "--config", "run.json", "--two-body"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "disk-collide",
            "--two-body",
            "--broad-phase",
            "uniform_grid",
            "--seed",
            "9",
            "--no-jitter",
        ])
        .unwrap();
        let config = build_config(&args).unwrap();
        assert_eq!(config.broad_phase, BroadPhaseKind::UniformGrid);
        assert_eq!(config.seed, 9);
        assert_eq!(config.layout.radius, 20.0);
        assert_eq!(config.jitter.angle, 0.0);
    }
}
