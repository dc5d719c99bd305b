//! Maze generator command-line driver
//!
//! Plays the host role: steps the generator tick by tick, optionally splices
//! in a portal pair, and prints the finished maze.

mod render;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mz_core::maze::{
    Coord, Edge, Grid, MazeGenerator, PlacementStrategy, PortalRecord, StepOutcome, place_portals,
    run_generation_step,
};
use mz_core::{MazeOptions, SpawnPoint};

use render::render_ascii;

/// Grow a perfect maze, one tick at a time
#[derive(Parser, Debug)]
#[command(name = "mazegen")]
#[command(author, version, about = "Grow a perfect maze, one tick at a time", long_about = None)]
struct Args {
    /// Options file (OPTIONS=name:value lines)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Maze width in cells
    #[arg(short = 'W', long = "width")]
    width: Option<u32>,

    /// Maze length in cells
    #[arg(short = 'L', long = "length")]
    length: Option<u32>,

    /// RNG seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Cells or growth iterations per tick
    #[arg(long = "step")]
    step: Option<usize>,

    /// First cell of the maze, as x,y
    #[arg(long = "origin", value_parser = parse_coord)]
    origin: Option<Coord>,

    /// Cell replaced by portal A, as x,y
    #[arg(long = "alpha", value_parser = parse_coord, requires = "beta")]
    alpha: Option<Coord>,

    /// Cell replaced by portal B, as x,y
    #[arg(long = "beta", value_parser = parse_coord, requires = "alpha")]
    beta: Option<Coord>,

    /// Wiring for portal A (direct, random, open)
    #[arg(long = "alpha-strategy", default_value_t = PlacementStrategy::Random)]
    alpha_strategy: PlacementStrategy,

    /// Wiring for portal B (direct, random, open)
    #[arg(long = "beta-strategy", default_value_t = PlacementStrategy::Random)]
    beta_strategy: PlacementStrategy,

    /// Print a JSON snapshot instead of the ASCII view
    #[arg(long = "json")]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Everything a renderer or navigation baker needs from a finished maze
#[derive(Serialize)]
struct Snapshot<'a> {
    seed: u64,
    width: u32,
    length: u32,
    player_spawn: SpawnPoint,
    minotaur_spawn: SpawnPoint,
    edges: Vec<Edge>,
    portals: &'a [PortalRecord],
    grid: &'a Grid,
}

fn parse_coord(text: &str) -> Result<Coord, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{text}'"))?;
    let x = x.trim().parse().map_err(|_| format!("bad x in '{text}'"))?;
    let y = y.trim().parse().map_err(|_| format!("bad y in '{text}'"))?;
    Ok(Coord::new(x, y))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_options(args: &Args) -> anyhow::Result<MazeOptions> {
    let mut options = match &args.config {
        Some(path) => MazeOptions::load_from_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => MazeOptions::default(),
    };

    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(length) = args.length {
        options.length = length;
    }
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if let Some(step) = args.step {
        options.populate_step = step;
        options.growth_step = step;
    }
    if let Some(origin) = args.origin {
        options.origin = origin;
    }

    options.validate().context("invalid maze options")?;
    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = build_options(&args)?;
    let mut generator = MazeGenerator::new(options)?;
    info!(seed = generator.seed(), "generating maze");

    let mut ticks = 0usize;
    loop {
        ticks += 1;
        match run_generation_step(&mut generator)? {
            StepOutcome::Yielded(progress) => debug!(
                tick = ticks,
                phase = %progress.phase,
                populated = progress.populated,
                in_maze = progress.in_maze,
                frontier = progress.frontier,
                "tick"
            ),
            StepOutcome::Done => break,
        }
    }
    info!(ticks, "maze complete");

    let seed = generator.seed();
    let options = generator.options().clone();
    let (mut grid, mut rng) = generator.into_parts();

    let portals = match (args.alpha, args.beta) {
        (Some(alpha), Some(beta)) => {
            let mut observer = |records: &[PortalRecord]| {
                for record in records {
                    info!(portal = %record.portal, coord = %record.coord, "portal known");
                }
            };
            place_portals(
                &mut grid,
                alpha,
                beta,
                args.alpha_strategy,
                args.beta_strategy,
                &mut rng,
                &mut observer,
            )
            .context("placing portals")?
            .to_vec()
        }
        (None, None) => Vec::new(),
        _ => bail!("--alpha and --beta must be given together"),
    };

    if args.json {
        let snapshot = Snapshot {
            seed,
            width: grid.width(),
            length: grid.length(),
            player_spawn: options.player_spawn,
            minotaur_spawn: options.minotaur_spawn,
            edges: grid.edges(),
            portals: &portals,
            grid: &grid,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_ascii(&grid));
        println!(
            "seed {}  {}x{}  {} passages  perfect: {}",
            seed,
            grid.width(),
            grid.length(),
            grid.edge_count(),
            grid.is_perfect()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("3,4"), Ok(Coord::new(3, 4)));
        assert_eq!(parse_coord(" 0 , 9 "), Ok(Coord::new(0, 9)));
        assert!(parse_coord("3").is_err());
        assert!(parse_coord("-1,2").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "mazegen", "--width", "6", "--length", "4", "--seed", "12", "--step", "2",
        ]);
        let options = build_options(&args).unwrap();
        assert_eq!(options.width, 6);
        assert_eq!(options.length, 4);
        assert_eq!(options.seed, Some(12));
        assert_eq!(options.populate_step, 2);
        assert_eq!(options.growth_step, 2);
    }

    #[test]
    fn test_strategies_parse() {
        let args = Args::parse_from([
            "mazegen",
            "--alpha",
            "1,1",
            "--beta",
            "2,2",
            "--alpha-strategy",
            "direct",
            "--beta-strategy",
            "OPEN",
        ]);
        assert_eq!(args.alpha_strategy, PlacementStrategy::Direct);
        assert_eq!(args.beta_strategy, PlacementStrategy::Open);
        assert_eq!(args.alpha, Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_zero_step_rejected() {
        let args = Args::parse_from(["mazegen", "--step", "0"]);
        assert!(build_options(&args).is_err());
    }
}
