//! dnc-trace CLI
//!
//! Runs an instrumented divide-and-conquer algorithm and prints its result,
//! the full step trace as JSON, or a timed replay of the steps.
//!
//! Usage:
//!     dnc-trace karatsuba 1234 5678 --play
//!     dnc-trace closest --count 20 --seed 42 --json
//!     dnc-trace closest --file points.txt

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use dnc_trace::config::Config;
use dnc_trace::input::{parse_operand, random_points, read_points, sanitize_operand};
use dnc_trace::playback::{Playback, TraceStep};
use dnc_trace::{closest_pair, multiply, to_hex, trace_digest};

/// Traced divide-and-conquer algorithms
#[derive(Parser)]
#[command(name = "dnc-trace")]
#[command(version)]
#[command(about = "Karatsuba multiplication and closest pair with step traces", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Multiply two non-negative integers
    Karatsuba {
        x: String,
        y: String,

        /// Drop non-digit characters (e.g. "1,234") before parsing
        #[arg(long)]
        sanitize: bool,

        /// Print the run (result, steps, nodes) as JSON
        #[arg(long)]
        json: bool,

        /// Replay the steps at the configured interval
        #[arg(long)]
        play: bool,
    },

    /// Find the closest pair among a point set
    Closest {
        /// Point file, one "x y" or "x,y" pair per line
        #[arg(short, long, conflicts_with = "count")]
        file: Option<PathBuf>,

        /// Number of random points to generate
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Seed for reproducible random points
        #[arg(long)]
        seed: Option<u64>,

        /// Print the run (distance, pairs, steps) as JSON
        #[arg(long)]
        json: bool,

        /// Replay the steps at the configured interval
        #[arg(long)]
        play: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn replay<S: TraceStep>(steps: &[S], interval: Duration) {
    let mut playback = Playback::new(steps.len(), interval);
    playback.start();
    while let Some(step) = playback.current(steps) {
        println!(
            "[{}/{}] {}",
            playback.current_index() + 1,
            playback.len(),
            step.label()
        );
        thread::sleep(playback.interval());
        playback.tick();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Karatsuba {
            x,
            y,
            sanitize,
            json,
            play,
        } => {
            let (x, y) = if sanitize {
                (sanitize_operand(&x), sanitize_operand(&y))
            } else {
                (x, y)
            };
            let x = parse_operand(&x)?;
            let y = parse_operand(&y)?;
            let run = multiply(&x, &y);

            if play {
                replay(&run.steps, config.playback.karatsuba_interval());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                println!("{x} × {y} = {}", run.result);
                println!("Steps: {}", run.steps.len());
                println!("Recursion tree: {} nodes, depth {}", run.nodes.len(), run.max_depth());
                println!("Trace digest: {}", to_hex(&trace_digest(&run.steps)?));
            }
        }

        Commands::Closest {
            file,
            count,
            seed,
            json,
            play,
        } => {
            let points = match file {
                Some(path) => read_points(&path)
                    .with_context(|| format!("failed to read points from {}", path.display()))?,
                None => random_points(count, &config.bounds, seed)?,
            };
            let run = closest_pair(&points);

            if play {
                replay(&run.steps, config.playback.closest_pair_interval());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                println!("Points: {}", points.len());
                println!("Min distance: {:.3} units", run.min_dist);
                for (a, b) in &run.all_pairs {
                    println!(
                        "Pair: P{} ({:.3}, {:.3}) - P{} ({:.3}, {:.3})",
                        a.id, a.x, a.y, b.id, b.x, b.y
                    );
                }
                println!("Steps: {}", run.steps.len());
                println!("Trace digest: {}", to_hex(&trace_digest(&run.steps)?));
            }
        }
    }

    Ok(())
}
