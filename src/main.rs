//! Demo front end for the `feistel` library.
//!
//! Examples:
//!   feistel map --max 9 --seed 42 --rounds 8 3 4 5
//!   feistel invert --max 9 --seed 42 --rounds 8 7
//!   feistel shuffle --max 20 --seed 1 --min-avg-rounds 6
//!   feistel map --max 9 --rounds 8 --epochs 25 137
//!   feistel diagnostics --max 100000 --seed 7 --config network.json
//!
//! `--config` reads a JSON `NetworkConfig`; flags given alongside it override
//! its fields. Set `RUST_LOG=debug` to see construction details.

use std::error::Error;
use std::fs;
use std::process;

use feistel::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Map,
    Invert,
    Shuffle,
    Diagnostics,
}

#[derive(Debug)]
struct Options {
    command: Command,
    max_value: u64,
    seed: u64,
    config: NetworkConfig,
    indices: Vec<u64>,
}

fn usage() -> ! {
    eprintln!("feistel (keyed invertible permutations of [0, max])");
    eprintln!("Usage: feistel <command> --max <n> [options] [index...]\n");
    eprintln!("Commands:");
    eprintln!("  map <index...>              Forward-map indices");
    eprintln!("  invert <index...>           Inverse-map indices");
    eprintln!("  shuffle                     Print map(0..=max) (max < 2^24)");
    eprintln!("  diagnostics                 Fixed points, cycles, passes, correlation");
    eprintln!("Options:");
    eprintln!("  --max <n>                   Largest value in the domain (required)");
    eprintln!("  --seed <n>                  Key (default 0)");
    eprintln!("  --rounds <n>                Fixed rounds per pass (1-255)");
    eprintln!("  --min-avg-rounds <n>        Minimum average rounds per output (1-255)");
    eprintln!("  --epochs                    Map indices beyond max into later blocks");
    eprintln!("  --config <path>             JSON network config");
    process::exit(1);
}

fn parse_u64(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|e| format!("{flag}: invalid number {value:?}: {e}"))
}

fn parse_u8(flag: &str, value: Option<String>) -> Result<u8, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|e| format!("{flag}: invalid round count {value:?}: {e}"))
}

fn parse_args(args: Vec<String>) -> Result<Options, Box<dyn Error>> {
    let mut args = args.into_iter();
    let command = match args.next().as_deref() {
        Some("map") => Command::Map,
        Some("invert") => Command::Invert,
        Some("shuffle") => Command::Shuffle,
        Some("diagnostics") => Command::Diagnostics,
        Some("--help" | "-h" | "help") | None => usage(),
        Some(other) => return Err(format!("unknown command: {other}").into()),
    };

    let mut max_value = None;
    let mut seed = 0;
    let mut config = None;
    let mut rounds = None;
    let mut min_avg_rounds = None;
    let mut epochs = false;
    let mut indices = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max" => max_value = Some(parse_u64("--max", args.next())?),
            "--seed" => seed = parse_u64("--seed", args.next())?,
            "--rounds" => rounds = Some(parse_u8("--rounds", args.next())?),
            "--min-avg-rounds" => {
                min_avg_rounds = Some(parse_u8("--min-avg-rounds", args.next())?)
            }
            "--epochs" => epochs = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let json = fs::read_to_string(&path)
                    .map_err(|e| format!("reading config {path}: {e}"))?;
                config = Some(NetworkConfig::from_json(&json)?);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option: {other}").into())
            }
            other => indices.push(parse_u64("index", Some(other.to_string()))?),
        }
    }

    let mut config = config.unwrap_or_default();
    if rounds.is_some() {
        config.rounds = rounds;
        config.minimum_average_rounds = None;
    }
    if min_avg_rounds.is_some() {
        config.minimum_average_rounds = min_avg_rounds;
        config.rounds = None;
    }
    config.epochs |= epochs;

    Ok(Options {
        command,
        max_value: max_value.ok_or("--max is required")?,
        seed,
        config,
        indices,
    })
}

fn print_diagnostics(net: &Network, diag: &Diagnostics) {
    let split = net.split();
    println!(
        "network: max={} split={}x{} rounds={} epochs={}",
        net.max_value(),
        split.left,
        split.right,
        net.rounds(),
        net.epochs_enabled(),
    );
    println!(
        "fixed_points={} cycles={} (bound {}) longest_cycle={}",
        diag.fixed_points,
        diag.cycle_count,
        diag.cycle_bound(3.0),
        diag.longest_cycle,
    );
    println!(
        "passes: total={} mean={:.4} max={}",
        diag.total_passes,
        diag.mean_passes(),
        diag.max_passes,
    );
    println!(
        "lag1_correlation={:+.5} (expected {:+.5})",
        diag.lag1_correlation,
        diag.expected_lag1_correlation(),
    );
}

fn run(opts: Options) -> Result<(), Box<dyn Error>> {
    let net = Network::new(opts.max_value, opts.seed, &opts.config)?;
    tracing::info!(
        max_value = net.max_value(),
        rounds = net.rounds(),
        "network ready"
    );

    match opts.command {
        Command::Map | Command::Invert => {
            if opts.indices.is_empty() {
                return Err("no indices given".into());
            }
            for &index in &opts.indices {
                let mapped = if opts.command == Command::Map {
                    net.map(index)?
                } else {
                    net.invert_map(index)?
                };
                println!("{index} -> {mapped}");
            }
        }
        Command::Shuffle => {
            if net.max_value() >= feistel::network::MAX_MATERIALIZED_DOMAIN {
                return Err("domain too large to shuffle".into());
            }
            for value in net.shuffled() {
                println!("{value}");
            }
        }
        Command::Diagnostics => {
            let diag = net
                .diagnostics()
                .ok_or("domain too large for diagnostics")?;
            print_diagnostics(&net, &diag);
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(args).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}
