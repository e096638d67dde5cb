mod report;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use log::{debug, info};
use csimlib::config::PartialCacheConfig;
use csimlib::io::open_trace;
use csimlib::simulator::Simulator;
use crate::report::Reports;

#[derive(Parser, Debug)]
#[command(about = String::from("Replays a memory trace against an LRU set-associative cache"))]
struct Args {
    /// Number of set index bits (S = 2^s is the number of sets)
    #[arg(short = 's')]
    index_bits: Option<u32>,

    /// Associativity (number of lines per set)
    #[arg(short = 'E')]
    associativity: Option<usize>,

    /// Number of block bits (B = 2^b is the block size)
    #[arg(short = 'b')]
    offset_bits: Option<u32>,

    /// The trace to replay
    #[arg(short = 't')]
    trace: PathBuf,

    /// JSON file with any of `s`, `E` and `b`, overridden by the flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every access and what it did
    #[arg(short, long)]
    verbose: bool,

    /// Print diagnostics for every access
    #[arg(short, long)]
    diagnostics: bool,

    /// Print the whole cache after every access
    #[arg(short = 'c', long = "cache-state")]
    state: bool,

    /// Print timings
    #[arg(short, long)]
    performance: bool,

    /// Print the totals as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let start = Instant::now();
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => PartialCacheConfig::from_file(path)?,
        None => PartialCacheConfig::default(),
    };
    let config = file_config
        .merge(PartialCacheConfig {
            index_bits: args.index_bits,
            associativity: args.associativity,
            offset_bits: args.offset_bits,
        })
        .build()?;
    info!("Simulating {config:?} on {}", args.trace.display());

    let mut simulator = Simulator::new(&config)?;
    let trace_reader = open_trace(&args.trace)?;
    let reports = Reports {
        verbose: args.verbose,
        diagnostics: args.diagnostics,
        state: args.state,
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let stats = if reports.any() {
        let mut write_result = Ok(());
        let stats = *simulator.simulate_with(trace_reader, |record, outcome, cache| {
            if write_result.is_ok() {
                write_result = reports.write(&mut out, record, outcome, cache);
            }
        })?;
        write_result.wrap_err("Couldn't write the access reports")?;
        stats
    } else {
        *simulator.simulate(trace_reader)?
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats).wrap_err("Couldn't serialise the output")?)?;
    } else {
        writeln!(out, "{stats}")?;
    }
    if args.performance {
        let simulation_time = simulator.get_execution_time();
        let total_time = start.elapsed();
        writeln!(out, "Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9)?;
        writeln!(out, "Total execution time (includes configuration and output): {}s", total_time.as_nanos() as f64 / 1e9)?;
    }
    debug!("Lines never filled: {}", simulator.cache().invalid_line_count());
    out.flush()?;
    Ok(())
}
