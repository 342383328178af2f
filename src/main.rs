use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use phase_gauss::host::{
    read_system_file, validate_system, write_system_file, BackwardsSubstitution,
};
use phase_gauss::{EngineConfig, Scheduler};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file: the size n, n*n coefficients, then n right-hand side values.
    #[arg(default_value = "in.txt")]
    pub input: PathBuf,
    #[arg(short, long, default_value = "output.txt")]
    pub output: PathBuf,
    /// Caps the worker pool; defaults to one worker per sub-task of the densest phase.
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,
}

fn solve_system(input: &Path, output: &Path, config: EngineConfig) -> Result<()> {
    let mut matrix = read_system_file(input)?;
    log::info!("Successfully read file: {}", input.display());
    validate_system(&matrix).context("validating input system")?;

    let report = Scheduler::new(config)
        .eliminate(&mut matrix)
        .context("forward elimination")?;
    log::debug!(
        "{} workers ran {} phases, {} joined",
        report.pool_size,
        report.activations.len(),
        report.joined_workers
    );

    let mut back_substitution = BackwardsSubstitution::zero(matrix.size());
    back_substitution
        .solve(&mut matrix)
        .context("back-substitution hit a zero pivot")?;
    log::debug!("solution: {:?}", back_substitution.solution);

    write_system_file(output, &matrix)?;
    log::info!("Successfully wrote solution to output file: {}", output.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::debug!("Running with: {args:?}");
    let config = EngineConfig {
        worker_limit: args.workers,
    };
    if let Err(err) = solve_system(&args.input, &args.output, config) {
        eprintln!("failed to solve system: {err:?}");
        process::exit(1)
    }
}
