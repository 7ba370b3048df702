//! # Subcommands
//!
//! - `gradcheck` builds a seeded random network and compares its analytic
//!   policy gradient against central finite differences.
//! - `bandit` trains the real agent through the real runner on the six-arm
//!   bandit and checks that the best arm ends up above the threshold.
//!   The trained parameters can be written out with `--save-params`.
//! - `inspect` loads a parameter snapshot and summarises it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reinforce::snapshot;
use rl::{BanditConfig, GradCheckConfig};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "reinforce", version, about = "REINFORCE policy-gradient trainer and validation harness")]
pub struct Cli {
    /// Log every environment step.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare analytic gradients against finite differences.
    Gradcheck {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Indices probed per parameter tensor.
        #[arg(long, default_value_t = 32)]
        samples: usize,
    },
    /// Train on the synthetic bandit and check convergence.
    Bandit {
        /// JSON file with bandit settings; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        steps: Option<usize>,
        /// Seed for the agent's generator.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        threshold: Option<f32>,
        /// Write the trained parameters here (`.json` or raw blob).
        #[arg(long)]
        save_params: Option<PathBuf>,
    },
    /// Summarise a saved parameter snapshot.
    Inspect {
        #[arg(long)]
        params: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one subcommand and reports whether its check passed.
///
/// # Errors
///
/// Returns configuration and file errors. A failed check is not an error.
pub fn run(command: Command) -> Result<bool> {
    match command {
        Command::Gradcheck { seed, samples } => {
            let config = GradCheckConfig { seed, samples_per_tensor: samples, ..GradCheckConfig::default() };
            let report = rl::run_gradient_check(&config);
            print_json(&report)?;
            if !report.passed {
                tracing::error!(
                    max_relative_error = report.max_relative_error,
                    threshold = report.threshold,
                    "gradient check failed"
                );
            }
            Ok(report.passed)
        }
        Command::Bandit { config, steps, seed, threshold, save_params } => {
            let mut bandit = match config {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    BanditConfig::from_json_str(&json)?
                }
                None => BanditConfig::default(),
            };
            if let Some(steps) = steps {
                bandit.steps = steps;
            }
            if let Some(seed) = seed {
                bandit.seed = seed;
            }
            if let Some(threshold) = threshold {
                bandit.threshold = threshold;
            }

            tracing::info!(steps = bandit.steps, seed = bandit.seed, "training on the bandit");
            let (report, agent) = rl::train_bandit(&bandit)?;
            if let Some(path) = save_params {
                snapshot::save(&path, &agent.policy().params())?;
            }
            print_json(&report)?;
            if !report.passed {
                tracing::error!(
                    best_action_prob = report.best_action_prob,
                    threshold = report.threshold,
                    "bandit did not converge"
                );
            }
            Ok(report.passed)
        }
        Command::Inspect { params } => {
            let snapshot = snapshot::load(&params)?;
            print_json(&snapshot::summarize(&snapshot)?)?;
            Ok(true)
        }
    }
}
