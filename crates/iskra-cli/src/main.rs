mod pulse;
mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iskra_core::{EngineReport, Ritual, score};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};

use crate::pulse::PulseLoop;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "iskra", about = "Affective state engine: score text, simulate and run the pulse")]
struct Cli {
    /// Settings file (TOML); falls back to ISKRA_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one message against the lexicon
    Score {
        /// Message text
        text: String,
    },

    /// Feed inputs into a fresh engine, tick it and print the report
    Simulate {
        /// Input message (repeatable, applied in order)
        #[arg(long = "input")]
        inputs: Vec<String>,

        /// Ritual to perform before the inputs (shatter, awaken)
        #[arg(long, value_parser = parse_ritual)]
        ritual: Option<Ritual>,

        /// Number of ticks to run
        #[arg(long, default_value_t = 25)]
        ticks: u64,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Run the live pulse, reading one message per stdin line
    Run {
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Snapshot print interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        report_ms: u64,
    },

    /// Print the effective settings as TOML
    Config,
}

fn parse_ritual(name: &str) -> Result<Ritual, String> {
    Ritual::from_name(name).ok_or_else(|| format!("unknown ritual '{name}' (expected shatter or awaken)"))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Score { text } => cmd_score(&settings, text),
        Commands::Simulate {
            inputs,
            ritual,
            ticks,
            seed,
        } => cmd_simulate(&settings, inputs, *ritual, *ticks, *seed),
        Commands::Run { seed, report_ms } => cmd_run(&settings, *seed, *report_ms).await,
        Commands::Config => cmd_config(&settings),
    }
}

fn cmd_score(settings: &Settings, text: &str) -> Result<()> {
    let scores = score(settings.lexicon(), text);
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}

fn cmd_simulate(
    settings: &Settings,
    inputs: &[String],
    ritual: Option<Ritual>,
    ticks: u64,
    seed: u64,
) -> Result<()> {
    let mut engine = settings.build_engine()?;
    let mut rng = SmallRng::seed_from_u64(seed);

    if let Some(ritual) = ritual {
        engine.perform(ritual);
    }
    for text in inputs {
        let addressed = engine.on_user_input(text);
        tracing::debug!(addressed, "input scored");
    }
    for _ in 0..ticks {
        engine.tick(&mut rng);
    }

    print_report(&engine.report())
}

async fn cmd_run(settings: &Settings, seed: Option<u64>, report_ms: u64) -> Result<()> {
    let engine = settings.build_engine()?;
    let rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut pulse = PulseLoop::new(engine, rng);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reporter = interval(Duration::from_millis(report_ms.max(1)));
    reporter.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // interval fires immediately; skip that one
    reporter.tick().await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                let line = line.trim();
                match line.strip_prefix('/') {
                    Some(name) => match Ritual::from_name(name) {
                        Some(ritual) => pulse.perform(ritual).await,
                        None => eprintln!("unknown ritual: {name}"),
                    },
                    None => {
                        pulse.on_user_input(line).await;
                    }
                }
            }
            _ = reporter.tick() => {
                let snapshot = pulse.snapshot().await;
                let phase = pulse.phase().await;
                let derived = pulse.derived().await;
                println!(
                    "{}",
                    serde_json::json!({ "phase": phase, "state": snapshot, "derived": derived })
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    pulse.stop().await;
    print_report(&pulse.report().await)
}

fn cmd_config(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn print_report(report: &EngineReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
