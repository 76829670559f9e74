use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use urn_bench::config::{ExperimentConfig, Variant};
use urn_bench::logging::init_logging;
use urn_bench::runner::ExperimentRunner;

/// Monte Carlo estimate of the chance that draws from an urn share a color.
#[derive(Debug, Parser)]
#[command(
    name = "urn-match",
    author,
    version,
    about = "Simulate same-color draws from an urn and compare with the exact probability"
)]
struct Cli {
    /// Number of balls of each color, in color order.
    #[arg(value_name = "COUNT")]
    counts: Vec<u32>,

    /// Optional YAML experiment file; command-line values override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draws thrown away at the start of every trial [default: 4].
    #[arg(long, visible_alias = "discard", value_name = "N")]
    after: Option<usize>,

    /// Draws that must share a color for a trial to match [default: 2].
    #[arg(long, value_name = "N")]
    compare: Option<usize>,

    /// Number of trials per urn variant [default: 100000].
    #[arg(long, value_name = "N")]
    trials: Option<u64>,

    /// RNG seed; a random seed is chosen and reported when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Urn representation(s) to simulate.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Write JSON tracing events to the configured telemetry file.
    #[arg(long)]
    log_structured: bool,

    /// Exit after validating the experiment (no simulation is run).
    #[arg(long)]
    validate_only: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    List,
    Count,
    All,
}

impl VariantArg {
    fn variants(self) -> Vec<Variant> {
        match self {
            VariantArg::List => vec![Variant::List],
            VariantArg::Count => vec![Variant::Count],
            VariantArg::All => Variant::ALL.to_vec(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };

    if !cli.counts.is_empty() {
        config.urn.counts = cli.counts;
    }

    if let Some(after) = cli.after {
        config.simulation.plan.discard = after;
    }

    if let Some(compare) = cli.compare {
        config.simulation.plan.compare = compare;
    }

    if let Some(trials) = cli.trials {
        config.simulation.plan.trials = trials;
    }

    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }

    if let Some(variant) = cli.variant {
        config.variants = variant.variants();
    }

    if cli.log_structured {
        config.logging.enable_structured = true;
    }

    config.validate()?;

    if cli.validate_only {
        let plan = config.plan();
        println!(
            "Experiment '{}' is valid: {} color{} ({} balls), discard {}, compare {}, {} trials",
            config.run_id,
            config.urn.counts.len(),
            if config.urn.counts.len() == 1 { "" } else { "s" },
            config.urn.total(),
            plan.discard,
            plan.compare,
            plan.trials
        );
        return Ok(());
    }

    let logging_guard = init_logging(&config)?;
    let runner = ExperimentRunner::new(config)?;
    let report = runner.run()?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
        println!();
        println!(
            "Seed: {} (largest deviation from exact: {:.4})",
            report.seed,
            report.max_deviation()
        );
        if let Some(guard) = logging_guard.as_ref() {
            println!("Telemetry log: {}", guard.telemetry_path.display());
        }
    }

    Ok(())
}
