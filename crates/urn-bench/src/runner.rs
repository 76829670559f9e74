use std::time::Instant;

use rand::rngs::{SmallRng, StdRng};
use rand::{RngCore, SeedableRng};
use thiserror::Error;
use tracing::{Level, event};
use urn_core::simulation::estimate;
use urn_core::{AppInfo, CountUrn, ListUrn, Urn, UrnError, exact_match_probability};

use crate::config::{ExperimentConfig, Variant};
use crate::report::{ExactReport, ExperimentReport, VariantReport};

/// Runs every configured urn variant through the same trial plan and times it.
pub struct ExperimentRunner {
    config: ExperimentConfig,
}

impl ExperimentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: ExperimentConfig) -> Result<Self, RunnerError> {
        let total = config.urn.total();
        let available = usize::try_from(total).map_err(|_| UrnError::TooManyBalls { total })?;
        config.plan().validate(available)?;
        Ok(Self { config })
    }

    /// Execute the experiment.
    ///
    /// Each variant gets its own generator derived from the run seed, so a fixed
    /// seed reproduces every estimate regardless of which variants are selected.
    pub fn run(&self) -> Result<ExperimentReport, RunnerError> {
        let seed = self.config.simulation.seed.unwrap_or_else(rand::random);
        let mut seeds = StdRng::seed_from_u64(seed);
        let variant_seeds = Variant::ALL.map(|variant| (variant, seeds.next_u64()));

        let exact = self.solve_exact()?;

        let mut variants = Vec::with_capacity(self.config.variants.len());
        for &variant in &self.config.variants {
            let variant_seed = variant_seeds
                .iter()
                .find(|(candidate, _)| *candidate == variant)
                .map(|(_, seed)| *seed)
                .unwrap_or(seed);
            variants.push(self.simulate(variant, variant_seed, exact.probability)?);
        }

        Ok(ExperimentReport {
            run_id: self.config.run_id.clone(),
            generator: format!("{} {}", AppInfo::name(), AppInfo::version()),
            counts: self.config.urn.counts.clone(),
            plan: self.config.plan(),
            seed,
            variants,
            exact,
        })
    }

    fn simulate(
        &self,
        variant: Variant,
        seed: u64,
        exact: f64,
    ) -> Result<VariantReport, RunnerError> {
        let counts = &self.config.urn.counts;
        let rng = SmallRng::seed_from_u64(seed);
        let mut urn: Box<dyn Urn> = match variant {
            Variant::List => Box::new(ListUrn::new(counts, rng)?),
            Variant::Count => Box::new(CountUrn::new(counts, rng)?),
        };

        let plan = self.config.plan();
        let start = Instant::now();
        let tally = estimate(&mut urn, &plan).map_err(|source| RunnerError::Simulation {
            variant: variant.label(),
            source,
        })?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;
        let probability = tally.probability();

        event!(
            target: "urn_bench::variant",
            Level::INFO,
            run_id = %self.config.run_id,
            variant = variant.label(),
            trials = tally.trials,
            matches = tally.matches,
            probability,
            exact,
            elapsed_ms
        );

        Ok(VariantReport {
            variant,
            matches: tally.matches,
            probability,
            deviation: probability - exact,
            elapsed_ms,
        })
    }

    fn solve_exact(&self) -> Result<ExactReport, RunnerError> {
        let start = Instant::now();
        let probability =
            exact_match_probability(&self.config.urn.counts, self.config.plan().compare)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

        event!(
            target: "urn_bench::exact",
            Level::INFO,
            run_id = %self.config.run_id,
            compare = self.config.plan().compare,
            probability,
            elapsed_ms
        );

        Ok(ExactReport {
            probability,
            elapsed_ms,
        })
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid experiment: {0}")]
    Invalid(#[from] UrnError),
    #[error("{variant} simulation failed: {source}")]
    Simulation {
        variant: &'static str,
        #[source]
        source: UrnError,
    },
}
