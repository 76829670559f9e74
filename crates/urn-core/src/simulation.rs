//! Monte Carlo estimate of the probability that consecutive draws share a color.
//!
//! A trial discards `discard` draws, takes one reference draw, then `compare - 1`
//! further draws; it is a match when every further draw equals the reference.
//! The urn is reset after every trial so trials never share state.

use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::error::UrnError;
use crate::urn::Urn;

pub const DEFAULT_DISCARD: usize = 4;
pub const DEFAULT_COMPARE: usize = 2;
pub const DEFAULT_TRIALS: u64 = 100_000;

/// Draw protocol applied to every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPlan {
    #[serde(default = "default_discard")]
    pub discard: usize,
    #[serde(default = "default_compare")]
    pub compare: usize,
    #[serde(default = "default_trials")]
    pub trials: u64,
}

impl Default for TrialPlan {
    fn default() -> Self {
        Self {
            discard: DEFAULT_DISCARD,
            compare: DEFAULT_COMPARE,
            trials: DEFAULT_TRIALS,
        }
    }
}

impl TrialPlan {
    pub const fn new(discard: usize, compare: usize, trials: u64) -> Self {
        Self {
            discard,
            compare,
            trials,
        }
    }

    /// Balls consumed by a single trial, saturating at `u64::MAX`.
    pub fn draws_per_trial(&self) -> u64 {
        (self.discard as u64).saturating_add(self.compare as u64)
    }

    /// Rejects plans that could not run against an urn of `available` balls.
    pub fn validate(&self, available: usize) -> Result<(), UrnError> {
        if self.compare == 0 {
            return Err(UrnError::ZeroCompare);
        }
        if self.trials == 0 {
            return Err(UrnError::ZeroTrials);
        }
        let required = self.draws_per_trial();
        if (available as u64) < required {
            return Err(UrnError::InsufficientBalls {
                required,
                available: available as u64,
            });
        }
        Ok(())
    }
}

fn default_discard() -> usize {
    DEFAULT_DISCARD
}

fn default_compare() -> usize {
    DEFAULT_COMPARE
}

fn default_trials() -> u64 {
    DEFAULT_TRIALS
}

/// Match tally produced by [`estimate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub matches: u64,
    pub trials: u64,
}

impl Estimate {
    pub fn probability(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.matches as f64 / self.trials as f64
        }
    }
}

/// Runs one trial and resets the urn, whatever the outcome.
///
/// The caller is responsible for having validated `plan` against the urn.
pub fn run_trial<U: Urn + ?Sized>(urn: &mut U, plan: &TrialPlan) -> Result<bool, UrnError> {
    let outcome = draw_trial(urn, plan);
    urn.reset();
    outcome
}

fn draw_trial<U: Urn + ?Sized>(urn: &mut U, plan: &TrialPlan) -> Result<bool, UrnError> {
    for _ in 0..plan.discard {
        urn.draw()?;
    }

    let reference = urn.draw()?;
    let mut matched = true;
    for _ in 1..plan.compare {
        // Keep drawing after a mismatch so each trial consumes the same balls.
        matched &= urn.draw()? == reference;
    }
    Ok(matched)
}

/// Runs `plan.trials` trials against `urn` and tallies the matches.
///
/// The urn must hold at least `discard + compare` balls at the start; since
/// every trial ends with a reset, this is checked once before the loop.
pub fn estimate<U: Urn + ?Sized>(urn: &mut U, plan: &TrialPlan) -> Result<Estimate, UrnError> {
    plan.validate(urn.remaining())?;

    let mut matches = 0u64;
    for _ in 0..plan.trials {
        if run_trial(urn, plan)? {
            matches += 1;
        }
    }

    let estimate = Estimate {
        matches,
        trials: plan.trials,
    };
    event!(
        target: "urn_core::simulation",
        Level::DEBUG,
        discard = plan.discard,
        compare = plan.compare,
        trials = plan.trials,
        matches,
        probability = estimate.probability()
    );
    Ok(estimate)
}

/// Empirical probability that the `compare` draws following `discard` discarded draws share a color.
pub fn estimate_match_probability<U: Urn + ?Sized>(
    urn: &mut U,
    discard: usize,
    compare: usize,
    trials: u64,
) -> Result<f64, UrnError> {
    estimate(urn, &TrialPlan::new(discard, compare, trials)).map(|estimate| estimate.probability())
}
