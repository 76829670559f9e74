use std::fmt::Write as _;

use serde::Serialize;
use urn_core::TrialPlan;

use crate::config::Variant;

/// Outcome of one experiment: every simulated variant plus the closed-form answer.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub run_id: String,
    pub generator: String,
    pub counts: Vec<u32>,
    #[serde(flatten)]
    pub plan: TrialPlan,
    pub seed: u64,
    pub variants: Vec<VariantReport>,
    pub exact: ExactReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub variant: Variant,
    pub matches: u64,
    pub probability: f64,
    /// Estimate minus the exact probability.
    pub deviation: f64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExactReport {
    pub probability: f64,
    pub elapsed_ms: f64,
}

impl ExperimentReport {
    /// Plain-text rendering: one block per variant, then the closed form.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for variant in &self.variants {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", variant.variant.label());
            let _ = writeln!(out, "Probability: {}", variant.probability);
            let _ = writeln!(out, "Time: {} ms", variant.elapsed_ms);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Math");
        let _ = writeln!(out, "Probability: {}", self.exact.probability);
        let _ = writeln!(out, "Time: {} ms", self.exact.elapsed_ms);
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Largest absolute gap between any variant's estimate and the exact probability.
    pub fn max_deviation(&self) -> f64 {
        self.variants
            .iter()
            .map(|variant| variant.deviation.abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ExperimentReport {
        ExperimentReport {
            run_id: "sample".to_string(),
            generator: "urn-match 0.1.0".to_string(),
            counts: vec![5, 5, 5],
            plan: TrialPlan::new(4, 2, 10),
            seed: 7,
            variants: vec![
                VariantReport {
                    variant: Variant::List,
                    matches: 3,
                    probability: 0.3,
                    deviation: 0.3 - 2.0 / 7.0,
                    elapsed_ms: 1.5,
                },
                VariantReport {
                    variant: Variant::Count,
                    matches: 2,
                    probability: 0.2,
                    deviation: 0.2 - 2.0 / 7.0,
                    elapsed_ms: 0.5,
                },
            ],
            exact: ExactReport {
                probability: 2.0 / 7.0,
                elapsed_ms: 0.01,
            },
        }
    }

    #[test]
    fn text_has_one_block_per_variant_and_math() {
        let text = sample_report().render_text();
        assert!(text.contains("\nListUrn\nProbability: 0.3\nTime: 1.5 ms\n"));
        assert!(text.contains("\nCountUrn\nProbability: 0.2\n"));
        assert!(text.contains("\nMath\nProbability: 0.2857"));
    }

    #[test]
    fn json_flattens_the_plan() {
        let json = sample_report().to_json().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("decode");
        assert_eq!(value["discard"], 4);
        assert_eq!(value["compare"], 2);
        assert_eq!(value["trials"], 10);
        assert_eq!(value["variants"][0]["variant"], "list");
        assert_eq!(value["variants"][1]["matches"], 2);
    }

    #[test]
    fn max_deviation_takes_the_largest_gap() {
        let report = sample_report();
        assert!((report.max_deviation() - (2.0 / 7.0 - 0.2)).abs() < 1e-12);
    }
}
