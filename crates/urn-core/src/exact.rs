//! Closed-form match probabilities.
//!
//! The probability that `compare` balls drawn without replacement share a color is
//! `sum_c ff(count[c], compare) / ff(n, compare)`, where `ff(k, m)` is the falling
//! factorial `k * (k - 1) * ... * (k - m + 1)`. Products are formed in `u128` and
//! only the final ratio is rounded; when a product would overflow, the ratio is
//! accumulated term by term in `f64` instead.

use crate::error::UrnError;

/// `k * (k - 1) * ... * (k - m + 1)`, zero when `k < m`, `None` on `u128` overflow.
pub fn falling_factorial(k: u64, m: u64) -> Option<u128> {
    if k < m {
        return Some(0);
    }
    (0..m).try_fold(1u128, |acc, step| acc.checked_mul(u128::from(k - step)))
}

/// Probability that `compare` consecutive draws from a full urn share a color.
///
/// Because the discarded draws are themselves uniform, this is also the answer
/// for any number of discarded draws; see [`match_probability_after_discard`].
pub fn exact_match_probability(counts: &[u32], compare: usize) -> Result<f64, UrnError> {
    let total = total_balls(counts);
    check_supply(total, 0, compare)?;
    let m = compare as u64;

    if let Some((numerator, denominator)) = exact_ratio(counts, total, m) {
        return Ok(numerator as f64 / denominator as f64);
    }

    Ok(counts
        .iter()
        .map(|&count| ratio_of_falling(u64::from(count), total, m))
        .sum())
}

/// Probability that the `compare` draws following `discard` discarded draws share a color,
/// computed without assuming the discard step is irrelevant.
///
/// The balls removed from each color by the discard follow a hypergeometric
/// distribution; the match probability of the remaining composition is averaged
/// over it. The result agrees with [`exact_match_probability`].
pub fn match_probability_after_discard(
    counts: &[u32],
    discard: usize,
    compare: usize,
) -> Result<f64, UrnError> {
    let total = total_balls(counts);
    check_supply(total, discard, compare)?;
    let d = discard as u64;
    let m = compare as u64;
    let remaining = total - d;

    let mut probability = 0.0;
    for &count in counts {
        let k = u64::from(count);
        let others = total - k;
        let lowest = d.saturating_sub(others);
        let highest = d.min(k);

        let mut ln_pmf = ln_choose(k, lowest) + ln_choose(others, d - lowest) - ln_choose(total, d);
        for removed in lowest..=highest {
            probability += ln_pmf.exp() * ratio_of_falling(k - removed, remaining, m);
            if removed < highest {
                ln_pmf += ln_removal_step(k, others, d, removed);
            }
        }
    }
    Ok(probability)
}

/// `ln(P(X = x + 1) / P(X = x))` where `X` counts the balls of a `k`-ball color
/// among `d` discarded from `k + others`. Requires `x < min(d, k)`.
fn ln_removal_step(k: u64, others: u64, d: u64, x: u64) -> f64 {
    let up = (k - x) as f64 * (d - x) as f64;
    let down = (x + 1) as f64 * (others - (d - x - 1)) as f64;
    up.ln() - down.ln()
}

fn total_balls(counts: &[u32]) -> u64 {
    counts.iter().map(|&count| u64::from(count)).sum()
}

fn check_supply(total: u64, discard: usize, compare: usize) -> Result<(), UrnError> {
    if compare == 0 {
        return Err(UrnError::ZeroCompare);
    }
    let required = (discard as u64).saturating_add(compare as u64);
    if total < required {
        return Err(UrnError::InsufficientBalls {
            required,
            available: total,
        });
    }
    Ok(())
}

fn exact_ratio(counts: &[u32], total: u64, m: u64) -> Option<(u128, u128)> {
    let numerator = counts.iter().try_fold(0u128, |acc, &count| {
        acc.checked_add(falling_factorial(u64::from(count), m)?)
    })?;
    let denominator = falling_factorial(total, m)?;
    Some((numerator, denominator))
}

/// `ff(k, m) / ff(n, m)` as a product of per-step ratios. Requires `n >= m`.
fn ratio_of_falling(k: u64, n: u64, m: u64) -> f64 {
    if k < m {
        return 0.0;
    }
    (0..m)
        .map(|step| (k - step) as f64 / (n - step) as f64)
        .product()
}

fn ln_choose(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    (0..k)
        .map(|step| ((n - step) as f64).ln() - ((step + 1) as f64).ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_factorial_basics() {
        assert_eq!(falling_factorial(5, 2), Some(20));
        assert_eq!(falling_factorial(5, 0), Some(1));
        assert_eq!(falling_factorial(1, 2), Some(0));
        assert_eq!(falling_factorial(u64::MAX, 3), None);
    }

    #[test]
    fn three_equal_colors() {
        let p = exact_match_probability(&[5, 5, 5], 2).expect("valid");
        assert_eq!(p, 60.0 / 210.0);
    }

    #[test]
    fn boundaries() {
        assert_eq!(exact_match_probability(&[1, 1], 2), Ok(0.0));
        assert_eq!(exact_match_probability(&[2], 2), Ok(1.0));
        assert_eq!(exact_match_probability(&[3, 4], 1), Ok(1.0));
    }

    #[test]
    fn rejects_short_supply_and_zero_compare() {
        assert_eq!(
            exact_match_probability(&[1], 2),
            Err(UrnError::InsufficientBalls {
                required: 2,
                available: 1
            })
        );
        assert_eq!(exact_match_probability(&[4], 0), Err(UrnError::ZeroCompare));
        assert!(match_probability_after_discard(&[2, 2], 3, 2).is_err());
    }

    #[test]
    fn oversized_discard_is_short_supply() {
        assert_eq!(
            match_probability_after_discard(&[5, 5], usize::MAX, 2),
            Err(UrnError::InsufficientBalls {
                required: u64::MAX,
                available: 10
            })
        );
    }

    #[test]
    fn removal_step_matches_small_hypergeometric() {
        // Discarding 2 of [2, 2]: P(X = 1) / P(X = 0) = (4/6) / (1/6).
        assert!((ln_removal_step(2, 2, 2, 0) - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn removal_step_stays_finite_for_huge_urns() {
        let k = u64::from(u32::MAX);
        let others = 3 * k;
        let d = 5_000_000_000;
        let step = ln_removal_step(k, others, d, 0);
        let expected = (k as f64).ln() + (d as f64).ln() - ((others - d + 1) as f64).ln();
        assert!(step.is_finite());
        assert!((step - expected).abs() < 1e-9, "{step} vs {expected}");
    }

    #[test]
    fn overflow_falls_back_to_ratios() {
        let counts = [u32::MAX, u32::MAX];
        let p = exact_match_probability(&counts, 5).expect("valid");
        assert!((p - 0.0625).abs() < 1e-9, "p = {p}");
    }

    #[test]
    fn after_discard_matches_closed_form() {
        let counts = [5, 3, 7, 1];
        let expected = exact_match_probability(&counts, 3).expect("valid");
        for discard in 0..=13 {
            let p = match_probability_after_discard(&counts, discard, 3).expect("valid");
            assert!(
                (p - expected).abs() < 1e-12,
                "discard {discard}: {p} vs {expected}"
            );
        }
    }

    #[test]
    fn after_discard_handles_an_exhausting_discard() {
        // Discarding all but two balls of [2, 2] leaves a matching pair with probability 1/3.
        let p = match_probability_after_discard(&[2, 2], 2, 2).expect("valid");
        assert!((p - 1.0 / 3.0).abs() < 1e-12);
    }
}
