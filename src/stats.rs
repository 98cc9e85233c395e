//! Summary statistics over Monte-Carlo samples, and a keyed accumulator
//! utility (the typed replacement for a dynamic-attribute counter).

use std::collections::BTreeMap;

use statrs::distribution::{Discrete, Hypergeometric};

use crate::errors::Error;

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (Bessel's correction); 0 for fewer than two
/// samples.
pub fn stddev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let variance =
        samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}

/// Two-sided empirical p-value: `2 * min(k_low, k_high) / n`, clipped to
/// `[1/n, 1]`, where `k_low`/`k_high` count samples at least as extreme as
/// `observed` on either side.
pub fn two_sided_empirical_pvalue(samples: &[f64], observed: f64) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 1.0;
    }
    let k_low = samples.iter().filter(|&&x| x <= observed).count();
    let k_high = samples.iter().filter(|&&x| x >= observed).count();
    let p = 2.0 * (k_low.min(k_high) as f64) / n as f64;
    p.max(1.0 / n as f64).min(1.0)
}

/// Two-sided tail probability of the hypergeometric distribution with
/// `population` items, `successes` marked items and `draws` drawn without
/// replacement, evaluated at `observed` successes. Used to cross-check the
/// empirical p-value against its closed-form counterpart for single-base
/// overlap scenarios.
pub fn hypergeometric_two_sided_pvalue(
    population: u64,
    successes: u64,
    draws: u64,
    observed: u64,
) -> Result<f64, Error> {
    let dist = Hypergeometric::new(population, successes, draws)
        .map_err(|source| Error::Stats { source })?;
    let min_k = draws.saturating_sub(population - successes);
    let max_k = successes.min(draws);

    let p_low: f64 = (min_k..=observed.min(max_k)).map(|k| dist.pmf(k)).sum();
    let p_high: f64 = (observed.max(min_k)..=max_k).map(|k| dist.pmf(k)).sum();

    Ok((2.0 * p_low.min(p_high)).min(1.0))
}

/// A keyed integer accumulator: the typed replacement for a dynamic
/// attribute-indexed counter. Counts default to zero and merge additively.
#[derive(Default, Clone, Debug)]
pub struct Accumulator {
    counts: BTreeMap<String, i64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, value: i64) {
        *self.counts.entry(key.to_string()).or_insert(0) += value;
    }

    pub fn get(&self, key: &str) -> i64 {
        *self.counts.get(key).unwrap_or(&0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn merge(&mut self, other: &Accumulator) {
        for (key, value) in other.iter() {
            self.add(key, value);
        }
    }
}
