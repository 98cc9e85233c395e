//! Empirical length distribution and length sampling.

use rand::Rng;

use crate::errors::Error;

/// An empirical distribution of segment lengths, bucketed by `bucket_size`.
///
/// Bucket `i` covers lengths in `(i * bucket_size, (i + 1) * bucket_size]`.
#[derive(Clone, Debug)]
pub struct LengthHistogram {
    bucket_size: u64,
    counts: Vec<u64>,
}

impl LengthHistogram {
    /// Tally `lengths` into buckets of `bucket_size` covering
    /// `(0, max_length]`. Lengths of zero or greater than `max_length` are
    /// dropped.
    pub fn from_lengths<I>(lengths: I, bucket_size: u64, max_length: u64) -> Result<Self, Error>
    where
        I: IntoIterator<Item = u64>,
    {
        let bucket_size = bucket_size.max(1);
        let nbuckets = ((max_length + bucket_size - 1) / bucket_size).max(1) as usize;
        let mut counts = vec![0u64; nbuckets];

        for length in lengths {
            if length == 0 || length > max_length {
                continue;
            }
            let idx = (((length - 1) / bucket_size) as usize).min(counts.len() - 1);
            counts[idx] += 1;
        }

        Ok(LengthHistogram {
            bucket_size,
            counts,
        })
    }

    pub fn bucket_size(&self) -> u64 {
        self.bucket_size
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of tallied lengths.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// True if this histogram carries no mass and cannot back a sampler.
    pub fn is_degenerate(&self) -> bool {
        self.total() == 0
    }
}

/// A draws-a-length sampler built from a [`LengthHistogram`]'s cumulative
/// distribution.
///
/// [`HistogramSampler::sample`] resolves a uniform draw via binary search
/// over the CDF (the "fast" variant); [`HistogramSampler::sample_linear`]
/// performs the same resolution via a linear scan (the "slow" variant) and
/// exists so tests can cross-check that both follow the same distribution.
#[derive(Clone, Debug)]
pub struct HistogramSampler {
    bucket_size: u64,
    cdf: Vec<u64>,
    total: u64,
}

impl HistogramSampler {
    pub fn new(histogram: &LengthHistogram) -> Result<Self, Error> {
        if histogram.is_degenerate() {
            return Err(Error::DegenerateHistogram);
        }
        let mut cdf = Vec::with_capacity(histogram.counts().len());
        let mut running = 0u64;
        for &count in histogram.counts() {
            running += count;
            cdf.push(running);
        }
        Ok(HistogramSampler {
            bucket_size: histogram.bucket_size(),
            cdf,
            total: running,
        })
    }

    /// Draw a positive length, resolving the bucket via binary search.
    pub fn sample(&self, rng: &mut impl Rng) -> u64 {
        let draw = rng.gen_range(0, self.total);
        let idx = self.cdf.partition_point(|&cumulative| cumulative <= draw);
        self.length_for_bucket(idx, rng)
    }

    /// Draw a positive length, resolving the bucket via a linear scan.
    pub fn sample_linear(&self, rng: &mut impl Rng) -> u64 {
        let draw = rng.gen_range(0, self.total);
        let mut idx = self.cdf.len() - 1;
        for (i, &cumulative) in self.cdf.iter().enumerate() {
            if draw < cumulative {
                idx = i;
                break;
            }
        }
        self.length_for_bucket(idx, rng)
    }

    fn length_for_bucket(&self, idx: usize, rng: &mut impl Rng) -> u64 {
        let base = (idx as u64) * self.bucket_size;
        if self.bucket_size > 1 {
            base + 1 + rng.gen_range(0, self.bucket_size)
        } else {
            base + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn degenerate_histogram_rejected() {
        let hist = LengthHistogram::from_lengths(std::iter::empty(), 1, 100).unwrap();
        assert!(hist.is_degenerate());
        assert!(matches!(
            HistogramSampler::new(&hist),
            Err(Error::DegenerateHistogram)
        ));
    }

    #[test]
    fn single_length_is_deterministic() {
        let lengths = std::iter::repeat(37u64).take(50);
        let hist = LengthHistogram::from_lengths(lengths, 1, 100).unwrap();
        let sampler = HistogramSampler::new(&hist).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(sampler.sample(&mut rng), 37);
            assert_eq!(sampler.sample_linear(&mut rng), 37);
        }
    }

    #[test]
    fn mean_converges_to_empirical_mean() {
        let lengths = vec![10u64, 20, 30, 40, 50];
        let mean: f64 = lengths.iter().sum::<u64>() as f64 / lengths.len() as f64;
        let hist = LengthHistogram::from_lengths(lengths, 1, 100).unwrap();
        let sampler = HistogramSampler::new(&hist).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let draws: Vec<u64> = (0..20_000).map(|_| sampler.sample(&mut rng)).collect();
        let observed_mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        assert!((observed_mean - mean).abs() < 1.0, "{} vs {}", observed_mean, mean);
    }
}
