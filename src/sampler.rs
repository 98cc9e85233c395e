//! Draws random segment placements inside a workspace that preserve the
//! nucleotide mass and approximate length distribution of an input segment
//! set.

use rand::Rng;

use crate::errors::Error;
use crate::histogram::HistogramSampler;
use crate::segment::SegmentList;

/// A cumulative-sum index over a normalized workspace, mapping a uniform
/// offset in `[0, workspace.sum())` to a workspace coordinate in O(log n).
struct WorkspaceIndex {
    segments: Vec<(u64, u64)>,
    prefix: Vec<u64>,
}

impl WorkspaceIndex {
    fn new(workspace: &SegmentList) -> Self {
        let segments = workspace.as_slice().to_vec();
        let mut prefix = Vec::with_capacity(segments.len());
        let mut running = 0u64;
        for &(s, e) in &segments {
            running += e - s;
            prefix.push(running);
        }
        WorkspaceIndex { segments, prefix }
    }

    /// Resolve `offset` (drawn uniformly from `[0, total)`) to a coordinate
    /// `p` and the bounds `(a, b)` of the workspace segment containing it.
    fn position_at(&self, offset: u64) -> (u64, u64, u64) {
        let idx = self.prefix.partition_point(|&cumulative| cumulative <= offset);
        let preceding = if idx == 0 { 0 } else { self.prefix[idx - 1] };
        let (a, b) = self.segments[idx];
        (a + (offset - preceding), a, b)
    }
}

fn overlaps_any(placed: &[(u64, u64)], candidate: (u64, u64)) -> bool {
    let idx = placed.partition_point(|&(s, _)| s <= candidate.0);
    if idx > 0 && placed[idx - 1].1 > candidate.0 {
        return true;
    }
    if idx < placed.len() && placed[idx].0 < candidate.1 {
        return true;
    }
    false
}

fn insert_sorted(placed: &mut Vec<(u64, u64)>, candidate: (u64, u64)) {
    let idx = placed.partition_point(|&(s, _)| s <= candidate.0);
    placed.insert(idx, candidate);
}

/// Draws a random [`SegmentList`] constrained to a workspace, preserving the
/// nucleotide mass and (up to bucket resolution) the length distribution of
/// the input segments.
#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct SamplerAnnotator {
    /// Bucket size for the length histogram built from the input segments.
    #[builder(default = "1")]
    bucket_size: u64,
    /// Maximum length considered by the histogram; defaults to the
    /// workspace's total nucleotide mass when unset.
    #[builder(default)]
    nbuckets: Option<u64>,
    /// Retry budget per length draw before giving up on a placement.
    #[builder(default = "1000")]
    max_retries: u32,
}

impl SamplerAnnotator {
    /// Draw a random placement of `segments` inside `workspace`.
    ///
    /// The returned list is normalized, its nucleotide mass equals
    /// `segments.intersect(workspace).sum()` exactly, and every returned
    /// segment lies inside some workspace segment.
    pub fn sample(
        &self,
        segments: &SegmentList,
        workspace: &SegmentList,
        rng: &mut impl Rng,
    ) -> Result<SegmentList, Error> {
        if !segments.is_normalized() || !workspace.is_normalized() {
            return Err(Error::NotNormalized);
        }
        let workspace_sum = workspace.sum();
        if workspace_sum == 0 {
            return Err(Error::EmptyWorkspace);
        }

        let clipped = segments.intersect(workspace)?;
        let target_mass = clipped.sum();
        if target_mass == 0 {
            return Ok(SegmentList::new());
        }

        let max_length = self.nbuckets.unwrap_or(workspace_sum);
        let histogram = clipped.length_distribution(self.bucket_size, max_length)?;
        let length_sampler = HistogramSampler::new(&histogram)?;
        let index = WorkspaceIndex::new(workspace);

        let mut placed: Vec<(u64, u64)> = Vec::new();
        let mut placed_mass = 0u64;

        while placed_mass < target_mass {
            let remaining = target_mass - placed_mass;
            let length = length_sampler.sample(rng).min(remaining);
            if length == 0 {
                break;
            }

            let mut retries = 0u32;
            let mut placed_this_round = false;
            while retries <= self.max_retries {
                let offset = rng.gen_range(0, workspace_sum);
                let (p, _, seg_end) = index.position_at(offset);
                let candidate_end = (p + length).min(seg_end);
                let candidate = (p, candidate_end);

                if candidate.1 > candidate.0 && !overlaps_any(&placed, candidate) {
                    placed_mass += candidate.1 - candidate.0;
                    insert_sorted(&mut placed, candidate);
                    placed_this_round = true;
                    break;
                }
                retries += 1;
            }

            if !placed_this_round {
                return Err(Error::UnsampleableLength { retries });
            }
        }

        SegmentList::from_iter(placed, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn chunked_workspace(n: u64, size: u64) -> SegmentList {
        SegmentList::from_iter((0..n).map(|i| (i * size, i * size + size)), true).unwrap()
    }

    #[test]
    fn sample_conserves_nucleotide_mass() {
        let workspace = chunked_workspace(10, 1000);
        let segments =
            SegmentList::from_iter((0..10).map(|i| (i * 1000, i * 1000 + 100)), true).unwrap();
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let sample = sampler.sample(&segments, &workspace, &mut rng).unwrap();
            assert_eq!(sample.sum(), 1000);
        }
    }

    #[test]
    fn sample_stays_inside_workspace() {
        let workspace =
            SegmentList::from_iter(vec![(0, 500), (1000, 1300), (5000, 5050)], true).unwrap();
        let segments = SegmentList::from_iter(vec![(0, 200), (1000, 1100)], true).unwrap();
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..500 {
            let sample = sampler.sample(&segments, &workspace, &mut rng).unwrap();
            for &(s, e) in sample.as_slice() {
                let inside = workspace
                    .as_slice()
                    .iter()
                    .any(|&(a, b)| s >= a && e <= b);
                assert!(inside, "segment ({}, {}) escapes the workspace", s, e);
            }
        }
    }

    #[test]
    fn sample_is_normalized() {
        let workspace = chunked_workspace(5, 200);
        let segments = SegmentList::from_iter(vec![(0, 50), (200, 260)], true).unwrap();
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let sample = sampler.sample(&segments, &workspace, &mut rng).unwrap();
        assert!(sample.is_normalized());
    }

    #[test]
    fn empty_workspace_is_an_error() {
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let segments = SegmentList::from_iter(vec![(0, 10)], true).unwrap();
        assert!(matches!(
            sampler.sample(&segments, &SegmentList::new(), &mut rng),
            Err(Error::EmptyWorkspace)
        ));
    }

    #[test]
    fn empty_segments_yield_empty_sample() {
        let workspace = chunked_workspace(3, 100);
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let sample = sampler
            .sample(&SegmentList::new(), &workspace, &mut rng)
            .unwrap();
        assert!(sample.is_empty());
    }

    #[test]
    fn requires_normalized_inputs() {
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut unnormalized = SegmentList::new();
        unnormalized.extend(&SegmentList::from_iter(vec![(0, 10)], true).unwrap());
        let workspace = chunked_workspace(1, 100);
        assert!(matches!(
            sampler.sample(&unnormalized, &workspace, &mut rng),
            Err(Error::NotNormalized)
        ));
    }
}
