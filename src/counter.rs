//! Overlap statistics computed from a sample, an annotation, and (already
//! clipped into) a workspace.

use crate::errors::Error;
use crate::segment::SegmentList;

/// A statistic computed from a sampled `SegmentList` and an annotation
/// `SegmentList`. Pluggable: any type conforming to this trait can be
/// handed to a [`crate::driver::SimulationDriver`].
pub trait Counter: Send + Sync {
    fn count(&self, sample: &SegmentList, annotation: &SegmentList) -> Result<f64, Error>;

    /// Short name used in result reporting.
    fn name(&self) -> &str;
}

/// Nucleotide overlap: `sample.intersect(annotation).sum()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NucleotideOverlapCounter;

impl Counter for NucleotideOverlapCounter {
    fn count(&self, sample: &SegmentList, annotation: &SegmentList) -> Result<f64, Error> {
        Ok(sample.intersect(annotation)?.sum() as f64)
    }

    fn name(&self) -> &str {
        "nucleotide_overlap"
    }
}

/// Segment-count overlap: number of `sample` segments touching at least one
/// `annotation` segment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentOverlapCounter;

impl Counter for SegmentOverlapCounter {
    fn count(&self, sample: &SegmentList, annotation: &SegmentList) -> Result<f64, Error> {
        Ok(sample.intersection_with_segments(annotation)? as f64)
    }

    fn name(&self) -> &str {
        "segment_overlap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nucleotide_overlap_counts_shared_bases() {
        let sample = SegmentList::from_iter(vec![(0, 10), (20, 30)], true).unwrap();
        let annotation = SegmentList::from_iter(vec![(5, 25)], true).unwrap();
        let counter = NucleotideOverlapCounter;
        assert_eq!(counter.count(&sample, &annotation).unwrap(), 10.0);
    }

    #[test]
    fn segment_overlap_counts_touched_segments() {
        let sample = SegmentList::from_iter(vec![(0, 10), (20, 30), (40, 50)], true).unwrap();
        let annotation = SegmentList::from_iter(vec![(5, 6), (45, 46)], true).unwrap();
        let counter = SegmentOverlapCounter;
        assert_eq!(counter.count(&sample, &annotation).unwrap(), 2.0);
    }
}
