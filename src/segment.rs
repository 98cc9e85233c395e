//! Interval arithmetic over sorted, disjoint, half-open integer segments.

use crate::errors::Error;
use crate::histogram::LengthHistogram;

/// An ordered sequence of half-open `[start, end)` segments.
///
/// When `is_normalized()` is true the segments are sorted by `start`,
/// pairwise disjoint, non-adjacent (no shared endpoints) and contain no
/// empty segments. Most set-algebraic operations require both operands to
/// be normalized and return [`Error::NotNormalized`] otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentList {
    segments: Vec<(u64, u64)>,
    normalized: bool,
}

impl SegmentList {
    /// An empty, trivially normalized segment list.
    pub fn new() -> Self {
        SegmentList {
            segments: Vec::new(),
            normalized: true,
        }
    }

    /// Build a list from an iterable of `(start, end)` pairs, optionally
    /// normalizing the result before returning it.
    pub fn from_iter<I>(iter: I, normalize: bool) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut list = Self::new();
        for (start, end) in iter {
            list.add(start, end)?;
        }
        if normalize {
            list.normalize();
        }
        Ok(list)
    }

    /// Append a segment to the tail. `InvalidSegment` if `end < start`.
    ///
    /// `is_normalized()` remains true only if the new segment falls
    /// strictly after the current tail and is non-empty.
    pub fn add(&mut self, start: u64, end: u64) -> Result<(), Error> {
        if end < start {
            return Err(Error::InvalidSegment { start, end });
        }
        if self.normalized {
            let still_sorted = match self.segments.last() {
                None => end > start,
                Some(&(_, prev_end)) => start > prev_end && end > start,
            };
            if !still_sorted {
                self.normalized = false;
            }
        }
        self.segments.push((start, end));
        Ok(())
    }

    /// Concatenate another list's segments onto this one. Always leaves the
    /// result unnormalized.
    pub fn extend(&mut self, other: &SegmentList) {
        self.segments.extend_from_slice(&other.segments);
        self.normalized = false;
    }

    /// Remove all segments. The empty list is normalized.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.normalized = true;
    }

    /// Sort, merge overlapping/adjacent segments and drop empties.
    pub fn normalize(&mut self) {
        if self.normalized {
            return;
        }
        self.segments.retain(|&(s, e)| e > s);
        self.segments.sort_unstable_by_key(|&(s, _)| s);

        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(self.segments.len());
        for &(s, e) in &self.segments {
            match merged.last_mut() {
                Some((_, last_end)) if s <= *last_end => {
                    if e > *last_end {
                        *last_end = e;
                    }
                }
                _ => merged.push((s, e)),
            }
        }
        self.segments = merged;
        self.normalized = true;
    }

    /// Total nucleotide mass, `Σ(end - start)`.
    pub fn sum(&self) -> u64 {
        self.segments.iter().map(|&(s, e)| e - s).sum()
    }

    /// Number of stored segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// No segments, or all segments have zero length.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() || self.sum() == 0
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// The underlying `(start, end)` pairs, in current (possibly
    /// unnormalized) order.
    pub fn as_slice(&self) -> &[(u64, u64)] {
        &self.segments
    }

    /// Nucleotide count of the intersection with the half-open range
    /// `[a, b)`. Requires a normalized list.
    pub fn overlap_with_range(&self, a: u64, b: u64) -> Result<u64, Error> {
        if !self.normalized {
            return Err(Error::NotNormalized);
        }
        if b <= a {
            return Ok(0);
        }
        let start_idx = self.segments.partition_point(|&(_, end)| end <= a);
        let mut total = 0u64;
        for &(s, e) in &self.segments[start_idx..] {
            if s >= b {
                break;
            }
            let lo = s.max(a);
            let hi = e.min(b);
            if hi > lo {
                total += hi - lo;
            }
        }
        Ok(total)
    }

    /// Set intersection with `other`, computed via a two-pointer merge.
    /// Both operands must be normalized; the result is normalized.
    pub fn intersect(&self, other: &SegmentList) -> Result<SegmentList, Error> {
        if !self.normalized || !other.normalized {
            return Err(Error::NotNormalized);
        }
        let (a, b) = (&self.segments, &other.segments);
        let mut result = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        while i < a.len() && j < b.len() {
            let (s1, e1) = a[i];
            let (s2, e2) = b[j];
            let lo = s1.max(s2);
            let hi = e1.min(e2);
            if hi > lo {
                result.push((lo, hi));
            }
            if e1 < e2 {
                i += 1;
            } else {
                j += 1;
            }
        }
        Ok(SegmentList {
            segments: result,
            normalized: true,
        })
    }

    /// Count of segments in `self` that overlap at least one segment in
    /// `other`. Both operands must be normalized.
    pub fn intersection_with_segments(&self, other: &SegmentList) -> Result<usize, Error> {
        if !self.normalized || !other.normalized {
            return Err(Error::NotNormalized);
        }
        let (a, b) = (&self.segments, &other.segments);
        let mut count = 0usize;
        let (mut i, mut j) = (0usize, 0usize);
        while i < a.len() && j < b.len() {
            let (s1, e1) = a[i];
            let (s2, e2) = b[j];
            if e1 <= s2 {
                i += 1;
            } else if e2 <= s1 {
                j += 1;
            } else {
                count += 1;
                i += 1;
            }
        }
        Ok(count)
    }

    /// Clip this list's segments to `workspace`, preserving normalization.
    /// Equivalent to [`SegmentList::intersect`].
    pub fn filter(&self, workspace: &SegmentList) -> Result<SegmentList, Error> {
        self.intersect(workspace)
    }

    /// Tally segment lengths into a [`LengthHistogram`] covering
    /// `[0, max_length]`, bucketed by `bucket_size`. Requires a normalized
    /// list.
    pub fn length_distribution(
        &self,
        bucket_size: u64,
        max_length: u64,
    ) -> Result<LengthHistogram, Error> {
        if !self.normalized {
            return Err(Error::NotNormalized);
        }
        LengthHistogram::from_lengths(
            self.segments.iter().map(|&(s, e)| e - s),
            bucket_size,
            max_length,
        )
    }
}

impl Default for SegmentList {
    fn default() -> Self {
        Self::new()
    }
}
