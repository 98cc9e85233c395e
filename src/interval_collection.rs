//! A two-level `track -> contig -> SegmentList` mapping.

use std::collections::BTreeMap;

use crate::segment::SegmentList;

/// `contig -> SegmentList`, the shape of a single track, and also the shape
/// of the workspace (which has no track dimension of its own).
pub type ContigMap = BTreeMap<String, SegmentList>;

/// A named collection of tracks, each a [`ContigMap`]. Lookup of an absent
/// `(track, contig)` pair yields the empty `SegmentList`; `entry` creates
/// one on first access.
#[derive(Default, Clone, Debug)]
pub struct IntervalCollection {
    tracks: BTreeMap<String, ContigMap>,
}

impl IntervalCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: impl Into<String>, contig: impl Into<String>, list: SegmentList) {
        self.tracks
            .entry(track.into())
            .or_insert_with(BTreeMap::new)
            .insert(contig.into(), list);
    }

    /// Mutable access to a track's contig entry, creating both the track
    /// and the contig (as an empty list) if absent.
    pub fn entry(&mut self, track: impl Into<String>, contig: impl Into<String>) -> &mut SegmentList {
        self.tracks
            .entry(track.into())
            .or_insert_with(BTreeMap::new)
            .entry(contig.into())
            .or_insert_with(SegmentList::new)
    }

    /// A clone of the `(track, contig)` list, or an empty one if absent.
    pub fn get(&self, track: &str, contig: &str) -> SegmentList {
        self.tracks
            .get(track)
            .and_then(|contigs| contigs.get(contig))
            .cloned()
            .unwrap_or_default()
    }

    pub fn track(&self, track: &str) -> Option<&ContigMap> {
        self.tracks.get(track)
    }

    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(|s| s.as_str())
    }

    pub fn contig_names(&self, track: &str) -> Vec<&str> {
        self.tracks
            .get(track)
            .map(|contigs| contigs.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&str, &ContigMap)> {
        self.tracks.iter().map(|(name, contigs)| (name.as_str(), contigs))
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_lookup_yields_empty_list() {
        let collection = IntervalCollection::new();
        let list = collection.get("segments", "chr1");
        assert!(list.is_empty());
    }

    #[test]
    fn entry_creates_on_insert() {
        let mut collection = IntervalCollection::new();
        collection.entry("segments", "chr1").add(0, 10).unwrap();
        assert_eq!(collection.get("segments", "chr1").len(), 1);
    }

    #[test]
    fn track_names_and_contig_names() {
        let mut collection = IntervalCollection::new();
        collection.insert("segments", "chr1", SegmentList::new());
        collection.insert("segments", "chr2", SegmentList::new());
        collection.insert("annotation", "chr1", SegmentList::new());

        let mut tracks: Vec<&str> = collection.track_names().collect();
        tracks.sort_unstable();
        assert_eq!(tracks, vec!["annotation", "segments"]);

        let mut contigs = collection.contig_names("segments");
        contigs.sort_unstable();
        assert_eq!(contigs, vec!["chr1", "chr2"]);
    }
}
