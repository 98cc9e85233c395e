//! Orchestrates N samples per segment track, tallies overlaps against each
//! annotation track, and summarizes the resulting null distribution.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::Config;
use crate::counter::Counter;
use crate::errors::Error;
use crate::interval_collection::{ContigMap, IntervalCollection};
use crate::sampler::SamplerAnnotator;
use crate::stats;

/// Observed/expected/stddev/p-value summary for one (track, annotation)
/// pair.
#[derive(Clone, Debug, Getters)]
#[get = "pub"]
pub struct EnrichmentResult {
    track: String,
    annotation: String,
    observed: f64,
    expected: f64,
    stddev: f64,
    pvalue: f64,
    nsamples: usize,
    samples: Option<Vec<f64>>,
}

/// Runs the Monte-Carlo simulation: for each segment track, draw
/// `config.n_samples()` constrained random placements and tally `counter`
/// against every annotation track.
pub struct SimulationDriver<'a> {
    config: &'a Config,
}

impl<'a> SimulationDriver<'a> {
    pub fn new(config: &'a Config) -> Self {
        SimulationDriver { config }
    }

    pub fn run(
        &self,
        segments: &IntervalCollection,
        annotations: &IntervalCollection,
        workspace: &ContigMap,
        sampler: &SamplerAnnotator,
        counter: &dyn Counter,
    ) -> Result<Vec<EnrichmentResult>, Error> {
        if workspace.values().all(|list| list.is_empty()) {
            return Err(Error::EmptyWorkspace);
        }

        let mut results = Vec::new();

        for (track_index, (track_name, track_contigs)) in segments.tracks().enumerate() {
            info!(
                "track {}: computing observed overlap against {} annotation track(s)",
                track_name,
                annotations.track_names().count()
            );
            let observed =
                self.observed_overlaps(track_contigs, annotations, workspace, counter)?;

            let per_iteration = self.collect_samples(
                track_index,
                track_contigs,
                annotations,
                workspace,
                sampler,
                counter,
            )?;

            for annotation_name in annotations.track_names() {
                let obs = *observed.get(annotation_name).unwrap_or(&0.0);
                let values: Vec<f64> = per_iteration
                    .iter()
                    .map(|row| *row.get(annotation_name).unwrap_or(&0.0))
                    .collect();
                let expected = stats::mean(&values);
                let sd = stats::stddev(&values);
                let pvalue = stats::two_sided_empirical_pvalue(&values, obs);
                debug!(
                    "{} vs {}: observed={} expected={} stddev={} pvalue={}",
                    track_name, annotation_name, obs, expected, sd, pvalue
                );

                results.push(EnrichmentResult {
                    track: track_name.to_string(),
                    annotation: annotation_name.to_string(),
                    observed: obs,
                    expected,
                    stddev: sd,
                    pvalue,
                    nsamples: values.len(),
                    samples: if *self.config.retain_samples() {
                        Some(values)
                    } else {
                        None
                    },
                });
            }
        }

        Ok(results)
    }

    fn observed_overlaps(
        &self,
        track_contigs: &ContigMap,
        annotations: &IntervalCollection,
        workspace: &ContigMap,
        counter: &dyn Counter,
    ) -> Result<BTreeMap<String, f64>, Error> {
        let mut totals = BTreeMap::new();
        for annotation_name in annotations.track_names() {
            let mut total = 0.0;
            for (contig, ws) in workspace.iter() {
                if ws.is_empty() {
                    continue;
                }
                let seg = track_contigs.get(contig).cloned().unwrap_or_default();
                let ann = annotations.get(annotation_name, contig);
                total += counter.count(&seg.intersect(ws)?, &ann.intersect(ws)?)?;
            }
            totals.insert(annotation_name.to_string(), total);
        }
        Ok(totals)
    }

    fn collect_samples(
        &self,
        track_index: usize,
        track_contigs: &ContigMap,
        annotations: &IntervalCollection,
        workspace: &ContigMap,
        sampler: &SamplerAnnotator,
        counter: &dyn Counter,
    ) -> Result<Vec<BTreeMap<String, f64>>, Error> {
        let n = *self.config.n_samples();
        let base_seed = *self.config.seed();
        let threads = *self.config.threads();

        let run_iteration = |iteration: usize| -> Result<BTreeMap<String, f64>, Error> {
            let seed = base_seed ^ (track_index as u64) ^ (iteration as u64);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut totals: BTreeMap<String, f64> = annotations
                .track_names()
                .map(|name| (name.to_string(), 0.0))
                .collect();

            for (contig, ws) in workspace.iter() {
                if ws.is_empty() {
                    continue;
                }
                let seg = track_contigs.get(contig).cloned().unwrap_or_default();
                let sampled = sampler.sample(&seg, ws, &mut rng)?;
                for annotation_name in annotations.track_names() {
                    let ann = annotations.get(annotation_name, contig).intersect(ws)?;
                    *totals.get_mut(annotation_name).unwrap() += counter.count(&sampled, &ann)?;
                }
            }

            Ok(totals)
        };

        if threads > 1 {
            (0..n)
                .into_par_iter()
                .map(run_iteration)
                .collect::<Result<Vec<_>, _>>()
        } else {
            (0..n).map(run_iteration).collect::<Result<Vec<_>, _>>()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::counter::NucleotideOverlapCounter;
    use crate::sampler::SamplerAnnotatorBuilder;
    use crate::segment::SegmentList;

    fn workspace(size: u64) -> ContigMap {
        let mut ws = ContigMap::new();
        ws.insert(
            "chr1".to_string(),
            SegmentList::from_iter(vec![(0, size)], true).unwrap(),
        );
        ws
    }

    #[test]
    fn empty_workspace_is_rejected() {
        let config = ConfigBuilder::default().n_samples(10).build().unwrap();
        let driver = SimulationDriver::new(&config);
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let counter = NucleotideOverlapCounter;

        let segments = IntervalCollection::new();
        let annotations = IntervalCollection::new();
        let empty_ws = ContigMap::new();

        assert!(matches!(
            driver.run(&segments, &annotations, &empty_ws, &sampler, &counter),
            Err(Error::EmptyWorkspace)
        ));
    }

    #[test]
    fn snp_overlap_mean_approaches_hypergeometric_rate() {
        let ws = workspace(1000);
        let mut segments = IntervalCollection::new();
        segments.insert(
            "segments",
            "chr1",
            SegmentList::from_iter(vec![(0, 1)], true).unwrap(),
        );
        let mut annotations = IntervalCollection::new();
        annotations.insert(
            "annotation",
            "chr1",
            SegmentList::from_iter(vec![(0, 50)], true).unwrap(),
        );

        let config = ConfigBuilder::default()
            .n_samples(2000)
            .seed(123)
            .build()
            .unwrap();
        let sampler = SamplerAnnotatorBuilder::default().build().unwrap();
        let counter = NucleotideOverlapCounter;
        let driver = SimulationDriver::new(&config);

        let results = driver
            .run(&segments, &annotations, &ws, &sampler, &counter)
            .unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(*result.observed(), 1.0);
        assert!((*result.expected() - 0.05).abs() < 0.02);
    }
}
