// Copyright 2020 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use structopt::StructOpt;

use crate::config::{ConfigBuilder, RunSpec};
use crate::counter::{Counter, NucleotideOverlapCounter, SegmentOverlapCounter};
use crate::driver::SimulationDriver;
use crate::io;
use crate::sampler::SamplerAnnotatorBuilder;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "gat",
    about = "Monte-Carlo enrichment of genomic interval overlap against a workspace.",
    setting = structopt::clap::AppSettings::ColoredHelp,
)]
pub enum Gat {
    #[structopt(name = "run", about = "Run the enrichment simulation.")]
    Run {
        /// YAML run specification, as an alternative to --segments/--annotations/--workspace.
        #[structopt(long = "config", parse(from_os_str), conflicts_with_all = &["segments", "annotations", "workspace"])]
        config: Option<PathBuf>,

        /// Segment track(s) to test, given as name=path.bed; may be repeated.
        #[structopt(long = "segments", required_unless = "config", number_of_values = 1)]
        segments: Vec<String>,

        /// Annotation track(s) to test against, given as name=path.bed; may be repeated.
        #[structopt(long = "annotations", required_unless = "config", number_of_values = 1)]
        annotations: Vec<String>,

        /// Workspace file (BED3+) defining the universe of sampling.
        #[structopt(long = "workspace", parse(from_os_str), required_unless = "config")]
        workspace: Option<PathBuf>,

        /// Number of Monte-Carlo samples drawn per segment track.
        #[structopt(long = "num-samples", default_value = "1000")]
        num_samples: usize,

        /// Bucket size for the length histogram.
        #[structopt(long = "bucket-size", default_value = "1")]
        bucket_size: u64,

        /// Base RNG seed, for reproducible sampling.
        #[structopt(long = "seed", default_value = "42")]
        seed: u64,

        /// Number of worker threads; 1 runs single-threaded.
        #[structopt(long = "threads", default_value = "1")]
        threads: usize,

        /// Retry budget per length draw before giving up on a placement.
        #[structopt(long = "max-retries", default_value = "1000")]
        max_retries: u32,

        /// Retain per-sample counter values in the output (debugging aid).
        #[structopt(long = "retain-samples")]
        retain_samples: bool,

        /// Use segment-count overlap instead of nucleotide overlap.
        #[structopt(long = "segment-counter")]
        segment_counter: bool,

        /// Output path for the results table (tab-separated).
        #[structopt(long = "output", short = "o", parse(from_os_str))]
        output: PathBuf,
    },
}

pub fn run(opt: Gat) -> Result<()> {
    match opt {
        Gat::Run {
            config,
            segments,
            annotations,
            workspace,
            num_samples,
            bucket_size,
            seed,
            threads,
            max_retries,
            retain_samples,
            segment_counter,
            output,
        } => {
            info!("loading segments, annotations and workspace");

            let (segments, annotations, workspace, num_samples, bucket_size, seed) =
                if let Some(config_path) = config {
                    let spec = RunSpec::from_yaml_file(&config_path)?;
                    let segments = spec
                        .segments()
                        .iter()
                        .map(|(name, path)| format!("{}={}", name, path.display()))
                        .collect::<Vec<_>>();
                    let annotations = spec
                        .annotations()
                        .iter()
                        .map(|(name, path)| format!("{}={}", name, path.display()))
                        .collect::<Vec<_>>();
                    (
                        segments,
                        annotations,
                        spec.workspace().clone(),
                        *spec.n_samples(),
                        *spec.bucket_size(),
                        *spec.seed(),
                    )
                } else {
                    let workspace = workspace
                        .ok_or_else(|| anyhow::anyhow!("--workspace is required without --config"))?;
                    (segments, annotations, workspace, num_samples, bucket_size, seed)
                };

            let segments = io::load_collection(&segments)?;
            let annotations = io::load_collection(&annotations)?;
            let workspace = io::read_bed(&workspace)?;

            let config = ConfigBuilder::default()
                .n_samples(num_samples)
                .bucket_size(bucket_size)
                .seed(seed)
                .threads(threads)
                .max_retries(max_retries)
                .retain_samples(retain_samples)
                .build()?;

            let sampler = SamplerAnnotatorBuilder::default()
                .bucket_size(bucket_size)
                .max_retries(max_retries)
                .build()?;

            let counter: Box<dyn Counter> = if segment_counter {
                Box::new(SegmentOverlapCounter)
            } else {
                Box::new(NucleotideOverlapCounter)
            };

            info!(
                "running {} samples per track across {} segment track(s)",
                config.n_samples(),
                segments.track_names().count()
            );
            let driver = SimulationDriver::new(&config);
            let results = driver.run(&segments, &annotations, &workspace, &sampler, counter.as_ref())?;

            io::write_results_tsv(&output, &results)?;
            info!("wrote results to {}", output.display());
            Ok(())
        }
    }
}
