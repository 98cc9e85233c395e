use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("operation requires a normalized SegmentList but received an unnormalized one")]
    NotNormalized,
    #[error("invalid segment ({start}, {end}): end must not be smaller than start")]
    InvalidSegment { start: u64, end: u64 },
    #[error("sampler invoked with a workspace of zero total nucleotide mass")]
    EmptyWorkspace,
    #[error(
        "could not place a segment of the required length inside the workspace after {retries} retries"
    )]
    UnsampleableLength { retries: u32 },
    #[error("length histogram has zero total count; cannot build a sampler from it")]
    DegenerateHistogram,
    #[error("malformed interval at {path}:{line}: {msg}")]
    InvalidInterval {
        path: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("track specification must be given as name=path, got {spec}")]
    InvalidTrackSpec { spec: String },
    #[error("error reading/writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing delimited records in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid hypergeometric distribution parameters: {source}")]
    Stats {
        #[source]
        source: statrs::StatsError,
    },
}
