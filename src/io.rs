//! Adapters between the pure in-memory core and the outside world: BED-like
//! interval file readers and a tab-separated result writer. The core itself
//! observes no I/O; everything here is glue.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::driver::EnrichmentResult;
use crate::errors::Error;
use crate::interval_collection::{ContigMap, IntervalCollection};
use crate::segment::SegmentList;

lazy_static! {
    static ref TRACK_SPEC_RE: Regex = Regex::new(r"^([^=]+)=(.+)$").unwrap();
}

fn io_err(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a BED3+ (`contig\tstart\tend[\t...]`) file into a per-contig
/// [`ContigMap`], normalizing each contig's segments. Blank lines, `#`
/// comments and UCSC `track` header lines are skipped.
pub fn read_bed(path: &Path) -> Result<ContigMap, Error> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let reader = BufReader::new(file);

    let mut raw: BTreeMap<String, Vec<(u64, u64)>> = BTreeMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_err(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("track") {
            continue;
        }

        let mut fields = line.split_whitespace();
        let invalid = |msg: &str| Error::InvalidInterval {
            path: path.to_path_buf(),
            line: i + 1,
            msg: msg.to_string(),
        };

        let contig = fields.next().ok_or_else(|| invalid("missing contig column"))?;
        let start: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| invalid("missing or invalid start column"))?;
        let end: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| invalid("missing or invalid end column"))?;

        raw.entry(contig.to_string()).or_insert_with(Vec::new).push((start, end));
    }

    let mut contigs = ContigMap::new();
    for (contig, intervals) in raw {
        let list = SegmentList::from_iter(intervals, true).map_err(|_| Error::InvalidInterval {
            path: path.to_path_buf(),
            line: 0,
            msg: format!("invalid interval on contig {}", contig),
        })?;
        contigs.insert(contig, list);
    }
    Ok(contigs)
}

/// Parse a `name=path` track specification, as used for `--segments` and
/// `--annotations` on the command line.
pub fn parse_track_spec(spec: &str) -> Result<(String, PathBuf), Error> {
    TRACK_SPEC_RE
        .captures(spec)
        .map(|caps| (caps[1].to_string(), PathBuf::from(&caps[2])))
        .ok_or_else(|| Error::InvalidTrackSpec {
            spec: spec.to_string(),
        })
}

/// Load several `name=path` track specifications into one
/// [`IntervalCollection`].
pub fn load_collection(specs: &[String]) -> Result<IntervalCollection, Error> {
    let mut collection = IntervalCollection::new();
    for spec in specs {
        let (name, path) = parse_track_spec(spec)?;
        for (contig, list) in read_bed(&path)? {
            collection.insert(name.clone(), contig, list);
        }
    }
    Ok(collection)
}

/// Write one row per (track, annotation) result as a tab-separated table.
pub fn write_results_tsv(path: &Path, results: &[EnrichmentResult]) -> Result<(), Error> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(csv_err)?;

    writer
        .write_record(&[
            "track",
            "annotation",
            "observed",
            "expected",
            "stddev",
            "pvalue",
            "nsamples",
        ])
        .map_err(csv_err)?;

    for result in results {
        writer
            .write_record(&[
                result.track().clone(),
                result.annotation().clone(),
                result.observed().to_string(),
                result.expected().to_string(),
                result.stddev().to_string(),
                result.pvalue().to_string(),
                result.nsamples().to_string(),
            ])
            .map_err(csv_err)?;
    }

    writer.flush().map_err(|e| io_err(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_track_spec() {
        let (name, path) = parse_track_spec("segments=data/segments.bed").unwrap();
        assert_eq!(name, "segments");
        assert_eq!(path, PathBuf::from("data/segments.bed"));
    }

    #[test]
    fn rejects_malformed_track_spec() {
        assert!(matches!(
            parse_track_spec("segments-data.bed"),
            Err(Error::InvalidTrackSpec { .. })
        ));
    }

    #[test]
    fn reads_and_normalizes_bed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "chr1\t0\t10").unwrap();
        writeln!(file, "chr1\t5\t15").unwrap();
        writeln!(file, "chr2\t100\t200").unwrap();
        file.flush().unwrap();

        let contigs = read_bed(file.path()).unwrap();
        assert_eq!(contigs.get("chr1").unwrap().sum(), 15);
        assert_eq!(contigs.get("chr2").unwrap().sum(), 100);
    }
}
