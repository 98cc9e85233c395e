//! Explicit, caller-owned run configuration. There is no global mutable
//! options object; every entry point takes a [`Config`] by reference.

#[derive(Builder, Getters, Clone, Debug)]
#[builder(pattern = "owned")]
#[get = "pub"]
pub struct Config {
    /// Number of Monte-Carlo samples drawn per segment track.
    #[builder(default = "1000")]
    n_samples: usize,
    /// Bucket size for the length histogram built from each track.
    #[builder(default = "1")]
    bucket_size: u64,
    /// Base RNG seed; combined with track/iteration indices for
    /// reproducible, independently-seeded draws.
    #[builder(default = "42")]
    seed: u64,
    /// Worker threads used to parallelize sampling iterations. `1` runs
    /// single-threaded.
    #[builder(default = "1")]
    threads: usize,
    /// Retain the per-sample counter values in each result (debugging aid;
    /// increases memory use proportionally to `n_samples`).
    #[builder(default = "false")]
    retain_samples: bool,
    /// Retry budget per length draw in the sampler before surfacing
    /// `UnsampleableLength`.
    #[builder(default = "1000")]
    max_retries: u32,
}

/// A run description loadable from a YAML file via `gat run --config`, as
/// an alternative to repeating `--segments`/`--annotations` flags on the
/// command line. Mirrors the way `grammar::Scenario` is deserialized from a
/// YAML scenario file.
#[derive(Deserialize, Getters, Clone, Debug)]
#[get = "pub"]
pub struct RunSpec {
    /// Segment tracks, `name -> BED3+ path`.
    segments: std::collections::BTreeMap<String, std::path::PathBuf>,
    /// Annotation tracks, `name -> BED3+ path`.
    annotations: std::collections::BTreeMap<String, std::path::PathBuf>,
    /// Workspace file (BED3+).
    workspace: std::path::PathBuf,
    #[serde(default = "RunSpec::default_n_samples")]
    n_samples: usize,
    #[serde(default = "RunSpec::default_bucket_size")]
    bucket_size: u64,
    #[serde(default = "RunSpec::default_seed")]
    seed: u64,
}

impl RunSpec {
    fn default_n_samples() -> usize {
        1000
    }

    fn default_bucket_size() -> u64 {
        1
    }

    fn default_seed() -> u64 {
        42
    }

    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self, crate::errors::Error> {
        let file = std::fs::File::open(path).map_err(|source| crate::errors::Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(file).map_err(|source| crate::errors::Error::InvalidInterval {
            path: path.to_path_buf(),
            line: 0,
            msg: format!("malformed run spec: {}", source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ConfigBuilder::default().build().unwrap();
        assert_eq!(*config.n_samples(), 1000);
        assert_eq!(*config.bucket_size(), 1);
        assert_eq!(*config.max_retries(), 1000);
        assert!(!*config.retain_samples());
    }

    #[test]
    fn run_spec_parses_minimal_yaml() {
        let yaml = "segments:\n  foo: foo.bed\nannotations:\n  bar: bar.bed\nworkspace: ws.bed\n";
        let spec: RunSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.n_samples(), &1000);
        assert_eq!(spec.segments().get("foo").unwrap().to_str().unwrap(), "foo.bed");
    }
}
