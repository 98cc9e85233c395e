//! Monte-Carlo evaluation of enrichment or depletion of overlap between a
//! set of segments and a set of annotations, restricted to a workspace.
//!
//! The core is pure in-memory interval arithmetic: [`segment::SegmentList`]
//! for set algebra on half-open integer intervals, [`histogram`] for
//! empirical length sampling, [`sampler::SamplerAnnotator`] for
//! workspace-constrained random placement, and [`driver::SimulationDriver`]
//! to orchestrate repeated sampling into a p-value. File I/O, the CLI and
//! logging setup are adapters around this core; they do not participate in
//! its correctness.

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

pub mod cli;
pub mod config;
pub mod counter;
pub mod driver;
pub mod errors;
pub mod histogram;
pub mod interval_collection;
pub mod io;
pub mod sampler;
pub mod segment;
pub mod stats;

pub use config::{Config, ConfigBuilder, RunSpec};
pub use counter::{Counter, NucleotideOverlapCounter, SegmentOverlapCounter};
pub use driver::{EnrichmentResult, SimulationDriver};
pub use errors::Error;
pub use histogram::{HistogramSampler, LengthHistogram};
pub use interval_collection::{ContigMap, IntervalCollection};
pub use sampler::{SamplerAnnotator, SamplerAnnotatorBuilder};
pub use segment::SegmentList;
