//! # kcluster - API documentation
//!
//! kcluster is a small rust library for iterative k-means clustering over a
//! partitionable sample set.
//!
//! ## Design target
//! The engine mirrors the classic partition/assign/aggregate/converge loop:
//! per-sample nearest-centroid assignment fans out across independent shards,
//! per-centroid reducers aggregate the groups into updated centroids, and the
//! driver halts once the centroids stabilize or a round budget is exhausted.
//! Samples are given using a raw row-major vector instead of any high-level
//! matrix crate, and both phases of a round are parallelized with rayon while
//! keeping their barrier semantics explicit.
//!
//! ## Input and output
//! Samples and seed centroids arrive as simple delimited text records (one
//! comma-separated sample per line; seed rows split by a second delimiter),
//! and each round's new centroid set is serialized the same way, so a round's
//! output can directly seed a subsequent run.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kcluster::*;
//!
//! fn main() -> kcluster::Result<()> {
//!     let records = "1.0,1.0\n0.0,1.0\n9.0,9.0\n11.0,10.0\n";
//!     let (samples, _skipped) = read_samples::<f64, _>(records.as_bytes(), ParsePolicy::FailFast)?;
//!     let seed = seeds::from_delimited("0.0,0.0\t10.0,10.0", '\t', ',')?;
//!
//!     let driver = ClusterDriver::new(samples, EuclideanDistance);
//!     let outcome = driver.run(seed, &ClusterConfig::default())?;
//!
//!     println!("Centroids: {:?}", outcome.centroids);
//!     println!("Termination: {:?} after {} rounds", outcome.reason, outcome.rounds);
//!     Ok(())
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kcluster::*;
//!
//! fn main() -> kcluster::Result<()> {
//!     let records = "1.0,1.0\n0.0,1.0\n9.0,9.0\n11.0,10.0\n";
//!     let (samples, _) = read_samples::<f64, _>(records.as_bytes(), ParsePolicy::FailFast)?;
//!     let seed = seeds::from_delimited("0.0,0.0\t10.0,10.0", '\t', ',')?;
//!
//!     let conf = ClusterConfig::build()
//!         .max_rounds(10)
//!         .round_done(&|_, round, unchanged|
//!             println!("Round {} - {} centroids unchanged", round, unchanged))
//!         .build();
//!
//!     let driver = ClusterDriver::new(samples, EuclideanDistance);
//!     let outcome = driver.run(seed, &conf)?;
//!     println!("Termination: {:?}", outcome.reason);
//!     Ok(())
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`ClusterDriver`] struct, created over a
//! loaded [`SampleSet`] and a [`DistanceFunction`]. Calling
//! [`ClusterDriver::run`] (or [`ClusterDriver::run_with_sink`] to forward each
//! round's centroid set to a [`RoundSink`]) executes rounds until the
//! unchanged-centroid count reaches the convergence threshold or the round
//! budget runs out, and returns a [`ClusterOutcome`] with the final
//! [`CentroidSet`] and the [`TerminationReason`]. All per-run options live in
//! [`ClusterConfig`], built through its builder.

#[macro_use]
mod helpers;
mod aggregate;
mod api;
mod assign;
mod converge;
mod dataset;
mod distances;
mod engine;
mod error;
mod io;
mod primitive;
pub mod seeds;

pub use aggregate::{AggregationResult, EmptyClusterPolicy};
pub use api::{
    ClusterConfig, ClusterConfigBuilder, ClusterDriver, ClusterOutcome, RoundDoneCallbackFn, SeedDoneCallbackFn,
};
pub use converge::{ConvergenceTracker, TerminationReason};
pub use dataset::{CentroidSet, SampleSet};
pub use distances::{DistanceFunction, EuclideanDistance, SquaredEuclideanDistance};
pub use error::{ClusterError, Result};
pub use io::{read_samples, write_centroids, DelimitedWriterSink, NoopSink, ParsePolicy, RoundSink};
pub use primitive::Primitive;
