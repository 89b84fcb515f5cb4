use crate::aggregate::EmptyClusterPolicy;
use crate::converge::TerminationReason;
use crate::dataset::{CentroidSet, SampleSet};
use crate::distances::{DistanceFunction, EuclideanDistance};
use crate::error::Result;
use crate::io::{NoopSink, RoundSink};
use crate::primitive::Primitive;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub type SeedDoneCallbackFn<'a, T> = &'a dyn Fn(&CentroidSet<T>);
pub type RoundDoneCallbackFn<'a, T> = &'a dyn Fn(&CentroidSet<T>, usize, usize);

/// This is a structure holding the configuration options of a clustering run,
/// such as the round budget, the convergence epsilon, or a couple of callbacks
/// that can be set to get status information from a running calculation.
///
/// For more detailed information about all possible options, have a look at
/// [`ClusterConfigBuilder`].
pub struct ClusterConfig<'a, T: Primitive> {
    /// Comparison tolerance of the per-centroid unchanged check
    pub(crate) epsilon: T,
    /// Maximum amount of rounds before the run stops with [`TerminationReason::BudgetExhausted`]
    pub(crate) max_rounds: usize,
    /// Amount of shards the sample set is partitioned into for the assignment phase
    pub(crate) shard_count: usize,
    /// Amount of unchanged centroids that counts as convergence (`None` = all K)
    pub(crate) convergence_threshold: Option<usize>,
    /// Policy for centroids that attracted zero samples in a round
    pub(crate) empty_cluster_policy: EmptyClusterPolicy,
    /// Cooperative cancellation flag, checked between rounds
    pub(crate) cancel: Arc<AtomicBool>,
    /// Callback that is called once the seed centroid set is accepted
    /// ## Arguments
    /// - **seed**: The seed [`CentroidSet`] the run starts from
    pub(crate) seed_done: SeedDoneCallbackFn<'a, T>,
    /// Callback that is called after each round
    /// ## Arguments
    /// - **centroids**: The round's newly computed [`CentroidSet`]
    /// - **round**: Number of the finished round (starting at 0)
    /// - **unchanged**: Amount of centroids that were unchanged this round
    pub(crate) round_done: RoundDoneCallbackFn<'a, T>,
}
impl<'a, T: Primitive> Default for ClusterConfig<'a, T> {
    fn default() -> Self {
        Self {
            epsilon: T::from(1e-11).unwrap(),
            max_rounds: 5,
            shard_count: rayon::current_num_threads(),
            convergence_threshold: None,
            empty_cluster_policy: EmptyClusterPolicy::default(),
            cancel: Arc::new(AtomicBool::new(false)),
            seed_done: &|_| {},
            round_done: &|_, _, _| {},
        }
    }
}
impl<'a, T: Primitive> ClusterConfig<'a, T> {
    /// Use the [`ClusterConfigBuilder`] to build a [`ClusterConfig`] instance.
    pub fn build() -> ClusterConfigBuilder<'a, T> {
        ClusterConfigBuilder { config: ClusterConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for ClusterConfig<'a, T> {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
}

pub struct ClusterConfigBuilder<'a, T: Primitive> {
    config: ClusterConfig<'a, T>,
}
impl<'a, T: Primitive> ClusterConfigBuilder<'a, T> {
    /// Set the tolerance of the unchanged check: a centroid counts as
    /// unchanged iff every dimension differs from its prior value by at most
    /// **epsilon**.
    /// ## Default
    /// `1e-11`
    pub fn epsilon(mut self, epsilon: T) -> Self {
        self.config.epsilon = epsilon; self
    }
    /// Set the round budget. When the budget runs out without convergence, the
    /// run terminates normally with [`TerminationReason::BudgetExhausted`] and
    /// the last computed centroid set.
    /// ## Default
    /// `5`
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = max_rounds; self
    }
    /// Set the amount of shards the sample set is partitioned into for the
    /// assignment phase. This is a concurrency-tuning parameter, independent
    /// of K; it never changes the computed result.
    /// ## Default
    /// `rayon::current_num_threads()`
    pub fn shard_count(mut self, shard_count: usize) -> Self {
        self.config.shard_count = shard_count; self
    }
    /// Set the amount of unchanged centroids that counts as convergence.
    /// ## Default
    /// All K centroids must be unchanged.
    pub fn convergence_threshold(mut self, threshold: usize) -> Self {
        self.config.convergence_threshold = Some(threshold); self
    }
    /// Set the policy for centroids that attracted zero samples in a round.
    /// ## Default
    /// [`EmptyClusterPolicy::FailFast`]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Set the cooperative cancellation flag. The driver checks it at the top
    /// of every round; in-flight shard and reducer tasks of a started round
    /// always finish, so a cancelled run never carries a partially-updated
    /// centroid set.
    pub fn cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.config.cancel = cancel; self
    }
    /// Set the callback that should be called once the seed centroid set is
    /// accepted, before the first round starts.
    pub fn seed_done(mut self, seed_done: SeedDoneCallbackFn<'a, T>) -> Self {
        self.config.seed_done = seed_done; self
    }
    /// Set the callback that should be called after each round of a running
    /// calculation.
    pub fn round_done(mut self, round_done: RoundDoneCallbackFn<'a, T>) -> Self {
        self.config.round_done = round_done; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> ClusterConfig<'a, T> { self.config }
}

/// Final result of a run, as returned by the API.
///
/// ## Fields
/// - **centroids**: The last computed [`CentroidSet`]
/// - **rounds**: Amount of rounds that were executed
/// - **unchanged**: Unchanged-centroid count of the last executed round
/// - **reason**: Why the run stopped
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterOutcome<T: Primitive> {
    pub centroids: CentroidSet<T>,
    pub rounds: usize,
    pub unchanged: usize,
    pub reason: TerminationReason,
}

/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the sample set to operate on and
/// the distance function to compare with. Calling [`ClusterDriver::run`] does
/// not mutate the driver, so multiple runs (e.g. from differing seeds) can be
/// done against the same loaded sample set.
pub struct ClusterDriver<T: Primitive, D: DistanceFunction<T> = EuclideanDistance> {
    samples: SampleSet<T>,
    distance: D,
}
impl<T: Primitive, D: DistanceFunction<T>> ClusterDriver<T, D> {
    /// Create a new instance of the [`ClusterDriver`] structure.
    ///
    /// ## Arguments
    /// - **samples**: The loaded, immutable [`SampleSet`] of the run
    /// - **distance**: [`DistanceFunction`] used for every sample-to-centroid comparison
    pub fn new(samples: SampleSet<T>, distance: D) -> Self {
        Self { samples, distance }
    }

    pub fn samples(&self) -> &SampleSet<T> { &self.samples }
    pub(crate) fn distance(&self) -> &D { &self.distance }

    /// Run rounds of assignment and aggregation until the centroids stabilize
    /// or the round budget is exhausted.
    ///
    /// ## Arguments
    /// - **seed**: Initial [`CentroidSet`] (K and D of the run are fixed by it)
    /// - **config**: [`ClusterConfig`] instance, containing the run's configuration options
    ///
    /// ## Returns
    /// Instance of [`ClusterOutcome`], containing the final centroid set and
    /// the termination reason.
    pub fn run<'a>(&self, seed: CentroidSet<T>, config: &ClusterConfig<'a, T>) -> Result<ClusterOutcome<T>> {
        self.run_with_sink(seed, config, &mut NoopSink)
    }

    /// Same as [`ClusterDriver::run`], but additionally publishes each round's
    /// new centroid set to **sink** before the continue/stop decision.
    pub fn run_with_sink<'a>(
        &self,
        seed: CentroidSet<T>,
        config: &ClusterConfig<'a, T>,
        sink: &mut dyn RoundSink<T>,
    ) -> Result<ClusterOutcome<T>> {
        crate::engine::run_rounds(self, seed, config, sink)
    }
}
