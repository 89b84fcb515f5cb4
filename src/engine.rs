use crate::aggregate;
use crate::assign;
use crate::converge::{ConvergenceTracker, TerminationReason};
use crate::dataset::CentroidSet;
use crate::distances::DistanceFunction;
use crate::error::{ClusterError, Result};
use crate::io::RoundSink;
use crate::primitive::Primitive;
use crate::{ClusterConfig, ClusterDriver, ClusterOutcome};
use log::{debug, info};
use std::sync::atomic::Ordering;

/// Round-scoped driver state. Only the centroid set survives a round; the
/// assignment table and the aggregation results are discarded once the next
/// set is published.
struct RoundState<T: Primitive> {
    centroids: CentroidSet<T>,
    round: usize,
    unchanged: usize,
}

/// The driver's round loop: `Seeding -> Running(r) -> {Running(r+1) |
/// Converged | BudgetExhausted | Cancelled}`.
///
/// Each round runs two strictly ordered phases. The assignment fan-out must
/// fully materialize before any group mean is computed, and all reducer tasks
/// must finish before the round is evaluated and the next centroid set is
/// published. Any error aborts the round and the run; there are no partial
/// rounds and no retries.
pub(crate) fn run_rounds<T, D>(
    driver: &ClusterDriver<T, D>,
    seed: CentroidSet<T>,
    config: &ClusterConfig<'_, T>,
    sink: &mut dyn RoundSink<T>,
) -> Result<ClusterOutcome<T>>
where
    T: Primitive,
    D: DistanceFunction<T>,
{
    let samples = driver.samples();
    if seed.dims() != samples.sample_dims() {
        return Err(ClusterError::SeedMismatch { seed: seed.dims(), samples: samples.sample_dims() });
    }

    let k = seed.k();
    let mut state = RoundState { centroids: seed, round: 0, unchanged: 0 };
    (config.seed_done)(&state.centroids);

    while state.round < config.max_rounds {
        if config.cancel.load(Ordering::Relaxed) {
            info!("run cancelled before round {}", state.round);
            return Ok(outcome(state, TerminationReason::Cancelled));
        }

        // Phase 1: sharded nearest-centroid assignment (barrier)
        let assignments = assign::assign_samples(samples, &state.centroids, driver.distance(), config.shard_count);

        // Phase 2: per-centroid reduction over the complete groups (barrier)
        let results = aggregate::aggregate(
            samples,
            &assignments,
            &state.centroids,
            config.epsilon,
            config.empty_cluster_policy,
            state.round,
        )?;

        let mut tracker = ConvergenceTracker::new(k, config.convergence_threshold);
        results.iter().for_each(|r| tracker.record(r.unchanged));
        let next = CentroidSet::from_results(&results, samples.sample_dims());
        sink.publish(state.round, &next)?;
        debug!("round {}: {}/{} centroids unchanged", state.round, tracker.unchanged(), k);

        state = RoundState { centroids: next, round: state.round + 1, unchanged: tracker.unchanged() };
        (config.round_done)(&state.centroids, state.round - 1, state.unchanged);

        if tracker.converged() {
            info!("converged after {} rounds", state.round);
            return Ok(outcome(state, TerminationReason::Converged));
        }
    }

    info!("round budget of {} exhausted without convergence", config.max_rounds);
    Ok(outcome(state, TerminationReason::BudgetExhausted))
}

fn outcome<T: Primitive>(state: RoundState<T>, reason: TerminationReason) -> ClusterOutcome<T> {
    ClusterOutcome { centroids: state.centroids, rounds: state.round, unchanged: state.unchanged, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::EmptyClusterPolicy;
    use crate::dataset::SampleSet;
    use crate::io::{read_samples, DelimitedWriterSink, ParsePolicy};
    use crate::{seeds, EuclideanDistance};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn two_blob_driver() -> ClusterDriver<f64> {
        let samples = SampleSet::new(vec![1.0, 1.0, 0.0, 1.0, 9.0, 9.0, 11.0, 10.0], 4, 2);
        ClusterDriver::new(samples, EuclideanDistance)
    }

    fn two_blob_seed() -> CentroidSet<f64> {
        CentroidSet::new(vec![0.0, 0.0, 10.0, 10.0], 2, 2)
    }

    #[test]
    fn two_blobs_converge() {
        let driver = two_blob_driver();
        let outcome = driver.run(two_blob_seed(), &ClusterConfig::default()).unwrap();

        // Round 0 moves the centroids onto the group means, round 1 confirms them
        assert_eq!(outcome.reason, TerminationReason::Converged);
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.unchanged, 2);
        assert_approx_eq!(outcome.centroids.row(0)[0], 0.5);
        assert_approx_eq!(outcome.centroids.row(0)[1], 1.0);
        assert_approx_eq!(outcome.centroids.row(1)[0], 10.0);
        assert_approx_eq!(outcome.centroids.row(1)[1], 9.5);
    }

    #[test]
    fn never_exceeds_the_round_budget() {
        let driver = two_blob_driver();
        let config = ClusterConfig::build().max_rounds(1).build();
        let outcome = driver.run(two_blob_seed(), &config).unwrap();

        assert_eq!(outcome.reason, TerminationReason::BudgetExhausted);
        assert_eq!(outcome.rounds, 1);
        assert_approx_eq!(outcome.centroids.row(0)[0], 0.5);
    }

    #[test]
    fn convergence_threshold_is_configurable() {
        // Centroid 0 already sits on its group's mean; centroid 1 does not
        let samples = SampleSet::new(vec![0.0, 0.0, 2.0, 0.0, 9.0, 0.0], 3, 2);
        let driver = ClusterDriver::new(samples, EuclideanDistance);
        let seed = CentroidSet::new(vec![1.0, 0.0, 8.0, 0.0], 2, 2);

        let config = ClusterConfig::build().convergence_threshold(1).build();
        let outcome = driver.run(seed, &config).unwrap();
        assert_eq!(outcome.reason, TerminationReason::Converged);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.unchanged, 1);
    }

    #[test]
    fn empty_cluster_aborts_the_run_by_default() {
        let samples = SampleSet::new(vec![0.0, 0.0, 1.0, 1.0], 2, 2);
        let driver = ClusterDriver::new(samples, EuclideanDistance);
        let seed = CentroidSet::new(vec![0.0, 0.0, 100.0, 100.0], 2, 2);

        let err = driver.run(seed, &ClusterConfig::default()).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyCluster { index: 1, round: 0 }));
    }

    #[test]
    fn empty_cluster_fallback_retains_the_centroid() {
        let samples = SampleSet::new(vec![0.0f64, 0.0, 1.0, 1.0], 2, 2);
        let driver = ClusterDriver::new(samples, EuclideanDistance);
        let seed = CentroidSet::new(vec![0.0, 0.0, 100.0, 100.0], 2, 2);

        let config = ClusterConfig::build()
            .empty_cluster_policy(EmptyClusterPolicy::RetainPrevious)
            .build();
        let outcome = driver.run(seed, &config).unwrap();
        assert_eq!(outcome.reason, TerminationReason::Converged);
        assert_eq!(outcome.centroids.row(1), &[100.0, 100.0]);
        assert_approx_eq!(outcome.centroids.row(0)[0], 0.5);
    }

    #[test]
    fn cancel_flag_stops_between_rounds() {
        let driver = two_blob_driver();
        let cancel = Arc::new(AtomicBool::new(true));
        let config = ClusterConfig::build().cancel_flag(cancel).build();

        let outcome = driver.run(two_blob_seed(), &config).unwrap();
        assert_eq!(outcome.reason, TerminationReason::Cancelled);
        assert_eq!(outcome.rounds, 0);
        // A cancelled run still carries a consistent centroid set: the seed
        assert_eq!(outcome.centroids, two_blob_seed());
    }

    #[test]
    fn seed_dimensionality_must_match_samples() {
        let driver = two_blob_driver();
        let seed = CentroidSet::new(vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0], 2, 3);
        let err = driver.run(seed, &ClusterConfig::default()).unwrap_err();
        assert!(matches!(err, ClusterError::SeedMismatch { seed: 3, samples: 2 }));
    }

    #[test]
    fn callbacks_observe_every_round() {
        use std::cell::RefCell;
        let driver = two_blob_driver();
        let rounds: RefCell<Vec<(usize, usize)>> = RefCell::new(Vec::new());
        let seed_seen = RefCell::new(false);

        let seed_done = |seed: &CentroidSet<f64>| { *seed_seen.borrow_mut() = seed.k() == 2; };
        let round_done =
            |_: &CentroidSet<f64>, round: usize, unchanged: usize| rounds.borrow_mut().push((round, unchanged));
        let config = ClusterConfig::build().seed_done(&seed_done).round_done(&round_done).build();
        driver.run(two_blob_seed(), &config).unwrap();

        assert!(*seed_seen.borrow());
        assert_eq!(*rounds.borrow(), vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn published_rounds_seed_the_next_run() {
        // End-to-end through the delimited collaborators: load samples from a
        // record stream, run one round, feed the published output back in as
        // the next seed.
        let records = "1.0,1.0\n0.0,1.0\n9.0,9.0\n11.0,10.0\n";
        let (samples, skipped) = read_samples::<f64, _>(records.as_bytes(), ParsePolicy::FailFast).unwrap();
        assert_eq!(skipped, 0);
        let driver = ClusterDriver::new(samples, EuclideanDistance);

        let mut sink = DelimitedWriterSink::new(Vec::new());
        let seed = seeds::from_delimited::<f64>("0.0,0.0\t10.0,10.0", '\t', ',').unwrap();
        let config = ClusterConfig::build().max_rounds(1).build();
        let first = driver.run_with_sink(seed, &config, &mut sink).unwrap();

        let published = String::from_utf8(sink.into_inner()).unwrap();
        let reseed = seeds::from_delimited::<f64>(&published, '\n', ',').unwrap();
        assert_eq!(reseed, first.centroids);

        let second = driver.run(reseed, &ClusterConfig::default()).unwrap();
        assert_eq!(second.reason, TerminationReason::Converged);
        assert_eq!(second.rounds, 1);
        assert_eq!(second.centroids, first.centroids);
    }
}
