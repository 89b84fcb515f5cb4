use crate::dataset::{CentroidSet, SampleSet};
use crate::error::{ClusterError, Result};
use crate::primitive::Primitive;
use rayon::prelude::*;

/// Policy for centroids that attracted zero samples in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Abort the round and the whole run with [`ClusterError::EmptyCluster`].
    #[default]
    FailFast,
    /// The centroid keeps its previous value. The retained value trivially
    /// equals the prior one, so it carries `unchanged = true`.
    RetainPrevious,
}

/// Result of reducing one centroid's sample group.
///
/// ## Fields
/// - **index**: The centroid index this group belongs to
/// - **centroid**: Componentwise mean of all samples assigned to **index**
/// - **count**: Amount of samples that contributed to the mean
/// - **unchanged**: Whether the new mean equals the prior centroid within epsilon
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationResult<T: Primitive> {
    pub index: usize,
    pub centroid: Vec<T>,
    pub count: usize,
    pub unchanged: bool,
}

/// Aggregation phase of one round: one reducer task per centroid index, each
/// observing the complete assignment table.
///
/// Correctness requires the full membership of a group before its mean is
/// computed, so this phase only starts after the assignment barrier; no
/// partial or streaming mean ever reaches the convergence check. Reducer
/// tasks for different indices are independent and run concurrently. The
/// returned vector is ordered by centroid index and covers every index in
/// `0..K`.
pub(crate) fn aggregate<T: Primitive>(
    samples: &SampleSet<T>,
    assignments: &[usize],
    prior: &CentroidSet<T>,
    epsilon: T,
    policy: EmptyClusterPolicy,
    round: usize,
) -> Result<Vec<AggregationResult<T>>> {
    (0..prior.k())
        .into_par_iter()
        .map(|index| reduce_group(samples, assignments, prior, index, epsilon, policy, round))
        .collect()
}

fn reduce_group<T: Primitive>(
    samples: &SampleSet<T>,
    assignments: &[usize],
    prior: &CentroidSet<T>,
    index: usize,
    epsilon: T,
    policy: EmptyClusterPolicy,
    round: usize,
) -> Result<AggregationResult<T>> {
    let mut sum = vec![T::zero(); samples.sample_dims()];
    let mut count = 0usize;
    for (row, &assignment) in samples.rows().zip(assignments.iter()) {
        if assignment == index {
            sum.iter_mut().zip(row.iter()).for_each(|(acc, &v)| *acc += v);
            count += 1;
        }
    }

    if count == 0 {
        return match policy {
            EmptyClusterPolicy::FailFast => Err(ClusterError::EmptyCluster { index, round }),
            EmptyClusterPolicy::RetainPrevious => Ok(AggregationResult {
                index,
                centroid: prior.row(index).to_vec(),
                count: 0,
                unchanged: true,
            }),
        };
    }

    let count_t = T::from(count).unwrap();
    sum.iter_mut().for_each(|v| *v = *v / count_t);
    let unchanged = sum
        .iter()
        .zip(prior.row(index).iter())
        .all(|(&new, &old)| (old - new).abs() <= epsilon);
    Ok(AggregationResult { index, centroid: sum, count, unchanged })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-11;

    fn prior() -> CentroidSet<f64> {
        CentroidSet::new(vec![0.0, 0.0, 10.0, 10.0], 2, 2)
    }

    #[test]
    fn computes_componentwise_mean() {
        let samples = SampleSet::new(vec![1.0, 1.0, 0.0, 1.0, 9.0, 9.0, 11.0, 10.0], 4, 2);
        let assignments = vec![0, 0, 1, 1];
        let results = aggregate(&samples, &assignments, &prior(), EPSILON, EmptyClusterPolicy::FailFast, 0).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 0);
        assert_eq!(results[0].count, 2);
        assert_approx_eq!(results[0].centroid[0], 0.5);
        assert_approx_eq!(results[0].centroid[1], 1.0);
        assert_eq!(results[1].count, 2);
        assert_approx_eq!(results[1].centroid[0], 10.0);
        assert_approx_eq!(results[1].centroid[1], 9.5);
        assert!(!results[0].unchanged);
        assert!(!results[1].unchanged);
    }

    #[test]
    fn unchanged_flag_honors_epsilon() {
        // Group mean exactly equals the prior centroid
        let samples = SampleSet::new(vec![-1.0, 0.0, 1.0, 0.0, 10.0, 10.0], 3, 2);
        let assignments = vec![0, 0, 1];
        let results = aggregate(&samples, &assignments, &prior(), EPSILON, EmptyClusterPolicy::FailFast, 0).unwrap();
        assert!(results[0].unchanged);
        assert!(results[1].unchanged);

        // Perturb one dimension of one group by more than epsilon
        let samples = SampleSet::new(vec![-1.0, 0.0, 1.0, 1e-9, 10.0, 10.0], 3, 2);
        let results = aggregate(&samples, &assignments, &prior(), EPSILON, EmptyClusterPolicy::FailFast, 0).unwrap();
        assert!(!results[0].unchanged);
        assert!(results[1].unchanged);
    }

    #[test]
    fn empty_group_fails_fast_by_default() {
        let samples = SampleSet::new(vec![1.0, 1.0, 2.0, 2.0], 2, 2);
        let assignments = vec![0, 0];
        let err = aggregate(&samples, &assignments, &prior(), EPSILON, EmptyClusterPolicy::FailFast, 3).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyCluster { index: 1, round: 3 }));
    }

    #[test]
    fn empty_group_can_retain_previous_centroid() {
        let samples = SampleSet::new(vec![1.0, 1.0, 2.0, 2.0], 2, 2);
        let assignments = vec![0, 0];
        let results =
            aggregate(&samples, &assignments, &prior(), EPSILON, EmptyClusterPolicy::RetainPrevious, 0).unwrap();
        assert_eq!(results[1].centroid, vec![10.0, 10.0]);
        assert_eq!(results[1].count, 0);
        assert!(results[1].unchanged);
    }
}
