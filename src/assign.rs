use crate::dataset::{CentroidSet, SampleSet};
use crate::distances::DistanceFunction;
use crate::primitive::Primitive;
use rayon::prelude::*;

/// Assignment phase of one round: determine the nearest centroid for every
/// sample, fanned out over shards of the sample set.
///
/// The centroid set is small (K in the single digits usually) and is shared
/// read-only with every shard; each shard writes only its own slice of the
/// assignment table, so there is no shared mutable state. The function returns
/// once every sample is assigned, which is the round's first barrier.
pub(crate) fn assign_samples<T, D>(
    samples: &SampleSet<T>,
    centroids: &CentroidSet<T>,
    distance: &D,
    shard_count: usize,
) -> Vec<usize>
where
    T: Primitive,
    D: DistanceFunction<T>,
{
    let mut assignments = vec![0usize; samples.sample_cnt()];
    // manually calculate the shard size, because rayon does not do static
    // scheduling (which is more apropriate here)
    let shard_len = samples.sample_cnt().div_ceil(shard_count.max(1)).max(1);
    samples
        .data()
        .par_chunks(samples.sample_dims())
        .with_min_len(shard_len)
        .zip(assignments.par_iter_mut())
        .for_each(|(sample, slot)| {
            *slot = nearest_centroid(sample, centroids, distance);
        });
    assignments
}

/// Linear scan over all centroids, tracking the minimum distance. Strict `<`
/// keeps the FIRST centroid achieving the minimum, so ties break toward the
/// lowest index.
pub(crate) fn nearest_centroid<T, D>(sample: &[T], centroids: &CentroidSet<T>, distance: &D) -> usize
where
    T: Primitive,
    D: DistanceFunction<T>,
{
    let mut min = T::infinity();
    let mut index = 0;
    for (i, centroid) in centroids.rows().enumerate() {
        let dist = distance.distance(centroid, sample);
        if dist < min {
            min = dist;
            index = i;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EuclideanDistance;

    fn two_centroids() -> CentroidSet<f64> {
        CentroidSet::new(vec![0.0, 0.0, 10.0, 10.0], 2, 2)
    }

    #[test]
    fn assigns_to_nearest() {
        let centroids = two_centroids();
        assert_eq!(nearest_centroid(&[1.0, 1.0], &centroids, &EuclideanDistance), 0);
        assert_eq!(nearest_centroid(&[9.0, 9.0], &centroids, &EuclideanDistance), 1);
    }

    #[test]
    fn ties_break_toward_lowest_index() {
        // Equidistant sample between both centroids
        let centroids = two_centroids();
        assert_eq!(nearest_centroid(&[5.0, 5.0], &centroids, &EuclideanDistance), 0);

        // Identical centroids
        let identical = CentroidSet::new(vec![3.0, 3.0, 3.0, 3.0], 2, 2);
        assert_eq!(nearest_centroid(&[1.0, 1.0], &identical, &EuclideanDistance), 0);
    }

    #[test]
    fn all_sentinel_distances_keep_index_zero() {
        // Malformed sample row: mismatched length yields the maximal distance
        // for every centroid, so the scan never moves off index 0.
        let centroids = two_centroids();
        assert_eq!(nearest_centroid(&[1.0, 1.0, 1.0], &centroids, &EuclideanDistance), 0);
    }

    #[test]
    fn shard_count_does_not_change_assignments() {
        let samples = SampleSet::new(
            (0..200).map(|i| (i % 23) as f64).collect(),
            100,
            2,
        );
        let centroids = CentroidSet::new(vec![0.0, 0.0, 11.0, 11.0, 22.0, 22.0], 3, 2);
        let one = assign_samples(&samples, &centroids, &EuclideanDistance, 1);
        let four = assign_samples(&samples, &centroids, &EuclideanDistance, 4);
        let many = assign_samples(&samples, &centroids, &EuclideanDistance, 64);
        assert_eq!(one, four);
        assert_eq!(one, many);
    }

    #[test]
    fn assignment_is_deterministic() {
        let samples = SampleSet::new(vec![1.0, 1.0, 0.0, 1.0, 9.0, 9.0, 11.0, 10.0], 4, 2);
        let centroids = two_centroids();
        let first = assign_samples(&samples, &centroids, &EuclideanDistance, 2);
        assert_eq!(first, vec![0, 0, 1, 1]);
        for _ in 0..4 {
            assert_eq!(assign_samples(&samples, &centroids, &EuclideanDistance, 2), first);
        }
    }
}
