use crate::primitive::Primitive;
use crate::DistanceFunction;

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))`, the engine's default metric.
pub struct EuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for EuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        SquaredEuclideanDistance.distance(a, b).sqrt()
    }
}

/// Squared Euclidean distance. Argmin-equivalent to [`EuclideanDistance`] but
/// skips the square root, which is all the nearest-centroid scan needs.
pub struct SquaredEuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for SquaredEuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        if a.len() != b.len() {
            return T::infinity();
        }
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| x - y)
            .map(|v| v * v)
            .sum()
    }
}
