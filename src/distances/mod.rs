mod euclideandistance;

pub use euclideandistance::{EuclideanDistance, SquaredEuclideanDistance};

use crate::primitive::Primitive;

/// Pluggable distance metric used for every sample-to-centroid comparison.
///
/// Implementations must be total: they sit on the hot path of the assignment
/// scan and are never allowed to panic. Slices of mismatched length yield the
/// maximal representable distance (`T::infinity()`), so a malformed row can
/// never be selected as the nearest centroid.
pub trait DistanceFunction<T: Primitive>: Sync {
    fn distance(&self, a: &[T], b: &[T]) -> T;
}
