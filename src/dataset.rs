use crate::aggregate::AggregationResult;
use crate::primitive::Primitive;

/// Immutable sample storage.
///
/// Samples are kept as a flat row-major buffer instead of any high-level
/// matrix crate: [row-major] = [<sample0>,<sample1>,<sample2>,...]. The set is
/// loaded once per run and only ever read afterwards, so it can be shared
/// freely between all assignment shards.
///
/// ## Fields
/// - **sample_cnt**: Amount of samples contained in the buffer
/// - **sample_dims**: Amount of dimensions each sample has
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet<T: Primitive> {
    data: Vec<T>,
    sample_cnt: usize,
    sample_dims: usize,
}
impl<T: Primitive> SampleSet<T> {
    /// Create a new [`SampleSet`] from an already flattened buffer.
    ///
    /// ## Arguments
    /// - **data**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples contained in the passed **data** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **data** vector has
    pub fn new(data: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Self {
        assert!(data.len() == sample_cnt * sample_dims);
        Self { data, sample_cnt, sample_dims }
    }

    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    pub fn sample_dims(&self) -> usize { self.sample_dims }

    /// Borrow one sample by index.
    pub fn row(&self, idx: usize) -> &[T] {
        &self.data[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }

    /// Iterate over all samples in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.sample_dims)
    }

    pub(crate) fn data(&self) -> &[T] { &self.data }
}

/// Ordered set of exactly K centroids, positionally identified across rounds.
///
/// The convergence check compares the centroid at index i of one round against
/// the centroid computed for index i in the previous round, so the order of
/// rows is part of a centroid's identity. A [`CentroidSet`] is never mutated in
/// place; each round replaces it wholesale, so in-flight assignment tasks
/// always see a consistent snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct CentroidSet<T: Primitive> {
    data: Vec<T>,
    k: usize,
    dims: usize,
}
impl<T: Primitive> CentroidSet<T> {
    /// Create a new [`CentroidSet`] from an already flattened buffer.
    ///
    /// ## Arguments
    /// - **data**: Vector of centroids [row-major] = [<centroid0>,<centroid1>,...]
    /// - **k**: Amount of centroids contained in the passed **data** vector
    /// - **dims**: Amount of dimensions each centroid has
    pub fn new(data: Vec<T>, k: usize, dims: usize) -> Self {
        assert!(k >= 1);
        assert!(data.len() == k * dims);
        Self { data, k, dims }
    }

    pub fn k(&self) -> usize { self.k }
    pub fn dims(&self) -> usize { self.dims }

    /// Borrow one centroid by index.
    pub fn row(&self, idx: usize) -> &[T] {
        &self.data[idx * self.dims..(idx + 1) * self.dims]
    }

    /// Iterate over all centroids in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.dims)
    }

    /// Assemble the next round's set from the aggregation results of the
    /// current round. The results arrive in index order, one per centroid.
    pub(crate) fn from_results(results: &[AggregationResult<T>], dims: usize) -> Self {
        let data = results.iter().flat_map(|r| r.centroid.iter().cloned()).collect();
        Self::new(data, results.len(), dims)
    }
}
