use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Error taxonomy of a clustering run.
///
/// Per-record errors ([`ClusterError::Parse`], [`ClusterError::DimensionMismatch`]) abort the
/// load by default; see [`ParsePolicy`](crate::ParsePolicy) for the skip-and-count alternative.
/// [`ClusterError::EmptyCluster`] aborts the round and the run unless the
/// retain-previous-centroid fallback is configured. Nothing is retried automatically.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A numeric field of a sample or centroid record failed to parse.
    #[error("record {line}: invalid numeric field `{token}`")]
    Parse { line: usize, token: String },

    /// A record's field count disagrees with the run's fixed dimensionality.
    #[error("record {line}: expected {expected} fields, got {actual}")]
    DimensionMismatch { line: usize, expected: usize, actual: usize },

    /// Seed centroids and samples disagree on dimensionality.
    #[error("seed dimensionality {seed} does not match sample dimensionality {samples}")]
    SeedMismatch { seed: usize, samples: usize },

    /// The seed blob contained no centroids.
    #[error("seed contains no centroids")]
    EmptySeed,

    /// A centroid attracted no samples in a round while the fail-fast
    /// empty-cluster policy was active.
    #[error("centroid {index} attracted no samples in round {round}")]
    EmptyCluster { index: usize, round: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
