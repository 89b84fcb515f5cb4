use crate::dataset::{CentroidSet, SampleSet};
use crate::primitive::Primitive;
use rand::prelude::*;

/// Random sample seeding (a.k.a. Forgy).
///
/// ## Description
/// Randomly selects k samples from the set as initial centroids.
/// Use a seeded generator for deterministically repeatable results.
pub fn random_sample<T: Primitive, R: Rng + ?Sized>(samples: &SampleSet<T>, k: usize, rng: &mut R) -> CentroidSet<T> {
    assert!(k >= 1 && k <= samples.sample_cnt());
    let rows: Vec<&[T]> = samples.rows().collect();
    let data = rows
        .choose_multiple(rng, k)
        .flat_map(|row| row.iter().cloned())
        .collect();
    CentroidSet::new(data, k, samples.sample_dims())
}
