use crate::dataset::CentroidSet;
use crate::error::{ClusterError, Result};
use crate::io::parse_record;
use crate::primitive::Primitive;

/// Parse a seed blob into a [`CentroidSet`].
///
/// ## Description
/// Rows are separated by **row_delim**, components within a row by
/// **field_delim**; the `"c1_1,c1_2\tc2_1,c2_2"` shape of external seed
/// collaborators. Every row must carry the same amount of components, which
/// fixes K and D for the run.
pub fn from_delimited<T: Primitive>(blob: &str, row_delim: char, field_delim: char) -> Result<CentroidSet<T>> {
    let mut data: Vec<T> = Vec::new();
    let mut dims: Option<usize> = None;
    let mut k = 0usize;

    for (idx, row) in blob.split(row_delim).enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let parsed = parse_record::<T>(row, idx + 1, field_delim, dims)?;
        dims.get_or_insert(parsed.len());
        data.extend_from_slice(&parsed);
        k += 1;
    }

    match dims {
        Some(dims) => Ok(CentroidSet::new(data, k, dims)),
        None => Err(ClusterError::EmptySeed),
    }
}
