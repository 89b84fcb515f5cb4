use crate::dataset::{CentroidSet, SampleSet};
use crate::error::{ClusterError, Result};
use crate::primitive::Primitive;
use log::warn;
use std::io::{BufRead, Write};

/// Policy for malformed sample records during loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort the load on the first malformed record.
    #[default]
    FailFast,
    /// Skip malformed records, counting how many were dropped.
    SkipAndCount,
}

/// Parse one delimited record into a row of components.
///
/// **lineno** is 1-based and only used for error reporting. When **expected**
/// is set, the field count is validated against it. Seed files written by
/// older tools carry a trailing delimiter; trailing delimiters are tolerated.
pub(crate) fn parse_record<T: Primitive>(line: &str, lineno: usize, field_delim: char, expected: Option<usize>) -> Result<Vec<T>> {
    let line = line.trim().trim_end_matches(field_delim);
    let mut row = Vec::with_capacity(expected.unwrap_or(2));
    for token in line.split(field_delim) {
        let token = token.trim();
        let value = token
            .parse::<f64>()
            .ok()
            .and_then(T::from)
            .ok_or_else(|| ClusterError::Parse { line: lineno, token: token.to_string() })?;
        row.push(value);
    }
    if let Some(expected) = expected {
        if row.len() != expected {
            return Err(ClusterError::DimensionMismatch { line: lineno, expected, actual: row.len() });
        }
    }
    Ok(row)
}

/// Load a sample set from a record stream: one sample per line, components
/// comma-separated. The first record fixes the run's dimensionality D; every
/// later record must match it.
///
/// ## Returns
/// The loaded [`SampleSet`] and the amount of records that were skipped
/// (always 0 under [`ParsePolicy::FailFast`]).
pub fn read_samples<T: Primitive, R: BufRead>(reader: R, policy: ParsePolicy) -> Result<(SampleSet<T>, usize)> {
    let mut data: Vec<T> = Vec::new();
    let mut dims: Option<usize> = None;
    let mut sample_cnt = 0usize;
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record::<T>(&line, idx + 1, ',', dims) {
            Ok(row) => {
                dims.get_or_insert(row.len());
                data.extend_from_slice(&row);
                sample_cnt += 1;
            }
            Err(err @ (ClusterError::Parse { .. } | ClusterError::DimensionMismatch { .. })) => match policy {
                ParsePolicy::FailFast => return Err(err),
                ParsePolicy::SkipAndCount => {
                    warn!("skipping malformed sample: {err}");
                    skipped += 1;
                }
            },
            Err(err) => return Err(err),
        }
    }

    let dims = dims.unwrap_or(0);
    Ok((SampleSet::new(data, sample_cnt, dims), skipped))
}

/// Serialize a centroid set the same way samples are read: comma-separated
/// components, one centroid per line. Re-parsing the output yields a
/// componentwise-equal set, so each round's output can seed the next.
pub fn write_centroids<T: Primitive, W: Write>(writer: &mut W, centroids: &CentroidSet<T>) -> Result<()> {
    for row in centroids.rows() {
        let mut first = true;
        for v in row {
            if !first {
                write!(writer, ",")?;
            }
            write!(writer, "{v}")?;
            first = false;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Per-round output collaborator. The engine publishes every round's new
/// centroid set here before deciding whether to iterate again.
pub trait RoundSink<T: Primitive> {
    fn publish(&mut self, round: usize, centroids: &CentroidSet<T>) -> Result<()>;
}

/// Sink that serializes each published set via [`write_centroids`].
pub struct DelimitedWriterSink<W: Write> {
    writer: W,
}
impl<W: Write> DelimitedWriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
    pub fn into_inner(self) -> W {
        self.writer
    }
}
impl<T: Primitive, W: Write> RoundSink<T> for DelimitedWriterSink<W> {
    fn publish(&mut self, _round: usize, centroids: &CentroidSet<T>) -> Result<()> {
        write_centroids(&mut self.writer, centroids)
    }
}

/// Sink for runs that do not forward per-round output anywhere.
pub struct NoopSink;
impl<T: Primitive> RoundSink<T> for NoopSink {
    fn publish(&mut self, _round: usize, _centroids: &CentroidSet<T>) -> Result<()> {
        Ok(())
    }
}
