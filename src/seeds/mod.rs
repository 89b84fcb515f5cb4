//! Centroid seeding strategies.
//!
//! A run starts from a seed [`CentroidSet`](crate::CentroidSet): either parsed
//! from an external seed blob ([`from_delimited`]) or drawn from the sample
//! set itself ([`random_sample`]).

mod delimited;
mod randomsample;

pub use delimited::from_delimited;
pub use randomsample::random_sample;
