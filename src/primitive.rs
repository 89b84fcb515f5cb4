use num::{Float, NumCast, Zero};
use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::AddAssign,
};

/// Trait describing the requirements for the underlying primitive type, used
/// for samples, centroids and distances alike. The engine is generic over this
/// trait, so the precision of a whole run is chosen by the type of the data
/// that is loaded into it.
pub trait Primitive:
    Float + Zero + NumCast + AddAssign + Sum + PartialOrd + Copy + Default + Display + Debug + Send + Sync + 'static
{
}
impl Primitive for f32 {}
impl Primitive for f64 {}
