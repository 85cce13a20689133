use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul};

/// Element types the kernels can compute with.
///
/// The trait pins down exactly what the tiled kernels and the reduction
/// engine need from a number: copyable value semantics, the additive
/// identity (the guarded-read fill value and every reduction seed), and
/// the handful of arithmetic operations the accumulation loops perform.
pub trait Scalar:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    /// The additive identity of the type.
    const ZERO: Self;
    /// The multiplicative identity of the type.
    const ONE: Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Square root (used by the Euclidean-norm routine).
    fn sqrt(self) -> Self;
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn abs(self) -> Self {
        f32::abs(self)
    }

    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}
