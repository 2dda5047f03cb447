//! Fixed-dimension numeric algebra: small vectors, masks, and matrices of
//! 1 to 4 components, with the scalar fallback implementation of every
//! operation a SIMD-aware build would eventually specialize.
//!
//! None of the types here reach for a SIMD intrinsics crate: every
//! reduction and elementwise operation below is a plain `for i in 0..D`
//! loop. A capability-gated fast path for `D in {2,3,4}` and `f32`/`f64`
//! is a natural extension point but is intentionally left unimplemented,
//! since nothing downstream depends on it yet.

mod mask;
mod mat;
mod vec;

pub use mask::Mask;
pub use mat::{Matrix, MatrixEigError};
pub use vec::Vector;

use num_traits::{Float, NumCast, One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Bound satisfied by every scalar type `Vector`/`Matrix`/`Mask` can be
/// generic over: signed integers and floats alike.
pub trait Scalar:
    Copy
    + Default
    + PartialOrd
    + PartialEq
    + Debug
    + Send
    + Sync
    + Zero
    + One
    + NumCast
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + 'static
{
    /// Elementwise minimum, NaN-unaware (this crate never puts NaN in a
    /// `Vector` that a partitioner will compare).
    fn scalar_min(self, other: Self) -> Self;
    /// Elementwise maximum.
    fn scalar_max(self, other: Self) -> Self;
    /// Absolute value.
    fn scalar_abs(self) -> Self;
}

macro_rules! impl_scalar_for_float {
    ($t:ty) => {
        impl Scalar for $t {
            fn scalar_min(self, other: Self) -> Self {
                <$t>::min(self, other)
            }
            fn scalar_max(self, other: Self) -> Self {
                <$t>::max(self, other)
            }
            fn scalar_abs(self) -> Self {
                <$t>::abs(self)
            }
        }
    };
}

macro_rules! impl_scalar_for_int {
    ($t:ty) => {
        impl Scalar for $t {
            fn scalar_min(self, other: Self) -> Self {
                Ord::min(self, other)
            }
            fn scalar_max(self, other: Self) -> Self {
                Ord::max(self, other)
            }
            fn scalar_abs(self) -> Self {
                <$t>::abs(self)
            }
        }
    };
}

impl_scalar_for_float!(f32);
impl_scalar_for_float!(f64);
impl_scalar_for_int!(i32);
impl_scalar_for_int!(i64);
impl_scalar_for_int!(isize);

/// Extra bound required by operations that need square roots or a notion of
/// "small enough to be zero" (norms, normalization, eigendecomposition).
pub trait FloatScalar: Scalar + Float {
    /// Tolerance used to treat a near-zero quantity as exactly zero.
    fn tiny() -> Self;
}

impl FloatScalar for f32 {
    fn tiny() -> Self {
        1e-12
    }
}

impl FloatScalar for f64 {
    fn tiny() -> Self {
        1e-30
    }
}
