//! Floating-point abstraction so the simulation runs on `f32` or `f64`.

use core::cmp::PartialOrd;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Scalar operations the soft-body engine needs.
///
/// Implemented for `f32` and `f64` on top of `libm`, so the crate stays
/// `no_std`.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + core::fmt::Debug
{
    /// 0.0
    fn zero() -> Self;
    /// 1.0
    fn one() -> Self;
    /// 0.5
    fn half() -> Self;
    /// 2.0
    fn two() -> Self;
    /// Pi.
    fn pi() -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    /// Convert from f32 (constants and configuration values).
    fn from_f32(v: f32) -> Self;
    /// Arctangent of y/x in the correct quadrant.
    fn atan2(y: Self, x: Self) -> Self;
    /// False for NaN and infinities.
    fn is_finite(self) -> bool;

    /// Threshold below which lengths and distances count as degenerate.
    fn epsilon() -> Self {
        Self::from_f32(1e-6)
    }

    /// Convert a count or index.
    fn from_usize(v: usize) -> Self {
        Self::from_f32(v as f32)
    }

    /// Clamp self to [min, max].
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    /// Clamp self to [0, 1].
    fn saturate(self) -> Self {
        self.clamp(Self::zero(), Self::one())
    }

    /// Check if approximately zero within epsilon.
    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }

    /// Strictly positive and finite.
    fn is_positive_finite(self) -> bool {
        self.is_finite() && self > Self::zero()
    }
}

macro_rules! impl_float {
    ($t:ident, $sqrt:ident, $sin:ident, $cos:ident, $fabs:ident, $atan2:ident) => {
        impl Float for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            fn half() -> Self {
                0.5
            }
            #[inline]
            fn two() -> Self {
                2.0
            }
            fn pi() -> Self {
                core::$t::consts::PI
            }
            fn sqrt(self) -> Self {
                libm::$sqrt(self)
            }
            fn sin(self) -> Self {
                libm::$sin(self)
            }
            fn cos(self) -> Self {
                libm::$cos(self)
            }
            fn abs(self) -> Self {
                libm::$fabs(self)
            }
            // NaN loses against any number, so `clamp` sanitizes it
            fn min(self, other: Self) -> Self {
                if self < other || other.is_nan() { self } else { other }
            }
            fn max(self, other: Self) -> Self {
                if self > other || other.is_nan() { self } else { other }
            }
            fn from_f32(v: f32) -> Self {
                v as $t
            }
            fn from_usize(v: usize) -> Self {
                v as $t
            }
            fn atan2(y: Self, x: Self) -> Self {
                libm::$atan2(y, x)
            }
            fn is_finite(self) -> bool {
                $t::is_finite(self)
            }
        }
    };
}

impl_float!(f32, sqrtf, sinf, cosf, fabsf, atan2f);
impl_float!(f64, sqrt, sin, cos, fabs, atan2);
