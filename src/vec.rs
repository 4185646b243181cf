//! 2D vector math for point masses, shapes and joints.

use crate::float::Float;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Trait for vector types used in the simulation.
///
/// Only [`Vec2`] implements it; the trait keeps the generic helpers
/// (length, normalize, lerp) in one place.
pub trait Vec:
    Copy
    + Clone
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Default
    + core::fmt::Debug
{
    /// The scalar (float) type for this vector.
    type Scalar: Float;

    /// Zero vector.
    fn zero() -> Self;

    /// Dot product.
    fn dot(self, other: Self) -> Self::Scalar;

    /// Scale all components by a scalar.
    fn scale(self, s: Self::Scalar) -> Self;

    /// Squared length (avoids sqrt).
    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    /// Length (magnitude).
    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    /// Unit vector, or `None` when the length is below [`Float::epsilon`].
    fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len < Self::Scalar::epsilon() {
            None
        } else {
            Some(self.scale(Self::Scalar::one() / len))
        }
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    fn normalize(self) -> Self {
        self.try_normalize().unwrap_or_else(Self::zero)
    }

    /// Distance between two points.
    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    /// Squared distance between two points.
    fn distance_sq(self, other: Self) -> Self::Scalar {
        (self - other).length_sq()
    }

    /// Linear interpolation between self and other.
    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self).scale(t)
    }
}

/// 2D vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector at `angle` radians from +X.
    pub fn from_angle(angle: F) -> Self {
        Vec2 { x: angle.cos(), y: angle.sin() }
    }

    /// +X
    pub fn unit_x() -> Self {
        Vec2 { x: F::one(), y: F::zero() }
    }

    /// +Y
    pub fn unit_y() -> Self {
        Vec2 { x: F::zero(), y: F::one() }
    }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Self {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Rotate counter-clockwise by `angle` radians.
    pub fn rotate(self, angle: F) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Vec2 {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    /// Reflect about the line whose unit normal is `normal`.
    pub fn reflect(self, normal: Self) -> Self {
        self - normal.scale(F::two() * self.dot(normal))
    }

    pub fn component_min(self, other: Self) -> Self {
        Vec2 { x: self.x.min(other.x), y: self.y.min(other.y) }
    }

    pub fn component_max(self, other: Self) -> Self {
        Vec2 { x: self.x.max(other.x), y: self.y.max(other.y) }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float> Vec for Vec2<F> {
    type Scalar = F;
    fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }
    fn dot(self, other: Self) -> F { self.x * other.x + self.y * other.y }
    fn scale(self, s: F) -> Self { Vec2 { x: self.x * s, y: self.y * s } }
}

/// Arithmetic mean of a set of positions. Zero for an empty set.
pub fn centroid<F: Float, I: IntoIterator<Item = Vec2<F>>>(positions: I) -> Vec2<F> {
    let mut sum = Vec2::zero();
    let mut count = 0usize;
    for p in positions {
        sum += p;
        count += 1;
    }
    if count == 0 {
        return sum;
    }
    sum.scale(F::one() / F::from_usize(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_length() {
        let v = Vec2::new(3.0f32, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = Vec2::<f32>::zero();
        assert_eq!(v.normalize(), Vec2::zero());
        assert!(v.try_normalize().is_none());
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Vec2::new(1.0f32, 0.0).rotate(core::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reflect_about_floor_normal() {
        let v = Vec2::new(2.0f32, -3.0).reflect(Vec2::unit_y());
        assert_eq!(v, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid([
            Vec2::new(0.0f32, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]);
        assert_eq!(c, Vec2::new(1.0, 1.0));
    }
}
