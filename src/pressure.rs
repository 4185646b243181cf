//! Area-restoring pressure for closed rings of points.

use crate::float::Float;
use crate::point::PointMass;
use crate::vec::{Vec, Vec2};

/// Signed shoelace area of a ring. Positive for counter-clockwise order.
pub fn signed_area<F: Float>(points: &[PointMass<F>]) -> F {
    let n = points.len();
    if n < 3 {
        return F::zero();
    }
    let mut sum = F::zero();
    for i in 0..n {
        let a = points[i].position;
        let b = points[(i + 1) % n].position;
        sum = sum + a.cross(b);
    }
    sum * F::half()
}

/// Unsigned enclosed area of a ring.
pub fn area<F: Float>(points: &[PointMass<F>]) -> F {
    signed_area(points).abs()
}

/// Outward normal at point `i` of a ring with the given winding sign
/// (`1` for counter-clockwise, `-1` for clockwise).
///
/// Uses the secant through the two neighbours instead of the adjacent
/// edges, which keeps the normal continuous across sharp vertices.
pub fn vertex_normal<F: Float>(points: &[PointMass<F>], i: usize, winding: F) -> Option<Vec2<F>> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let prev = points[(i + n - 1) % n].position;
    let next = points[(i + 1) % n].position;
    let tangent = next - prev;
    tangent.perp().scale(-winding).try_normalize()
}

/// Pressure parameters of one body.
#[derive(Clone, Debug)]
pub struct Pressure<F: Float> {
    /// Rest area the pressure restores, before `pressure_amount` scaling.
    pub target_area: F,
    /// Multiplier on the target area (1 = hold the rest area).
    pub pressure_amount: F,
    /// Gain turning area error into per-point displacement.
    pub pressure_force: F,
}

impl<F: Float> Pressure<F> {
    pub fn new(target_area: F, pressure_amount: F, pressure_force: F) -> Self {
        Pressure {
            target_area: target_area.max(F::zero()),
            pressure_amount: pressure_amount.max(F::zero()),
            pressure_force,
        }
    }

    /// Area the ring is pushed towards.
    pub fn effective_target(&self) -> F {
        self.target_area * self.pressure_amount
    }

    /// Area error clamped to half the current area in either direction.
    pub fn area_error(&self, current_area: F) -> F {
        let limit = current_area * F::half();
        (self.effective_target() - current_area).clamp(-limit, limit)
    }

    /// Queue a push along every vertex normal. Returns the area measured
    /// before the push.
    pub fn accumulate(&self, points: &mut [PointMass<F>]) -> F {
        let n = points.len();
        let signed = signed_area(points);
        let current = signed.abs();
        if n < 3 || current < F::epsilon() {
            return current;
        }
        let winding = if signed < F::zero() { -F::one() } else { F::one() };
        let factor = self.area_error(current) / F::from_usize(n) * self.pressure_force;

        for i in 0..n {
            if let Some(normal) = vertex_normal(points, i, winding) {
                points[i].add_displacement(normal.scale(factor));
            }
        }
        current
    }
}
