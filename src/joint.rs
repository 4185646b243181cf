//! Couplings between bodies, applied after the collision pass.
//!
//! Joints name bodies by [`BodyKey`] and points by index. Both are checked
//! once when the joint is registered with a world; a joint that fails the
//! check stays inactive for good.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::point::PointMass;
use crate::vec::{Vec, Vec2};
use crate::world::BodyKey;
use alloc::vec::Vec as AllocVec;

/// A point index with its share of a weighted joint side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightedPoint<F: Float> {
    pub index: usize,
    pub weight: F,
}

/// Pulls the weighted centroids of two point subsets toward each other.
#[derive(Clone, Debug)]
pub struct WeightedJoint<F: Float> {
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    points_a: AllocVec<WeightedPoint<F>>,
    points_b: AllocVec<WeightedPoint<F>>,
    pub stiffness: F,
}

/// Snaps one point of each body onto their common midpoint.
#[derive(Clone, Debug)]
pub struct WeldJoint {
    pub body_a: BodyKey,
    pub point_a: usize,
    pub body_b: BodyKey,
    pub point_b: usize,
}

/// Pins points of one body to the world positions they had when the joint
/// was registered.
#[derive(Clone, Debug)]
pub struct FixedPointJoint<F: Float> {
    pub body: BodyKey,
    points: AllocVec<usize>,
    anchors: AllocVec<Vec2<F>>,
}

#[derive(Clone, Debug)]
pub enum JointKind<F: Float> {
    Weighted(WeightedJoint<F>),
    Weld(WeldJoint),
    FixedPoint(FixedPointJoint<F>),
}

/// A joint plus its activation state.
#[derive(Clone, Debug)]
pub struct Joint<F: Float> {
    kind: JointKind<F>,
    active: bool,
}

/// Clamp negative weights to zero and scale to a sum of one. An all-zero
/// side falls back to uniform weights.
fn normalize_weights<F: Float>(points: &mut [WeightedPoint<F>]) {
    if points.is_empty() {
        return;
    }
    let mut sum = F::zero();
    for p in points.iter_mut() {
        p.weight = if p.weight.is_finite() { p.weight.max(F::zero()) } else { F::zero() };
        sum = sum + p.weight;
    }
    if sum < F::epsilon() {
        let uniform = F::one() / F::from_usize(points.len());
        for p in points.iter_mut() {
            p.weight = uniform;
        }
    } else {
        for p in points.iter_mut() {
            p.weight = p.weight / sum;
        }
    }
}

fn check_index(index: usize, count: usize) -> Result<(), PhysicsError> {
    if index >= count {
        Err(PhysicsError::PointOutOfBounds { index, count })
    } else {
        Ok(())
    }
}

fn weighted_centroid<F: Float>(points: &[PointMass<F>], set: &[WeightedPoint<F>]) -> Vec2<F> {
    let mut c = Vec2::zero();
    for wp in set {
        c += points[wp.index].position.scale(wp.weight);
    }
    c
}

/// Move the free points of `set` so that its weighted centroid moves by
/// `shift`: point `i` takes `shift * w_i / sum(w_j^2)` over free points.
fn shift_set<F: Float>(points: &mut [PointMass<F>], set: &[WeightedPoint<F>], shift: Vec2<F>) {
    let norm = set
        .iter()
        .filter(|wp| !points[wp.index].fixed)
        .fold(F::zero(), |sum, wp| sum + wp.weight * wp.weight);
    if norm < F::epsilon() * F::epsilon() {
        return;
    }
    for wp in set {
        let p = &mut points[wp.index];
        if !p.fixed {
            p.position += shift.scale(wp.weight / norm);
        }
    }
}

impl<F: Float> WeightedJoint<F> {
    /// Weights on each side are renormalized to sum to one.
    pub fn new(
        body_a: BodyKey,
        points_a: AllocVec<WeightedPoint<F>>,
        body_b: BodyKey,
        points_b: AllocVec<WeightedPoint<F>>,
        stiffness: F,
    ) -> Self {
        let mut joint = WeightedJoint {
            body_a,
            body_b,
            points_a,
            points_b,
            stiffness: stiffness.saturate(),
        };
        normalize_weights(&mut joint.points_a);
        normalize_weights(&mut joint.points_b);
        joint
    }

    /// Equal weights on every listed point.
    pub fn uniform(
        body_a: BodyKey,
        indices_a: &[usize],
        body_b: BodyKey,
        indices_b: &[usize],
        stiffness: F,
    ) -> Self {
        let side = |indices: &[usize]| {
            indices
                .iter()
                .map(|&index| WeightedPoint { index, weight: F::one() })
                .collect::<AllocVec<_>>()
        };
        Self::new(body_a, side(indices_a), body_b, side(indices_b), stiffness)
    }

    pub fn points_a(&self) -> &[WeightedPoint<F>] {
        &self.points_a
    }

    pub fn points_b(&self) -> &[WeightedPoint<F>] {
        &self.points_b
    }

    fn shift(&self, centroid_a: Vec2<F>, centroid_b: Vec2<F>) -> Vec2<F> {
        (centroid_b - centroid_a).scale(self.stiffness * F::half())
    }

    /// Both weighted centroids move toward each other by
    /// `stiffness / 2` of their separation.
    pub fn solve(&self, a: &mut [PointMass<F>], b: &mut [PointMass<F>]) {
        let shift = self.shift(weighted_centroid(a, &self.points_a), weighted_centroid(b, &self.points_b));
        shift_set(a, &self.points_a, shift);
        shift_set(b, &self.points_b, -shift);
    }

    /// Variant of [`solve`](Self::solve) for two subsets of the same body.
    pub fn solve_within(&self, points: &mut [PointMass<F>]) {
        let shift = self.shift(
            weighted_centroid(points, &self.points_a),
            weighted_centroid(points, &self.points_b),
        );
        shift_set(points, &self.points_a, shift);
        shift_set(points, &self.points_b, -shift);
    }

    pub fn centroids(&self, a: &[PointMass<F>], b: &[PointMass<F>]) -> (Vec2<F>, Vec2<F>) {
        (weighted_centroid(a, &self.points_a), weighted_centroid(b, &self.points_b))
    }

    fn validate(&self, count_a: usize, count_b: usize) -> Result<(), PhysicsError> {
        if self.points_a.is_empty() || self.points_b.is_empty() {
            return Err(PhysicsError::EmptyPointSet);
        }
        for wp in &self.points_a {
            check_index(wp.index, count_a)?;
        }
        for wp in &self.points_b {
            check_index(wp.index, count_b)?;
        }
        Ok(())
    }
}

fn weld<F: Float>(a: &mut PointMass<F>, b: &mut PointMass<F>) {
    let target = match (a.fixed, b.fixed) {
        (true, true) => return,
        (true, false) => a.position,
        (false, true) => b.position,
        (false, false) => (a.position + b.position).scale(F::half()),
    };
    a.position = if a.fixed { a.position } else { target };
    b.position = if b.fixed { b.position } else { target };
}

impl WeldJoint {
    pub fn new(body_a: BodyKey, point_a: usize, body_b: BodyKey, point_b: usize) -> Self {
        WeldJoint { body_a, point_a, body_b, point_b }
    }

    /// Move both points to their average position. A fixed point holds and
    /// the other snaps onto it.
    pub fn solve<F: Float>(&self, a: &mut [PointMass<F>], b: &mut [PointMass<F>]) {
        weld(&mut a[self.point_a], &mut b[self.point_b]);
    }

    pub fn solve_within<F: Float>(&self, points: &mut [PointMass<F>]) {
        if self.point_a == self.point_b {
            return;
        }
        let (lo, hi) = if self.point_a < self.point_b {
            (self.point_a, self.point_b)
        } else {
            (self.point_b, self.point_a)
        };
        let (head, tail) = points.split_at_mut(hi);
        weld(&mut head[lo], &mut tail[0]);
    }
}

impl<F: Float> FixedPointJoint<F> {
    /// Anchors are captured when the joint is registered with a world.
    pub fn new(body: BodyKey, points: AllocVec<usize>) -> Self {
        FixedPointJoint { body, points, anchors: AllocVec::new() }
    }

    pub fn points(&self) -> &[usize] {
        &self.points
    }

    pub fn anchors(&self) -> &[Vec2<F>] {
        &self.anchors
    }

    /// Record the current positions of the pinned points as anchors.
    pub fn capture(&mut self, points: &[PointMass<F>]) {
        self.anchors = self.points.iter().map(|&i| points[i].position).collect();
    }

    /// Overwrite the pinned points with their anchors, at rest.
    pub fn solve(&self, points: &mut [PointMass<F>]) {
        for (&index, &anchor) in self.points.iter().zip(self.anchors.iter()) {
            points[index].teleport(anchor);
        }
    }
}

impl<F: Float> Joint<F> {
    /// Joints start inactive; registering with a world validates and
    /// activates them.
    pub fn new(kind: JointKind<F>) -> Self {
        Joint { kind, active: false }
    }

    pub fn weighted(joint: WeightedJoint<F>) -> Self {
        Self::new(JointKind::Weighted(joint))
    }

    pub fn weld(joint: WeldJoint) -> Self {
        Self::new(JointKind::Weld(joint))
    }

    pub fn fixed_point(joint: FixedPointJoint<F>) -> Self {
        Self::new(JointKind::FixedPoint(joint))
    }

    pub fn kind(&self) -> &JointKind<F> {
        &self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The bodies this joint couples; the second is `None` for single-body joints.
    pub fn bodies(&self) -> (BodyKey, Option<BodyKey>) {
        match &self.kind {
            JointKind::Weighted(j) => (j.body_a, Some(j.body_b)),
            JointKind::Weld(j) => (j.body_a, Some(j.body_b)),
            JointKind::FixedPoint(j) => (j.body, None),
        }
    }

    pub fn references(&self, body: BodyKey) -> bool {
        let (a, b) = self.bodies();
        a == body || b == Some(body)
    }

    /// Check point indices against the point counts of the joined bodies.
    pub fn validate(&self, count_a: usize, count_b: usize) -> Result<(), PhysicsError> {
        match &self.kind {
            JointKind::Weighted(j) => j.validate(count_a, count_b),
            JointKind::Weld(j) => {
                check_index(j.point_a, count_a)?;
                check_index(j.point_b, count_b)
            }
            JointKind::FixedPoint(j) => {
                if j.points.is_empty() {
                    return Err(PhysicsError::EmptyPointSet);
                }
                j.points.iter().try_for_each(|&i| check_index(i, count_a))
            }
        }
    }

    /// Validate, capture anchors, and activate. The first body's points are
    /// `a`; `b` is `None` when both sides name the same body.
    pub(crate) fn activate(
        &mut self,
        a: &[PointMass<F>],
        b: Option<&[PointMass<F>]>,
    ) -> Result<(), PhysicsError> {
        let count_b = b.map_or(a.len(), |b| b.len());
        self.validate(a.len(), count_b)?;
        if let JointKind::FixedPoint(j) = &mut self.kind {
            j.capture(a);
        }
        self.active = true;
        Ok(())
    }

    /// Apply the joint to two distinct bodies' points.
    pub fn solve(&self, a: &mut [PointMass<F>], b: &mut [PointMass<F>]) {
        if !self.active {
            return;
        }
        match &self.kind {
            JointKind::Weighted(j) => j.solve(a, b),
            JointKind::Weld(j) => j.solve(a, b),
            JointKind::FixedPoint(j) => j.solve(a),
        }
    }

    /// Apply the joint when every side names the same body.
    pub fn solve_within(&self, points: &mut [PointMass<F>]) {
        if !self.active {
            return;
        }
        match &self.kind {
            JointKind::Weighted(j) => j.solve_within(points),
            JointKind::Weld(j) => j.solve_within(points),
            JointKind::FixedPoint(j) => j.solve(points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn key() -> BodyKey {
        BodyKey(thunderdome::Arena::<()>::new().insert(()))
    }

    fn points(xs: &[(f32, f32)]) -> AllocVec<PointMass<f32>> {
        xs.iter().map(|&(x, y)| PointMass::new(Vec2::new(x, y), 1.0)).collect()
    }

    #[test]
    fn weights_are_normalized() {
        let j = WeightedJoint::new(
            key(),
            vec![WeightedPoint { index: 0, weight: 3.0f32 }, WeightedPoint { index: 1, weight: -1.0 }],
            key(),
            vec![WeightedPoint { index: 0, weight: 0.0 }, WeightedPoint { index: 1, weight: 0.0 }],
            1.0,
        );
        assert_eq!(j.points_a()[0].weight, 1.0);
        assert_eq!(j.points_a()[1].weight, 0.0);
        assert_eq!(j.points_b()[0].weight, 0.5);
    }

    #[test]
    fn full_stiffness_meets_in_the_middle() {
        let mut a = points(&[(0.0, 0.0), (0.0, 2.0), (2.0, 0.0), (2.0, 2.0)]);
        let mut b = points(&[(10.0, 1.0), (12.0, 1.0)]);
        let j = WeightedJoint::uniform(key(), &[0, 1, 2, 3], key(), &[0, 1], 1.0);
        j.solve(&mut a, &mut b);
        let (ca, cb) = j.centroids(&a, &b);
        assert!((ca - cb).length() < 1e-5);
        assert!((ca.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn weld_snaps_to_fixed_point() {
        let mut a = points(&[(0.0, 0.0)]);
        a[0].set_fixed(true);
        let mut b = points(&[(4.0, 4.0)]);
        WeldJoint::new(key(), 0, key(), 0).solve(&mut a, &mut b);
        assert_eq!(b[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(a[0].position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn inactive_joint_does_nothing() {
        let mut a = points(&[(0.0, 0.0)]);
        let mut b = points(&[(4.0, 0.0)]);
        let joint = Joint::<f32>::weld(WeldJoint::new(key(), 0, key(), 0));
        joint.solve(&mut a, &mut b);
        assert_eq!(b[0].position.x, 4.0);
    }

    #[test]
    fn activation_rejects_bad_index() {
        let a = points(&[(0.0, 0.0), (1.0, 0.0)]);
        let mut joint = Joint::<f32>::weld(WeldJoint::new(key(), 5, key(), 0));
        assert_eq!(
            joint.activate(&a, None),
            Err(PhysicsError::PointOutOfBounds { index: 5, count: 2 })
        );
        assert!(!joint.is_active());
    }

    #[test]
    fn fixed_point_returns_to_anchor() {
        let mut a = points(&[(1.0, 1.0), (2.0, 2.0)]);
        let mut joint = Joint::fixed_point(FixedPointJoint::new(key(), vec![1]));
        joint.activate(&a, None).unwrap();
        a[1].position = Vec2::new(9.0, 9.0);
        joint.solve_within(&mut a);
        assert_eq!(a[1].position, Vec2::new(2.0, 2.0));
        assert_eq!(a[1].prev_position, Vec2::new(2.0, 2.0));
    }
}
