//! Pairwise constraints between point masses: rigid distance and damped spring.
//!
//! Constraints refer to points by index into the owning body's point slice,
//! so they never borrow the points themselves. Each kind can be solved two
//! ways:
//!
//! - `solve` acts immediately: distance constraints move positions directly
//!   (position-based correction), springs accumulate a force that the next
//!   integration step resolves.
//! - `accumulate` is the soft-body substep form. Distance constraints push
//!   their correction into the points' displacement accumulators, so every
//!   contribution a point receives is averaged before it is applied.
//!   Springs stay force-based: they add a force that the body's next
//!   integration resolves, never moving a point within the substep.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::point::PointMass;
use crate::vec::{Vec, Vec2};

/// A constraint between two point masses of one body.
#[derive(Clone, Debug)]
pub enum Constraint<F: Float> {
    Distance(DistanceConstraint<F>),
    Spring(SpringConstraint<F>),
}

#[derive(Clone, Debug)]
pub struct DistanceConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    pub stiffness: F,
    pub active: bool,
}

#[derive(Clone, Debug)]
pub struct SpringConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    pub stiffness: F,
    pub damping: F,
    /// Fractions of each endpoint's per-step response this spring may use
    /// in the substep form. Bodies set them to one over the number of
    /// springs at that endpoint, so a point's springs average out.
    pub weight_a: F,
    pub weight_b: F,
    pub active: bool,
}

/// Geometry shared by both kinds: unit direction A->B, current length, and
/// the fraction of a correction each endpoint takes.
struct Pair<F: Float> {
    normal: Vec2<F>,
    dist: F,
    share_a: F,
    share_b: F,
}

fn pair<F: Float>(points: &[PointMass<F>], a: usize, b: usize) -> Option<Pair<F>> {
    let pa = &points[a];
    let pb = &points[b];
    let wa = pa.effective_inv_mass();
    let wb = pb.effective_inv_mass();
    let w_total = wa + wb;
    if w_total.is_near_zero(F::from_f32(1e-10)) {
        return None; // both fixed
    }
    let delta = pb.position - pa.position;
    let dist = delta.length();
    if dist < F::epsilon() {
        return None; // coincident, direction undefined
    }
    Some(Pair {
        normal: delta.scale(F::one() / dist),
        dist,
        share_a: wa / w_total,
        share_b: wb / w_total,
    })
}

fn check_indices(a: usize, b: usize, count: usize) -> Result<(), PhysicsError> {
    for index in [a, b] {
        if index >= count {
            return Err(PhysicsError::PointOutOfBounds { index, count });
        }
    }
    Ok(())
}

/// Give every spring an equal share of each endpoint's response, so a
/// point held by several springs is pulled by their average.
pub fn balance_spring_weights<F: Float>(constraints: &mut [Constraint<F>], point_count: usize) {
    let mut springs_at = alloc::vec![0usize; point_count];
    for c in constraints.iter() {
        if let Constraint::Spring(s) = c {
            springs_at[s.a] += 1;
            springs_at[s.b] += 1;
        }
    }
    for c in constraints.iter_mut() {
        if let Constraint::Spring(s) = c {
            s.weight_a = F::one() / F::from_usize(springs_at[s.a]);
            s.weight_b = F::one() / F::from_usize(springs_at[s.b]);
        }
    }
}

impl<F: Float> DistanceConstraint<F> {
    /// Negative rest lengths clamp to zero, stiffness clamps to [0, 1].
    pub fn new(a: usize, b: usize, rest_length: F, stiffness: F) -> Self {
        DistanceConstraint {
            a,
            b,
            rest_length: rest_length.max(F::zero()),
            stiffness: stiffness.saturate(),
            active: true,
        }
    }

    /// Rest length taken from the current separation.
    pub fn from_points(a: usize, b: usize, points: &[PointMass<F>], stiffness: F) -> Self {
        let rest_length = points[a].position.distance(points[b].position);
        Self::new(a, b, rest_length, stiffness)
    }

    /// Correction along A->B; A moves by `+correction * share_a`, B by
    /// `-correction * share_b`.
    fn correction(&self, points: &[PointMass<F>]) -> Option<(Vec2<F>, F, F)> {
        if !self.active {
            return None;
        }
        let p = pair(points, self.a, self.b)?;
        let error = p.dist - self.rest_length;
        let correction = p.normal.scale(error * self.stiffness);
        Some((correction, p.share_a, p.share_b))
    }

    /// Position-based correction applied directly to both endpoints.
    pub fn solve(&self, points: &mut [PointMass<F>]) {
        if let Some((correction, share_a, share_b)) = self.correction(points) {
            if !points[self.a].fixed {
                points[self.a].position += correction.scale(share_a);
            }
            if !points[self.b].fixed {
                points[self.b].position -= correction.scale(share_b);
            }
        }
    }

    pub fn accumulate(&self, points: &mut [PointMass<F>]) {
        if let Some((correction, share_a, share_b)) = self.correction(points) {
            points[self.a].add_displacement(correction.scale(share_a));
            points[self.b].add_displacement(-correction.scale(share_b));
        }
    }
}

impl<F: Float> SpringConstraint<F> {
    /// Negative rest lengths clamp to zero, stiffness and damping to [0, 1].
    pub fn new(a: usize, b: usize, rest_length: F, stiffness: F, damping: F) -> Self {
        SpringConstraint {
            a,
            b,
            rest_length: rest_length.max(F::zero()),
            stiffness: stiffness.saturate(),
            damping: damping.saturate(),
            weight_a: F::one(),
            weight_b: F::one(),
            active: true,
        }
    }

    pub fn from_points(
        a: usize,
        b: usize,
        points: &[PointMass<F>],
        stiffness: F,
        damping: F,
    ) -> Self {
        let rest_length = points[a].position.distance(points[b].position);
        Self::new(a, b, rest_length, stiffness, damping)
    }

    /// Signed spring magnitude along A->B for the given relative velocity.
    fn magnitude(&self, dist: F, relative_velocity: Vec2<F>, normal: Vec2<F>) -> F {
        self.stiffness * (dist - self.rest_length) + self.damping * relative_velocity.dot(normal)
    }

    /// Force-based solve: the endpoints receive opposite forces that the
    /// next integration step turns into motion.
    pub fn solve(&self, points: &mut [PointMass<F>], dt: F) {
        if !self.active {
            return;
        }
        let Some(p) = pair(points, self.a, self.b) else {
            return;
        };
        let relative_velocity = points[self.b].velocity(dt) - points[self.a].velocity(dt);
        let force = p.normal.scale(self.magnitude(p.dist, relative_velocity, p.normal));
        points[self.a].apply_force(force);
        points[self.b].apply_force(-force);
    }

    /// Substep form of [`solve`](Self::solve), in per-step units.
    ///
    /// The force is sized so that one integration of `dt` moves each endpoint
    /// by its inverse-mass share of `stiffness * stretch`, with damping
    /// measured on the per-step relative motion. A stiffness of 1 with unit
    /// weights therefore closes the stretch over one step. The force is
    /// split evenly over the `substeps` of a tick.
    pub fn accumulate_force(&self, points: &mut [PointMass<F>], dt: F, substeps: usize) {
        if !self.active || !dt.is_positive_finite() {
            return;
        }
        let Some(p) = pair(points, self.a, self.b) else {
            return;
        };
        let relative_motion = points[self.b].velocity_raw() - points[self.a].velocity_raw();
        let per_step = F::one() / (dt * dt * F::from_usize(substeps.max(1)));
        let pull = p.normal.scale(self.magnitude(p.dist, relative_motion, p.normal) * per_step);
        let mass_a = points[self.a].mass;
        let mass_b = points[self.b].mass;
        points[self.a].apply_force(pull.scale(p.share_a * self.weight_a * mass_a));
        points[self.b].apply_force(-pull.scale(p.share_b * self.weight_b * mass_b));
    }
}

impl<F: Float> Constraint<F> {
    pub fn distance(a: usize, b: usize, rest_length: F, stiffness: F) -> Self {
        Constraint::Distance(DistanceConstraint::new(a, b, rest_length, stiffness))
    }

    pub fn spring(a: usize, b: usize, rest_length: F, stiffness: F, damping: F) -> Self {
        Constraint::Spring(SpringConstraint::new(a, b, rest_length, stiffness, damping))
    }

    pub fn solve(&self, points: &mut [PointMass<F>], dt: F) {
        match self {
            Constraint::Distance(c) => c.solve(points),
            Constraint::Spring(c) => c.solve(points, dt),
        }
    }

    /// Substep form used by soft bodies: distance constraints queue a
    /// displacement, springs add a force for the next integration.
    pub fn accumulate(&self, points: &mut [PointMass<F>], dt: F, substeps: usize) {
        match self {
            Constraint::Distance(c) => c.accumulate(points),
            Constraint::Spring(c) => c.accumulate_force(points, dt, substeps),
        }
    }

    pub fn endpoints(&self) -> (usize, usize) {
        match self {
            Constraint::Distance(c) => (c.a, c.b),
            Constraint::Spring(c) => (c.a, c.b),
        }
    }

    pub fn rest_length(&self) -> F {
        match self {
            Constraint::Distance(c) => c.rest_length,
            Constraint::Spring(c) => c.rest_length,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Constraint::Distance(c) => c.active,
            Constraint::Spring(c) => c.active,
        }
    }

    /// Inactive constraints stay in place but do nothing.
    pub fn set_active(&mut self, active: bool) {
        match self {
            Constraint::Distance(c) => c.active = active,
            Constraint::Spring(c) => c.active = active,
        }
    }

    /// Absolute deviation from the rest length.
    pub fn error(&self, points: &[PointMass<F>]) -> F {
        let (a, b) = self.endpoints();
        (points[a].position.distance(points[b].position) - self.rest_length()).abs()
    }

    /// Verify both endpoints exist in a set of `count` points.
    pub fn validate(&self, count: usize) -> Result<(), PhysicsError> {
        let (a, b) = self.endpoints();
        check_indices(a, b, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_at(ax: f32, bx: f32) -> [PointMass<f32>; 2] {
        [
            PointMass::new(Vec2::new(ax, 0.0), 1.0),
            PointMass::new(Vec2::new(bx, 0.0), 1.0),
        ]
    }

    #[test]
    fn construction_clamps_parameters() {
        let c = SpringConstraint::new(0, 1, -2.0f32, 3.0, -1.0);
        assert_eq!(c.rest_length, 0.0);
        assert_eq!(c.stiffness, 1.0);
        assert_eq!(c.damping, 0.0);
    }

    #[test]
    fn distance_solve_reaches_rest_length() {
        let mut points = pair_at(0.0, 10.0);
        DistanceConstraint::new(0, 1, 4.0, 1.0).solve(&mut points);
        assert!((points[0].position.x - 3.0).abs() < 1e-5);
        assert!((points[1].position.x - 7.0).abs() < 1e-5);
    }

    #[test]
    fn fixed_endpoint_takes_no_correction() {
        let mut points = pair_at(0.0, 10.0);
        points[0].set_fixed(true);
        DistanceConstraint::new(0, 1, 4.0, 1.0).solve(&mut points);
        assert_eq!(points[0].position.x, 0.0);
        assert!((points[1].position.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn coincident_points_are_skipped() {
        let mut points = pair_at(2.0, 2.0);
        let c = Constraint::distance(0, 1, 5.0, 1.0);
        c.solve(&mut points, 1.0 / 60.0);
        c.accumulate(&mut points, 1.0 / 60.0, 1);
        assert_eq!(points[0].displacement_count, 0);
        assert_eq!(points[0].position, points[1].position);
    }

    #[test]
    fn spring_pulls_stretched_pair_together() {
        let mut points = pair_at(0.0, 10.0);
        Constraint::spring(0, 1, 4.0, 0.5, 0.0).solve(&mut points, 1.0 / 60.0);
        assert!(points[0].force.x > 0.0);
        assert!(points[1].force.x < 0.0);
        assert!((points[0].force.x + points[1].force.x).abs() < 1e-6);
    }

    #[test]
    fn spring_substep_waits_for_integration() {
        let dt = 1.0 / 60.0;
        let mut points = pair_at(0.0, 15.0);
        let spring = Constraint::spring(0, 1, 10.0, 1.0, 0.0);
        spring.accumulate(&mut points, dt, 1);
        for p in points.iter_mut() {
            assert!(!p.apply_displacement());
        }
        assert_eq!(points[0].position.x, 0.0);
        assert_eq!(points[1].position.x, 15.0);
        assert!(points[0].force.x > 0.0);
        assert!(points[1].force.x < 0.0);

        for p in points.iter_mut() {
            p.integrate(dt, 1.0);
        }
        assert!((points[0].position.x - 2.5).abs() < 1e-3);
        assert!((points[1].position.x - 12.5).abs() < 1e-3);
    }

    #[test]
    fn spring_force_is_split_over_substeps() {
        let dt = 1.0 / 60.0;
        let mut once = pair_at(0.0, 15.0);
        let mut split = pair_at(0.0, 15.0);
        let spring = Constraint::spring(0, 1, 10.0, 0.5, 0.0);
        spring.accumulate(&mut once, dt, 1);
        for _ in 0..4 {
            spring.accumulate(&mut split, dt, 4);
        }
        assert!((once[0].force.x - split[0].force.x).abs() < 1e-2);
    }

    #[test]
    fn balanced_weights_average_a_points_springs() {
        let mut constraints = [
            Constraint::spring(0, 1, 1.0f32, 1.0, 0.0),
            Constraint::spring(1, 2, 1.0, 1.0, 0.0),
            Constraint::distance(0, 2, 1.0, 1.0),
        ];
        balance_spring_weights(&mut constraints, 3);
        let Constraint::Spring(first) = &constraints[0] else {
            panic!("expected a spring");
        };
        assert_eq!((first.weight_a, first.weight_b), (1.0, 0.5));
        let Constraint::Spring(second) = &constraints[1] else {
            panic!("expected a spring");
        };
        assert_eq!((second.weight_a, second.weight_b), (0.5, 1.0));
    }

    #[test]
    fn inactive_constraint_is_inert() {
        let mut points = pair_at(0.0, 10.0);
        let mut c = Constraint::distance(0, 1, 4.0, 1.0);
        c.set_active(false);
        c.solve(&mut points, 1.0 / 60.0);
        assert_eq!(points[1].position.x, 10.0);
        assert!(!c.is_active());
    }

    #[test]
    fn validate_reports_bad_index() {
        let c = Constraint::<f32>::distance(0, 5, 1.0, 1.0);
        assert_eq!(
            c.validate(3),
            Err(PhysicsError::PointOutOfBounds { index: 5, count: 3 })
        );
    }
}
