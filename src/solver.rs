//! Iterative constraint solver for free-standing point systems.
//!
//! Soft bodies run their own pipeline; this harness is for loose rigs of
//! points and constraints (pendulums, spring chains, test fixtures).

use crate::config::SolverConfig;
use crate::constraint::Constraint;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::point::PointMass;
use alloc::vec::Vec as AllocVec;

/// Iterative constraint solver for Verlet point systems.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSolver<F: Float> {
    pub points: AllocVec<PointMass<F>>,
    pub constraints: AllocVec<Constraint<F>>,
}

impl<F: Float> ConstraintSolver<F> {
    pub fn new() -> Self {
        ConstraintSolver {
            points: AllocVec::new(),
            constraints: AllocVec::new(),
        }
    }

    pub fn add_point(&mut self, point: PointMass<F>) -> usize {
        let idx = self.points.len();
        self.points.push(point);
        idx
    }

    /// Constraints are not checked; see [`try_add_constraint`](Self::try_add_constraint).
    pub fn add_constraint(&mut self, constraint: Constraint<F>) {
        self.constraints.push(constraint);
    }

    pub fn try_add_constraint(&mut self, constraint: Constraint<F>) -> Result<(), PhysicsError> {
        constraint.validate(self.points.len())?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Gravity is a mass-independent acceleration; distance constraints
    /// correct positions directly while springs act through forces picked
    /// up by the next integration.
    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SolverConfig<F>, observer: &mut O) {
        if !dt.is_positive_finite() {
            return;
        }
        let sub_dt = dt / F::from_usize(config.sub_steps.max(1));

        for _sub in 0..config.sub_steps.max(1) {
            for p in self.points.iter_mut() {
                p.apply_acceleration(config.gravity);
            }

            for p in self.points.iter_mut() {
                p.integrate(sub_dt, config.damping);
            }
            observer.on_integrate();

            for i in 0..config.iterations {
                for constraint in self.constraints.iter() {
                    constraint.solve(&mut self.points, sub_dt);
                }
                observer.on_constraint_iteration(i);
            }
        }

        observer.on_step_complete();
    }

    pub fn point_count(&self) -> usize { self.points.len() }
    pub fn constraint_count(&self) -> usize { self.constraints.len() }
    pub fn point(&self, index: usize) -> &PointMass<F> { &self.points[index] }
    pub fn point_mut(&mut self, index: usize) -> &mut PointMass<F> { &mut self.points[index] }

    pub fn remove_constraint(&mut self, index: usize) -> Constraint<F> {
        self.constraints.swap_remove(index)
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;
    use crate::vec::{Vec, Vec2};

    #[test]
    fn pendulum_keeps_its_length() {
        let mut solver = ConstraintSolver::new();
        let pivot = solver.add_point(PointMass::fixed(Vec2::new(0.0f32, 0.0)));
        let bob = solver.add_point(PointMass::new(Vec2::new(5.0, 0.0), 1.0));
        solver.add_constraint(Constraint::distance(pivot, bob, 5.0, 1.0));
        let config = SolverConfig::new().with_gravity(Vec2::new(0.0, -9.81)).with_iterations(8);
        for _ in 0..120 {
            solver.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
        }
        let len = solver.point(bob).position.distance(solver.point(pivot).position);
        assert!((len - 5.0).abs() < 0.05, "len = {len}");
        assert_eq!(solver.point(pivot).position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn try_add_constraint_checks_indices() {
        let mut solver = ConstraintSolver::<f32>::new();
        solver.add_point(PointMass::new(Vec2::zero(), 1.0));
        assert_eq!(
            solver.try_add_constraint(Constraint::distance(0, 1, 1.0, 1.0)),
            Err(PhysicsError::PointOutOfBounds { index: 1, count: 1 })
        );
        assert_eq!(solver.constraint_count(), 0);
    }
}
