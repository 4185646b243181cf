//! Step observer trait for monitoring simulation progress.

/// Hooks called at each phase of a tick.
///
/// Body-level hooks fire from inside [`SoftBody::update_physics`] and the
/// generic solver; world-level hooks fire from [`World::step`] in phase
/// order: bodies, collision pass, joint pass, completion. All methods default
/// to no-ops.
///
/// [`SoftBody::update_physics`]: crate::body::SoftBody::update_physics
/// [`World::step`]: crate::world::World::step
pub trait StepObserver {
    /// Called after a body's (or the solver's) points have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each constraint-solving substep.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called once every registered body has been updated.
    fn on_bodies_updated(&mut self, _body_count: usize) {}

    /// Called after the body-vs-body pass with the number of body pairs
    /// that had at least one point correction.
    fn on_collision_pass(&mut self, _colliding_pairs: usize) {}

    /// Called after the joint pass with the number of joints applied.
    fn on_joint_pass(&mut self, _applied_joints: usize) {}

    /// Called when a step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// Observer that ignores everything.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
