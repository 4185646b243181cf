//! The fixed-timestep scheduler that owns bodies, joints and colliders.

use crate::body::{BodyEnv, DragSignal, SoftBody};
use crate::collision::{self, Collider, ColliderView};
use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::joint::Joint;
use crate::layer::CollisionLayerMatrix;
use crate::observer::StepObserver;
use crate::shape::{Aabb, Shape};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

use thunderdome as td;

/// Key type to look up a body stored in a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyKey(pub(crate) td::Index);

impl BodyKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// Key type to look up a joint stored in a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointKey(pub(crate) td::Index);

impl JointKey {
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// Key type to look up a static collider stored in a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderKey(pub(crate) td::Index);

impl ColliderKey {
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// Registry of everything that takes part in the simulation.
///
/// Every [`step`](Self::step) runs, in order: pending removals, every body's
/// own update, the body-vs-body collision pass, the joint pass, and finally
/// clears the per-tick motion of moved colliders. Bodies, joints and
/// colliders are processed in insertion order.
pub struct World<F: Float> {
    config: WorldConfig<F>,
    bodies: td::Arena<SoftBody<F>>,
    body_order: AllocVec<BodyKey>,
    joints: td::Arena<Joint<F>>,
    joint_order: AllocVec<JointKey>,
    colliders: td::Arena<Collider<F>>,
    collider_order: AllocVec<ColliderKey>,
    pending_removals: AllocVec<BodyKey>,
    accumulator: F,
    tick: u64,
}

impl<F: Float> World<F> {
    pub fn new(config: WorldConfig<F>) -> Self {
        World {
            config,
            bodies: td::Arena::new(),
            body_order: AllocVec::new(),
            joints: td::Arena::new(),
            joint_order: AllocVec::new(),
            colliders: td::Arena::new(),
            collider_order: AllocVec::new(),
            pending_removals: AllocVec::new(),
            accumulator: F::zero(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig<F> {
        &self.config
    }

    /// Gravity as an acceleration vector.
    pub fn gravity(&self) -> Vec2<F> {
        self.config.gravity()
    }

    pub fn set_gravity(&mut self, direction: Vec2<F>, magnitude: F) {
        self.config.gravity_direction = direction;
        self.config.gravity_magnitude = magnitude;
    }

    pub fn set_gravity_direction(&mut self, direction: Vec2<F>) {
        self.config.gravity_direction = direction;
    }

    pub fn set_gravity_magnitude(&mut self, magnitude: F) {
        self.config.gravity_magnitude = magnitude;
    }

    pub fn set_bounds(&mut self, bounds: Option<Aabb<F>>) {
        self.config.bounds = bounds;
    }

    pub fn layers_mut(&mut self) -> &mut CollisionLayerMatrix {
        &mut self.config.layers
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    //
    // Bodies
    //

    pub fn add_body(&mut self, body: SoftBody<F>) -> BodyKey {
        let kind = body.kind().name();
        let key = BodyKey(self.bodies.insert(body));
        self.body_order.push(key);
        log::debug!("added {kind} body {:?}", key.0);
        key
    }

    /// Schedule a body for removal at the start of the next tick. Joints
    /// referencing it are dropped at the same time.
    pub fn remove_body(&mut self, key: BodyKey) -> bool {
        if self.bodies.get(key.0).is_none() {
            log::warn!("cannot remove unknown body {:?}", key.0);
            return false;
        }
        if !self.pending_removals.contains(&key) {
            self.pending_removals.push(key);
        }
        true
    }

    pub fn body(&self, key: BodyKey) -> Option<&SoftBody<F>> {
        self.bodies.get(key.0)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut SoftBody<F>> {
        self.bodies.get_mut(key.0)
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &SoftBody<F>)> + '_ {
        self.body_order
            .iter()
            .filter_map(move |&key| self.bodies.get(key.0).map(|body| (key, body)))
    }

    pub fn body_count(&self) -> usize {
        self.body_order.len()
    }

    /// Body and point index nearest `target`, for hosts wiring up drag input.
    pub fn nearest_point(&self, target: Vec2<F>) -> Option<(BodyKey, usize)> {
        let mut best: Option<(BodyKey, usize, F)> = None;
        for (key, body) in self.bodies() {
            if let Some((index, dist_sq)) = body.nearest_point(target) {
                if best.map_or(true, |(_, _, d)| dist_sq < d) {
                    best = Some((key, index, dist_sq));
                }
            }
        }
        best.map(|(key, index, _)| (key, index))
    }

    /// Forward a pointer signal to a body's drag handling.
    pub fn handle_drag(&mut self, key: BodyKey, signal: &DragSignal<F>) {
        match self.bodies.get_mut(key.0) {
            Some(body) => body.handle_drag(signal),
            None => log::warn!("drag signal for unknown body {:?}", key.0),
        }
    }

    //
    // Joints
    //

    /// Register a joint. A joint whose bodies or point indices don't check
    /// out is still stored but never becomes active.
    pub fn add_joint(&mut self, mut joint: Joint<F>) -> JointKey {
        if let Err(err) = self.activate_joint(&mut joint) {
            log::warn!("joint rejected: {err}; it will stay inactive");
        }
        self.insert_joint(joint)
    }

    /// Like [`add_joint`](Self::add_joint), but an invalid joint is returned
    /// as an error instead of being stored.
    pub fn try_add_joint(&mut self, mut joint: Joint<F>) -> Result<JointKey, PhysicsError> {
        self.activate_joint(&mut joint)?;
        Ok(self.insert_joint(joint))
    }

    fn activate_joint(&self, joint: &mut Joint<F>) -> Result<(), PhysicsError> {
        let (a, b) = joint.bodies();
        let body_a = self.bodies.get(a.0).ok_or(PhysicsError::UnknownBody)?;
        let points_b = match b {
            Some(b) if b != a => Some(self.bodies.get(b.0).ok_or(PhysicsError::UnknownBody)?.points()),
            _ => None,
        };
        joint.activate(body_a.points(), points_b)
    }

    fn insert_joint(&mut self, joint: Joint<F>) -> JointKey {
        let key = JointKey(self.joints.insert(joint));
        self.joint_order.push(key);
        log::debug!("added joint {:?}", key.0);
        key
    }

    pub fn remove_joint(&mut self, key: JointKey) -> Option<Joint<F>> {
        let joint = self.joints.remove(key.0)?;
        self.joint_order.retain(|k| *k != key);
        Some(joint)
    }

    pub fn joint(&self, key: JointKey) -> Option<&Joint<F>> {
        self.joints.get(key.0)
    }

    pub fn joint_count(&self) -> usize {
        self.joint_order.len()
    }

    //
    // Colliders
    //

    pub fn add_collider(&mut self, shape: Shape<F>) -> ColliderKey {
        let key = ColliderKey(self.colliders.insert(Collider::new(shape)));
        self.collider_order.push(key);
        log::debug!("added collider {:?}", key.0);
        key
    }

    pub fn remove_collider(&mut self, key: ColliderKey) -> Option<Collider<F>> {
        let collider = self.colliders.remove(key.0)?;
        self.collider_order.retain(|k| *k != key);
        Some(collider)
    }

    pub fn collider(&self, key: ColliderKey) -> Option<&Collider<F>> {
        self.colliders.get(key.0)
    }

    /// Move a collider. Slimes resting on it are carried along on the next tick.
    pub fn move_collider(&mut self, key: ColliderKey, offset: Vec2<F>) -> bool {
        match self.colliders.get_mut(key.0) {
            Some(collider) => {
                collider.move_by(offset);
                true
            }
            None => {
                log::warn!("cannot move unknown collider {:?}", key.0);
                false
            }
        }
    }

    //
    // Simulation
    //

    /// Run as many whole ticks as fit in the accumulated frame time, at most
    /// `max_ticks_per_update`. A backlog beyond that is dropped. Returns the
    /// number of ticks run.
    pub fn update<O: StepObserver>(&mut self, frame_dt: F, observer: &mut O) -> usize {
        if !frame_dt.is_finite() || frame_dt < F::zero() {
            log::warn!("ignoring invalid frame time {frame_dt:?}");
            return 0;
        }
        self.accumulator = self.accumulator + frame_dt;
        let dt = self.config.fixed_dt;
        let mut ticks = 0;
        while self.accumulator >= dt && ticks < self.config.max_ticks_per_update {
            self.step(observer);
            self.accumulator = self.accumulator - dt;
            ticks += 1;
        }
        if self.accumulator >= dt {
            log::debug!("dropping {:?}s of simulation backlog", self.accumulator);
            self.accumulator = F::zero();
        }
        ticks
    }

    /// Advance the simulation by exactly one fixed tick.
    pub fn step<O: StepObserver>(&mut self, observer: &mut O) {
        self.flush_removals();

        let dt = self.config.fixed_dt;
        let views: AllocVec<ColliderView<'_, F>> = self
            .collider_order
            .iter()
            .filter_map(|&key| {
                let collider = self.colliders.get(key.0)?;
                Some(ColliderView { key: Some(key), collider, delta: collider.delta() })
            })
            .collect();
        let mut env = BodyEnv::new(self.config.gravity()).with_colliders(&views);
        if let Some(bounds) = self.config.bounds {
            env = env.with_bounds(bounds);
        }
        let mut updated = 0;
        for key in self.body_order.iter() {
            if let Some(body) = self.bodies.get_mut(key.0) {
                body.update_physics(dt, &env, observer);
                updated += 1;
            }
        }
        drop(views);
        observer.on_bodies_updated(updated);

        let colliding = self.collide_bodies();
        observer.on_collision_pass(colliding);

        let applied = self.update_joints();
        observer.on_joint_pass(applied);

        for collider in self.colliders.iter_mut().map(|(_, c)| c) {
            collider.clear_delta();
        }

        self.tick += 1;
        log::trace!(
            "tick {}: {updated} bodies, {colliding} colliding pairs, {applied} joints",
            self.tick
        );
        observer.on_step_complete();
    }

    /// Body-vs-body pass over every unordered pair. Returns the number of
    /// pairs that needed at least one correction.
    pub fn collide_bodies(&mut self) -> usize {
        let mut colliding = 0;
        let n = self.body_order.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (ka, kb) = (self.body_order[i], self.body_order[j]);
                let (Some(a), Some(b)) = self.bodies.get2_mut(ka.0, kb.0) else {
                    continue;
                };
                if collision::resolve_pair(a, b, &self.config.layers, self.config.min_separation) > 0 {
                    colliding += 1;
                }
            }
        }
        colliding
    }

    /// Apply every active joint once. Returns the number applied.
    pub fn update_joints(&mut self) -> usize {
        let mut applied = 0;
        for key in self.joint_order.iter() {
            let Some(joint) = self.joints.get(key.0) else {
                continue;
            };
            if !joint.is_active() {
                continue;
            }
            match joint.bodies() {
                (a, Some(b)) if a != b => {
                    let (Some(body_a), Some(body_b)) = self.bodies.get2_mut(a.0, b.0) else {
                        continue;
                    };
                    joint.solve(body_a.points_mut(), body_b.points_mut());
                    body_a.refresh();
                    body_b.refresh();
                }
                (a, _) => {
                    let Some(body) = self.bodies.get_mut(a.0) else {
                        continue;
                    };
                    joint.solve_within(body.points_mut());
                    body.refresh();
                }
            }
            applied += 1;
        }
        applied
    }

    fn flush_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let pending = core::mem::take(&mut self.pending_removals);
        for key in pending {
            if self.bodies.remove(key.0).is_none() {
                continue;
            }
            self.body_order.retain(|k| *k != key);
            log::debug!("removed body {:?}", key.0);

            let mut dropped = AllocVec::new();
            self.joint_order.retain(|jk| {
                let keep = self.joints.get(jk.0).map_or(false, |j| !j.references(key));
                if !keep {
                    dropped.push(*jk);
                }
                keep
            });
            for jk in dropped {
                self.joints.remove(jk.0);
                log::debug!("dropped joint {:?} referencing removed body {:?}", jk.0, key.0);
            }
        }
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}
