//! Configuration types for the solver, soft bodies and the world.

use crate::float::Float;
use crate::layer::{CollisionLayer, CollisionLayerMatrix};
use crate::shape::Aabb;
use crate::vec::{Vec, Vec2};

/// Configuration for the generic [`ConstraintSolver`](crate::solver::ConstraintSolver).
///
/// # Builder Pattern
/// ```
/// use squishy::config::SolverConfig;
/// use squishy::vec::Vec2;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_iterations(8)
///     .with_gravity(Vec2::new(0.0, -9.81))
///     .with_damping(0.99)
///     .with_sub_steps(2);
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfig<F: Float> {
    /// Number of constraint solver iterations per sub-step. Default: 4.
    pub iterations: usize,
    /// Gravity acceleration vector. Default: zero (no gravity).
    pub gravity: Vec2<F>,
    /// Velocity damping factor [0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Number of sub-steps per frame. Default: 1.
    pub sub_steps: usize,
}

impl<F: Float> SolverConfig<F> {
    pub fn new() -> Self {
        SolverConfig {
            iterations: 4,
            gravity: Vec2::zero(),
            damping: F::from_f32(0.99),
            sub_steps: 1,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping.saturate();
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction and per-tick parameters of a soft body.
///
/// Fields that only matter for one body kind are ignored by the others.
#[derive(Clone, Debug)]
pub struct BodyConfig<F: Float> {
    /// Mass of every point. Default: 1.
    pub mass: F,
    /// Velocity kept per integration step. Default: 0.99.
    pub damping: F,
    /// Constraint-solving substeps per tick. Default: 8.
    pub iterations: usize,
    /// Stiffness of perimeter constraints. Default: 1.
    pub stiffness: F,
    /// Damping of spring constraints. Default: 0.1.
    pub spring_damping: F,
    /// Ring bodies: also link every point to the one this many steps ahead.
    pub internal_skip: Option<usize>,
    /// Stiffness of internal and cross constraints. Default: 0.5.
    pub internal_stiffness: F,
    /// Circular bodies: pull of each point toward the radius. Default: 0.2.
    pub radial_stiffness: F,
    /// Framed bodies: pull toward the rotated template. Default: 0.2.
    pub frame_stiffness: F,
    /// Gain of the pressure force. Default: 0.01.
    pub pressure_force: F,
    /// Per-step travel cap for every point. Default: none.
    pub max_speed: Option<F>,
    pub collision_layer: CollisionLayer,
    pub collidable: bool,
    /// Velocity kept after bouncing off a static collider. Default: 0.3.
    pub restitution: F,
    /// Gap left between a resolved point and a collider surface. Default: 0.01.
    pub skin: F,
    /// Points closer than this to a surface count as touching. Default: 0.01.
    pub contact_distance: F,
}

impl<F: Float> BodyConfig<F> {
    pub fn new() -> Self {
        BodyConfig {
            mass: F::one(),
            damping: F::from_f32(0.99),
            iterations: 8,
            stiffness: F::one(),
            spring_damping: F::from_f32(0.1),
            internal_skip: None,
            internal_stiffness: F::half(),
            radial_stiffness: F::from_f32(0.2),
            frame_stiffness: F::from_f32(0.2),
            pressure_force: F::from_f32(0.01),
            max_speed: None,
            collision_layer: 0,
            collidable: true,
            restitution: F::from_f32(0.3),
            skin: F::from_f32(0.01),
            contact_distance: F::from_f32(0.01),
        }
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping.saturate();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness.saturate();
        self
    }

    pub fn with_spring_damping(mut self, damping: F) -> Self {
        self.spring_damping = damping.saturate();
        self
    }

    pub fn with_internal_springs(mut self, skip: usize, stiffness: F) -> Self {
        self.internal_skip = Some(skip);
        self.internal_stiffness = stiffness.saturate();
        self
    }

    pub fn with_radial_stiffness(mut self, stiffness: F) -> Self {
        self.radial_stiffness = stiffness.saturate();
        self
    }

    pub fn with_frame_stiffness(mut self, stiffness: F) -> Self {
        self.frame_stiffness = stiffness.saturate();
        self
    }

    pub fn with_pressure_force(mut self, force: F) -> Self {
        self.pressure_force = force;
        self
    }

    pub fn with_max_speed(mut self, max_speed: F) -> Self {
        self.max_speed = Some(max_speed);
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.collision_layer = layer;
        self
    }

    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution.saturate();
        self
    }

    pub fn with_skin(mut self, skin: F) -> Self {
        self.skin = skin.max(F::zero());
        self.contact_distance = self.contact_distance.max(self.skin);
        self
    }
}

impl<F: Float> Default for BodyConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// World-level simulation settings.
#[derive(Clone, Debug)]
pub struct WorldConfig<F: Float> {
    /// Length of one tick in seconds. Default: 1/60.
    pub fixed_dt: F,
    /// Direction of gravity; normalized on use. Default: -Y.
    pub gravity_direction: Vec2<F>,
    /// Default: 9.81.
    pub gravity_magnitude: F,
    /// Points are clamped into these bounds when set.
    pub bounds: Option<Aabb<F>>,
    /// Closest two points of different bodies may get. Default: 2.
    pub min_separation: F,
    pub layers: CollisionLayerMatrix,
    /// Cap on ticks run by one `World::update` call. Default: 8.
    pub max_ticks_per_update: usize,
}

impl<F: Float> WorldConfig<F> {
    pub fn new() -> Self {
        WorldConfig {
            fixed_dt: F::one() / F::from_f32(60.0),
            gravity_direction: Vec2::new(F::zero(), -F::one()),
            gravity_magnitude: F::from_f32(9.81),
            bounds: None,
            min_separation: F::two(),
            layers: CollisionLayerMatrix::default(),
            max_ticks_per_update: 8,
        }
    }

    pub fn with_fixed_dt(mut self, dt: F) -> Self {
        if dt.is_positive_finite() {
            self.fixed_dt = dt;
        } else {
            log::warn!("ignoring non-positive fixed timestep {dt:?}");
        }
        self
    }

    pub fn with_gravity(mut self, direction: Vec2<F>, magnitude: F) -> Self {
        self.gravity_direction = direction;
        self.gravity_magnitude = magnitude;
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb<F>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_min_separation(mut self, min_separation: F) -> Self {
        self.min_separation = min_separation.max(F::zero());
        self
    }

    pub fn with_layers(mut self, layers: CollisionLayerMatrix) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_max_ticks_per_update(mut self, max_ticks: usize) -> Self {
        self.max_ticks_per_update = max_ticks.max(1);
        self
    }

    /// Gravity as an acceleration vector.
    pub fn gravity(&self) -> Vec2<F> {
        self.gravity_direction.normalize().scale(self.gravity_magnitude)
    }
}

impl<F: Float> Default for WorldConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
