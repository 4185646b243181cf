//! 2D soft-body physics: slimes, squishy circles and deformable outlines.
//!
//! `squishy` simulates bodies built from a closed ring of Verlet point masses,
//! held together by distance and spring constraints, optionally pressurized,
//! and colliding with static shapes and with each other.
//!
//! # Features
//!
//! - **Verlet point masses**: implicit velocity, per-point speed cap, fixed points
//! - **Constraints**: rigid distance (position-based) and damped springs
//! - **Pressure**: area-restoring push along outward vertex normals
//! - **Body kinds**: spring rings, reinforced circles, framed outlines, slimes
//! - **Collisions**: point vs circle/box/polygon with restitution, body vs
//!   body with layer filtering
//! - **Joints**: weighted centroid, weld and fixed-point couplings
//! - **World**: fixed-timestep scheduler with deferred removal
//! - **Observable**: monitor ticks via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! # Example
//!
//! ```
//! use squishy::{BodyConfig, NoOpStepObserver, Shape, SoftBody, Vec2, World, WorldConfig};
//!
//! let mut world: World<f32> = World::new(WorldConfig::new().with_gravity(Vec2::new(0.0, -1.0), 300.0));
//! world.add_collider(Shape::rect(Vec2::new(-500.0, -50.0), Vec2::new(500.0, 0.0)));
//! let slime = world.add_body(SoftBody::slime(Vec2::new(0.0, 60.0), 30.0, 16, 1.5, BodyConfig::new()));
//!
//! for _ in 0..120 {
//!     world.step(&mut NoOpStepObserver);
//! }
//! assert!(world.body(slime).unwrap().bounds().min.y >= 0.0);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod point;
pub mod constraint;
pub mod pressure;
pub mod solver;
pub mod shape;
pub mod layer;
pub mod collision;
pub mod body;
pub mod joint;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use point::PointMass;
pub use constraint::{Constraint, DistanceConstraint, SpringConstraint};
pub use pressure::Pressure;
pub use solver::ConstraintSolver;
pub use shape::{Aabb, Polygon, Shape, StaticCollider};
pub use layer::{CollisionLayer, CollisionLayerMatrix};
pub use collision::{Collider, ColliderView, ContactParams};
pub use body::{BodyEnv, BodyKind, Drag, DragSignal, SoftBody};
pub use joint::{FixedPointJoint, Joint, JointKind, WeightedJoint, WeightedPoint, WeldJoint};
pub use world::{BodyKey, ColliderKey, JointKey, World};
pub use config::{BodyConfig, SolverConfig, WorldConfig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::PhysicsError;
