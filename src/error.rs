//! Error types for configuration and registration.
//!
//! The simulation loop never returns these: a tick always runs to
//! completion. They come out of the `try_*` constructors and registration
//! calls, whose infallible counterparts log the problem and fall back.

/// Errors that can occur while building bodies, constraints or joints.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("mass must be positive and finite")]
    InvalidMass,
    #[error("stiffness and damping must be finite")]
    InvalidStiffness,
    #[error("point index {index} out of bounds (count: {count})")]
    PointOutOfBounds { index: usize, count: usize },
    #[error("shape needs at least 3 points, got {count}")]
    InsufficientPoints { count: usize },
    #[error("body is not registered in this world")]
    UnknownBody,
    #[error("point set is empty")]
    EmptyPointSet,
}
