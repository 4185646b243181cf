//! Verlet point masses, the atoms every soft body is built from.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::{Vec, Vec2};

/// A 2D point mass with implicit (Verlet) velocity.
///
/// Velocity is never stored: it is `position - prev_position` per step.
/// Besides forces, a point carries a displacement accumulator: corrections
/// pushed into it during a substep are averaged, not summed, when
/// [`apply_displacement`](Self::apply_displacement) runs.
#[derive(Clone, Debug)]
pub struct PointMass<F: Float> {
    pub position: Vec2<F>,
    pub prev_position: Vec2<F>,
    /// Force accumulated since the last integration.
    pub force: Vec2<F>,
    /// Sum of pending displacements for the current substep.
    pub displacement: Vec2<F>,
    pub displacement_count: u32,
    pub mass: F,
    pub inv_mass: F,
    pub fixed: bool,
    /// Upper bound on the distance travelled in one integration step.
    pub max_speed: Option<F>,
}

impl<F: Float> PointMass<F> {
    /// Create a free point. A non-positive or non-finite mass falls back to 1.
    pub fn new(position: Vec2<F>, mass: F) -> Self {
        match Self::try_new(position, mass) {
            Ok(p) => p,
            Err(err) => {
                log::warn!("{err}; using unit mass");
                Self::with_valid_mass(position, F::one())
            }
        }
    }

    pub fn try_new(position: Vec2<F>, mass: F) -> Result<Self, PhysicsError> {
        if !mass.is_positive_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        Ok(Self::with_valid_mass(position, mass))
    }

    /// A point that never moves under simulation.
    pub fn fixed(position: Vec2<F>) -> Self {
        let mut p = Self::with_valid_mass(position, F::one());
        p.fixed = true;
        p
    }

    fn with_valid_mass(position: Vec2<F>, mass: F) -> Self {
        PointMass {
            position,
            prev_position: position,
            force: Vec2::zero(),
            displacement: Vec2::zero(),
            displacement_count: 0,
            mass,
            inv_mass: F::one() / mass,
            fixed: false,
            max_speed: None,
        }
    }

    pub fn with_max_speed(mut self, max_speed: Option<F>) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Inverse mass as seen by solvers: zero for fixed points.
    pub fn effective_inv_mass(&self) -> F {
        if self.fixed {
            F::zero()
        } else {
            self.inv_mass
        }
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        if !self.fixed {
            self.force += force;
        }
    }

    /// Mass-independent acceleration, stored as the equivalent force.
    pub fn apply_acceleration(&mut self, accel: Vec2<F>) {
        if !self.fixed {
            self.force += accel.scale(self.mass);
        }
    }

    /// Queue a positional correction for the current substep.
    pub fn add_displacement(&mut self, delta: Vec2<F>) {
        if self.fixed {
            return;
        }
        self.displacement += delta;
        self.displacement_count += 1;
    }

    /// Apply the average of the queued displacements and clear the queue.
    /// Returns whether the point moved.
    pub fn apply_displacement(&mut self) -> bool {
        let count = self.displacement_count;
        let delta = self.displacement;
        self.displacement = Vec2::zero();
        self.displacement_count = 0;
        if self.fixed || count == 0 {
            return false;
        }
        self.position += delta.scale(F::one() / F::from_f32(count as f32));
        true
    }

    pub fn integrate(&mut self, dt: F, damping: F) {
        if self.fixed {
            self.prev_position = self.position;
            self.force = Vec2::zero();
            return;
        }
        let mut velocity = (self.position - self.prev_position).scale(damping);
        if let Some(max_speed) = self.max_speed {
            if velocity.length_sq() > max_speed * max_speed {
                velocity = velocity.normalize().scale(max_speed);
            }
        }
        let accel = self.force.scale(self.inv_mass);
        self.prev_position = self.position;
        self.position = self.position + velocity + accel.scale(dt * dt);
        self.force = Vec2::zero();
    }

    pub fn velocity(&self, dt: F) -> Vec2<F> {
        if dt.is_near_zero(F::from_f32(1e-30)) {
            return Vec2::zero();
        }
        (self.position - self.prev_position).scale(F::one() / dt)
    }

    /// Displacement over the last step (velocity * dt).
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.position - self.prev_position
    }

    /// Overwrite the implicit velocity, expressed per step.
    pub fn set_velocity_raw(&mut self, velocity: Vec2<F>) {
        self.prev_position = self.position - velocity;
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
        if fixed {
            self.prev_position = self.position;
            self.force = Vec2::zero();
            self.displacement = Vec2::zero();
            self.displacement_count = 0;
        }
    }

    /// Kinematic move of a fixed point; free points are left to the solver.
    pub fn move_to(&mut self, position: Vec2<F>) {
        if self.fixed {
            self.prev_position = self.position;
            self.position = position;
        }
    }

    /// Shift without changing the implicit velocity.
    pub fn translate(&mut self, offset: Vec2<F>) {
        self.position += offset;
        self.prev_position += offset;
    }

    /// Place at `position` at rest.
    pub fn teleport(&mut self, position: Vec2<F>) {
        self.position = position;
        self.prev_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_is_averaged() {
        let mut p = PointMass::new(Vec2::new(0.0f32, 0.0), 1.0);
        p.add_displacement(Vec2::new(2.0, 0.0));
        p.add_displacement(Vec2::new(4.0, 0.0));
        assert!(p.apply_displacement());
        assert!((p.position.x - 3.0).abs() < 1e-6);
        assert_eq!(p.displacement_count, 0);
        assert!(!p.apply_displacement());
    }

    #[test]
    fn max_speed_caps_step() {
        let mut p = PointMass::new(Vec2::new(0.0f32, 0.0), 1.0).with_max_speed(Some(1.0));
        p.prev_position = Vec2::new(-10.0, 0.0);
        p.integrate(1.0 / 60.0, 1.0);
        assert!((p.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_mass_is_rejected() {
        assert_eq!(
            PointMass::try_new(Vec2::new(0.0f32, 0.0), 0.0).unwrap_err(),
            PhysicsError::InvalidMass
        );
        let p = PointMass::new(Vec2::new(0.0f32, 0.0), -3.0);
        assert_eq!(p.mass, 1.0);
    }

    #[test]
    fn fixed_point_ignores_displacement() {
        let mut p = PointMass::fixed(Vec2::new(1.0f32, 1.0));
        p.add_displacement(Vec2::new(5.0, 5.0));
        p.apply_force(Vec2::new(100.0, 0.0));
        p.integrate(1.0 / 60.0, 1.0);
        assert!(!p.apply_displacement());
        assert_eq!(p.position, Vec2::new(1.0, 1.0));
        assert_eq!(p.prev_position, p.position);
    }
}
