//! Collision response: points against static colliders and world bounds,
//! and body against body.

use crate::body::SoftBody;
use crate::config::BodyConfig;
use crate::float::Float;
use crate::layer::CollisionLayerMatrix;
use crate::point::PointMass;
use crate::shape::{Aabb, Shape, StaticCollider};
use crate::vec::{Vec, Vec2};
use crate::world::ColliderKey;

/// A static shape registered in a world. Hosts may move it between ticks;
/// the motion since the last tick is kept so bodies resting on it can be
/// carried along.
#[derive(Clone, Debug)]
pub struct Collider<F: Float> {
    shape: Shape<F>,
    delta: Vec2<F>,
}

impl<F: Float> Collider<F> {
    pub fn new(shape: Shape<F>) -> Self {
        Collider { shape, delta: Vec2::zero() }
    }

    pub fn shape(&self) -> &Shape<F> {
        &self.shape
    }

    pub fn move_by(&mut self, offset: Vec2<F>) {
        self.shape.translate(offset);
        self.delta += offset;
    }

    /// Motion accumulated since the last tick.
    pub fn delta(&self) -> Vec2<F> {
        self.delta
    }

    pub(crate) fn clear_delta(&mut self) {
        self.delta = Vec2::zero();
    }
}

impl<F: Float> StaticCollider<F> for Collider<F> {
    fn closest_point(&self, point: Vec2<F>) -> Vec2<F> {
        self.shape.closest_point(point)
    }

    fn overlap_point(&self, point: Vec2<F>) -> bool {
        self.shape.overlap_point(point)
    }

    fn bounds(&self) -> Aabb<F> {
        self.shape.bounds()
    }

    fn center(&self) -> Vec2<F> {
        self.shape.center()
    }
}

/// A collider as seen by a body during one tick.
#[derive(Clone, Copy)]
pub struct ColliderView<'a, F: Float> {
    /// Registry key, `None` for colliders supplied outside a world.
    pub key: Option<ColliderKey>,
    pub collider: &'a dyn StaticCollider<F>,
    /// Motion of the collider since the previous tick.
    pub delta: Vec2<F>,
}

impl<'a, F: Float> ColliderView<'a, F> {
    pub fn new(collider: &'a dyn StaticCollider<F>) -> Self {
        ColliderView { key: None, collider, delta: Vec2::zero() }
    }
}

/// Contact response parameters of one body.
#[derive(Copy, Clone, Debug)]
pub struct ContactParams<F: Float> {
    pub skin: F,
    pub contact_distance: F,
    pub restitution: F,
}

impl<F: Float> ContactParams<F> {
    pub fn from_config(config: &BodyConfig<F>) -> Self {
        ContactParams {
            skin: config.skin,
            contact_distance: config.contact_distance.max(config.skin),
            restitution: config.restitution,
        }
    }
}

/// Push `point` out of `collider` if it is inside or touching it.
///
/// The point ends at `surface + normal * skin`, and its implicit velocity is
/// reflected about the normal and scaled by the restitution when it was
/// moving into the surface. Returns whether the point was in contact.
pub fn resolve_point_static<F: Float, C: StaticCollider<F> + ?Sized>(
    point: &mut PointMass<F>,
    collider: &C,
    params: &ContactParams<F>,
) -> bool {
    if point.fixed {
        return false;
    }
    let pos = point.position;
    let inside = collider.overlap_point(pos);
    let surface = collider.closest_point(pos);
    let offset = pos - surface;
    if !inside && offset.length() >= params.contact_distance {
        return false;
    }

    let surface_dir = if inside { -offset } else { offset };
    let normal = surface_dir
        .try_normalize()
        .or_else(|| (pos - collider.center()).try_normalize())
        .unwrap_or_else(Vec2::unit_y);

    let velocity = point.velocity_raw();
    point.position = surface + normal.scale(params.skin);
    let response = if velocity.dot(normal) < F::zero() {
        velocity.reflect(normal).scale(params.restitution)
    } else {
        velocity
    };
    point.set_velocity_raw(response);
    true
}

/// Clamp a point into `bounds`, bouncing its velocity off the walls it hit.
pub fn clamp_to_bounds<F: Float>(point: &mut PointMass<F>, bounds: &Aabb<F>, restitution: F) -> bool {
    if point.fixed {
        return false;
    }
    let mut hit = false;
    let p = point;
    if p.position.x < bounds.min.x || p.position.x > bounds.max.x {
        p.position.x = p.position.x.clamp(bounds.min.x, bounds.max.x);
        let vel_x = p.position.x - p.prev_position.x;
        p.prev_position.x = p.position.x + vel_x * restitution;
        hit = true;
    }
    if p.position.y < bounds.min.y || p.position.y > bounds.max.y {
        p.position.y = p.position.y.clamp(bounds.min.y, bounds.max.y);
        let vel_y = p.position.y - p.prev_position.y;
        p.prev_position.y = p.position.y + vel_y * restitution;
        hit = true;
    }
    hit
}

/// Separate two point clouds so that no cross pair is closer than
/// `min_separation`. Each pair is pushed apart along its own delta by half
/// the penetration per point (the whole of it when one point is fixed).
/// Returns the number of corrected point pairs.
pub fn separate_points<F: Float>(
    a: &mut [PointMass<F>],
    center_a: Vec2<F>,
    b: &mut [PointMass<F>],
    center_b: Vec2<F>,
    min_separation: F,
) -> usize {
    let min_sq = min_separation * min_separation;
    let mut corrected = 0;
    for pa in a.iter_mut() {
        for pb in b.iter_mut() {
            let delta = pb.position - pa.position;
            let dist_sq = delta.length_sq();
            if dist_sq >= min_sq {
                continue;
            }
            let (share_a, share_b) = match (pa.fixed, pb.fixed) {
                (true, true) => continue,
                (true, false) => (F::zero(), F::one()),
                (false, true) => (F::one(), F::zero()),
                (false, false) => (F::half(), F::half()),
            };
            // direction A -> B
            let normal = delta
                .try_normalize()
                .or_else(|| (center_a - pa.position).try_normalize())
                .or_else(|| (center_b - center_a).try_normalize())
                .unwrap_or_else(Vec2::unit_x);
            let penetration = min_separation - dist_sq.sqrt();
            pa.position -= normal.scale(penetration * share_a);
            pb.position += normal.scale(penetration * share_b);
            corrected += 1;
        }
    }
    corrected
}

/// Body-vs-body response for one unordered pair.
///
/// Skipped when either body is not collidable, when their layers don't
/// collide, or when their bounds (grown by `min_separation`) don't overlap.
/// Returns the number of corrected point pairs.
pub fn resolve_pair<F: Float>(
    a: &mut SoftBody<F>,
    b: &mut SoftBody<F>,
    layers: &CollisionLayerMatrix,
    min_separation: F,
) -> usize {
    if !a.is_collidable() || !b.is_collidable() {
        return 0;
    }
    if !layers.can_collide(a.collision_layer(), b.collision_layer()) {
        return 0;
    }
    if !a.bounds().expanded(min_separation).overlaps(&b.bounds()) {
        return 0;
    }
    let (center_a, center_b) = (a.center(), b.center());
    let corrected = separate_points(a.points_mut(), center_a, b.points_mut(), center_b, min_separation);
    if corrected > 0 {
        a.refresh();
        b.refresh();
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ContactParams<f32> {
        ContactParams { skin: 0.01, contact_distance: 0.01, restitution: 0.5 }
    }

    #[test]
    fn point_inside_box_is_pushed_to_surface_plus_skin() {
        let floor = Shape::rect(Vec2::new(-10.0f32, -10.0), Vec2::new(10.0, 0.0));
        let mut p = PointMass::new(Vec2::new(1.0, -0.5), 1.0);
        p.prev_position = Vec2::new(1.0, 0.5);
        assert!(resolve_point_static(&mut p, &floor, &params()));
        assert!((p.position.y - 0.01).abs() < 1e-6);
        assert!(!floor.overlap_point(p.position));
        // moving down at 1 per step, bounces up at half speed
        assert!((p.velocity_raw().y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn point_leaving_the_surface_keeps_its_velocity() {
        let floor = Shape::rect(Vec2::new(-10.0f32, -10.0), Vec2::new(10.0, 0.0));
        let mut p = PointMass::new(Vec2::new(1.0, -0.5), 1.0);
        p.prev_position = Vec2::new(0.8, -0.8);
        assert!(resolve_point_static(&mut p, &floor, &params()));
        assert!((p.position.y - 0.01).abs() < 1e-6);
        // reflecting would aim it back into the floor
        assert!((p.velocity_raw() - Vec2::new(0.2, 0.3)).length() < 1e-5);
    }

    #[test]
    fn distant_point_is_untouched() {
        let c = Shape::circle(Vec2::new(0.0f32, 0.0), 1.0);
        let mut p = PointMass::new(Vec2::new(5.0, 0.0), 1.0);
        assert!(!resolve_point_static(&mut p, &c, &params()));
        assert_eq!(p.position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn point_on_surface_uses_center_direction() {
        let c = Shape::circle(Vec2::new(0.0f32, 0.0), 1.0);
        let mut p = PointMass::new(Vec2::new(1.0, 0.0), 1.0);
        assert!(resolve_point_static(&mut p, &c, &params()));
        assert!((p.position.x - 1.01).abs() < 1e-5);
        assert!(p.position.y.abs() < 1e-6);
    }

    #[test]
    fn bounds_clamp_reflects_velocity() {
        let bounds = Aabb::new(Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 10.0));
        let mut p = PointMass::new(Vec2::new(-1.0, 5.0), 1.0);
        p.prev_position = Vec2::new(1.0, 5.0);
        assert!(clamp_to_bounds(&mut p, &bounds, 0.5));
        assert_eq!(p.position.x, 0.0);
        assert!((p.velocity_raw().x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn coincident_points_separate_along_body_radius() {
        let mut a = [PointMass::new(Vec2::new(1.0f32, 0.0), 1.0)];
        let mut b = [PointMass::new(Vec2::new(1.0f32, 0.0), 1.0)];
        let n = separate_points(&mut a, Vec2::new(0.0, 0.0), &mut b, Vec2::new(0.0, 0.0), 2.0);
        assert_eq!(n, 1);
        assert!((a[0].position.x - 2.0).abs() < 1e-6);
        assert!(b[0].position.x.abs() < 1e-6);
    }

    #[test]
    fn fixed_point_pushes_the_other_fully() {
        let mut a = [PointMass::fixed(Vec2::new(0.0f32, 0.0))];
        let mut b = [PointMass::new(Vec2::new(0.5f32, 0.0), 1.0)];
        separate_points(&mut a, Vec2::new(-1.0, 0.0), &mut b, Vec2::new(1.0, 0.0), 2.0);
        assert_eq!(a[0].position, Vec2::new(0.0, 0.0));
        assert!((b[0].position.x - 2.0).abs() < 1e-6);
    }
}
