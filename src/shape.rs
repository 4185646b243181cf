//! Static collider shapes and axis-aligned bounds.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::{centroid, Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Aabb<F> {
    /// Corners may be given in any order.
    pub fn new(a: Vec2<F>, b: Vec2<F>) -> Self {
        Aabb {
            min: a.component_min(b),
            max: a.component_max(b),
        }
    }

    pub fn from_center(center: Vec2<F>, half_extents: Vec2<F>) -> Self {
        Aabb::new(center - half_extents, center + half_extents)
    }

    /// Tight bounds of a point set, `None` when empty.
    pub fn from_points<I: IntoIterator<Item = Vec2<F>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Aabb { min: first, max: first };
        for p in iter {
            bounds.min = bounds.min.component_min(p);
            bounds.max = bounds.max.component_max(p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Vec2<F> {
        (self.min + self.max).scale(F::half())
    }

    pub fn size(&self) -> Vec2<F> {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn expanded(&self, margin: F) -> Self {
        let m = Vec2::new(margin, margin);
        Aabb { min: self.min - m, max: self.max + m }
    }

    pub fn translated(&self, offset: Vec2<F>) -> Self {
        Aabb { min: self.min + offset, max: self.max + offset }
    }

    /// Closest point on the boundary. For interior points this is the
    /// projection onto the nearest edge.
    pub fn closest_boundary_point(&self, p: Vec2<F>) -> Vec2<F> {
        if !self.contains(p) {
            return Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y));
        }
        let left = p.x - self.min.x;
        let right = self.max.x - p.x;
        let bottom = p.y - self.min.y;
        let top = self.max.y - p.y;
        let nearest = left.min(right).min(bottom).min(top);
        if nearest == top {
            Vec2::new(p.x, self.max.y)
        } else if nearest == bottom {
            Vec2::new(p.x, self.min.y)
        } else if nearest == left {
            Vec2::new(self.min.x, p.y)
        } else {
            Vec2::new(self.max.x, p.y)
        }
    }
}

/// Interface the collision resolver needs from a static collider.
pub trait StaticCollider<F: Float> {
    /// Closest point on the collider's surface.
    fn closest_point(&self, point: Vec2<F>) -> Vec2<F>;
    /// Whether `point` lies inside the collider.
    fn overlap_point(&self, point: Vec2<F>) -> bool;
    fn bounds(&self) -> Aabb<F>;

    /// Reference point used when the surface direction is degenerate.
    fn center(&self) -> Vec2<F> {
        self.bounds().center()
    }
}

/// A simple (non self-intersecting) polygon with cached bounds.
#[derive(Clone, Debug)]
pub struct Polygon<F: Float> {
    vertices: AllocVec<Vec2<F>>,
    bounds: Aabb<F>,
}

impl<F: Float> Polygon<F> {
    pub fn new(vertices: AllocVec<Vec2<F>>) -> Result<Self, PhysicsError> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InsufficientPoints { count: vertices.len() });
        }
        let bounds = Aabb::from_points(vertices.iter().copied()).ok_or(PhysicsError::EmptyPointSet)?;
        Ok(Polygon { vertices, bounds })
    }

    pub fn vertices(&self) -> &[Vec2<F>] {
        &self.vertices
    }

    fn translate(&mut self, offset: Vec2<F>) {
        for v in self.vertices.iter_mut() {
            *v += offset;
        }
        self.bounds = self.bounds.translated(offset);
    }
}

/// Closest point to `p` on segment `a`-`b`.
pub fn closest_on_segment<F: Float>(p: Vec2<F>, a: Vec2<F>, b: Vec2<F>) -> Vec2<F> {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < F::epsilon() * F::epsilon() {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).saturate();
    a + ab.scale(t)
}

/// Even-odd ray cast point-in-polygon test.
pub fn polygon_contains<F: Float>(vertices: &[Vec2<F>], point: Vec2<F>) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = vertices[i];
        let pj = vertices[j];
        let dy = pj.y - pi.y;
        if !dy.is_near_zero(F::from_f32(1e-10))
            && ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / dy + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Static collider geometry.
#[derive(Clone, Debug)]
pub enum Shape<F: Float> {
    Circle { center: Vec2<F>, radius: F },
    Rect(Aabb<F>),
    Polygon(Polygon<F>),
}

impl<F: Float> Shape<F> {
    pub fn circle(center: Vec2<F>, radius: F) -> Self {
        Shape::Circle { center, radius: radius.abs() }
    }

    pub fn rect(a: Vec2<F>, b: Vec2<F>) -> Self {
        Shape::Rect(Aabb::new(a, b))
    }

    pub fn polygon(vertices: AllocVec<Vec2<F>>) -> Result<Self, PhysicsError> {
        Polygon::new(vertices).map(Shape::Polygon)
    }

    pub fn translate(&mut self, offset: Vec2<F>) {
        match self {
            Shape::Circle { center, .. } => *center += offset,
            Shape::Rect(aabb) => *aabb = aabb.translated(offset),
            Shape::Polygon(poly) => poly.translate(offset),
        }
    }
}

impl<F: Float> StaticCollider<F> for Shape<F> {
    fn closest_point(&self, point: Vec2<F>) -> Vec2<F> {
        match self {
            Shape::Circle { center, radius } => {
                let dir = (point - *center).try_normalize().unwrap_or_else(Vec2::unit_y);
                *center + dir.scale(*radius)
            }
            Shape::Rect(aabb) => aabb.closest_boundary_point(point),
            Shape::Polygon(poly) => {
                let v = &poly.vertices;
                let n = v.len();
                let mut best = v[0];
                let mut best_dist = F::zero();
                for i in 0..n {
                    let candidate = closest_on_segment(point, v[i], v[(i + 1) % n]);
                    let d = candidate.distance_sq(point);
                    if i == 0 || d < best_dist {
                        best = candidate;
                        best_dist = d;
                    }
                }
                best
            }
        }
    }

    fn overlap_point(&self, point: Vec2<F>) -> bool {
        match self {
            Shape::Circle { center, radius } => point.distance_sq(*center) < *radius * *radius,
            Shape::Rect(aabb) => {
                point.x > aabb.min.x && point.x < aabb.max.x && point.y > aabb.min.y && point.y < aabb.max.y
            }
            Shape::Polygon(poly) => {
                poly.bounds.contains(point) && polygon_contains(&poly.vertices, point)
            }
        }
    }

    fn bounds(&self) -> Aabb<F> {
        match self {
            Shape::Circle { center, radius } => {
                Aabb::from_center(*center, Vec2::new(*radius, *radius))
            }
            Shape::Rect(aabb) => *aabb,
            Shape::Polygon(poly) => poly.bounds,
        }
    }

    fn center(&self) -> Vec2<F> {
        match self {
            Shape::Circle { center, .. } => *center,
            Shape::Rect(aabb) => aabb.center(),
            Shape::Polygon(poly) => centroid(poly.vertices.iter().copied()),
        }
    }
}
