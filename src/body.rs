//! Soft bodies: closed rings of point masses held together by constraints,
//! optional pressure, and a shape-keeping rule that depends on the kind.

use crate::collision::{self, ColliderView, ContactParams};
use crate::config::BodyConfig;
use crate::constraint::{self, Constraint, DistanceConstraint, SpringConstraint};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::layer::CollisionLayer;
use crate::observer::StepObserver;
use crate::point::PointMass;
use crate::pressure::{self, Pressure};
use crate::shape::{polygon_contains, Aabb};
use crate::vec::{centroid, Vec, Vec2};
use crate::world::ColliderKey;
use alloc::vec::Vec as AllocVec;

const MIN_POINTS: usize = 3;

/// Shape-keeping strategy of a body, with the state it needs.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind<F: Float> {
    /// Perimeter springs, optionally internal springs and pressure.
    Ring { radius: F },
    /// Perimeter and cross distance constraints plus a radial pull toward
    /// the centroid. `projection` softly pulls every point to its ideal
    /// slot on the circle.
    Circular { radius: F, projection: Option<F> },
    /// Arbitrary outline kept by pulling every point toward a rigid local
    /// template that follows the body's translation and rotation.
    Framed {
        frame_points: AllocVec<Vec2<F>>,
        frame_rotation: F,
    },
    /// Pressurized ring, inflated to `puffiness` times the area of its
    /// construction circle. Can be dragged and carried by moving colliders.
    Slime {
        radius: F,
        puffiness: F,
        drag: Option<Drag>,
    },
}

impl<F: Float> BodyKind<F> {
    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Ring { .. } => "ring",
            BodyKind::Circular { .. } => "circular",
            BodyKind::Framed { .. } => "framed",
            BodyKind::Slime { .. } => "slime",
        }
    }
}

/// A point held by an external drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Drag {
    pub point: usize,
    was_fixed: bool,
}

/// Pointer state forwarded by the host's input layer.
#[derive(Copy, Clone, Debug)]
pub struct DragSignal<F: Float> {
    pub position: Vec2<F>,
    /// The button went down this frame.
    pub pressed: bool,
    /// The button went up this frame.
    pub released: bool,
}

/// What a body sees of the world during one tick.
#[derive(Clone, Copy)]
pub struct BodyEnv<'a, F: Float> {
    pub gravity: Vec2<F>,
    pub bounds: Option<Aabb<F>>,
    pub colliders: &'a [ColliderView<'a, F>],
}

impl<'a, F: Float> BodyEnv<'a, F> {
    pub fn new(gravity: Vec2<F>) -> Self {
        BodyEnv { gravity, bounds: None, colliders: &[] }
    }

    pub fn with_bounds(mut self, bounds: Aabb<F>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_colliders(mut self, colliders: &'a [ColliderView<'a, F>]) -> Self {
        self.colliders = colliders;
        self
    }
}

/// A deformable 2D body.
///
/// Points form a closed ring: point `i` neighbours `(i + 1) % n`. Center,
/// bounds and area are cached after every update.
#[derive(Clone, Debug)]
pub struct SoftBody<F: Float> {
    points: AllocVec<PointMass<F>>,
    constraints: AllocVec<Constraint<F>>,
    pressure: Option<Pressure<F>>,
    kind: BodyKind<F>,
    config: BodyConfig<F>,
    user_force: Vec2<F>,
    /// Collider each point last touched during the previous tick.
    contacts: AllocVec<Option<ColliderKey>>,
    center: Vec2<F>,
    bounds: Aabb<F>,
    area: F,
}

fn check_count(count: usize) -> Result<(), PhysicsError> {
    if count < MIN_POINTS {
        Err(PhysicsError::InsufficientPoints { count })
    } else {
        Ok(())
    }
}

fn checked_count(count: usize, kind: &str) -> usize {
    if count < MIN_POINTS {
        log::warn!("{kind} body needs at least {MIN_POINTS} points, got {count}; using {MIN_POINTS}");
        MIN_POINTS
    } else {
        count
    }
}

fn check_config<F: Float>(config: &BodyConfig<F>) -> Result<(), PhysicsError> {
    if !config.mass.is_positive_finite() {
        return Err(PhysicsError::InvalidMass);
    }
    let gains = [
        config.stiffness,
        config.spring_damping,
        config.internal_stiffness,
        config.radial_stiffness,
        config.frame_stiffness,
        config.pressure_force,
        config.restitution,
        config.damping,
    ];
    if gains.iter().any(|g| !g.is_finite()) {
        return Err(PhysicsError::InvalidStiffness);
    }
    Ok(())
}

fn default_frame<F: Float>() -> AllocVec<Vec2<F>> {
    let x = F::from_f32(0.866);
    let y = F::from_f32(-0.5);
    alloc::vec![Vec2::new(F::zero(), F::one()), Vec2::new(-x, y), Vec2::new(x, y)]
}

/// Offset of slot `i` of `n` on a circle of `radius`, counter-clockwise from +X.
fn circle_slot<F: Float>(i: usize, n: usize, radius: F) -> Vec2<F> {
    let angle = F::two() * F::pi() * F::from_usize(i) / F::from_usize(n);
    Vec2::from_angle(angle).scale(radius)
}

/// Rotation that best maps `offsets` onto the points' offsets from `center`.
fn estimate_rotation<F: Float, I: IntoIterator<Item = Vec2<F>>>(
    offsets: I,
    points: &[PointMass<F>],
    center: Vec2<F>,
) -> F {
    let mut cross = F::zero();
    let mut dot = F::zero();
    for (offset, point) in offsets.into_iter().zip(points) {
        let d = point.position - center;
        cross = cross + offset.cross(d);
        dot = dot + offset.dot(d);
    }
    if cross.abs() < F::epsilon() && dot.abs() < F::epsilon() {
        return F::zero();
    }
    F::atan2(cross, dot)
}

/// `count` points spread evenly by arc length around a closed outline.
fn resample_closed<F: Float>(vertices: &[Vec2<F>], count: usize) -> AllocVec<Vec2<F>> {
    let n = vertices.len();
    let edge_len = |i: usize| vertices[i].distance(vertices[(i + 1) % n]);
    let perimeter = (0..n).fold(F::zero(), |sum, i| sum + edge_len(i));
    if perimeter < F::epsilon() {
        return alloc::vec![vertices[0]; count];
    }
    let step = perimeter / F::from_usize(count);
    let mut out = AllocVec::with_capacity(count);
    let mut edge = 0;
    let mut edge_start = F::zero();
    for k in 0..count {
        let s = step * F::from_usize(k);
        while edge + 1 < n && edge_start + edge_len(edge) < s {
            edge_start = edge_start + edge_len(edge);
            edge += 1;
        }
        let len = edge_len(edge);
        let t = if len > F::epsilon() { ((s - edge_start) / len).saturate() } else { F::zero() };
        out.push(vertices[edge].lerp(vertices[(edge + 1) % n], t));
    }
    out
}

/// Shift an outline so its centroid sits at the origin.
fn centered<F: Float>(vertices: AllocVec<Vec2<F>>) -> AllocVec<Vec2<F>> {
    let c = centroid(vertices.iter().copied());
    vertices.into_iter().map(|v| v - c).collect()
}

impl<F: Float> SoftBody<F> {
    /// Ring of `point_count` points on a circle, linked by perimeter springs.
    pub fn ring(center: Vec2<F>, radius: F, point_count: usize, config: BodyConfig<F>) -> Self {
        let count = checked_count(point_count, "ring");
        Self::build(center, BodyKind::Ring { radius: radius.abs() }, count, config)
    }

    pub fn try_ring(
        center: Vec2<F>,
        radius: F,
        point_count: usize,
        config: BodyConfig<F>,
    ) -> Result<Self, PhysicsError> {
        check_count(point_count)?;
        check_config(&config)?;
        Ok(Self::build(center, BodyKind::Ring { radius: radius.abs() }, point_count, config))
    }

    /// Reinforced circle: rigid perimeter, cross braces and a radial pull.
    pub fn circular(center: Vec2<F>, radius: F, point_count: usize, config: BodyConfig<F>) -> Self {
        let count = checked_count(point_count, "circular");
        let kind = BodyKind::Circular { radius: radius.abs(), projection: None };
        Self::build(center, kind, count, config)
    }

    pub fn try_circular(
        center: Vec2<F>,
        radius: F,
        point_count: usize,
        config: BodyConfig<F>,
    ) -> Result<Self, PhysicsError> {
        check_count(point_count)?;
        check_config(&config)?;
        let kind = BodyKind::Circular { radius: radius.abs(), projection: None };
        Ok(Self::build(center, kind, point_count, config))
    }

    /// Body that keeps the outline `shape`, given in local coordinates.
    /// The outline is re-centred on its centroid and placed at `center`.
    pub fn framed(center: Vec2<F>, shape: AllocVec<Vec2<F>>, config: BodyConfig<F>) -> Self {
        let shape = if shape.len() < MIN_POINTS {
            log::warn!(
                "framed body needs at least {MIN_POINTS} points, got {}; using default triangle",
                shape.len()
            );
            default_frame()
        } else {
            shape
        };
        let count = shape.len();
        let kind = BodyKind::Framed { frame_points: centered(shape), frame_rotation: F::zero() };
        Self::build(center, kind, count, config)
    }

    pub fn try_framed(
        center: Vec2<F>,
        shape: AllocVec<Vec2<F>>,
        config: BodyConfig<F>,
    ) -> Result<Self, PhysicsError> {
        check_count(shape.len())?;
        check_config(&config)?;
        let count = shape.len();
        let kind = BodyKind::Framed { frame_points: centered(shape), frame_rotation: F::zero() };
        Ok(Self::build(center, kind, count, config))
    }

    /// Pressurized slime of `point_count` points. Perimeter rest lengths and
    /// the pressure target are sized for a circle of area
    /// `pi * radius^2 * puffiness`.
    pub fn slime(
        center: Vec2<F>,
        radius: F,
        point_count: usize,
        puffiness: F,
        config: BodyConfig<F>,
    ) -> Self {
        let count = checked_count(point_count, "slime");
        let puffiness = if puffiness.is_positive_finite() {
            puffiness
        } else {
            log::warn!("slime puffiness {puffiness:?} is not positive; using 1");
            F::one()
        };
        let kind = BodyKind::Slime { radius: radius.abs(), puffiness, drag: None };
        Self::build(center, kind, count, config)
    }

    pub fn try_slime(
        center: Vec2<F>,
        radius: F,
        point_count: usize,
        puffiness: F,
        config: BodyConfig<F>,
    ) -> Result<Self, PhysicsError> {
        check_count(point_count)?;
        check_config(&config)?;
        if !puffiness.is_positive_finite() {
            return Err(PhysicsError::InvalidStiffness);
        }
        let kind = BodyKind::Slime { radius: radius.abs(), puffiness, drag: None };
        Ok(Self::build(center, kind, point_count, config))
    }

    /// Add area-restoring pressure holding `amount` times the current area.
    /// Slimes are always pressurized; for them this only changes the amount.
    pub fn with_pressure(mut self, amount: F) -> Self {
        match &mut self.pressure {
            Some(p) => p.pressure_amount = amount.max(F::zero()),
            None => {
                self.pressure = Some(Pressure::new(self.area, amount, self.config.pressure_force));
            }
        }
        self
    }

    /// Circular bodies only: pull every point toward its ideal circle slot.
    pub fn with_circle_projection(mut self, strength: F) -> Self {
        match &mut self.kind {
            BodyKind::Circular { projection, .. } => *projection = Some(strength.saturate()),
            other => log::warn!("circle projection ignored on {} body", other.name()),
        }
        self
    }

    fn build(center: Vec2<F>, kind: BodyKind<F>, count: usize, mut config: BodyConfig<F>) -> Self {
        if !config.mass.is_positive_finite() {
            log::warn!("body mass {:?} is not positive; using 1", config.mass);
            config.mass = F::one();
        }

        let positions: AllocVec<Vec2<F>> = match &kind {
            BodyKind::Ring { radius }
            | BodyKind::Circular { radius, .. }
            | BodyKind::Slime { radius, .. } => {
                (0..count).map(|i| center + circle_slot(i, count, *radius)).collect()
            }
            BodyKind::Framed { frame_points, frame_rotation } => {
                frame_points.iter().map(|f| center + f.rotate(*frame_rotation)).collect()
            }
        };
        let points: AllocVec<PointMass<F>> = positions
            .iter()
            .map(|&p| PointMass::new(p, config.mass).with_max_speed(config.max_speed))
            .collect();

        let n = points.len();
        let mut constraints = AllocVec::with_capacity(n * 2);
        let mut pressure = None;
        match &kind {
            BodyKind::Ring { .. } => {
                for i in 0..n {
                    let j = (i + 1) % n;
                    constraints.push(Constraint::Spring(SpringConstraint::from_points(
                        i,
                        j,
                        &points,
                        config.stiffness,
                        config.spring_damping,
                    )));
                }
                if let Some(skip) = config.internal_skip {
                    let skip = skip % n;
                    if skip > 1 && skip < n - 1 {
                        for i in 0..n {
                            let j = (i + skip) % n;
                            // opposite points would be linked twice
                            if skip * 2 == n && j < i {
                                continue;
                            }
                            constraints.push(Constraint::Spring(SpringConstraint::from_points(
                                i,
                                j,
                                &points,
                                config.internal_stiffness,
                                config.spring_damping,
                            )));
                        }
                    }
                }
            }
            BodyKind::Circular { .. } => {
                for i in 0..n {
                    constraints.push(Constraint::Distance(DistanceConstraint::from_points(
                        i,
                        (i + 1) % n,
                        &points,
                        config.stiffness,
                    )));
                }
                if n >= 4 {
                    for i in 0..n {
                        let j = (i + n / 2) % n;
                        if i < j {
                            constraints.push(Constraint::Distance(DistanceConstraint::from_points(
                                i,
                                j,
                                &points,
                                config.internal_stiffness,
                            )));
                        }
                    }
                }
            }
            BodyKind::Framed { .. } => {
                for i in 0..n {
                    constraints.push(Constraint::Distance(DistanceConstraint::from_points(
                        i,
                        (i + 1) % n,
                        &points,
                        config.stiffness,
                    )));
                }
            }
            BodyKind::Slime { radius, puffiness, .. } => {
                // edge of the regular n-gon whose area is the target
                let sides = F::from_usize(n);
                let half_angle = F::pi() / sides;
                let tan = half_angle.sin() / half_angle.cos();
                let rest = F::two() * *radius * (*puffiness * F::pi() * tan / sides).sqrt();
                for i in 0..n {
                    constraints.push(Constraint::distance(i, (i + 1) % n, rest, config.stiffness));
                }
                let target = F::pi() * *radius * *radius * *puffiness;
                pressure = Some(Pressure::new(target, F::one(), config.pressure_force));
            }
        }

        constraint::balance_spring_weights(&mut constraints, n);
        log::debug!("built {} body with {} points and {} constraints", kind.name(), n, constraints.len());

        let mut body = SoftBody {
            contacts: alloc::vec![None; n],
            points,
            constraints,
            pressure,
            kind,
            config,
            user_force: Vec2::zero(),
            center,
            bounds: Aabb { min: center, max: center },
            area: F::zero(),
        };
        body.refresh();
        body
    }

    /// Rebuild points and constraints with `point_count` points around the
    /// current center. The new body starts at rest with no fixed points;
    /// framed outlines are resampled along their perimeter.
    pub fn recreate(&mut self, point_count: usize) {
        let count = checked_count(point_count, self.kind.name());
        let kind = match &self.kind {
            BodyKind::Framed { frame_points, frame_rotation } => {
                let frame_points = if frame_points.len() == count {
                    frame_points.clone()
                } else {
                    centered(resample_closed(frame_points, count))
                };
                BodyKind::Framed { frame_points, frame_rotation: *frame_rotation }
            }
            BodyKind::Slime { radius, puffiness, .. } => {
                BodyKind::Slime { radius: *radius, puffiness: *puffiness, drag: None }
            }
            other => other.clone(),
        };
        let amount = match (&self.kind, &self.pressure) {
            (BodyKind::Slime { .. }, _) | (_, None) => None,
            (_, Some(p)) => Some(p.pressure_amount),
        };
        let mut rebuilt = Self::build(self.center, kind, count, self.config.clone());
        if let Some(amount) = amount {
            rebuilt = rebuilt.with_pressure(amount);
        }
        *self = rebuilt;
    }

    /// Advance the body by one tick of `dt` seconds.
    ///
    /// Runs kind pre-step (platform carry), gravity and user forces,
    /// integration, `config.iterations` substeps, and finally refreshes the
    /// cached center, bounds and area. A non-positive `dt` does nothing.
    pub fn update_physics<O: StepObserver>(&mut self, dt: F, env: &BodyEnv<'_, F>, observer: &mut O) {
        if !dt.is_positive_finite() {
            log::trace!("skipping body update with dt {dt:?}");
            return;
        }

        self.carry_with_platforms(env);
        for contact in self.contacts.iter_mut() {
            *contact = None;
        }

        let user_force = core::mem::take(&mut self.user_force);
        for p in self.points.iter_mut() {
            p.apply_acceleration(env.gravity);
            p.apply_force(user_force);
            p.integrate(dt, self.config.damping);
        }
        observer.on_integrate();

        let params = ContactParams::from_config(&self.config);
        let substeps = self.config.iterations.max(1);
        for iteration in 0..substeps {
            self.substep(env, &params, dt, substeps);
            observer.on_constraint_iteration(iteration);
        }

        self.refresh();
    }

    /// Points that touched a moved collider last tick follow its motion.
    fn carry_with_platforms(&mut self, env: &BodyEnv<'_, F>) {
        if !matches!(self.kind, BodyKind::Slime { .. }) {
            return;
        }
        for (point, contact) in self.points.iter_mut().zip(self.contacts.iter()) {
            let Some(key) = contact else {
                continue;
            };
            if let Some(view) = env.colliders.iter().find(|v| v.key == Some(*key)) {
                if !point.fixed {
                    point.translate(view.delta);
                }
            }
        }
    }

    /// Springs only add forces here; they move points at the next tick's
    /// integration.
    fn substep(&mut self, env: &BodyEnv<'_, F>, params: &ContactParams<F>, dt: F, substeps: usize) {
        for c in self.constraints.iter() {
            c.accumulate(&mut self.points, dt, substeps);
        }
        self.accumulate_shape_keeping();
        if let Some(pressure) = &self.pressure {
            pressure.accumulate(&mut self.points);
        }
        for p in self.points.iter_mut() {
            p.apply_displacement();
        }

        if let Some(bounds) = &env.bounds {
            for p in self.points.iter_mut() {
                collision::clamp_to_bounds(p, bounds, params.restitution);
            }
        }

        for (p, contact) in self.points.iter_mut().zip(self.contacts.iter_mut()) {
            for view in env.colliders {
                if !view.collider.bounds().expanded(params.contact_distance).contains(p.position) {
                    continue;
                }
                if collision::resolve_point_static(p, view.collider, params) && view.key.is_some() {
                    *contact = view.key;
                }
            }
        }
    }

    /// Kind-specific displacement: radial pull and slot projection for
    /// circular bodies, template pull for framed ones.
    fn accumulate_shape_keeping(&mut self) {
        let n = self.points.len();
        match &mut self.kind {
            BodyKind::Circular { radius, projection } => {
                let radius = *radius;
                let center = centroid(self.points.iter().map(|p| p.position));
                let radial = self.config.radial_stiffness;
                if radial > F::zero() {
                    for p in self.points.iter_mut() {
                        let d = p.position - center;
                        let len = d.length();
                        if len > F::epsilon() {
                            p.add_displacement(d.scale((radius - len) / len * radial));
                        }
                    }
                }
                if let Some(strength) = *projection {
                    let slots = (0..n).map(|i| circle_slot(i, n, radius));
                    let rotation = estimate_rotation(slots, &self.points, center);
                    for (i, p) in self.points.iter_mut().enumerate() {
                        let target = center + circle_slot(i, n, radius).rotate(rotation);
                        p.add_displacement((target - p.position).scale(strength));
                    }
                }
            }
            BodyKind::Framed { frame_points, frame_rotation } => {
                let stiffness = self.config.frame_stiffness;
                let center = centroid(self.points.iter().map(|p| p.position));
                let rotation = estimate_rotation(frame_points.iter().copied(), &self.points, center);
                *frame_rotation = rotation;
                if stiffness > F::zero() {
                    for (f, p) in frame_points.iter().zip(self.points.iter_mut()) {
                        let target = center + f.rotate(rotation);
                        p.add_displacement((target - p.position).scale(stiffness));
                    }
                }
            }
            BodyKind::Ring { .. } | BodyKind::Slime { .. } => {}
        }
    }

    /// Recompute the cached center, bounds and area (and the frame rotation
    /// of framed bodies) from the current point positions.
    pub fn refresh(&mut self) {
        self.center = centroid(self.points.iter().map(|p| p.position));
        self.bounds = Aabb::from_points(self.points.iter().map(|p| p.position))
            .unwrap_or(Aabb { min: self.center, max: self.center });
        self.area = pressure::area(&self.points);
        if let BodyKind::Framed { frame_points, frame_rotation } = &mut self.kind {
            *frame_rotation = estimate_rotation(frame_points.iter().copied(), &self.points, self.center);
        }
    }

    /// Uniform force on every point, consumed by the next update.
    pub fn apply_force(&mut self, force: Vec2<F>) {
        self.user_force += force;
    }

    /// Apply an impulse (per-step displacement) to the point nearest `point`.
    pub fn poke(&mut self, point: Vec2<F>, impulse: Vec2<F>) {
        if let Some((index, _)) = self.nearest_point(point) {
            let p = &mut self.points[index];
            // Verlet velocity = pos - prev_pos
            if !p.fixed {
                p.prev_position -= impulse;
            }
        }
    }

    /// Index and squared distance of the point nearest `target`.
    pub fn nearest_point(&self, target: Vec2<F>) -> Option<(usize, F)> {
        let mut best: Option<(usize, F)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.position.distance_sq(target);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best
    }

    /// Whether `point` lies inside the body's outline.
    pub fn contains(&self, point: Vec2<F>) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }
        polygon_contains(&self.positions(), point)
    }

    /// Shift the whole body without changing its velocity.
    pub fn translate(&mut self, offset: Vec2<F>) {
        for p in self.points.iter_mut() {
            p.translate(offset);
        }
        self.refresh();
    }

    pub fn set_fixed(&mut self, index: usize, fixed: bool) -> Result<(), PhysicsError> {
        let count = self.points.len();
        let p = self.points.get_mut(index).ok_or(PhysicsError::PointOutOfBounds { index, count })?;
        p.set_fixed(fixed);
        Ok(())
    }

    /// Slimes only: make point `index` kinematic until [`end_drag`](Self::end_drag).
    pub fn begin_drag(&mut self, index: usize) -> bool {
        if index >= self.points.len() {
            log::warn!("drag point {index} out of bounds (count: {})", self.points.len());
            return false;
        }
        if !matches!(self.kind, BodyKind::Slime { .. }) {
            log::debug!("{} body cannot be dragged", self.kind.name());
            return false;
        }
        self.end_drag();
        let was_fixed = self.points[index].fixed;
        self.points[index].set_fixed(true);
        if let BodyKind::Slime { drag, .. } = &mut self.kind {
            *drag = Some(Drag { point: index, was_fixed });
        }
        true
    }

    /// Move the dragged point to `target`.
    pub fn drag_to(&mut self, target: Vec2<F>) {
        if let Some(drag) = self.drag() {
            self.points[drag.point].move_to(target);
        }
    }

    /// Release the drag, restoring the point's previous fixed state.
    pub fn end_drag(&mut self) {
        let BodyKind::Slime { drag, .. } = &mut self.kind else {
            return;
        };
        if let Some(d) = drag.take() {
            self.points[d.point].set_fixed(d.was_fixed);
        }
    }

    /// Translate a pointer signal into drag calls. A press grabs the point
    /// nearest the pointer.
    pub fn handle_drag(&mut self, signal: &DragSignal<F>) {
        if signal.pressed && self.drag().is_none() {
            if let Some((index, _)) = self.nearest_point(signal.position) {
                self.begin_drag(index);
            }
        }
        self.drag_to(signal.position);
        if signal.released {
            self.end_drag();
        }
    }

    pub fn drag(&self) -> Option<Drag> {
        match &self.kind {
            BodyKind::Slime { drag, .. } => *drag,
            _ => None,
        }
    }

    pub fn points(&self) -> &[PointMass<F>] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&PointMass<F>> {
        self.points.get(index)
    }

    /// Direct access for collision and joint passes. Call
    /// [`refresh`](Self::refresh) after moving points.
    pub fn points_mut(&mut self) -> &mut [PointMass<F>] {
        &mut self.points
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [Constraint<F>] {
        &mut self.constraints
    }

    pub fn center(&self) -> Vec2<F> {
        self.center
    }

    pub fn bounds(&self) -> Aabb<F> {
        self.bounds
    }

    /// Enclosed area as of the last refresh.
    pub fn area(&self) -> F {
        self.area
    }

    pub fn pressure(&self) -> Option<&Pressure<F>> {
        self.pressure.as_ref()
    }

    pub fn kind(&self) -> &BodyKind<F> {
        &self.kind
    }

    pub fn config(&self) -> &BodyConfig<F> {
        &self.config
    }

    pub fn is_collidable(&self) -> bool {
        self.config.collidable
    }

    pub fn set_collidable(&mut self, collidable: bool) {
        self.config.collidable = collidable;
    }

    pub fn collision_layer(&self) -> CollisionLayer {
        self.config.collision_layer
    }

    pub fn set_collision_layer(&mut self, layer: CollisionLayer) {
        self.config.collision_layer = layer;
    }

    /// Collider each point touched during the last tick.
    pub fn contacts(&self) -> &[Option<ColliderKey>] {
        &self.contacts
    }
}
