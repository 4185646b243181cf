use squishy::collision::{resolve_point_static, ContactParams};
use squishy::vec::Vec as _;
use squishy::{
    BodyConfig, CollisionLayerMatrix, NoOpStepObserver, PointMass, Shape, SoftBody, StaticCollider, Vec2, World,
    WorldConfig,
};

fn params() -> ContactParams<f32> {
    ContactParams::from_config(&BodyConfig::new())
}

fn shapes() -> Vec<Shape<f32>> {
    vec![
        Shape::circle(Vec2::new(0.0, 0.0), 5.0),
        Shape::rect(Vec2::new(-4.0, -3.0), Vec2::new(4.0, 3.0)),
        Shape::polygon(vec![
            Vec2::new(-5.0, -4.0),
            Vec2::new(5.0, -4.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(0.0, 6.0),
            Vec2::new(-6.0, 2.0),
        ])
        .unwrap(),
    ]
}

#[test]
fn resolved_points_end_outside_every_shape() {
    for shape in shapes() {
        for i in 0..24 {
            let a = i as f32 * std::f32::consts::PI / 12.0;
            for r in [0.3f32, 1.5, 2.9] {
                let start = Vec2::new(r * a.cos(), r * a.sin());
                let mut p = PointMass::new(start, 1.0);
                assert!(shape.overlap_point(start));
                assert!(resolve_point_static(&mut p, &shape, &params()));
                assert!(!shape.overlap_point(p.position), "{shape:?} still holds {:?}", p.position);
                let gap = p.position.distance(shape.closest_point(p.position));
                assert!((gap - 0.01).abs() < 1e-3, "gap {gap} for {shape:?}");
            }
        }
    }
}

#[test]
fn fixed_points_ignore_colliders() {
    let shape = Shape::circle(Vec2::new(0.0f32, 0.0), 5.0);
    let mut p = PointMass::fixed(Vec2::new(1.0, 0.0));
    assert!(!resolve_point_static(&mut p, &shape, &params()));
    assert_eq!(p.position, Vec2::new(1.0, 0.0));
}

#[test]
fn polygon_needs_three_vertices() {
    assert!(Shape::polygon(vec![Vec2::new(0.0f32, 0.0), Vec2::new(1.0, 0.0)]).is_err());
}

fn overlapping_rings(world: &mut World<f32>, a: BodyConfig<f32>, b: BodyConfig<f32>) -> (squishy::BodyKey, squishy::BodyKey) {
    let ka = world.add_body(SoftBody::ring(Vec2::new(0.0, 0.0), 30.0, 16, a));
    let kb = world.add_body(SoftBody::ring(Vec2::new(0.0, 0.0), 30.0, 16, b));
    (ka, kb)
}

fn min_cross_distance(world: &World<f32>, a: squishy::BodyKey, b: squishy::BodyKey) -> f32 {
    let (a, b) = (world.body(a).unwrap(), world.body(b).unwrap());
    let mut best = f32::MAX;
    for pa in a.points() {
        for pb in b.points() {
            best = best.min(pa.position.distance(pb.position));
        }
    }
    best
}

#[test]
fn coincident_bodies_are_separated() {
    let mut world: World<f32> = World::new(WorldConfig::new().with_min_separation(2.0));
    let (a, b) = overlapping_rings(&mut world, BodyConfig::new(), BodyConfig::new());
    assert_eq!(min_cross_distance(&world, a, b), 0.0);

    assert_eq!(world.collide_bodies(), 1);
    let d = min_cross_distance(&world, a, b);
    assert!(d >= 2.0 - 1e-3, "closest pair at {d}");
}

#[test]
fn non_collidable_bodies_pass_through() {
    let mut world: World<f32> = World::new(WorldConfig::new());
    let (a, b) = overlapping_rings(&mut world, BodyConfig::new().with_collidable(false), BodyConfig::new());
    assert_eq!(world.collide_bodies(), 0);
    assert_eq!(min_cross_distance(&world, a, b), 0.0);

    world.body_mut(a).unwrap().set_collidable(true);
    assert_eq!(world.collide_bodies(), 1);
}

#[test]
fn layer_matrix_filters_pairs() {
    let layers = CollisionLayerMatrix::default().with(1, 2, false);
    let mut world: World<f32> = World::new(WorldConfig::new().with_layers(layers));
    let (a, b) = overlapping_rings(&mut world, BodyConfig::new().with_layer(1), BodyConfig::new().with_layer(2));
    assert_eq!(world.collide_bodies(), 0);

    world.body_mut(b).unwrap().set_collision_layer(3);
    assert_eq!(world.collide_bodies(), 1);

    world.layers_mut().set(1, 3, false);
    world.body_mut(a).unwrap().translate(Vec2::new(0.5, 0.0));
    assert_eq!(world.collide_bodies(), 0);
}

#[test]
fn distant_bodies_skip_the_pair_test() {
    let mut world: World<f32> = World::new(WorldConfig::new());
    world.add_body(SoftBody::slime(Vec2::new(0.0, 0.0), 10.0, 12, 1.0, BodyConfig::new()));
    world.add_body(SoftBody::slime(Vec2::new(100.0, 0.0), 10.0, 12, 1.0, BodyConfig::new()));
    assert_eq!(world.collide_bodies(), 0);
}

#[test]
fn stacked_slimes_stay_apart() {
    let mut world: World<f32> = World::new(WorldConfig::new());
    world.add_collider(Shape::rect(Vec2::new(-200.0, -50.0), Vec2::new(200.0, 0.0)));
    let low = world.add_body(SoftBody::slime(Vec2::new(0.0, 12.0), 10.0, 16, 1.0, BodyConfig::new()));
    let high = world.add_body(SoftBody::slime(Vec2::new(0.0, 36.0), 10.0, 16, 1.0, BodyConfig::new()));

    for _ in 0..300 {
        world.step(&mut NoOpStepObserver);
    }

    let (low, high) = (world.body(low).unwrap(), world.body(high).unwrap());
    assert!(high.center().y > low.center().y + 5.0);
    assert!(low.bounds().min.y > -0.5);
}
