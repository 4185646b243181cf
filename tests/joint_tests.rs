use squishy::vec::Vec as _;
use squishy::*;

fn weightless() -> World<f32> {
    World::new(WorldConfig::new().with_gravity(Vec2::new(0.0, -1.0), 0.0))
}

fn slime_pair(world: &mut World<f32>) -> (BodyKey, BodyKey) {
    let config = BodyConfig::new().with_collidable(false);
    let a = world.add_body(SoftBody::slime(Vec2::new(0.0, 0.0), 10.0, 16, 1.0, config.clone()));
    let b = world.add_body(SoftBody::slime(Vec2::new(40.0, 0.0), 10.0, 16, 1.0, config));
    (a, b)
}

struct JointCounter(usize);

impl StepObserver for JointCounter {
    fn on_joint_pass(&mut self, applied: usize) {
        self.0 += applied;
    }
}

fn centroid_gap(world: &World<f32>, joint: &WeightedJoint<f32>) -> f32 {
    let a = world.body(joint.body_a).unwrap().points();
    let b = world.body(joint.body_b).unwrap().points();
    let (ca, cb) = joint.centroids(a, b);
    ca.distance(cb)
}

#[test]
fn rigid_weighted_joint_closes_the_gap_every_tick() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);
    let link = WeightedJoint::uniform(a, &[0, 1, 2, 3], b, &[8, 9], 1.0);
    let key = world.add_joint(Joint::weighted(link.clone()));
    assert!(world.joint(key).unwrap().is_active());
    assert!(centroid_gap(&world, &link) > 20.0);

    for _ in 0..10 {
        world.step(&mut NoOpStepObserver);
        let gap = centroid_gap(&world, &link);
        assert!(gap < 1e-3, "gap {gap}");
    }
}

#[test]
fn soft_weighted_joint_converges() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);
    let link = WeightedJoint::uniform(a, &[0, 1, 2, 3], b, &[8, 9], 0.3);
    world.add_joint(Joint::weighted(link.clone()));

    world.step(&mut NoOpStepObserver);
    let early = centroid_gap(&world, &link);
    for _ in 0..300 {
        world.step(&mut NoOpStepObserver);
    }
    let late = centroid_gap(&world, &link);
    assert!(late < early);
    assert!(late < 0.5, "gap {late}");

    let target = std::f32::consts::PI * 100.0;
    for key in [a, b] {
        let ratio = world.body(key).unwrap().area() / target;
        assert!(ratio > 0.9 && ratio < 1.1, "area ratio {ratio}");
    }
}

#[test]
fn weld_joins_two_points() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);
    world.add_joint(Joint::weld(WeldJoint::new(a, 0, b, 8)));

    for _ in 0..60 {
        world.step(&mut NoOpStepObserver);
        let pa = world.body(a).unwrap().points()[0].position;
        let pb = world.body(b).unwrap().points()[8].position;
        assert!(pa.distance(pb) < 1e-4);
    }
}

#[test]
fn fixed_point_joint_pins_under_gravity() {
    let mut world: World<f32> = World::new(WorldConfig::new());
    let key = world.add_body(SoftBody::slime(Vec2::new(0.0, 50.0), 10.0, 16, 1.0, BodyConfig::new()));
    let top = world.body(key).unwrap().points()[4].position;
    world.add_joint(Joint::fixed_point(FixedPointJoint::new(key, vec![4])));

    for _ in 0..120 {
        world.step(&mut NoOpStepObserver);
    }

    let body = world.body(key).unwrap();
    assert_eq!(body.points()[4].position, top);
    assert!(body.center().y < top.y);
    assert!(body.center().y > top.y - 30.0);
}

#[test]
fn joint_within_one_body() {
    let mut world = weightless();
    let key = world.add_body(SoftBody::slime(Vec2::new(0.0, 0.0), 10.0, 16, 1.0, BodyConfig::new()));
    let pinch = WeightedJoint::uniform(key, &[0], key, &[8], 0.5);
    let joint = world.add_joint(Joint::weighted(pinch));
    assert!(world.joint(joint).unwrap().is_active());

    let before = {
        let points = world.body(key).unwrap().points();
        points[0].position.distance(points[8].position)
    };
    world.step(&mut NoOpStepObserver);
    let points = world.body(key).unwrap().points();
    assert!(points[0].position.distance(points[8].position) < before);
}

#[test]
fn invalid_joints_stay_inactive() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);

    let bad = world.add_joint(Joint::weld(WeldJoint::new(a, 0, b, 99)));
    assert!(!world.joint(bad).unwrap().is_active());
    assert_eq!(world.joint_count(), 1);

    let mut observer = JointCounter(0);
    world.step(&mut observer);
    assert_eq!(observer.0, 0);

    assert_eq!(
        world.try_add_joint(Joint::weld(WeldJoint::new(a, 16, b, 0))).unwrap_err(),
        PhysicsError::PointOutOfBounds { index: 16, count: 16 }
    );
    assert_eq!(
        world
            .try_add_joint(Joint::weighted(WeightedJoint::uniform(a, &[], b, &[0], 1.0)))
            .unwrap_err(),
        PhysicsError::EmptyPointSet
    );
    assert_eq!(world.joint_count(), 1);
}

#[test]
fn joint_on_unknown_body_is_rejected() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);
    let joint = Joint::weld(WeldJoint::new(a, 0, b, 0));
    world.remove_body(b);
    world.step(&mut NoOpStepObserver);

    assert_eq!(world.try_add_joint(joint.clone()).unwrap_err(), PhysicsError::UnknownBody);
    let key = world.add_joint(joint);
    assert!(!world.joint(key).unwrap().is_active());
}

#[test]
fn removing_a_body_drops_its_joints() {
    let mut world = weightless();
    let (a, b) = slime_pair(&mut world);
    let c = world.add_body(SoftBody::slime(Vec2::new(80.0, 0.0), 10.0, 16, 1.0, BodyConfig::new()));
    let ab = world.add_joint(Joint::weld(WeldJoint::new(a, 0, b, 8)));
    let bc = world.add_joint(Joint::weld(WeldJoint::new(b, 0, c, 8)));
    let pin = world.add_joint(Joint::fixed_point(FixedPointJoint::new(c, vec![0])));
    assert_eq!(world.joint_count(), 3);

    assert!(world.remove_body(b));
    // removal is deferred to the next tick
    assert!(world.joint(ab).is_some());
    world.step(&mut NoOpStepObserver);

    assert!(world.body(b).is_none());
    assert!(world.joint(ab).is_none());
    assert!(world.joint(bc).is_none());
    assert!(world.joint(pin).is_some());
    assert_eq!(world.joint_count(), 1);
}
