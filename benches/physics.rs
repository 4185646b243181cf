//! Benchmarks for squishy physics simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use squishy::*;

fn floor() -> Shape<f32> {
    Shape::rect(Vec2::new(-1000.0, -100.0), Vec2::new(1000.0, 0.0))
}

fn bench_slime_drop(c: &mut Criterion) {
    c.bench_function("slime_16_points_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(WorldConfig::new());
            world.add_collider(floor());
            let key = world.add_body(SoftBody::slime(
                Vec2::new(0.0, 45.0), 30.0, 16, 1.5, BodyConfig::new(),
            ));
            for _ in 0..60 {
                world.step(&mut NoOpStepObserver);
            }
            world.body(key).map(|body| body.area())
        });
    });
}

fn bench_body_pile(c: &mut Criterion) {
    c.bench_function("pile_of_8_bodies_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(
                WorldConfig::new().with_gravity(Vec2::new(0.0, -1.0), 300.0),
            );
            world.add_collider(floor());
            for i in 0..8 {
                let center = Vec2::new((i % 4) as f32 * 25.0, 30.0 + (i / 4) as f32 * 40.0);
                let body = match i % 3 {
                    0 => SoftBody::slime(center, 10.0, 16, 1.2, BodyConfig::new()),
                    1 => SoftBody::circular(center, 10.0, 16, BodyConfig::new()),
                    _ => SoftBody::ring(center, 10.0, 16, BodyConfig::new().with_stiffness(0.5))
                        .with_pressure(1.0),
                };
                world.add_body(body);
            }
            for _ in 0..60 {
                world.step(&mut NoOpStepObserver);
            }
            world.tick_count()
        });
    });
}

fn bench_pendulum_chain(c: &mut Criterion) {
    c.bench_function("solver_chain_50_points_60_steps", |b| {
        b.iter(|| {
            let mut solver = ConstraintSolver::new();
            solver.add_point(PointMass::fixed(Vec2::new(0.0f32, 10.0)));
            for i in 1..50 {
                let idx = solver.add_point(PointMass::new(Vec2::new(i as f32 * 0.2, 10.0), 1.0));
                solver.add_constraint(Constraint::distance(idx - 1, idx, 0.2, 1.0));
            }
            let config = SolverConfig::new()
                .with_gravity(Vec2::new(0.0, -9.81))
                .with_iterations(8);
            for _ in 0..60 {
                solver.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
            }
            solver.point(49).position
        });
    });
}

criterion_group!(benches, bench_slime_drop, bench_body_pile, bench_pendulum_chain);
criterion_main!(benches);
