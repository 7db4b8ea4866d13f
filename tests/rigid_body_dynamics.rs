//! Integration tests for the physics world

use swell_math::{Quat, Vec3};
use swell_physics::{
    IntegratorKind, NoForces, PhysicalState, PhysicsConfig, PhysicsWorld, RigidBody,
    RIGID_BODY_STATE_SIZE,
};

const EPSILON: f32 = 1e-3;

fn world(integrator: IntegratorKind, gravity: f32) -> PhysicsWorld {
    PhysicsWorld::with_config(PhysicsConfig::new(gravity).with_integrator(integrator))
}

#[test]
fn test_free_fall_matches_analytic() {
    let mut world = world(IntegratorKind::Rk4, -9.81);
    let key = world.add_body(
        RigidBody::new_sphere(0.5, 3.0)
            .with_position(Vec3::new(1.0, 20.0, -2.0))
            .with_velocity(Vec3::new(2.0, 0.0, 0.0)),
    );

    for _ in 0..100 {
        world.step(0.01, &mut NoForces).unwrap();
    }

    let body = world.get_body(key).unwrap();
    assert!((body.position.x - 3.0).abs() < EPSILON);
    assert!((body.position.y - (20.0 - 0.5 * 9.81)).abs() < EPSILON);
    assert!((body.position.z + 2.0).abs() < EPSILON);
    assert!((body.velocity().y + 9.81).abs() < EPSILON);
}

#[test]
fn test_torque_free_sphere_spins_at_constant_rate() {
    let mut world = world(IntegratorKind::Rk4, 0.0);
    // I = 0.4 for a unit sphere of unit mass, so ω = (0, 1, 0)
    let key = world.add_body(
        RigidBody::new_sphere(1.0, 1.0).with_angular_momentum(Vec3::new(0.0, 0.4, 0.0)),
    );

    let quarter_turn = std::f32::consts::FRAC_PI_2;
    let steps = 157;
    let dt = quarter_turn / steps as f32;
    for _ in 0..steps {
        world.step(dt, &mut NoForces).unwrap();
    }

    let body = world.get_body(key).unwrap();
    assert_eq!(body.angular_momentum, Vec3::new(0.0, 0.4, 0.0));
    let expected = Quat::from_axis_angle(Vec3::Y, quarter_turn);
    assert!(
        quat_distance(body.orientation, expected) < EPSILON,
        "orientation {:?}",
        body.orientation
    );
}

fn quat_distance(a: Quat, b: Quat) -> f32 {
    let same = (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs() + (a.w - b.w).abs();
    let flipped = (a.x + b.x).abs() + (a.y + b.y).abs() + (a.z + b.z).abs() + (a.w + b.w).abs();
    same.min(flipped)
}

/// Orientation of a tumbling box after 5 seconds
fn tumble(integrator: IntegratorKind, steps: u32) -> Quat {
    let mut world = world(integrator, 0.0);
    let key = world.add_body(
        RigidBody::new_box(Vec3::new(1.0, 2.0, 3.0), 4.0)
            .with_angular_momentum(Vec3::new(1.0, 0.5, 3.0)),
    );
    let dt = 5.0 / steps as f32;
    for _ in 0..steps {
        world.step(dt, &mut NoForces).unwrap();
    }
    world.get_body(key).unwrap().orientation
}

#[test]
fn test_rk4_tracks_tumbling_body_better_than_euler() {
    let reference = tumble(IntegratorKind::Rk4, 1000);
    let rk4 = quat_distance(tumble(IntegratorKind::Rk4, 100), reference);
    let euler = quat_distance(tumble(IntegratorKind::Euler, 100), reference);
    assert!(rk4 < EPSILON, "rk4 error {}", rk4);
    assert!(euler > 10.0 * rk4, "euler {} vs rk4 {}", euler, rk4);
}

#[test]
fn test_shared_buffer_holds_every_body() {
    let mut world = world(IntegratorKind::Euler, -9.81);
    let bodies = [
        RigidBody::new_sphere(0.5, 1.0).with_position(Vec3::new(1.0, 2.0, 3.0)),
        RigidBody::new_box(Vec3::new(1.0, 1.0, 1.0), 2.0).with_position(Vec3::new(-1.0, 0.0, 4.0)),
        RigidBody::new_cylinder(2.0, 0.5, 3.0).with_position(Vec3::new(0.0, 5.0, -1.0)),
    ];
    let keys: Vec<_> = bodies.iter().cloned().map(|b| world.add_body(b)).collect();
    assert_eq!(world.state().len(), 3 * RIGID_BODY_STATE_SIZE);

    world.step(0.1, &mut NoForces).unwrap();

    let mut offsets: Vec<_> = keys.iter().map(|&k| world.state_offset(k).unwrap()).collect();
    for (&key, &offset) in keys.iter().zip(&offsets) {
        let body = world.get_body(key).unwrap();
        let mut packed = [0.0; RIGID_BODY_STATE_SIZE];
        body.serialize_state(&mut packed, 0).unwrap();
        assert_eq!(&world.state()[offset..offset + RIGID_BODY_STATE_SIZE], &packed);
    }

    offsets.sort_unstable();
    assert_eq!(offsets, vec![0, RIGID_BODY_STATE_SIZE, 2 * RIGID_BODY_STATE_SIZE]);
}

#[test]
fn test_removed_body_key_is_stale() {
    let mut world = world(IntegratorKind::Rk4, -9.81);
    let a = world.add_body(RigidBody::new_sphere(0.5, 1.0));
    let b = world.add_body(RigidBody::new_sphere(0.5, 1.0).with_position(Vec3::new(0.0, 10.0, 0.0)));

    assert!(world.remove_body(a).is_some());
    assert!(world.remove_body(a).is_none());
    let c = world.add_body(RigidBody::new_sphere(0.25, 1.0));
    assert_ne!(a, c);
    assert!(world.get_body(a).is_none());

    world.step(0.05, &mut NoForces).unwrap();
    assert_eq!(world.body_count(), 2);
    assert!(world.get_body(b).unwrap().position.y < 10.0);
}
