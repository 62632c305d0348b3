use raycar::config::{SimConfig, WorldConfig};
use raycar::{CarController, ControlInput, PhysicsWorld};

const DT: f32 = 1.0 / 60.0;

fn flat_world() -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.ramp = None;
    cfg
}

fn run(world: &mut PhysicsWorld, car: &mut CarController<rapier3d::prelude::RigidBodyHandle>, ticks: usize) -> usize {
    let mut grounded = 0;
    for _ in 0..ticks {
        car.update_input(DT);
        world.begin_step();
        grounded = car.fixed_step(world).grounded_count();
        world.step(DT);
    }
    grounded
}

#[test]
fn dropped_car_settles_on_its_springs() {
    let cfg = SimConfig::default();
    let mut world = PhysicsWorld::new(&flat_world());
    let body = world.spawn_car(&cfg.car, [0.0, 1.5, 0.0]);
    let mut car = CarController::new(cfg.car.clone(), body);

    let grounded = run(&mut world, &mut car, 600);
    let rb = world.body(body).unwrap();

    assert_eq!(grounded, 4);
    assert!(rb.linvel().norm() < 0.5, "still moving: {:?}", rb.linvel());

    // chassis bottom rides above the ground, mounts within suspension reach
    let y = rb.translation().y;
    let bottom = y - cfg.car.chassis_half_extents[1];
    assert!(bottom > 0.0, "chassis scraping: y = {y}");
    assert!(y + cfg.car.mount_offsets[0][1] < cfg.car.suspension_length, "y = {y}");

    // nearly level
    let up = rb.position().rotation * rapier3d::prelude::Vector::y();
    assert!(up.y > 0.98, "tilted: {up:?}");
}

#[test]
fn throttle_drives_along_chassis_forward() {
    let cfg = SimConfig::default();
    let mut world = PhysicsWorld::new(&flat_world());
    let body = world.spawn_car(&cfg.car, [0.0, 1.5, 0.0]);
    let mut car = CarController::new(cfg.car.clone(), body);

    run(&mut world, &mut car, 240);
    let z0 = world.body(body).unwrap().translation().z;

    car.set_target(ControlInput { throttle: 1.0, steer: 0.0 });
    run(&mut world, &mut car, 180);

    let rb = world.body(body).unwrap();
    let dz = rb.translation().z - z0;
    assert!(dz > 3.0, "moved only {dz}");
    assert!(rb.translation().x.abs() < 1.0, "drifted sideways: {}", rb.translation().x);
}

#[test]
fn airborne_car_only_falls() {
    let cfg = SimConfig::default();
    let mut world = PhysicsWorld::new(&flat_world());
    let body = world.spawn_car(&cfg.car, [0.0, 30.0, 0.0]);
    let mut car = CarController::new(cfg.car.clone(), body);
    car.set_target(ControlInput { throttle: 1.0, steer: 1.0 });

    let grounded = run(&mut world, &mut car, 10);
    assert_eq!(grounded, 0);

    let rb = world.body(body).unwrap();
    let v = rb.linvel();
    assert!(v.y < 0.0);
    assert!(v.x.abs() < 1e-4 && v.z.abs() < 1e-4, "{v:?}");
}
