extern crate nalgebra as na;

use examples2d::falling_blocks2::{FallingBlocks, FallingBlocksConfig};
use na::{Point2, Vector2};
use ncollide2d::shape::{Cuboid, Segment};
use nphysics2d::material::BasicMaterial;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use testbed2d::{PhysicsWorld, Scene, Testbed};

fn gravity() -> Vector2<f32> {
    Vector2::new(0.0, -10.0)
}

fn constructed(scene: &mut dyn Scene, seed: u64) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(gravity());
    let mut rng = StdRng::seed_from_u64(seed);
    scene.construct(&mut world, &mut rng);
    world.maintain();
    world
}

fn approx_eq(a: &Point2<f32>, b: &Point2<f32>) -> bool {
    (a - b).norm() < 1.0e-5
}

fn assert_falling_blocks_world(world: &PhysicsWorld) {
    let stats = world.stats(0.0, 0);
    assert_eq!(stats.bodies, 151);
    assert_eq!(stats.static_bodies, 1);
    assert_eq!(stats.dynamic_bodies, 150);
    assert_eq!(stats.colliders, 154);
}

#[test]
fn body_count() {
    let mut scene = FallingBlocks::new();
    let world = constructed(&mut scene, 0);

    assert_falling_blocks_world(&world);
    assert!(scene.ground_handle().is_some());
    assert_eq!(scene.block_handles().len(), 150);
}

#[test]
fn boundary_is_four_segments() {
    let mut scene = FallingBlocks::new();
    let world = constructed(&mut scene, 1);
    let ground = scene.ground_handle().unwrap();

    let mut expected = vec![
        (Point2::new(-25.0, 0.0), Point2::new(25.0, 0.0)),
        (Point2::new(-25.0, 50.0), Point2::new(25.0, 50.0)),
        (Point2::new(-25.0, 50.0), Point2::new(-25.0, 0.0)),
        (Point2::new(25.0, 50.0), Point2::new(25.0, 0.0)),
    ];

    let mut nsegments = 0;
    for (_, collider) in world.colliders.iter() {
        if collider.body() != ground {
            continue;
        }

        let segment = collider
            .shape()
            .as_shape::<Segment<f32>>()
            .expect("the boundary must only be made of segments");
        let found = expected
            .iter()
            .position(|(a, b)| approx_eq(a, &segment.a) && approx_eq(b, &segment.b))
            .expect("unexpected wall");
        let _ = expected.remove(found);
        nsegments += 1;
    }

    assert_eq!(nsegments, 4);
    assert!(expected.is_empty());
}

#[test]
fn blocks_spawn_inside_the_enclosure() {
    let mut scene = FallingBlocks::new();
    let world = constructed(&mut scene, 2);

    for handle in scene.block_handles() {
        let rb = world.bodies.rigid_body(*handle).unwrap();
        let pos = rb.position().translation.vector;

        assert!(pos.x >= -25.0 && pos.x <= 25.0, "x out of range: {}", pos.x);
        assert!(pos.y >= 0.0 && pos.y <= 50.0, "y out of range: {}", pos.y);
    }
}

#[test]
fn blocks_are_unit_squares_with_material() {
    let mut scene = FallingBlocks::new();
    let world = constructed(&mut scene, 3);
    let ground = scene.ground_handle().unwrap();

    let mut nblocks = 0;
    for (_, collider) in world.colliders.iter() {
        if collider.body() == ground {
            continue;
        }

        let cuboid = collider.shape().as_shape::<Cuboid<f32>>().unwrap();
        assert_eq!(cuboid.half_extents, Vector2::new(0.5, 0.5));
        assert_eq!(collider.density(), 1.0);

        let material = collider
            .material()
            .downcast_ref::<BasicMaterial<f32>>()
            .unwrap();
        assert_eq!(material.friction, 0.3);
        nblocks += 1;
    }

    assert_eq!(nblocks, 150);
}

#[test]
fn create_gives_independent_scenes() {
    let mut first = FallingBlocks::create();
    let mut second = FallingBlocks::create();

    let first_world = constructed(&mut *first, 4);
    let second_world = constructed(&mut *second, 5);

    assert_falling_blocks_world(&first_world);
    assert_falling_blocks_world(&second_world);
}

#[test]
fn keys_do_not_touch_the_world() {
    let mut scene = FallingBlocks::new();
    let mut world = constructed(&mut scene, 6);

    let before: Vec<_> = scene
        .block_handles()
        .iter()
        .map(|h| world.bodies.rigid_body(*h).unwrap().position().translation.vector)
        .collect();

    for key in &['h', 'l', 'x', ' '] {
        scene.on_key(&mut world, *key);
    }

    assert_eq!(*world.gravity(), gravity());
    assert_falling_blocks_world(&world);

    let after: Vec<_> = scene
        .block_handles()
        .iter()
        .map(|h| world.bodies.rigid_body(*h).unwrap().position().translation.vector)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn blocks_fall_when_stepped() {
    let mut scene = FallingBlocks::new();
    let mut world = constructed(&mut scene, 7);
    let settings = testbed2d::Settings::default();

    let height = |world: &PhysicsWorld| -> f32 {
        scene
            .block_handles()
            .iter()
            .map(|h| world.bodies.rigid_body(*h).unwrap().position().translation.vector.y)
            .sum()
    };

    let before = height(&world);
    for _ in 0..30 {
        world.step(&settings);
    }

    assert!(height(&world) < before);
}

#[test]
fn disabling_sleep_wakes_every_block() {
    let mut testbed = Testbed::from_builders(0, examples2d::builders()).unwrap();
    testbed.settings_mut().seed = Some(8);
    testbed.settings_mut().dump_every = 0;

    testbed.run_frames(900).unwrap();
    let settled = testbed.stats();
    assert_eq!(settled.dynamic_bodies, 150);
    assert!(settled.awake_bodies < 150, "no block fell asleep: {}", settled);

    testbed.settings_mut().enable_sleep = false;
    testbed.frame().unwrap();
    assert_eq!(testbed.stats().awake_bodies, 150);

    let walls = FallingBlocksConfig::default();
    let world = testbed.world();
    for (handle, _) in world.bodies.iter() {
        let rb = match world.bodies.rigid_body(handle) {
            Some(rb) => rb,
            None => continue,
        };
        let pos = rb.position().translation.vector;
        assert!(pos.x.abs() <= walls.width / 2.0 && pos.y >= 0.0 && pos.y <= walls.height);
    }
}

#[test]
fn same_seed_same_layout() {
    let config = FallingBlocksConfig::default();
    let a = config.spawn_positions(&mut StdRng::seed_from_u64(42));
    let b = config.spawn_positions(&mut StdRng::seed_from_u64(42));

    assert_eq!(a.len(), 150);
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn spawn_positions_stay_in_bounds(
        seed in any::<u64>(),
        width in 1.0f32..200.0,
        height in 1.0f32..200.0,
        num_blocks in 0usize..300,
    ) {
        let config = FallingBlocksConfig {
            width,
            height,
            num_blocks,
            ..FallingBlocksConfig::default()
        };
        let positions = config.spawn_positions(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(positions.len(), num_blocks);
        for p in positions {
            prop_assert!(p.x >= -width / 2.0 && p.x <= width / 2.0);
            prop_assert!(p.y >= 0.0 && p.y <= height);
        }
    }
}

#[test]
fn console_settings_load() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/console_settings.json");
    let settings = testbed2d::Settings::load(path).unwrap();

    assert_eq!(settings.hz, 30.0);
    assert_eq!(settings.position_iterations, 1);
    assert_eq!(settings.steps_per_frame, 1);
    assert_eq!(settings.default_frames(), 780);
}
