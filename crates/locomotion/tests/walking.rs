use std::f32::consts::FRAC_PI_2;

use glam::{IVec3, Vec3};
use voxworld_common::math::{REFERENCE_UP, tangent_basis};
use voxworld_common::{AddressingMode, Cell, LocomotionConfig, Material, WorldConfig};
use voxworld_input::{MoveIntent, TickIntent};
use voxworld_locomotion::{
    AgentState, LateralOutcome, LocomotionController, MotionState, RadialSpring,
};
use voxworld_terrain::{SurfaceField, Terrain, VoxelRecord, WorldGenerator};

fn uniform_field(mode: AddressingMode, columns: u32, rows: u32, height: u32) -> SurfaceField {
    let mut field = SurfaceField::new(mode, columns, rows, 0.45, 4.8);
    for j in 0..rows as i64 {
        for i in 0..columns as i64 {
            field.set_cell(i, j, Cell::new(height, Material::Grass));
        }
    }
    field
}

fn moving(forward: f32, strafe: f32) -> TickIntent {
    TickIntent {
        movement: MoveIntent::new(forward, strafe),
        ..TickIntent::default()
    }
}

#[test]
fn diagonal_move_on_sphere_has_unit_speed() {
    let terrain = Terrain::from_parts(
        0,
        uniform_field(AddressingMode::Spherical, 64, 33, 1),
        Vec::new(),
    );
    let config = LocomotionConfig::default();
    let speed = config.sphere_speed;
    let mut controller = LocomotionController::spawn(config, &terrain);
    let (east, north) = tangent_basis(controller.state().normal, REFERENCE_UP);

    let dt = 1.0 / 60.0;
    controller.update(dt, &moving(1.0, -1.0), &terrain);
    let report = controller.last_step();
    assert_eq!(report.outcome, LateralOutcome::Moved);
    assert!((report.tangent_move.length() - speed * dt).abs() < 1e-6);

    let expected = (north - east).normalize();
    let actual = report.tangent_move.normalize();
    assert!(actual.dot(expected) > 0.9999, "direction {actual} vs {expected}");
}

#[test]
fn diagonal_move_on_plane_has_unit_speed() {
    let terrain = Terrain::from_parts(
        0,
        uniform_field(AddressingMode::Planar, 32, 32, 1),
        Vec::new(),
    );
    let config = LocomotionConfig::default();
    let speed = config.planar_speed;
    let mut controller = LocomotionController::spawn(config, &terrain);
    let start = controller.state().position;

    let dt = 1.0 / 60.0;
    controller.update(dt, &moving(1.0, -1.0), &terrain);
    let delta = controller.state().position - start;
    let horizontal = Vec3::new(delta.x, 0.0, delta.z);
    assert!((horizontal.length() - speed * dt).abs() < 1e-5);
    // Yaw 0 faces -Z; left is -X.
    assert!(horizontal.x < 0.0 && horizontal.z < 0.0);
    assert!((horizontal.x - horizontal.z).abs() < 1e-5);
}

#[test]
fn fast_agent_cannot_enter_voxel() {
    let field = uniform_field(AddressingMode::Planar, 16, 16, 0);
    let terrain = Terrain::from_parts(
        0,
        field,
        [VoxelRecord::whole(IVec3::ZERO, Material::Rock)],
    );
    let config = LocomotionConfig {
        planar_speed: 12.0,
        ..LocomotionConfig::default()
    };
    let radius = config.agent_radius;
    let eye = config.eye_height;
    let start = AgentState {
        position: Vec3::new(0.575, eye, 0.0),
        forward: Vec3::NEG_Z,
        normal: Vec3::Y,
        motion: MotionState::Planar {
            yaw: 0.0,
            pitch: 0.0,
        },
    };
    let mut controller = LocomotionController::from_state(config, start);
    controller.update(1.0 / 60.0, &moving(0.0, -1.0), &terrain);

    let p = controller.state().position;
    let horizontal = (p.x * p.x + p.z * p.z).sqrt();
    assert!(horizontal >= radius + 0.45 / 2.0 - 1e-5, "distance {horizontal}");
    assert_eq!(controller.last_step().pushes, 1);
}

#[test]
fn tall_wall_blocks_spherical_move() {
    let mut field = uniform_field(AddressingMode::Spherical, 64, 33, 1);
    for j in 14..33 {
        for i in 0..64 {
            field.set_cell(i, j, Cell::new(10, Material::Rock));
        }
    }
    let terrain = Terrain::from_parts(0, field, Vec::new());

    let phi = FRAC_PI_2 - 0.4;
    let normal = Vec3::new(phi.sin(), phi.cos(), 0.0);
    let (_, north) = tangent_basis(normal, REFERENCE_UP);
    let offset = terrain.field().query(normal) - 4.8;
    let start = AgentState {
        position: normal * (4.8 + offset),
        forward: north,
        normal,
        motion: MotionState::Spherical(RadialSpring::at_rest(offset)),
    };
    let config = LocomotionConfig {
        sphere_speed: 3.0,
        ..LocomotionConfig::default()
    };
    let mut controller = LocomotionController::from_state(config, start);
    controller.update(0.05, &moving(-1.0, 0.0), &terrain);

    assert_eq!(controller.last_step().outcome, LateralOutcome::Blocked);
    assert!(controller.state().normal.distance(normal) < 1e-6);
}

#[test]
fn gentle_rise_is_climbed_smoothly() {
    let mut field = uniform_field(AddressingMode::Spherical, 64, 33, 1);
    for j in 0..16 {
        for i in 0..64 {
            field.set_cell(i, j, Cell::new(2, Material::Grass));
        }
    }
    let terrain = Terrain::from_parts(0, field, Vec::new());
    let mut controller = LocomotionController::spawn(LocomotionConfig::default(), &terrain);
    let start_radius = controller.state().position.length();

    let mut last = start_radius;
    let mut largest_jump = 0.0_f32;
    for _ in 0..120 {
        controller.update(1.0 / 60.0, &moving(1.0, 0.0), &terrain);
        let r = controller.state().position.length();
        largest_jump = largest_jump.max((r - last).abs());
        last = r;
    }
    assert!(last > start_radius + 0.3, "agent climbed onto the rise");
    assert!(largest_jump < 0.1, "no snapping, jump {largest_jump}");
}

#[test]
fn long_walk_on_generated_world_stays_finite() {
    for mode in [AddressingMode::Spherical, AddressingMode::Planar] {
        let config = WorldConfig {
            mode,
            ..WorldConfig::default()
        };
        let terrain = WorldGenerator::new(config).build(42);
        let mut controller = LocomotionController::spawn(LocomotionConfig::default(), &terrain);
        for k in 0..600 {
            let t = k as f32 * 0.05;
            let mut intent = moving(t.cos(), t.sin());
            intent.rotation.yaw = (t * 0.3).sin();
            controller.update(1.0 / 60.0, &intent, &terrain);
            let state = controller.state();
            assert!(state.is_finite(), "{mode:?} tick {k}");
            assert!((state.normal.length() - 1.0).abs() < 1e-4);
            assert!((state.forward.length() - 1.0).abs() < 1e-4);
        }
    }
}
