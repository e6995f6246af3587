use cgmath::{Deg, Point3};

use voxel_sandbox::{
    application_state::config::EngineConfig,
    engine_state::{
        rendering::{meshing::greedy, ChunkRenderer, HeadlessRenderer, TextureAtlas},
        voxels::{
            block::{block_type::BlockType, Block},
            chunk::{ChunkPosition, ChunkState, CHUNK_HEIGHT},
            lighting::PointLight,
            world::World,
        },
    },
};

fn ready_world(view_distance: i32) -> World {
    let config = EngineConfig {
        view_distance,
        worker_count: 2,
        ..EngineConfig::default()
    };
    let mut world = World::new(config, TextureAtlas::placeholder(6));
    world.start_generating();
    world.wait_until_idle();
    world
}

/// Highest solid block of the column, scanning down from the top.
fn surface(world: &World, x: i32, z: i32) -> i32 {
    (0..CHUNK_HEIGHT as i32)
        .rev()
        .find(|&y| world.block_at(x, y, z).is_some_and(Block::is_solid))
        .unwrap()
}

#[test]
fn negative_coordinates_map_to_negative_chunks() {
    let mut world = ready_world(1);
    assert_eq!(world.block_at(-1, 0, -1), Some(Block::new(BlockType::BEDROCK)));

    assert!(world.set_block_at(-1, 200, -1, Block::new(BlockType::LAMP)));
    let expected = PointLight::at(-0.5, 200.5, -0.5);
    assert_eq!(world.chunk(ChunkPosition::new(-1, -1)).unwrap().lights(), vec![expected]);
    assert!(world.chunk(ChunkPosition::new(0, 0)).unwrap().lights().is_empty());
}

#[test]
fn edits_outside_the_world_are_rejected() {
    let mut world = ready_world(1);
    let stone = Block::new(BlockType::STONE);
    assert!(!world.set_block_at(100, 10, 100, stone));
    assert!(!world.set_block_at(0, CHUNK_HEIGHT as i32, 0, stone));
    assert!(!world.set_block_at(0, -1, 0, stone));
    assert_eq!(world.block_at(100, 10, 100), None);
}

#[test]
fn lamp_round_trip_restores_the_light_list() {
    let mut world = ready_world(1);
    assert!(world.add_light_at_camera());
    let chunk = world.chunk(ChunkPosition::new(0, 0)).unwrap().clone();
    let before = chunk.lights();
    assert_eq!(before.len(), 1);

    assert!(world.set_block_at(3, 200, 3, Block::new(BlockType::LAMP)));
    assert_eq!(chunk.light_count(), 2);
    assert!(chunk.lights().contains(&PointLight::at(3.5, 200.5, 3.5)));

    assert_eq!(world.remove_block_at(3, 200, 3), Some(Block::new(BlockType::LAMP)));
    assert_eq!(chunk.lights(), before);

    // Overwriting a lamp with another block also takes its light away
    assert!(world.set_block_at(4, 200, 4, Block::new(BlockType::LAMP)));
    assert!(world.set_block_at(4, 200, 4, Block::new(BlockType::STONE)));
    assert_eq!(chunk.lights(), before);
}

#[test]
fn edits_rebuild_the_chunk_mesh() {
    let mut world = ready_world(1);
    let chunk = world.chunk(ChunkPosition::new(0, 0)).unwrap().clone();
    let first = chunk.take_pending_mesh().unwrap();
    assert!(!chunk.upload_pending());

    assert!(world.set_block_at(8, 250, 8, Block::new(BlockType::STONE)));
    world.wait_until_idle();

    let rebuilt = chunk.take_pending_mesh().unwrap();
    assert_eq!(rebuilt.quad_count(), first.quad_count() + 6);
}

#[test]
fn back_to_back_edits_publish_the_newest_grid() {
    let config = EngineConfig {
        view_distance: 0,
        worker_count: 4,
        ..EngineConfig::default()
    };
    let mut world = World::new(config, TextureAtlas::placeholder(6));
    world.start_generating();
    world.wait_until_idle();
    let chunk = world.chunk(ChunkPosition::new(0, 0)).unwrap().clone();
    chunk.take_pending_mesh();

    for round in 0..60 {
        let x = round % 16;
        let y = 200 + round / 16;
        assert!(world.set_block_at(x, y, 3, Block::new(BlockType::STONE)));
        assert!(world.set_block_at(x, y, 5, Block::new(BlockType::DIRT)));
        world.wait_until_idle();

        let mesh = chunk.take_pending_mesh().unwrap();
        assert_eq!(mesh.quads, greedy(&chunk.grid_snapshot()).quads, "round {round}");
        assert_eq!(chunk.state(), ChunkState::Ready);
    }
}

#[test]
fn destroy_then_place_along_the_view() {
    let mut world = ready_world(1);
    let h = surface(&world, 8, 8);
    let top = world.block_at(8, h, 8).unwrap();

    world.teleport(Point3::new(8.5, h as f32 + 2.5, 8.5));
    let camera = world.camera_mut();
    camera.pitch = Deg(-89.0);
    camera.update_vectors();

    assert_eq!(world.destroy_block(), Some(([8, h, 8], top)));
    assert_eq!(world.block_at(8, h, 8), Some(Block::AIR));

    world.select(BlockType::LAMP);
    assert_eq!(world.place_block(), Some([8, h, 8]));
    let chunk = world.chunk(ChunkPosition::new(0, 0)).unwrap().clone();
    assert_eq!(chunk.lights(), vec![PointLight::at(8.5, h as f32 + 0.5, 8.5)]);

    assert_eq!(
        world.destroy_block(),
        Some(([8, h, 8], Block::new(BlockType::LAMP)))
    );
    assert!(chunk.lights().is_empty());
}

#[test]
fn bedrock_survives_destruction() {
    let mut world = ready_world(1);
    assert!(world.set_block_at(8, 1, 8, Block::AIR));
    world.teleport(Point3::new(8.5, 1.5, 8.5));
    let camera = world.camera_mut();
    camera.pitch = Deg(-89.0);
    camera.update_vectors();

    assert_eq!(world.destroy_block(), None);
    assert_eq!(world.block_at(8, 0, 8), Some(Block::new(BlockType::BEDROCK)));
}

#[test]
fn lights_come_from_nearby_chunks_only() {
    let mut world = ready_world(3);
    assert!(world.set_block_at(40, 200, 8, Block::new(BlockType::LAMP)));
    assert!(world.set_block_at(2, 200, 2, Block::new(BlockType::LAMP)));
    let lamp_far = PointLight::at(40.5, 200.5, 8.5);
    let lamp_home = PointLight::at(2.5, 200.5, 2.5);

    let lights = world.gather_lights(ChunkPosition::new(0, 0));
    assert_eq!(lights.first(), Some(&lamp_home));
    assert!(lights.contains(&lamp_far));
    assert!(lights.last().unwrap().is_sentinel());

    let lights = world.gather_lights(ChunkPosition::new(-1, 0));
    assert!(lights.contains(&lamp_home));
    assert!(!lights.contains(&lamp_far));
    assert_eq!(lights.len(), 2);
}

#[test]
fn rendering_uploads_each_mesh_once() {
    let mut world = ready_world(1);
    let mut renderer = HeadlessRenderer::new();

    renderer.begin_frame();
    world.render(&mut renderer);
    let visible = world.viewable().len();
    assert!(visible > 0);
    assert_eq!(renderer.frame_draws(), visible);
    assert_eq!(renderer.uploads(), visible);
    assert!(renderer.frame_vertices() > 0);
    assert!(renderer.max_lights() >= 1);

    renderer.begin_frame();
    world.render(&mut renderer);
    assert_eq!(renderer.uploads(), visible);
    assert_eq!(renderer.total_draws(), 2 * visible);
}

#[test]
fn ground_plane_follows_the_camera_chunk() {
    let mut world = ready_world(1);
    let mut renderer = HeadlessRenderer::new();
    assert_eq!(world.physics().get().body_count(), 1);

    world.render(&mut renderer);
    let home = ChunkPosition::new(0, 0);
    assert_eq!(world.ground_chunk(), Some(home));
    assert!(world.chunk(home).unwrap().has_ground_plane());
    assert_eq!(world.physics().get().body_count(), 2);

    world.teleport(Point3::new(24.5, 125.0, 8.5));
    world.render(&mut renderer);
    let next = ChunkPosition::new(1, 0);
    assert_eq!(world.ground_chunk(), Some(next));
    assert!(world.chunk(next).unwrap().has_ground_plane());
    assert!(!world.chunk(home).unwrap().has_ground_plane());
    assert_eq!(world.physics().get().body_count(), 2);
}
