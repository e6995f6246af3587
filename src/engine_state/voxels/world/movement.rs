//! Player movement against the voxel grid.
//!
//! Movement is resolved into a velocity every tick and handed to the player
//! body. The grid of the chunk under the camera is the only collision source
//! consulted here; the physics ground plane catches anything that slips
//! through.

use std::sync::Arc;

use cgmath::{EuclideanSpace, Vector3};

use crate::{
    application_state::input_state::InputSnapshot,
    engine_state::voxels::chunk::Chunk,
};

use super::World;

/// Upward speed given by a jump.
pub const JUMP_VELOCITY: f32 = 10.0;
/// Downward acceleration while falling, in blocks per second squared.
pub const GRAVITY: f32 = 9.8;
/// Fall speed given on the first airborne tick.
const INITIAL_FALL_VELOCITY: f32 = -0.01;

/// Whether the cell containing `point` (chunk-local) is solid.
fn occupied(chunk: &Chunk, point: Vector3<f32>) -> bool {
    chunk.occupied(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// Whether a player column of three cells centered one unit from `local`
/// along `axis` (in the direction of `sign`) is free.
fn axis_clear(chunk: &Chunk, local: Vector3<f32>, axis: usize, sign: f32) -> bool {
    let mut probe = local;
    probe[axis] += sign;
    (-1..=1).all(|dy| !occupied(chunk, probe + Vector3::new(0.0, dy as f32, 0.0)))
}

impl World {
    /// Turns input into the player body's velocity for this tick.
    pub(super) fn player_movement(&mut self, input: &InputSnapshot) {
        let Some(chunk) = self.chunks.get(&self.camera_chunk()).map(Arc::clone) else {
            self.player.set_linear_velocity(Vector3::new(0.0, 0.0, 0.0));
            return;
        };
        let local = self.camera.position.to_vec() - self.camera_chunk().world_origin();
        let camera = &mut self.camera;

        camera.grounded = occupied(&chunk, local - Vector3::unit_y() * 2.0);

        let mut target = Vector3::new(0.0, 0.0, 0.0);

        if !camera.flying {
            let rising = self
                .player
                .linear_velocity()
                .map_or(0.0, |velocity| velocity.y);
            if rising > 0.0 {
                target.y = rising;
            }
        }

        if input.toggle_fly.is_just_pressed() {
            camera.toggle_flying();
            if camera.flying {
                self.player.set_linear_velocity(Vector3::new(0.0, 0.0, 0.0));
            }
        }

        let (forward, right) = if camera.flying {
            (camera.front, camera.right)
        } else {
            (camera.horizontal_front(), camera.horizontal_right())
        };

        let mut desired = Vector3::new(0.0, 0.0, 0.0);
        if input.forward.is_active() {
            desired += forward;
        }
        if input.backward.is_active() {
            desired -= forward;
        }
        if input.right.is_active() {
            desired += right;
        }
        if input.left.is_active() {
            desired -= right;
        }

        // Each axis is blocked on its own, so sliding along a wall still works
        let axes: &[usize] = if camera.flying { &[0, 1, 2] } else { &[0, 2] };
        for &axis in axes {
            if desired[axis] != 0.0 && !axis_clear(&chunk, local, axis, desired[axis].signum()) {
                desired[axis] = 0.0;
            }
        }
        target.x += desired.x * camera.speed;
        target.z += desired.z * camera.speed;
        if camera.flying {
            target.y += desired.y * camera.speed;
        }

        let head = local + Vector3::unit_y();
        let head_blocked = occupied(&chunk, head);

        if input.jump.is_active() && !head_blocked {
            if camera.flying {
                target.y += camera.speed;
            } else if camera.grounded {
                target.y = JUMP_VELOCITY;
            }
        }
        if head_blocked && target.y > 0.0 {
            target.y = 0.0;
        }

        if input.descend.is_active() && camera.flying && !camera.grounded {
            target.y -= camera.speed;
        }

        if !camera.flying {
            if camera.grounded {
                camera.gravity_velocity = 0.0;
                target.y = target.y.max(0.0);
            } else {
                if camera.gravity_velocity == 0.0 {
                    camera.gravity_velocity = INITIAL_FALL_VELOCITY;
                }
                camera.gravity_velocity -= GRAVITY * self.config.fixed_timestep;
                target.y += camera.gravity_velocity;
            }
        }

        self.player.set_linear_velocity(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::{block_type::BlockType, Block},
        chunk::{BlockGrid, ChunkPosition, LocalCoords},
    };

    fn chunk_with(blocks: &[(usize, usize, usize)]) -> Chunk {
        let mut grid = BlockGrid::new();
        for &(x, y, z) in blocks {
            grid.set(LocalCoords::new(x, y, z), Block::new(BlockType::STONE));
        }
        Chunk::with_grid(ChunkPosition::new(0, 0), grid)
    }

    #[test]
    fn wall_blocks_only_its_axis() {
        let chunk = chunk_with(&[(6, 10, 5)]);
        let local = Vector3::new(5.5, 10.5, 5.5);
        assert!(!axis_clear(&chunk, local, 0, 1.0));
        assert!(axis_clear(&chunk, local, 0, -1.0));
        assert!(axis_clear(&chunk, local, 2, 1.0));
    }

    #[test]
    fn column_check_covers_feet_and_head() {
        let feet = chunk_with(&[(6, 9, 5)]);
        let head = chunk_with(&[(6, 11, 5)]);
        let above = chunk_with(&[(6, 12, 5)]);
        let local = Vector3::new(5.5, 10.5, 5.5);
        assert!(!axis_clear(&feet, local, 0, 1.0));
        assert!(!axis_clear(&head, local, 0, 1.0));
        assert!(axis_clear(&above, local, 0, 1.0));
    }

    #[test]
    fn outside_the_chunk_is_open() {
        let chunk = chunk_with(&[]);
        assert!(axis_clear(&chunk, Vector3::new(15.5, 10.0, 0.5), 0, 1.0));
        assert!(!occupied(&chunk, Vector3::new(-0.5, 10.0, 0.5)));
    }
}
