//! # Physics
//!
//! A thin wrapper over a rapier rigid-body world. The voxel world only uses it
//! for two kinds of bodies:
//!
//! * the player, a dynamic box whose velocity is set by the movement code
//!   every tick;
//! * one fixed ground plane for the chunk the player is standing in.
//!
//! World gravity is zero. Falling is accumulated by the movement code and
//! handed over as velocity.
//!
//! Bodies are owned through [`BodyHandle`], which removes its body (and the
//! body's colliders) from the world when dropped. The physics world is only
//! ever touched from the main thread.

use cgmath::Vector3;
use log::debug;
use rapier3d::prelude::*;

use crate::{core::MtResource, engine_state::voxels::chunk::ChunkPosition};

/// Height of the chunk ground plane: the top of the bedrock layer.
pub const GROUND_PLANE_HEIGHT: f32 = 1.0;

/// Half extents of the player's collision box.
pub const PLAYER_HALF_EXTENTS: [f32; 3] = [1.0, 2.0, 1.0];

/// Slack for accumulated float error when deciding whether a substep fits.
const SUBSTEP_EPSILON: f32 = 1e-5;

fn to_rapier(v: Vector3<f32>) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_rapier(v: &Vector<Real>) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

/// All rapier state needed to step a simulation.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Simulated time not yet consumed by a substep
    accumulator: f32,
}

impl PhysicsWorld {
    /// Creates an empty world that advances in fixed substeps of `fixed_substep` seconds.
    pub fn new(fixed_substep: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: fixed_substep,
            ..IntegrationParameters::default()
        };

        PhysicsWorld {
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            accumulator: 0.0,
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Runs as many fixed substeps as fit in the accumulated time, at most
    /// `max_substeps`. Time that does not fit under the cap is dropped.
    /// Returns the number of substeps taken.
    pub fn step(&mut self, dt: f32, max_substeps: u32) -> u32 {
        let substep = self.integration_parameters.dt;
        self.accumulator += dt.max(0.0);

        let mut taken = 0;
        while self.accumulator + SUBSTEP_EPSILON >= substep && taken < max_substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
            self.accumulator = (self.accumulator - substep).max(0.0);
            taken += 1;
        }

        if taken == max_substeps && self.accumulator + SUBSTEP_EPSILON >= substep {
            debug!("Physics fell behind, dropping {:.3}s", self.accumulator);
            self.accumulator = 0.0;
        }
        taken
    }

    /// Adds the player's dynamic box centered at `position`.
    pub fn add_player(&mut self, position: Vector3<f32>) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_rapier(position))
            .lock_rotations()
            .can_sleep(false)
            .build();
        let [hx, hy, hz] = PLAYER_HALF_EXTENTS;
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Adds an infinite upward-facing plane at [`GROUND_PLANE_HEIGHT`].
    pub fn add_ground_plane(&mut self, origin: Vector3<f32>) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![origin.x, GROUND_PLANE_HEIGHT, origin.z])
            .build();
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .friction(0.0)
            .build();

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Removes a body and every collider attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        self.bodies.get(handle).map(|body| from_rapier(body.translation()))
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        self.bodies.get(handle).map(|body| from_rapier(body.linvel()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vector3<f32>) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(to_rapier(velocity), true);
        }
    }

    pub fn set_translation(&mut self, handle: RigidBodyHandle, position: Vector3<f32>) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_rapier(position), true);
        }
    }
}

/// Owns one body in a shared [`PhysicsWorld`].
///
/// Dropping the handle unregisters the body. Never drop one while holding a
/// lock on the same physics world.
pub struct BodyHandle {
    world: MtResource<PhysicsWorld>,
    handle: RigidBodyHandle,
}

impl BodyHandle {
    /// Registers the player body at `position`.
    pub fn player(world: &MtResource<PhysicsWorld>, position: Vector3<f32>) -> Self {
        let handle = world.get_mut().add_player(position);
        BodyHandle {
            world: world.clone(),
            handle,
        }
    }

    /// Registers the ground plane of the chunk at `position`.
    pub fn ground_plane(world: &MtResource<PhysicsWorld>, position: ChunkPosition) -> Self {
        let handle = world.get_mut().add_ground_plane(position.world_origin());
        BodyHandle {
            world: world.clone(),
            handle,
        }
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    pub fn translation(&self) -> Option<Vector3<f32>> {
        self.world.get().translation(self.handle)
    }

    pub fn linear_velocity(&self) -> Option<Vector3<f32>> {
        self.world.get().linear_velocity(self.handle)
    }

    pub fn set_linear_velocity(&self, velocity: Vector3<f32>) {
        self.world.get_mut().set_linear_velocity(self.handle, velocity);
    }

    pub fn set_translation(&self, position: Vector3<f32>) {
        self.world.get_mut().set_translation(self.handle, position);
    }
}

impl Drop for BodyHandle {
    fn drop(&mut self) {
        self.world.get_mut().remove_body(self.handle);
    }
}

impl std::fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BodyHandle").field(&self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_world() -> MtResource<PhysicsWorld> {
        MtResource::new(PhysicsWorld::new(1.0 / 60.0))
    }

    #[test]
    fn dropping_a_handle_unregisters_the_body() {
        let world = shared_world();
        let plane = BodyHandle::ground_plane(&world, ChunkPosition::new(3, -2));
        let player = BodyHandle::player(&world, Vector3::new(8.0, 20.0, 8.0));
        assert_eq!(world.get().body_count(), 2);
        assert_eq!(world.get().collider_count(), 2);

        drop(plane);
        assert_eq!(world.get().body_count(), 1);
        assert_eq!(world.get().collider_count(), 1);
        assert!(player.translation().is_some());
    }

    #[test]
    fn velocity_is_integrated_without_gravity() {
        let world = shared_world();
        let player = BodyHandle::player(&world, Vector3::new(0.0, 50.0, 0.0));
        player.set_linear_velocity(Vector3::new(6.0, 0.0, 0.0));

        assert_eq!(world.get_mut().step(0.5, 100), 30);
        let position = player.translation().unwrap();
        assert!((position.x - 3.0).abs() < 0.05, "{position:?}");
        assert!((position.y - 50.0).abs() < 1e-3, "{position:?}");
    }

    #[test]
    fn substeps_are_capped() {
        let world = shared_world();
        let mut physics = world.get_mut();
        assert_eq!(physics.step(1.0, 5), 5);
        // The backlog was dropped rather than carried over
        assert_eq!(physics.step(0.0, 5), 0);
    }

    #[test]
    fn ground_plane_stops_a_falling_player() {
        let world = shared_world();
        let _plane = BodyHandle::ground_plane(&world, ChunkPosition::new(0, 0));
        let player = BodyHandle::player(&world, Vector3::new(8.0, 10.0, 8.0));

        for _ in 0..240 {
            player.set_linear_velocity(Vector3::new(0.0, -5.0, 0.0));
            world.get_mut().step(1.0 / 60.0, 10);
        }
        let resting = GROUND_PLANE_HEIGHT + PLAYER_HALF_EXTENTS[1];
        let y = player.translation().unwrap().y;
        assert!(y > resting - 0.25 && y < resting + 0.25, "y = {y}");
    }
}
