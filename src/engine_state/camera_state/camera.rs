//! # Camera Implementation
//!
//! The player camera. It doubles as the player: its position is read back
//! from the player's rigid body every tick, and its movement flags (flying,
//! grounded, accumulated fall speed) drive the movement code in the world.
//!
//! ## Key Components
//! - `Camera`: Position, orientation and movement state
//! - `Projection`: Perspective projection settings

use cgmath::*;

use crate::application_state::config::CameraConfig;

/// Pitch is kept strictly inside ±90° so `front` never lines up with world up.
const PITCH_LIMIT: f32 = 89.0;

/// Near clipping plane distance
const Z_NEAR: f32 = 0.01;
/// Far clipping plane distance
const Z_FAR: f32 = 1000.0;

/// A first-person (optionally third-person) camera in world space.
///
/// Angles are in degrees. A yaw of 0 looks down +X, 90 down +Z.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation around Y, wrapped into [0, 360]
    pub yaw: Deg<f32>,
    /// Vertical rotation, clamped to ±89°
    pub pitch: Deg<f32>,
    /// Vertical field of view
    pub fov: Deg<f32>,
    /// Movement speed in blocks per second
    pub speed: f32,
    /// Degrees of rotation per unit of mouse movement
    pub sensitivity: f32,
    /// Normalized forward vector
    pub front: Vector3<f32>,
    /// Normalized vector pointing to the camera's right
    pub right: Vector3<f32>,
    /// Normalized vector pointing to the camera's up
    pub up: Vector3<f32>,
    /// Free flight: no gravity, vertical movement on jump/descend
    pub flying: bool,
    /// A solid block sits two units below the camera
    pub grounded: bool,
    /// Downward speed accumulated while falling (negative)
    pub gravity_velocity: f32,
    /// View from one unit behind the player
    pub third_person: bool,
}

impl Camera {
    /// Creates a camera from its configuration.
    ///
    /// # Arguments
    /// * `config` - Spawn point, angles, speed and sensitivity
    ///
    /// # Returns
    /// A walking (not flying) camera with up-to-date direction vectors
    pub fn new(config: &CameraConfig) -> Self {
        let [x, y, z] = config.spawn;
        let mut camera = Camera {
            position: Point3::new(x, y, z),
            yaw: Deg(config.yaw_degrees),
            pitch: Deg(config.pitch_degrees.clamp(-PITCH_LIMIT, PITCH_LIMIT)),
            fov: Deg(config.fov_degrees),
            speed: config.speed,
            sensitivity: config.mouse_sensitivity,
            front: Vector3::unit_x(),
            right: Vector3::unit_z(),
            up: Vector3::unit_y(),
            flying: false,
            grounded: false,
            gravity_velocity: 0.0,
            third_person: false,
        };
        camera.update_vectors();
        camera
    }

    /// Recomputes `front`, `right` and `up` from yaw and pitch.
    pub fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = Rad::from(self.yaw).0.sin_cos();
        let (pitch_sin, pitch_cos) = Rad::from(self.pitch).0.sin_cos();

        self.front = Vector3::new(pitch_cos * yaw_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(Vector3::unit_y()).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Applies a mouse movement.
    ///
    /// # Arguments
    /// * `dx` - Horizontal movement; positive turns right
    /// * `dy` - Vertical movement; positive looks down
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw.0 += dx * self.sensitivity;
        self.pitch.0 -= dy * self.sensitivity;

        if self.yaw.0 > 360.0 {
            self.yaw.0 = 0.0;
        } else if self.yaw.0 < 0.0 {
            self.yaw.0 = 360.0;
        }
        self.pitch.0 = self.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_vectors();
    }

    /// `front` projected onto the ground plane.
    ///
    /// Falls back to +X when looking straight up or down.
    pub fn horizontal_front(&self) -> Vector3<f32> {
        flatten(self.front)
    }

    /// `right` projected onto the ground plane.
    pub fn horizontal_right(&self) -> Vector3<f32> {
        flatten(self.right)
    }

    /// Moves the camera to the player body's position.
    pub fn sync_from_body(&mut self, position: Vector3<f32>) {
        self.position = Point3::from_vec(position);
    }

    /// Switches between walking and flying. Either way the fall speed resets.
    pub fn toggle_flying(&mut self) {
        self.flying = !self.flying;
        self.gravity_velocity = 0.0;
    }

    /// Calculates the view matrix for this camera.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        if self.third_person {
            Matrix4::look_at_rh(self.position - self.front, self.position + self.front, self.up)
        } else {
            Matrix4::look_to_rh(self.position, self.front, self.up)
        }
    }
}

fn flatten(v: Vector3<f32>) -> Vector3<f32> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    if flat.magnitude2() > f32::EPSILON {
        flat.normalize()
    } else {
        Vector3::unit_x()
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view
    fovy: Rad<f32>,
}

impl Projection {
    /// Creates a new projection for a viewport of the given size.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
        }
    }

    /// Updates the aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, Z_NEAR, Z_FAR)
    }
}
