//! The free-flying camera.
//!
//! The orientation is stored as yaw and pitch in degrees. The viewing
//! direction and the up vector are always derived from those two angles and
//! are never written directly.

use glam::{Mat4, Vec3};
use serde::Deserialize;

/// World units travelled per millisecond while a movement key is held.
pub const CAMERA_SPEED: f32 = 0.05;
/// Degrees turned per millisecond while a look key is held.
pub const TURN_SPEED: f32 = 0.1;
/// Pitch is kept inside the open interval `(-PITCH_LIMIT, PITCH_LIMIT)`.
pub const PITCH_LIMIT: f32 = 89.0;

const WORLD_UP: Vec3 = Vec3::Y;

/// Axis along which the camera can be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAxis {
    /// Along the viewing direction.
    Forward,
    /// Sideways, perpendicular to the direction and the up vector.
    Strafe,
    /// Along the camera up vector.
    Vertical,
}

/// A single continuous effect a held key has on the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    /// Move along `axis`. `amount` is the signed unit direction (+1 or -1).
    Move { axis: MoveAxis, amount: f32 },
    /// Turn by the given yaw/pitch rates, scaled by [`TURN_SPEED`].
    Turn { yaw: f32, pitch: f32 },
}

/// The viewer camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    direction: Vec3,
    up: Vec3,
}

impl Camera {
    /// Creates a new camera at `position` looking along the given yaw and pitch (degrees).
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: clamp_pitch(pitch),
            direction: Vec3::NEG_Z,
            up: WORLD_UP,
        };
        camera.recompute_basis();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// The unit viewing direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// The camera up vector, orthogonal to [`Camera::direction`].
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The unit vector pointing to the right of the camera.
    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize()
    }

    /// Adds to yaw and pitch (degrees) and recomputes the basis vectors.
    pub fn update_orientation(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = clamp_pitch(self.pitch + delta_pitch);
        self.recompute_basis();
    }

    /// Moves the camera along `axis` by `CAMERA_SPEED * delta_ms * amount`.
    pub fn translate(&mut self, axis: MoveAxis, amount: f32, delta_ms: f32) {
        let along = match axis {
            MoveAxis::Forward => self.direction,
            MoveAxis::Strafe => self.right(),
            MoveAxis::Vertical => self.up,
        };
        self.position += along * (CAMERA_SPEED * delta_ms * amount);
    }

    /// Applies one held-key action for a frame lasting `delta_ms` milliseconds.
    pub fn apply(&mut self, action: CameraAction, delta_ms: f32) {
        match action {
            CameraAction::Move { axis, amount } => self.translate(axis, amount, delta_ms),
            CameraAction::Turn { yaw, pitch } => {
                self.update_orientation(yaw * TURN_SPEED * delta_ms, pitch * TURN_SPEED * delta_ms)
            }
        }
    }

    /// Returns the view matrix looking from the position along the direction.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    fn recompute_basis(&mut self) {
        self.direction = direction_from_angles(self.yaw, self.pitch);
        let side = WORLD_UP.cross(self.direction).normalize();
        self.up = self.direction.cross(side);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), -90.0, 0.0)
    }
}

/// Unit direction for the given yaw and pitch in degrees.
pub fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
}

fn clamp_pitch(pitch: f32) -> f32 {
    // Just inside the limit so the right vector never degenerates.
    let limit = PITCH_LIMIT - f32::EPSILON * PITCH_LIMIT;
    pitch.clamp(-limit, limit)
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), aspect_ratio, self.near, self.far)
    }
}
