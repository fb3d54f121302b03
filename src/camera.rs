//! A fly camera for orbiting and inspecting the scene.
//!
//! [`FlyCamera`] starts in a fixed pose looking at the origin. Toggling free
//! mode (bound to `C` in the demo shell) enables first-person controls: WASD
//! to move, mouse to look, `Space`/`Shift` for vertical movement. The scroll
//! wheel zooms by narrowing the field of view in either mode, and `R` resets
//! the camera to its home pose.

use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::input::Input;

/// Home position the camera returns to on [`FlyCamera::reset`].
const HOME_POSITION: Vec3 = Vec3::new(30.0, 30.0, 30.0);
const HOME_FOV_DEGREES: f32 = 45.0;

const MIN_FOV_DEGREES: f32 = 10.0;
const MAX_FOV_DEGREES: f32 = 90.0;

/// First-person camera with yaw/pitch orientation and scroll-wheel zoom.
///
/// Yaw of `0` looks toward `-Z`; pitch is positive looking up. Pitch is
/// clamped just short of straight up/down to avoid a degenerate view basis.
#[derive(Clone, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Horizontal angle in radians. 0 = looking toward -Z.
    pub yaw: f32,
    /// Vertical angle in radians. 0 = horizontal, positive = up.
    pub pitch: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Whether first-person controls are active.
    pub free: bool,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Mouse look sensitivity.
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        let mut camera = Self {
            position: HOME_POSITION,
            yaw: 0.0,
            pitch: 0.0,
            fov: HOME_FOV_DEGREES.to_radians(),
            free: false,
            speed: 15.0,
            sensitivity: 0.003,
            near: 0.1,
            far: 1000.0,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }
}

impl FlyCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the camera at a world position without moving it.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        self.yaw = dir.x.atan2(-dir.z);
        self.pitch = dir.y.asin().clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }

    /// Return to the home pose: fixed mode, looking at the origin from the
    /// home position with the default field of view.
    pub fn reset(&mut self) {
        self.position = HOME_POSITION;
        self.fov = HOME_FOV_DEGREES.to_radians();
        self.free = false;
        self.look_at(Vec3::ZERO);
    }

    /// The unit forward direction derived from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize_or_zero()
    }

    /// The horizontal right direction, used for strafing.
    fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin()).normalize_or_zero()
    }

    /// Apply this frame's input: scroll zoom always, mouse look and WASD
    /// movement only while free.
    pub fn update(&mut self, input: &Input, dt: f32) {
        let zoom = input.scroll_delta().y;
        if zoom != 0.0 {
            self.fov = (self.fov - zoom * 2.0_f32.to_radians()).clamp(
                MIN_FOV_DEGREES.to_radians(),
                MAX_FOV_DEGREES.to_radians(),
            );
        }

        if !self.free {
            return;
        }

        let delta = input.mouse_delta();
        self.yaw += delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );

        let forward = self.forward();
        let right = self.right();
        let mut velocity = Vec3::ZERO;

        if input.key_down(KeyCode::KeyW) {
            velocity += forward;
        }
        if input.key_down(KeyCode::KeyS) {
            velocity -= forward;
        }
        if input.key_down(KeyCode::KeyA) {
            velocity -= right;
        }
        if input.key_down(KeyCode::KeyD) {
            velocity += right;
        }
        if input.key_down(KeyCode::Space) {
            velocity += Vec3::Y;
        }
        if input.key_down(KeyCode::ShiftLeft) {
            velocity -= Vec3::Y;
        }

        if velocity.length_squared() > 0.0 {
            self.position += velocity.normalize() * self.speed * dt;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn default_looks_at_origin() {
        let camera = FlyCamera::new();
        let expected = (Vec3::ZERO - HOME_POSITION).normalize();
        assert!((camera.forward() - expected).length() < TOLERANCE);
    }

    #[test]
    fn look_at_recovers_yaw_and_pitch() {
        let mut camera = FlyCamera::new();
        camera.position = Vec3::ZERO;
        camera.look_at(-Vec3::Z);
        assert!(camera.yaw.abs() < TOLERANCE);
        assert!(camera.pitch.abs() < TOLERANCE);

        camera.look_at(Vec3::X);
        assert!((camera.yaw - std::f32::consts::FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn reset_restores_home_pose() {
        let mut camera = FlyCamera::new();
        camera.free = true;
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        camera.fov = 1.0;
        camera.reset();

        assert!(!camera.free);
        assert_eq!(camera.position, HOME_POSITION);
        assert!((camera.fov - HOME_FOV_DEGREES.to_radians()).abs() < TOLERANCE);
    }

    #[test]
    fn view_matrix_moves_origin_in_front_of_camera() {
        let camera = FlyCamera::new();
        let view_origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        // The origin sits straight ahead: on the -Z view axis at the home
        // distance.
        assert!(view_origin.x.abs() < 1e-3);
        assert!(view_origin.y.abs() < 1e-3);
        assert!((view_origin.z + HOME_POSITION.length()).abs() < 1e-3);
    }
}
