//! Position, orientation and uniform scale with a lazily cached model matrix.
//!
//! [`RigidTransform`] is the bridge between the quaternion algebra in
//! [`quat`](crate::quat) and the renderer: every drawable object owns one, and
//! the render passes pull a `Mat4` out of it each frame. Recomputing that
//! matrix on every read would waste work for static objects, so the transform
//! keeps a cached matrix behind a dirty flag and rebuilds it only after a
//! mutation.
//!
//! The two rotation mutators make the frame of a rotation explicit instead of
//! leaving it to operand-order folklore:
//!
//! - [`RigidTransform::rotate_left`] left-multiplies (`q * current`): the
//!   rotation is applied *after* the existing orientation, so its axis is
//!   expressed in the **world frame**.
//! - [`RigidTransform::rotate_right`] right-multiplies (`current * q`): the
//!   rotation is applied *before* the existing orientation, so its axis is
//!   expressed in the object's **own (local) frame**.
//!
//! The two only coincide when the rotations commute; see the tests for a
//! counterexample.

use crate::quat::Quat;
use glam::{Mat4, Vec3};
use std::cell::Cell;

/// A 3D pose: position, orientation and uniform scale, plus the cached
/// model matrix derived from them.
///
/// The cache lives in [`Cell`]s so [`RigidTransform::model_matrix`] can take
/// `&self`; the frame loop is single-threaded and reads are idempotent.
#[derive(Debug)]
pub struct RigidTransform {
    position: Vec3,
    orientation: Quat,
    scale: f32,
    matrix: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0, Vec3::Y, 1.0)
    }
}

impl RigidTransform {
    /// Creates a transform at `position`, rotated `angle_degrees` about
    /// `axis`, with the given uniform scale.
    ///
    /// A scale of exactly `0.0` would collapse the object invisibly and is
    /// almost always a forgotten argument, so it is coerced to `1.0`.
    pub fn new(position: Vec3, angle_degrees: f32, axis: Vec3, scale: f32) -> Self {
        let scale = if scale == 0.0 { 1.0 } else { scale };

        Self {
            position,
            orientation: Quat::from_axis_angle(angle_degrees.to_radians(), axis),
            scale,
            matrix: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty.set(true);
    }

    /// Replaces the orientation outright. The quaternion is stored as given;
    /// callers are expected to pass a unit quaternion.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.dirty.set(true);
    }

    /// Moves the transform by `delta` in world space.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty.set(true);
    }

    /// Multiplies the uniform scale by `factor`. A factor of exactly `0.0`
    /// would be irreversible (every later multiply stays zero), so it is
    /// ignored.
    pub fn scale(&mut self, factor: f32) {
        if factor == 0.0 {
            return;
        }
        self.scale *= factor;
        self.dirty.set(true);
    }

    /// Rotates about an axis expressed in the **world frame**: the new
    /// orientation is `q * current`, applying `q` after everything the object
    /// has already accumulated.
    pub fn rotate_left(&mut self, q: Quat) {
        self.orientation = (q * self.orientation).normalized();
        self.dirty.set(true);
    }

    /// Rotates about an axis expressed in the object's **own frame**: the new
    /// orientation is `current * q`, applying `q` before the accumulated
    /// orientation (i.e. in already-rotated coordinates).
    pub fn rotate_right(&mut self, q: Quat) {
        self.orientation = (self.orientation * q).normalized();
        self.dirty.set(true);
    }

    /// The model matrix `translate · rotate · scale` (scale applied first).
    ///
    /// Rebuilt only when a mutation has occurred since the last read;
    /// repeated reads return the identical cached value.
    pub fn model_matrix(&self) -> Mat4 {
        if self.dirty.get() {
            let m = Mat4::from_translation(self.position)
                * self.orientation.to_mat4()
                * Mat4::from_scale(Vec3::splat(self.scale));
            self.matrix.set(m);
            self.dirty.set(false);
        }
        self.matrix.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const TOLERANCE: f32 = 1e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < TOLERANCE,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn new_transform_matrix_is_trs() {
        let t = RigidTransform::new(Vec3::new(1.0, 2.0, 3.0), 0.0, Vec3::Y, 2.0);
        let m = t.model_matrix();
        assert_vec3_near(m.transform_point3(Vec3::X), Vec3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn zero_construction_scale_becomes_one() {
        let t = RigidTransform::new(Vec3::ZERO, 0.0, Vec3::Y, 0.0);
        assert_eq!(t.scale_factor(), 1.0);
    }

    #[test]
    fn zero_scale_factor_is_ignored() {
        let mut t = RigidTransform::new(Vec3::ZERO, 0.0, Vec3::Y, 2.0);
        t.scale(0.0);
        assert_eq!(t.scale_factor(), 2.0);
        t.scale(0.5);
        assert_eq!(t.scale_factor(), 1.0);
    }

    #[test]
    fn world_frame_quarter_turn_about_y() {
        let mut t = RigidTransform::default();
        t.rotate_left(Quat::from_axis_angle(FRAC_PI_2, Vec3::Y));
        let m = t.model_matrix();

        // +X lands on -Z, +Z lands on +X.
        assert_vec3_near(m.transform_vector3(Vec3::X), -Vec3::Z);
        assert_vec3_near(m.transform_vector3(Vec3::Z), Vec3::X);
    }

    #[test]
    fn left_and_right_composition_differ() {
        // 90 deg about X, then 90 deg about Z. World-frame and local-frame
        // application give different final orientations.
        let rx = Quat::from_axis_angle(FRAC_PI_2, Vec3::X);
        let rz = Quat::from_axis_angle(FRAC_PI_2, Vec3::Z);

        let mut world = RigidTransform::default();
        world.rotate_left(rx);
        world.rotate_left(rz);

        let mut local = RigidTransform::default();
        local.rotate_right(rx);
        local.rotate_right(rz);

        // World order: +Y -> +Z (about X) -> +Z (about Z fixes it).
        assert_vec3_near(world.orientation().rotate(Vec3::Y), Vec3::Z);
        // Local order is rx * rz: +Y -> -X (about Z) -> -X (about X fixes it).
        assert_vec3_near(local.orientation().rotate(Vec3::Y), -Vec3::X);

        assert!(!world.orientation().same_orientation(&local.orientation()));
    }

    #[test]
    fn single_rotation_left_equals_right() {
        // With no accumulated orientation the two frames coincide.
        let q = Quat::from_axis_angle(1.2, Vec3::new(1.0, 2.0, 0.5));

        let mut a = RigidTransform::default();
        a.rotate_left(q);
        let mut b = RigidTransform::default();
        b.rotate_right(q);

        assert!(a.orientation().same_orientation(&b.orientation()));
    }

    #[test]
    fn matrix_reads_are_idempotent() {
        let mut t = RigidTransform::new(Vec3::new(0.5, 0.0, -1.0), 33.0, Vec3::new(1.0, 1.0, 0.0), 1.5);
        t.translate(Vec3::Y);

        let first = t.model_matrix();
        let second = t.model_matrix();
        // Bit-identical: the second read must come from the cache.
        assert_eq!(first.to_cols_array(), second.to_cols_array());
    }

    #[test]
    fn mutation_invalidates_cache() {
        let mut t = RigidTransform::default();
        let before = t.model_matrix();
        t.translate(Vec3::new(0.0, 5.0, 0.0));
        let after = t.model_matrix();
        assert_ne!(before.to_cols_array(), after.to_cols_array());
        assert_vec3_near(after.transform_point3(Vec3::ZERO), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn scale_is_applied_innermost() {
        let mut t = RigidTransform::new(Vec3::ZERO, 90.0, Vec3::Y, 1.0);
        t.scale(2.0);
        let m = t.model_matrix();
        // Scale happens before rotation: +X is doubled, then rotated onto -Z.
        assert_vec3_near(m.transform_vector3(Vec3::X), -2.0 * Vec3::Z);
    }
}
