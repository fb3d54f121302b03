//! Quaternion algebra for composing 3D rotations.
//!
//! This module is the mathematical core of Strophe. It provides [`Quat`], a
//! hand-rolled quaternion type built on top of glam's vectors and matrices,
//! with construction from axis-angle pairs, shortest-arc alignment, and
//! matrices; Hamilton-product composition; interpolation (nlerp and slerp);
//! and conversion to the 4×4 rotation matrices consumed by the renderer.
//!
//! # Multiplication convention
//!
//! Quaternion multiplication is non-commutative, and every subtle bug in
//! rotation code traces back to an ambiguous operand order. Strophe fixes one
//! convention and uses it everywhere:
//!
//! **`a * b` applies `b`'s rotation first, then `a`'s.**
//!
//! Equivalently, `(a * b).rotate(v) == a.rotate(b.rotate(v))`. Left-multiplying
//! a new rotation onto an existing orientation therefore applies it in the
//! world frame, and right-multiplying applies it in the object's own (already
//! rotated) frame. See [`RigidTransform`](crate::RigidTransform) for the two
//! composition mutators built on this rule.
//!
//! # Unit quaternions
//!
//! Only unit quaternions represent orientations. Arithmetic results may be
//! transiently non-unit; normalize them before treating them as rotations or
//! feeding them to [`Quat::rotate`]. Note that `q` and `-q` describe the same
//! spatial orientation even though their components differ — use
//! [`Quat::same_orientation`] when that equivalence matters, and
//! [`Quat::approx_eq`] when it does not.
//!
//! # Example
//!
//! ```
//! use strophe::{Quat, Vec3};
//!
//! // 90 degrees about the Z axis maps +X onto +Y.
//! let q = Quat::from_axis_angle(std::f32::consts::FRAC_PI_2, Vec3::Z);
//! let v = q.rotate(Vec3::X);
//! assert!((v - Vec3::Y).length() < 1e-5);
//! ```

use glam::{Mat4, Vec3, Vec4};
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance shared by every near-zero and near-parallel branch in the
/// quaternion code: normalization, inversion, slerp's nlerp fallback, and the
/// approximate comparisons.
pub const QUAT_EPSILON: f32 = 1e-6;

/// A quaternion `(x, y, z, w)` where `[x, y, z]` is the vector part and `w`
/// the scalar part.
///
/// Constructed by [`Quat::from_axis_angle`], [`Quat::from_to`],
/// [`Quat::look_rotation`], [`Quat::from_mat4`], or plain arithmetic.
/// Immutable value semantics throughout; the only in-place operation is
/// [`Quat::normalize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// The no-rotation quaternion `(0, 0, 0, 1)`.
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a quaternion from raw components. No normalization is applied;
    /// prefer the rotation constructors when building an orientation.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized internally. A zero-length axis degrades to a
    /// zero vector, producing `(0, 0, 0, cos(angle/2))` — a meaningless but
    /// non-crashing result. Callers that can receive user-supplied axes
    /// should validate them first.
    pub fn from_axis_angle(angle: f32, axis: Vec3) -> Self {
        let norm = axis.normalize_or_zero();
        let s = (angle * 0.5).sin();

        Self {
            x: norm.x * s,
            y: norm.y * s,
            z: norm.z * s,
            w: (angle * 0.5).cos(),
        }
    }

    /// Returns the shortest-arc rotation mapping unit vector `from` onto unit
    /// vector `to`.
    ///
    /// If the vectors already coincide the identity is returned. If they are
    /// antiparallel there is no unique rotation axis; the world axis least
    /// aligned with `from` is picked to build a 180° rotation (zero scalar
    /// part).
    pub fn from_to(from: Vec3, to: Vec3) -> Self {
        let f = from.normalize_or_zero();
        let t = to.normalize_or_zero();
        let cos = f.dot(t);

        if cos > 1.0 - QUAT_EPSILON {
            return Self::IDENTITY;
        }

        if cos < -1.0 + QUAT_EPSILON {
            // Antiparallel: rotate 180 degrees about any axis orthogonal to
            // `from`, chosen from the world axis with the smallest projection.
            let mut ortho = Vec3::X;
            if f.y.abs() < f.x.abs() {
                ortho = Vec3::Y;
            }
            if f.z.abs() < f.y.abs() && f.z.abs() < f.x.abs() {
                ortho = Vec3::Z;
            }

            let axis = f.cross(ortho).normalize_or_zero();
            return Self::new(axis.x, axis.y, axis.z, 0.0);
        }

        // Half-vector construction: the rotation from f to the half vector
        // has exactly half the angle, which is what the quaternion encodes.
        let half = (f + t).normalize_or_zero();
        let axis = f.cross(half);

        Self::new(axis.x, axis.y, axis.z, f.dot(half))
    }

    /// Computes the rotation whose forward direction is `forward` and whose
    /// up direction is as close to `up` as orthogonality allows.
    ///
    /// Built in two steps with a fixed, documented order: first align world
    /// forward `(0, 0, 1)` with `forward`, then twist about the new forward
    /// axis to bring the rotated up vector onto `up`. Under this crate's
    /// multiplication convention (right operand first) that composition is
    /// `twist * forward_alignment`.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let f = forward.normalize_or_zero();
        let u = up.normalize_or_zero();
        let r = u.cross(f);
        let u = f.cross(r);

        // World forward to the desired forward.
        let forward_alignment = Self::from_to(Vec3::Z, f);

        // Where did that put the object's up? Twist it onto the desired up.
        // The twist axis is parallel to `f`, so the forward alignment is
        // preserved.
        let object_up = forward_alignment.rotate(Vec3::Y);
        let twist = Self::from_to(object_up, u);

        (twist * forward_alignment).normalized()
    }

    /// Reconstructs a rotation from the upper-left 3×3 block of `m`.
    ///
    /// The up and forward basis vectors are read from the matrix columns,
    /// re-orthogonalized (right from up×forward, then up recomputed from
    /// forward×right), and fed through [`Quat::look_rotation`]. The result is
    /// a unit quaternion even for slightly skewed input.
    pub fn from_mat4(m: &Mat4) -> Self {
        let up = m.col(1).truncate().normalize_or_zero();
        let forward = m.col(2).truncate().normalize_or_zero();
        let right = up.cross(forward);
        let up = forward.cross(right);

        Self::look_rotation(forward, up)
    }

    /// The vector part `(x, y, z)`.
    #[inline]
    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// The normalized rotation axis. Zero for the identity (no axis exists).
    pub fn axis(&self) -> Vec3 {
        self.vector().normalize_or_zero()
    }

    /// The rotation angle in radians, in `[0, 2π]`.
    pub fn angle(&self) -> f32 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, other: &Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Squared norm `x² + y² + z² + w²`.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Norm. Returns `0.0` outright when the squared norm is below
    /// [`QUAT_EPSILON`] rather than taking the root of a denormal.
    pub fn length(&self) -> f32 {
        let len_sq = self.length_squared();
        if len_sq < QUAT_EPSILON {
            return 0.0;
        }
        len_sq.sqrt()
    }

    /// Normalizes in place. No-op when the squared norm is below
    /// [`QUAT_EPSILON`].
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Returns the unit quaternion with this one's direction, or the identity
    /// when the squared norm is below [`QUAT_EPSILON`].
    pub fn normalized(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq < QUAT_EPSILON {
            return Self::IDENTITY;
        }
        let inv_len = 1.0 / len_sq.sqrt();

        Self {
            x: self.x * inv_len,
            y: self.y * inv_len,
            z: self.z * inv_len,
            w: self.w * inv_len,
        }
    }

    /// Negated vector part. For unit quaternions this is also the inverse.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// The multiplicative inverse: conjugate divided by the squared norm.
    /// Returns the identity when the squared norm is below [`QUAT_EPSILON`]
    /// instead of dividing by near-zero.
    pub fn inverse(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq < QUAT_EPSILON {
            return Self::IDENTITY;
        }
        let recip = 1.0 / len_sq;

        Self {
            x: -self.x * recip,
            y: -self.y * recip,
            z: -self.z * recip,
            w: self.w * recip,
        }
    }

    /// Component-wise comparison within [`QUAT_EPSILON`].
    ///
    /// Note that this is stricter than orientation equality: `q` and `-q`
    /// compare unequal here even though they rotate identically. Use
    /// [`Quat::same_orientation`] for the spatial equivalence.
    pub fn approx_eq(&self, other: &Quat) -> bool {
        (self.x - other.x).abs() <= QUAT_EPSILON
            && (self.y - other.y).abs() <= QUAT_EPSILON
            && (self.z - other.z).abs() <= QUAT_EPSILON
            && (self.w - other.w).abs() <= QUAT_EPSILON
    }

    /// Whether two quaternions describe the same spatial orientation, which
    /// holds when the components match or when they are exact negations (unit
    /// quaternions double-cover the rotation group).
    pub fn same_orientation(&self, other: &Quat) -> bool {
        self.approx_eq(other) || self.approx_eq(&-*other)
    }

    /// Rotates `v` by this quaternion.
    ///
    /// Uses the expanded sandwich product
    /// `v + 2·cross(q.v, cross(q.v, v) + q.w·v)`, which is algebraically
    /// `q · v · q⁻¹` for unit `q` without building the intermediate
    /// quaternions. The quaternion must be unit length for the result to be a
    /// pure rotation.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let qv = self.vector();
        v + 2.0 * qv.cross(qv.cross(v) + self.w * v)
    }

    /// Raw component-wise blend `self·(1−t) + other·t`. The result is not
    /// normalized and is generally not a unit quaternion; see [`Quat::nlerp`]
    /// for the orientation-safe version.
    pub fn lerp(&self, other: &Quat, t: f32) -> Self {
        *self * (1.0 - t) + *other * t
    }

    /// Normalized linear interpolation: blend the components, then
    /// renormalize. Cheap, commonly good enough, but the angular velocity is
    /// not constant across `t`.
    pub fn nlerp(&self, other: &Quat, t: f32) -> Self {
        (*self + (*other - *self) * t).normalized()
    }

    /// Raises the quaternion to a scalar power, scaling the rotation angle by
    /// `f` while keeping the axis.
    ///
    /// `q.powf(0.5)` is half the rotation, `q.powf(2.0)` twice it. The
    /// identity (which has no axis) is returned unchanged for any power.
    pub fn powf(&self, f: f32) -> Self {
        let angle = self.angle();
        let axis = self.axis();

        let half_sin = (f * angle * 0.5).sin();
        let half_cos = (f * angle * 0.5).cos();

        Self {
            x: axis.x * half_sin,
            y: axis.y * half_sin,
            z: axis.z * half_sin,
            w: half_cos,
        }
    }

    /// Spherical linear interpolation from `self` (at `t = 0`) to `other`
    /// (at `t = 1`) with constant angular velocity.
    ///
    /// Computed as `(other · self⁻¹)^t · self`: take the delta rotation
    /// between the endpoints, scale its angle by `t`, and apply it on top of
    /// the start. When the inputs are nearly parallel (`|dot| > 1 − ε`) the
    /// delta's axis is numerically meaningless, so this falls back to
    /// [`Quat::nlerp`], which is indistinguishable at such small angles.
    pub fn slerp(&self, other: &Quat, t: f32) -> Self {
        if self.dot(other).abs() > 1.0 - QUAT_EPSILON {
            return self.nlerp(other, t);
        }

        ((*other * self.inverse()).powf(t) * *self).normalized()
    }

    /// Builds the homogeneous rotation matrix for this quaternion.
    ///
    /// The upper-left 3×3 block holds the rotated standard basis vectors as
    /// columns (glam matrices are column-major), the translation column is
    /// zero and the bottom-right element is one. The quaternion should be
    /// unit length.
    pub fn to_mat4(&self) -> Mat4 {
        let r = self.rotate(Vec3::X);
        let u = self.rotate(Vec3::Y);
        let f = self.rotate(Vec3::Z);

        Mat4::from_cols(r.extend(0.0), u.extend(0.0), f.extend(0.0), Vec4::W)
    }
}

impl Add for Quat {
    type Output = Quat;

    fn add(self, rhs: Quat) -> Quat {
        Quat::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub for Quat {
    type Output = Quat;

    fn sub(self, rhs: Quat) -> Quat {
        Quat::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, rhs: f32) -> Quat {
        Quat::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// Hamilton product. `a * b` applies `b`'s rotation first, then `a`'s.
impl Mul for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Quat {
        Quat::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const TOLERANCE: f32 = 1e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < TOLERANCE,
            "expected {b:?}, got {a:?} (distance {})",
            (a - b).length()
        );
    }

    fn assert_quat_near(a: Quat, b: Quat) {
        assert!(
            (a.x - b.x).abs() < TOLERANCE
                && (a.y - b.y).abs() < TOLERANCE
                && (a.z - b.z).abs() < TOLERANCE
                && (a.w - b.w).abs() < TOLERANCE,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn identity_has_no_effect() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_vec3_near(Quat::IDENTITY.rotate(v), v);
        assert_quat_near(Quat::IDENTITY * Quat::IDENTITY, Quat::IDENTITY);
    }

    #[test]
    fn from_axis_angle_components() {
        let q = Quat::from_axis_angle(FRAC_PI_2, Vec3::Z);
        let half = FRAC_PI_4;
        assert_quat_near(q, Quat::new(0.0, 0.0, half.sin(), half.cos()));
    }

    #[test]
    fn from_axis_angle_normalizes_axis() {
        let a = Quat::from_axis_angle(1.0, Vec3::new(0.0, 10.0, 0.0));
        let b = Quat::from_axis_angle(1.0, Vec3::Y);
        assert_quat_near(a, b);
    }

    #[test]
    fn zero_axis_degrades_without_panicking() {
        let q = Quat::from_axis_angle(FRAC_PI_2, Vec3::ZERO);
        assert_eq!(q.vector(), Vec3::ZERO);
        assert!((q.w - FRAC_PI_4.cos()).abs() < TOLERANCE);
    }

    #[test]
    fn normalized_has_unit_length() {
        let q = Quat::new(1.0, 2.0, 3.0, 4.0).normalized();
        assert!((q.length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn normalize_of_near_zero_is_identity() {
        let q = Quat::new(1e-8, 0.0, 0.0, 0.0).normalized();
        assert_quat_near(q, Quat::IDENTITY);
        assert_quat_near(Quat::new(0.0, 0.0, 0.0, 1e-8).inverse(), Quat::IDENTITY);
    }

    #[test]
    fn inverse_round_trip_is_identity() {
        let q = Quat::from_axis_angle(1.1, Vec3::new(0.3, -0.7, 0.2));
        assert!((q * q.inverse()).same_orientation(&Quat::IDENTITY));
        assert!((q * q.inverse()).approx_eq(&Quat::IDENTITY));
    }

    #[test]
    fn rotation_axis_is_a_fixed_point() {
        let axis = Vec3::new(1.0, 2.0, -0.5).normalize();
        let q = Quat::from_axis_angle(2.3, axis);
        assert_vec3_near(q.rotate(axis), axis);
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let q = Quat::from_axis_angle(FRAC_PI_2, Vec3::Z);
        assert_vec3_near(q.rotate(Vec3::X), Vec3::Y);
    }

    #[test]
    fn product_applies_right_operand_first() {
        // 90 deg about X takes +Y to +Z; a following 90 deg about Z (world
        // frame, hence left operand) leaves +Z where it is.
        let rx = Quat::from_axis_angle(FRAC_PI_2, Vec3::X);
        let rz = Quat::from_axis_angle(FRAC_PI_2, Vec3::Z);

        assert_vec3_near((rz * rx).rotate(Vec3::Y), Vec3::Z);
        // Reversed order: 90 deg about Z first takes +Y to -X, then 90 deg
        // about X leaves -X alone.
        assert_vec3_near((rx * rz).rotate(Vec3::Y), -Vec3::X);
    }

    #[test]
    fn product_matches_composed_rotation() {
        let a = Quat::from_axis_angle(0.8, Vec3::new(1.0, 1.0, 0.0));
        let b = Quat::from_axis_angle(-1.3, Vec3::new(0.0, 1.0, 2.0));
        let v = Vec3::new(0.5, -1.0, 2.0);
        assert_vec3_near((a * b).rotate(v), a.rotate(b.rotate(v)));
    }

    #[test]
    fn conjugate_inverts_unit_rotation() {
        let q = Quat::from_axis_angle(0.9, Vec3::new(0.2, 0.5, -1.0));
        let v = Vec3::new(3.0, -1.0, 0.5);
        assert_vec3_near(q.conjugate().rotate(q.rotate(v)), v);
    }

    #[test]
    fn from_to_maps_from_onto_to() {
        let from = Vec3::new(1.0, 0.2, -0.3).normalize();
        let to = Vec3::new(-0.5, 1.0, 0.8).normalize();
        let q = Quat::from_to(from, to);
        assert_vec3_near(q.rotate(from), to);
        assert!((q.length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn from_to_of_equal_vectors_is_identity() {
        let v = Vec3::new(0.0, 0.6, 0.8);
        assert_quat_near(Quat::from_to(v, v), Quat::IDENTITY);
    }

    #[test]
    fn from_to_of_antiparallel_vectors() {
        let q = Quat::from_to(Vec3::X, -Vec3::X);
        // 180 degree rotation: zero scalar part, and it must still map the
        // input onto its negation.
        assert!(q.w.abs() < TOLERANCE);
        assert_vec3_near(q.rotate(Vec3::X), -Vec3::X);

        let q = Quat::from_to(Vec3::Y, -Vec3::Y);
        assert!(q.w.abs() < TOLERANCE);
        assert_vec3_near(q.rotate(Vec3::Y), -Vec3::Y);
    }

    #[test]
    fn same_orientation_accepts_negation() {
        let q = Quat::from_axis_angle(1.0, Vec3::Y);
        assert!(q.same_orientation(&-q));
        assert!(!q.approx_eq(&-q));
    }

    #[test]
    fn axis_angle_extraction_round_trips() {
        let axis = Vec3::new(0.0, 0.6, 0.8);
        let q = Quat::from_axis_angle(1.4, axis);
        assert_vec3_near(q.axis(), axis);
        assert!((q.angle() - 1.4).abs() < TOLERANCE);
    }

    #[test]
    fn powf_scales_the_angle() {
        let q = Quat::from_axis_angle(1.0, Vec3::Z);
        let half = q.powf(0.5);
        assert!((half.angle() - 0.5).abs() < TOLERANCE);
        assert_vec3_near(half.axis(), Vec3::Z);
        // Squaring the half rotation recovers the original.
        assert!((half * half).same_orientation(&q));
    }

    #[test]
    fn powf_of_identity_is_identity() {
        assert_quat_near(Quat::IDENTITY.powf(0.37), Quat::IDENTITY);
    }

    #[test]
    fn nlerp_endpoints() {
        let a = Quat::from_axis_angle(0.3, Vec3::X);
        let b = Quat::from_axis_angle(1.2, Vec3::Y);
        assert!(a.nlerp(&b, 0.0).approx_eq(&a));
        assert!(a.nlerp(&b, 1.0).approx_eq(&b));
    }

    #[test]
    fn slerp_endpoints_and_midpoint() {
        let a = Quat::from_axis_angle(0.4, Vec3::new(1.0, 0.5, 0.0));
        let b = Quat::from_axis_angle(2.0, Vec3::new(0.0, 1.0, 1.0));

        assert!(a.slerp(&b, 0.0).same_orientation(&a));
        assert!(a.slerp(&b, 1.0).same_orientation(&b));

        let mid = a.slerp(&b, 0.5);
        assert!((mid.length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn slerp_has_constant_angular_velocity() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(2.0, Vec3::Y);
        // Each quarter of the interpolation should cover the same angle.
        let quarter = a.slerp(&b, 0.25);
        let half = a.slerp(&b, 0.5);
        assert!((quarter.angle() - 0.5).abs() < 1e-3);
        assert!((half.angle() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn slerp_of_near_parallel_inputs_falls_back() {
        let a = Quat::from_axis_angle(1.0, Vec3::Z);
        let b = Quat::from_axis_angle(1.0 + 1e-8, Vec3::Z);
        let q = a.slerp(&b, 0.5);
        assert!(q.same_orientation(&a));
        assert!((q.length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn to_mat4_columns_are_rotated_basis_vectors() {
        let q = Quat::from_axis_angle(FRAC_PI_2, Vec3::Y);
        let m = q.to_mat4();

        // 90 deg about Y: +X lands on -Z, +Z lands on +X.
        assert_vec3_near(m.col(0).truncate(), -Vec3::Z);
        assert_vec3_near(m.col(1).truncate(), Vec3::Y);
        assert_vec3_near(m.col(2).truncate(), Vec3::X);
        assert_eq!(m.col(3), Vec4::W);
    }

    #[test]
    fn to_mat4_agrees_with_rotate() {
        let q = Quat::from_axis_angle(0.7, Vec3::new(1.0, -2.0, 0.5));
        let m = q.to_mat4();
        let v = Vec3::new(1.5, 0.25, -3.0);
        assert_vec3_near(m.transform_point3(v), q.rotate(v));
    }

    #[test]
    fn from_mat4_round_trips_orientation() {
        let q = Quat::from_axis_angle(1.9, Vec3::new(0.4, 1.0, -0.6));
        let recovered = Quat::from_mat4(&q.to_mat4());
        assert!(recovered.same_orientation(&q));
    }

    #[test]
    fn look_rotation_aligns_forward_and_up() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let q = Quat::look_rotation(forward, Vec3::Y);
        assert_vec3_near(q.rotate(Vec3::Z), forward);
        assert_vec3_near(q.rotate(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn look_rotation_twists_up_after_aligning_forward() {
        // Looking straight down world forward with a tilted up axis: the
        // forward alignment is the identity, so only the twist remains and it
        // must preserve forward.
        let up = Vec3::new(1.0, 1.0, 0.0).normalize();
        let q = Quat::look_rotation(Vec3::Z, up);
        assert_vec3_near(q.rotate(Vec3::Z), Vec3::Z);
        assert_vec3_near(q.rotate(Vec3::Y), up);
    }

    #[test]
    fn half_turn_angle_is_pi() {
        let q = Quat::from_axis_angle(PI, Vec3::X);
        assert!((q.angle() - PI).abs() < TOLERANCE);
    }
}
