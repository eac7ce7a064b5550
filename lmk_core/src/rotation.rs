//! Rotation matrices and rigid transforms.
//!
//! Composition follows VTK's default pre-multiply convention: every
//! `rotate_*` call on a [`RigidTransform`] is applied to points *before* the
//! transform accumulated so far. `identity().rotate_y(a).rotate_x(b).rotate_z(c)`
//! therefore equals the matrix product `Ry(a) · Rx(b) · Rz(c)`.

use core::ops::Mul;

use crate::types::Point3;

/// Coordinate axis used for rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis (vertical in camera space).
    Y,
    /// The Z axis (viewing direction).
    Z,
}

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Matrix rows.
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Create a matrix from rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Right-handed rotation about `axis` by `degrees`.
    pub fn rotation(axis: Axis, degrees: f32) -> Self {
        let rad = degrees.to_radians();
        let (s, c) = (libm::sinf(rad), libm::cosf(rad));
        match axis {
            Axis::X => Self::from_rows([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]),
            Axis::Y => Self::from_rows([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]),
            Axis::Z => Self::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]),
        }
    }

    /// Rotation about X by `degrees`.
    #[inline]
    pub fn rotate_x(degrees: f32) -> Self {
        Self::rotation(Axis::X, degrees)
    }

    /// Rotation about Y by `degrees`.
    #[inline]
    pub fn rotate_y(degrees: f32) -> Self {
        Self::rotation(Axis::Y, degrees)
    }

    /// Rotation about Z by `degrees`.
    #[inline]
    pub fn rotate_z(degrees: f32) -> Self {
        Self::rotation(Axis::Z, degrees)
    }

    /// Transposed matrix (the inverse of a rotation).
    pub fn transpose(&self) -> Self {
        let r = &self.rows;
        Self::from_rows([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }

    /// Multiply a column vector.
    #[inline]
    pub fn mul_vec(&self, v: Point3) -> Point3 {
        let r = &self.rows;
        Point3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }

    /// Largest absolute element difference to another matrix.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        let mut max = 0.0f32;
        for i in 0..3 {
            for j in 0..3 {
                max = max.max(libm::fabsf(self.rows[i][j] - other.rows[i][j]));
            }
        }
        max
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut rows = [[0.0f32; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        Self { rows }
    }
}

/// Rotation followed by translation: `p' = R·p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidTransform {
    /// Rotation part.
    pub rotation: Mat3,
    /// Translation part.
    pub translation: Point3,
}

impl RigidTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: Mat3::IDENTITY,
        translation: Point3::ZERO,
    };

    /// Create a transform from its parts.
    #[inline]
    pub const fn new(rotation: Mat3, translation: Point3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Identity transform.
    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Compose so that `inner` is applied first: `self ∘ inner`.
    pub fn then_before(&self, inner: &Self) -> Self {
        Self {
            rotation: self.rotation * inner.rotation,
            translation: self.rotation.mul_vec(inner.translation) + self.translation,
        }
    }

    /// Pre-multiply a rotation about `axis` (applied before the current transform).
    pub fn rotate(self, axis: Axis, degrees: f32) -> Self {
        self.then_before(&Self::new(Mat3::rotation(axis, degrees), Point3::ZERO))
    }

    /// Pre-multiply a rotation about X.
    #[inline]
    pub fn rotate_x(self, degrees: f32) -> Self {
        self.rotate(Axis::X, degrees)
    }

    /// Pre-multiply a rotation about Y.
    #[inline]
    pub fn rotate_y(self, degrees: f32) -> Self {
        self.rotate(Axis::Y, degrees)
    }

    /// Pre-multiply a rotation about Z.
    #[inline]
    pub fn rotate_z(self, degrees: f32) -> Self {
        self.rotate(Axis::Z, degrees)
    }

    /// Inverse transform.
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -rt.mul_vec(self.translation),
        }
    }

    /// Transform a position.
    #[inline]
    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.rotation.mul_vec(p) + self.translation
    }

    /// Transform a direction (translation is ignored).
    #[inline]
    pub fn transform_vector(&self, v: Point3) -> Point3 {
        self.rotation.mul_vec(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_rotate_y_moves_z_towards_x() {
        let p = Mat3::rotate_y(90.0).mul_vec(Point3::Z);
        assert!(p.max_abs_diff(Point3::X) < EPS, "{:?}", p);
    }

    #[test]
    fn test_rotate_x_moves_y_towards_z() {
        let p = Mat3::rotate_x(90.0).mul_vec(Point3::Y);
        assert!(p.max_abs_diff(Point3::Z) < EPS, "{:?}", p);
    }

    #[test]
    fn test_rotate_z_moves_x_towards_y() {
        let p = Mat3::rotate_z(90.0).mul_vec(Point3::X);
        assert!(p.max_abs_diff(Point3::Y) < EPS, "{:?}", p);
    }

    #[test]
    fn test_pre_multiply_order() {
        let t = RigidTransform::identity().rotate_y(30.0).rotate_x(-20.0).rotate_z(10.0);
        let expected = Mat3::rotate_y(30.0) * Mat3::rotate_x(-20.0) * Mat3::rotate_z(10.0);
        assert!(t.rotation.max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn test_rotations_do_not_commute() {
        let yx = Mat3::rotate_y(40.0) * Mat3::rotate_x(30.0);
        let xy = Mat3::rotate_x(30.0) * Mat3::rotate_y(40.0);
        assert!(yx.max_abs_diff(&xy) > 1e-2);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = RigidTransform::new(Mat3::rotate_z(25.0), Point3::new(1.0, -2.0, 3.0))
            .rotate_x(15.0);
        let p = Point3::new(4.0, 5.0, 6.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!(back.max_abs_diff(p) < 1e-4);
    }
}
