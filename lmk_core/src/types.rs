//! World-space vector used by meshes, bounds and the camera.

use core::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

/// Position or direction in mesh units (millimetres for face scans).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    /// X, to the right of the default camera.
    pub x: f32,
    /// Y, up in the default camera.
    pub y: f32,
    /// Z, towards the default camera.
    pub z: f32,
}

impl Point3 {
    /// Origin, also the camera focal point.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// +X.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// +Y, the default view-up.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// +Z, the default viewing axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Point from coordinates.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value on every axis.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// `[x, y, z]`.
    #[inline]
    pub const fn as_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Apply `f` per axis.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// Combine two points axis by axis.
    #[inline]
    pub fn zip_with(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        let p = self.zip_with(other, |a, b| a * b);
        p.x + p.y + p.z
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        libm::sqrtf(self.dot(self))
    }

    /// Unit vector along `self`, or [`ZERO`](Self::ZERO) for a zero vector.
    #[inline]
    pub fn normalize(self) -> Self {
        match self.length() {
            len if len > 0.0 => self / len,
            _ => Self::ZERO,
        }
    }

    /// Per-axis minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        self.zip_with(other, f32::min)
    }

    /// Per-axis maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        self.zip_with(other, f32::max)
    }

    /// Chebyshev distance, used for tolerance checks.
    #[inline]
    pub fn max_abs_diff(self, other: Self) -> f32 {
        let d = (self - other).map(libm::fabsf);
        d.x.max(d.y).max(d.z)
    }
}

impl From<[f32; 3]> for Point3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [f32; 3] {
    #[inline]
    fn from(p: Point3) -> Self {
        p.as_array()
    }
}

impl Index<usize> for Point3 {
    type Output = f32;

    fn index(&self, axis: usize) -> &f32 {
        [&self.x, &self.y, &self.z][axis]
    }
}

macro_rules! point_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Point3 {
            type Output = Self;

            #[inline]
            fn $method(self, other: Self) -> Self {
                self.zip_with(other, |a, b| a $op b)
            }
        }
    };
}

macro_rules! point_scalar_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f32> for Point3 {
            type Output = Self;

            #[inline]
            fn $method(self, s: f32) -> Self {
                self.map(|a| a $op s)
            }
        }
    };
}

point_binop!(Add, add, +);
point_binop!(Sub, sub, -);
point_scalar_op!(Mul, mul, *);
point_scalar_op!(Div, div, /);

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Neg for Point3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}
