//! Per-view transform parameters and their sampling domain.

use core::fmt;

use crate::error::LmkCoreError;
use crate::rotation::RigidTransform;

/// Parameters of one randomly posed view.
///
/// Rotations are in degrees. `scale`, `tx` and `ty` are recorded with the view
/// but only the rotations drive the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewTransform {
    /// Rotation about X in degrees.
    pub rx: f64,
    /// Rotation about Y in degrees.
    pub ry: f64,
    /// Rotation about Z in degrees.
    pub rz: f64,
    /// Isotropic scale.
    pub scale: f64,
    /// Translation along X.
    pub tx: f64,
    /// Translation along Y.
    pub ty: f64,
}

impl ViewTransform {
    /// Create a view transform.
    pub const fn new(rx: f64, ry: f64, rz: f64, scale: f64, tx: f64, ty: f64) -> Self {
        Self {
            rx,
            ry,
            rz,
            scale,
            tx,
            ty,
        }
    }

    /// The neutral view: no rotation, unit scale, no translation.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Values in record order `rx ry rz scale tx ty`.
    pub const fn as_array(&self) -> [f64; 6] {
        [self.rx, self.ry, self.rz, self.scale, self.tx, self.ty]
    }

    /// Build from values in record order.
    pub const fn from_array(v: [f64; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    /// Rotation applied to the scene: Y first in the call chain, then X, then Z.
    pub fn camera_rotation(&self) -> RigidTransform {
        RigidTransform::identity()
            .rotate_y(self.ry as f32)
            .rotate_x(self.rx as f32)
            .rotate_z(self.rz as f32)
    }

    /// Transform to apply to the camera.
    ///
    /// The mesh stays fixed and the camera moves, so this is the inverse of
    /// [`camera_rotation`](Self::camera_rotation).
    pub fn camera_transform(&self) -> RigidTransform {
        self.camera_rotation().inverse()
    }

    /// Parse a six-value, whitespace separated record.
    pub fn parse_record(record: &str) -> Result<Self, LmkCoreError> {
        let mut values = [0.0f64; 6];
        let mut count = 0;
        for (index, field) in record.split_whitespace().enumerate() {
            if index >= 6 {
                return Err(LmkCoreError::RecordFieldCount { got: index + 1 });
            }
            values[index] = field
                .parse()
                .map_err(|_| LmkCoreError::RecordFieldInvalid { index })?;
            count += 1;
        }
        if count != 6 {
            return Err(LmkCoreError::RecordFieldCount { got: count });
        }
        Ok(Self::from_array(values))
    }
}

/// Formats the transform as its text record.
impl fmt::Display for ViewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} {:?} {:?} {:?} {:?}",
            self.rx, self.ry, self.rz, self.scale, self.tx, self.ty
        )
    }
}

/// Half-open sampling interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    /// Inclusive lower bound.
    pub low: f64,
    /// Exclusive upper bound.
    pub high: f64,
    /// Whether samples are whole numbers.
    pub integer: bool,
}

impl SampleRange {
    /// Integer-valued range.
    pub const fn integer(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            integer: true,
        }
    }

    /// Continuous range.
    pub const fn uniform(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            integer: false,
        }
    }

    /// Whether `value` could have been drawn from this range.
    pub fn contains(&self, value: f64) -> bool {
        let in_bounds = value >= self.low && value < self.high;
        if self.integer {
            in_bounds && libm::floor(value) == value
        } else {
            in_bounds
        }
    }
}

/// Sampling domain for every [`ViewTransform`] field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformRanges {
    /// Domain of `rx`.
    pub rx: SampleRange,
    /// Domain of `ry`.
    pub ry: SampleRange,
    /// Domain of `rz`.
    pub rz: SampleRange,
    /// Domain of `scale`.
    pub scale: SampleRange,
    /// Domain of `tx`.
    pub tx: SampleRange,
    /// Domain of `ty`.
    pub ty: SampleRange,
}

impl TransformRanges {
    /// Ranges used for the DTU-3D face scans.
    pub const DTU_3D: Self = Self {
        rx: SampleRange::integer(-40.0, 40.0),
        ry: SampleRange::integer(-80.0, 80.0),
        rz: SampleRange::integer(-20.0, 20.0),
        scale: SampleRange::uniform(1.4, 1.9),
        tx: SampleRange::integer(-20.0, 20.0),
        ty: SampleRange::integer(-20.0, 20.0),
    };

    /// Wider ranges used for the BU-3DFE set.
    pub const BU_3DFE: Self = Self {
        rx: SampleRange::integer(-90.0, 20.0),
        ry: SampleRange::integer(-60.0, 60.0),
        rz: SampleRange::integer(-60.0, 60.0),
        scale: SampleRange::uniform(1.4, 1.9),
        tx: SampleRange::integer(-20.0, 20.0),
        ty: SampleRange::integer(-20.0, 20.0),
    };

    /// Whether every field of `view` lies in its range.
    pub fn contains(&self, view: &ViewTransform) -> bool {
        self.rx.contains(view.rx)
            && self.ry.contains(view.ry)
            && self.rz.contains(view.rz)
            && self.scale.contains(view.scale)
            && self.tx.contains(view.tx)
            && self.ty.contains(view.ty)
    }
}

impl Default for TransformRanges {
    fn default() -> Self {
        Self::DTU_3D
    }
}
