//! Sensor axes alignment for different mounting orientations
//!
//! Each physical sensor on a board can be mounted rotated relative to the
//! device body frame. An [`AlignmentSpec`] describes that mounting rotation so
//! every sensor reports in one common frame before calibration and solving.
//!
//! Two rotation conventions are in use on real boards: a rotation about a
//! single named axis, and a sequential X, then Y, then Z composition. Which
//! one applies is a property of the individual sensor's mounting and comes
//! from its calibration data.
//!
//! # Example
//! ```
//! use nalgebra::Vector3;
//! use fqa_attitude::{AlignmentSpec, Axis};
//!
//! // Sensor mounted turned a quarter turn about the body Z axis
//! let spec = AlignmentSpec::SingleAxis { axis: Axis::Z, angle: 90.0 };
//! let body = spec.align(Vector3::new(1.0, 0.0, 0.0));
//!
//! assert!((body - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
//! ```

use nalgebra::{Rotation3, Vector3};

use crate::math::{DEG_TO_RAD, Vector3Ext};
use crate::types::Axis;

/// Mounting rotation of one physical sensor, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentSpec {
    /// Sensor axes already match the body axes
    #[default]
    Identity,
    /// Rotation by `angle` degrees about one body axis
    SingleAxis { axis: Axis, angle: f32 },
    /// Rotation about X by `x`, then about Y by `y`, then about Z by `z` degrees
    Sequential { x: f32, y: f32, z: f32 },
}

impl AlignmentSpec {
    /// Rotation taking sensor-frame readings into the body frame
    pub fn rotation(&self) -> Rotation3<f32> {
        match *self {
            AlignmentSpec::Identity => Rotation3::identity(),
            AlignmentSpec::SingleAxis { axis, angle } => {
                Rotation3::from_axis_angle(&axis.unit(), angle * DEG_TO_RAD)
            }
            AlignmentSpec::Sequential { x, y, z } => {
                let angles = Vector3::new(x, y, z).deg_to_rad();
                let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), angles.x);
                let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), angles.y);
                let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), angles.z);
                rz * ry * rx
            }
        }
    }

    /// Express a sensor-frame reading in the body frame
    #[inline]
    pub fn align(&self, sensor: Vector3<f32>) -> Vector3<f32> {
        match self {
            AlignmentSpec::Identity => sensor,
            _ => self.rotation() * sensor,
        }
    }

    /// Express a body-frame vector in the sensor frame (undo [`align`](Self::align))
    #[inline]
    pub fn inverse_align(&self, body: Vector3<f32>) -> Vector3<f32> {
        match self {
            AlignmentSpec::Identity => body,
            _ => self.rotation().inverse() * body,
        }
    }
}

/// Rotates a sensor reading into the body frame.
///
/// Free-function form of [`AlignmentSpec::align`].
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fqa_attitude::{AlignmentSpec, align};
///
/// let raw = Vector3::new(0.1, -0.2, 9.8);
/// assert_eq!(align(raw, &AlignmentSpec::Identity), raw);
/// ```
#[inline]
pub fn align(sensor: Vector3<f32>, spec: &AlignmentSpec) -> Vector3<f32> {
    spec.align(sensor)
}
