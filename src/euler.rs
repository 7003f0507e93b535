//! Quaternion to roll/pitch/yaw conversion for display and telemetry

use nalgebra::{UnitQuaternion, Vector3};

use crate::math::RAD_TO_DEG;

/// Roll, pitch and yaw of an orientation
///
/// Produced for display only; never fed back into the solver.
///
/// # Example
/// ```
/// use nalgebra::UnitQuaternion;
/// use fqa_attitude::EulerAngles;
///
/// let q = UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3);
/// let euler = EulerAngles::from_quaternion(&q);
/// assert!((euler.yaw - 0.3).abs() < 1e-5);
///
/// let degrees = euler.to_degrees();
/// assert!((degrees.pitch + 11.459).abs() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngles {
    /// Rotation about the body X axis
    pub roll: f32,
    /// Rotation about the body Y axis, within `[-pi/2, pi/2]`
    pub pitch: f32,
    /// Rotation about the body Z axis
    pub yaw: f32,
}

impl EulerAngles {
    /// Angles from roll, pitch and yaw components
    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Extract roll, pitch and yaw (radians) from a unit quaternion
    ///
    /// Pitch is clamped to `±pi/2` at gimbal lock.
    pub fn from_quaternion(q: &UnitQuaternion<f32>) -> Self {
        let (r, i, j, k) = (q.w, q.i, q.j, q.k);

        let roll = (2.0 * (r * i + j * k)).atan2(1.0 - 2.0 * (i * i + j * j));

        let sinp = 2.0 * (r * j - k * i);
        let pitch = if sinp.abs() >= 1.0 {
            core::f32::consts::FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let yaw = (2.0 * (r * k + i * j)).atan2(1.0 - 2.0 * (j * j + k * k));

        Self { roll, pitch, yaw }
    }

    /// Same angles in degrees
    pub fn to_degrees(&self) -> Self {
        Self {
            roll: self.roll * RAD_TO_DEG,
            pitch: self.pitch * RAD_TO_DEG,
            yaw: self.yaw * RAD_TO_DEG,
        }
    }
}

impl From<EulerAngles> for Vector3<f32> {
    fn from(euler: EulerAngles) -> Self {
        Vector3::new(euler.roll, euler.pitch, euler.yaw)
    }
}

impl From<&UnitQuaternion<f32>> for EulerAngles {
    fn from(q: &UnitQuaternion<f32>) -> Self {
        Self::from_quaternion(q)
    }
}

/// Convert an orientation quaternion to Euler angles in radians
#[inline]
pub fn to_euler(q: &UnitQuaternion<f32>) -> EulerAngles {
    EulerAngles::from_quaternion(q)
}
