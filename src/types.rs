//! Core types and conventions for the attitude estimation pipeline

use nalgebra::{Unit, Vector3};

use crate::axes::AlignmentSpec;
use crate::calibration::CalibrationModel;

/// Body axes convention of the sensor readings handed to the solver
///
/// The closed-form solver works natively in a forward-right-down body frame
/// paired with a north-east-down Earth frame. Readings in the other
/// conventions are turned into that frame before solving, so the resulting
/// quaternion and Euler angles always follow the aerospace convention
/// (roll right-wing-down, pitch nose-up and yaw clockwise from above are positive).
///
/// # Conventions
/// - **NWU**: forward-left-up body axes; a level accelerometer reads `(0, 0, +1)`
/// - **ENU**: right-forward-up body axes; a level accelerometer reads `(0, 0, +1)`
/// - **NED**: forward-right-down body axes; a level accelerometer reads `(0, 0, -1)`
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fqa_attitude::Convention;
///
/// let level = Vector3::new(0.0, 0.0, 1.0);
/// assert_eq!(Convention::Nwu.to_native(level), Vector3::new(0.0, 0.0, -1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convention {
    /// North-West-Up: X forward, Y left, Z up
    #[default]
    Nwu,
    /// East-North-Up: X right, Y forward, Z up
    Enu,
    /// North-East-Down: X forward, Y right, Z down (solver native)
    Ned,
}

impl Convention {
    /// Express a body-frame reading in the solver's forward-right-down frame
    #[inline]
    pub fn to_native(self, v: Vector3<f32>) -> Vector3<f32> {
        match self {
            Convention::Nwu => Vector3::new(v.x, -v.y, -v.z),
            Convention::Enu => Vector3::new(v.y, v.x, -v.z),
            Convention::Ned => v,
        }
    }
}

/// A body axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// What the solver does when the magnetometer cannot provide a heading
///
/// This covers a zero-magnitude magnetometer sample, a missing or vertical
/// reference field, and a field parallel to gravity (no horizontal component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MagnetometerPolicy {
    /// Return the tilt-only (elevation and roll) quaternion with zero azimuth
    #[default]
    TiltOnly,
    /// Fail the epoch with [`Error::DegenerateInput`](crate::Error::DegenerateInput)
    Reject,
}

/// Where the azimuth of a solved attitude came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// Azimuth measured against the reference field
    Referenced,
    /// No usable magnetic heading; azimuth left at zero
    TiltOnly,
}

/// Settings of the closed-form solver
///
/// # Example
/// ```
/// use fqa_attitude::{Convention, MagnetometerPolicy, SolverSettings};
///
/// let settings = SolverSettings {
///     convention: Convention::Ned,
///     magnetometer_policy: MagnetometerPolicy::Reject,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverSettings {
    /// Body axes convention of the accelerometer, magnetometer and reference
    pub convention: Convention,
    /// Handling of readings that carry no usable heading
    pub magnetometer_policy: MagnetometerPolicy,
}

/// Per-device configuration of the [`Estimator`](crate::Estimator)
///
/// Alignment and calibration are device constants loaded once at startup.
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use fqa_attitude::{AlignmentSpec, CalibrationModel, EstimatorSettings};
///
/// let settings = EstimatorSettings {
///     accelerometer_alignment: AlignmentSpec::Sequential { x: 0.0, y: 180.0, z: 90.0 },
///     magnetometer_calibration: CalibrationModel::new(
///         Vector3::new(12.0, -4.5, 30.2),
///         Matrix3::identity(),
///     ),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorSettings {
    /// Mounting rotation of the accelerometer
    pub accelerometer_alignment: AlignmentSpec,
    /// Mounting rotation of the magnetometer
    pub magnetometer_alignment: AlignmentSpec,
    /// Hard- and soft-iron correction applied after alignment
    pub magnetometer_calibration: CalibrationModel,
    /// Solver settings
    pub solver: SolverSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventions_are_proper_rotations() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        for convention in [Convention::Nwu, Convention::Enu, Convention::Ned] {
            let cx = convention.to_native(x);
            let cy = convention.to_native(y);
            let cz = convention.to_native(z);
            // Right-handed frames stay right-handed
            assert_eq!(cx.cross(&cy), cz, "{:?} is not a rotation", convention);
        }
    }

    #[test]
    fn test_level_reading_maps_to_native_down() {
        let up = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(Convention::Nwu.to_native(up), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(Convention::Enu.to_native(up), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(Convention::Ned.to_native(-up), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_defaults() {
        let settings = EstimatorSettings::default();
        assert_eq!(settings.solver.convention, Convention::Nwu);
        assert_eq!(settings.solver.magnetometer_policy, MagnetometerPolicy::TiltOnly);
        assert_eq!(settings.accelerometer_alignment, AlignmentSpec::Identity);
        assert_eq!(settings.magnetometer_calibration, CalibrationModel::identity());
    }
}
