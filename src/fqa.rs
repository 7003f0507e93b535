//! Fast Quaternion Algorithm (FQA) attitude solver
//!
//! A deterministic, single-epoch solver: elevation and roll come from the
//! gravity direction, azimuth from the tilt-compensated magnetic field
//! measured against a reference field. Each partial rotation is built
//! directly from half-angle sines and cosines, so no angle is ever extracted
//! with an inverse trigonometric function.
//!
//! Based on Wu, Zhou, Fourati and Cheng, "Fast Complementary Filter for
//! Attitude Estimation Using Low-Cost MARG Sensors" (2016), and the FQA
//! description at <https://ahrs.readthedocs.io/en/latest/filters/fqa.html>.

use log::trace;
use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};

use crate::error::{Error, Result};
use crate::math::{QuaternionExt, Vector3Ext, sign};
use crate::types::{Axis, Heading, MagnetometerPolicy, SolverSettings};

/// Output of one solver epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    /// Unit orientation quaternion with a non-negative scalar part
    pub quaternion: UnitQuaternion<f32>,
    /// Whether the azimuth was resolved against the reference field
    pub heading: Heading,
}

/// Estimate orientation from an accelerometer and a magnetometer reading
///
/// Uses the default [`SolverSettings`]: forward-left-up inputs and a
/// tilt-only result when the magnetometer carries no heading.
///
/// `reference` is the magnetometer reading that defines zero yaw, typically
/// latched with [`ReferenceField`](crate::ReferenceField).
///
/// # Errors
/// [`Error::DegenerateInput`] when the accelerometer reading has zero magnitude.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fqa_attitude::{estimate_orientation, EulerAngles};
///
/// let accel = Vector3::new(0.0, 0.0, 1.0);  // flat and level
/// let mag = Vector3::new(20.0, 3.0, -42.0);
/// let q = estimate_orientation(accel, mag, mag).unwrap();
///
/// let euler = EulerAngles::from_quaternion(&q);
/// assert!(euler.roll.abs() < 1e-3 && euler.pitch.abs() < 1e-3 && euler.yaw.abs() < 1e-3);
/// ```
pub fn estimate_orientation(
    accelerometer: Vector3<f32>,
    magnetometer: Vector3<f32>,
    reference: Vector3<f32>,
) -> Result<UnitQuaternion<f32>> {
    solve(&SolverSettings::default(), accelerometer, magnetometer, reference)
        .map(|attitude| attitude.quaternion)
}

/// Tilt-only orientation (elevation then roll) from an accelerometer reading
///
/// This is the quaternion the solver falls back to when no heading is available.
pub fn estimate_tilt(
    settings: &SolverSettings,
    accelerometer: Vector3<f32>,
) -> Result<UnitQuaternion<f32>> {
    let accelerometer = settings.convention.to_native(accelerometer);
    let tilt = Tilt::from_accelerometer(accelerometer)?;
    Ok(UnitQuaternion::new_unchecked(tilt.elevation_roll.canonical()))
}

/// Run one solver epoch with explicit settings
///
/// All three vectors are in the body convention named by `settings`.
pub fn solve(
    settings: &SolverSettings,
    accelerometer: Vector3<f32>,
    magnetometer: Vector3<f32>,
    reference: Vector3<f32>,
) -> Result<Attitude> {
    let convention = settings.convention;
    let tilt = Tilt::from_accelerometer(convention.to_native(accelerometer))?;

    let azimuth = match azimuth(
        &tilt,
        convention.to_native(magnetometer),
        convention.to_native(reference),
    ) {
        Ok(azimuth) => azimuth,
        Err(error) => {
            return match settings.magnetometer_policy {
                MagnetometerPolicy::TiltOnly => Ok(Attitude {
                    quaternion: UnitQuaternion::new_unchecked(tilt.elevation_roll.canonical()),
                    heading: Heading::TiltOnly,
                }),
                MagnetometerPolicy::Reject => Err(error),
            };
        }
    };

    let q = (azimuth * tilt.elevation_roll).checked_normalize("orientation")?;
    trace!(
        "fqa: azimuth={:?} elevation_roll={:?} q={:?}",
        azimuth, tilt.elevation_roll, q
    );

    Ok(Attitude {
        quaternion: UnitQuaternion::new_unchecked(q.canonical()),
        heading: Heading::Referenced,
    })
}

/// Elevation and roll partial rotations
struct Tilt {
    elevation: Quaternion<f32>,
    roll: Quaternion<f32>,
    elevation_roll: Quaternion<f32>,
}

impl Tilt {
    fn from_accelerometer(accelerometer: Vector3<f32>) -> Result<Self> {
        let a = accelerometer.checked_normalize("accelerometer")?;

        // Elevation about Y
        let s_theta = a.x.clamp(-1.0, 1.0);
        let c_theta = (1.0 - s_theta * s_theta).sqrt();
        let elevation = half_angle_rotation(Axis::Y, sign(s_theta), c_theta)?;

        // Roll about X; undefined when lying exactly on a side
        let (s_phi, c_phi) = if c_theta == 0.0 {
            (0.0, 0.0)
        } else {
            (-a.y / c_theta, (-a.z / c_theta).clamp(-1.0, 1.0))
        };
        let roll = half_angle_rotation(Axis::X, tie_broken_sign(s_phi, c_phi), c_phi)?;

        trace!("fqa: elevation={:?} roll={:?}", elevation, roll);

        Ok(Self {
            elevation,
            roll,
            elevation_roll: elevation * roll,
        })
    }

    /// Rotate a body-frame vector into the gravity-levelled frame
    fn level(&self, v: Vector3<f32>) -> Quaternion<f32> {
        self.elevation
            * self.roll
            * Quaternion::from_imag(v)
            * self.roll.conjugate()
            * self.elevation.conjugate()
    }
}

/// Azimuth rotation about Z between the reference heading and the current heading
fn azimuth(
    tilt: &Tilt,
    magnetometer: Vector3<f32>,
    reference: Vector3<f32>,
) -> Result<Quaternion<f32>> {
    let m = magnetometer.checked_normalize("magnetometer")?;
    let levelled = tilt.level(m);

    let current = unit_horizontal(levelled.i, levelled.j, "magnetometer")?;
    let north = unit_horizontal(reference.x, reference.y, "reference")?;

    let c_psi = (north.x * current.x + north.y * current.y).clamp(-1.0, 1.0);
    let s_psi = -north.x * current.y + north.y * current.x;

    half_angle_rotation(Axis::Z, tie_broken_sign(s_psi, c_psi), c_psi)
}

/// Sign of a sine, forced positive for a half turn with a zero sine.
///
/// The cosine of a half turn often rounds to just above -1, so any negative
/// cosine counts; a zero sign there would drop the rotation to the identity.
fn tie_broken_sign(sine: f32, cosine: f32) -> f32 {
    if cosine < 0.0 && sine == 0.0 {
        1.0
    } else {
        sign(sine)
    }
}

fn half_angle_rotation(axis: Axis, sine_sign: f32, cosine: f32) -> Result<Quaternion<f32>> {
    let sin_half = sine_sign * ((1.0 - cosine) / 2.0).sqrt();
    let cos_half = ((1.0 + cosine) / 2.0).sqrt();
    Quaternion::from_half_angle(axis, sin_half, cos_half).checked_normalize("partial rotation")
}

fn unit_horizontal(x: f32, y: f32, quantity: &'static str) -> Result<Vector2<f32>> {
    let v = Vector2::new(x, y);
    let norm = v.norm();
    if norm > 0.0 && norm.is_finite() {
        Ok(v / norm)
    } else {
        Err(Error::DegenerateInput { quantity })
    }
}
