//! Per-sample attitude estimation pipeline

use log::{Level, debug, log, trace};
use nalgebra::{UnitQuaternion, Vector3};

use crate::error::Result;
use crate::euler::EulerAngles;
use crate::fqa::{self, Attitude};
use crate::reference::ReferenceField;
use crate::types::{EstimatorSettings, Heading};

/// A source of raw three-axis samples, e.g. an accelerometer or magnetometer driver
pub trait SensorSource {
    /// Fetch one sample in the sensor's own frame
    fn sample(&mut self) -> Result<Vector3<f32>>;
}

/// Attitude estimator
///
/// Runs the full chain for each sensor epoch: both readings are rotated into
/// the body frame, the magnetometer is calibrated, the first usable
/// magnetometer reading is latched as the yaw reference, and the closed-form
/// solver produces the orientation.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fqa_attitude::Estimator;
///
/// let mut estimator = Estimator::new();
///
/// let accelerometer = Vector3::new(0.0, 0.0, 1.0); // g
/// let magnetometer = Vector3::new(22.0, -5.0, -41.0); // uT
///
/// let _quaternion = estimator.update(accelerometer, magnetometer).unwrap();
/// let euler = estimator.euler().unwrap().to_degrees();
/// assert!(euler.yaw.abs() < 0.1); // first sample defines zero yaw
/// ```
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    /// Device configuration
    settings: EstimatorSettings,
    /// Yaw reference, latched on the first usable magnetometer sample
    reference: ReferenceField,
    /// Result of the last successful epoch
    attitude: Option<Attitude>,
}

impl Estimator {
    /// Create an estimator with default settings
    pub fn new() -> Self {
        Self::with_settings(EstimatorSettings::default())
    }

    /// Create an estimator with the given device configuration
    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Self {
            settings,
            reference: ReferenceField::new(),
            attitude: None,
        }
    }

    /// Current device configuration
    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    /// Replace the device configuration
    ///
    /// The latched reference is kept; call [`reset_reference`](Self::reset_reference)
    /// when the new calibration changes the magnetometer frame.
    pub fn set_settings(&mut self, settings: EstimatorSettings) {
        self.settings = settings;
    }

    /// Process one epoch of raw sensor readings
    ///
    /// # Arguments
    /// * `accelerometer` - Raw accelerometer reading in the accelerometer's frame
    /// * `magnetometer` - Raw magnetometer reading in the magnetometer's frame
    ///
    /// # Errors
    /// A zero accelerometer reading fails the epoch and leaves the previous
    /// orientation in place. Magnetometer problems only fail the epoch under
    /// [`MagnetometerPolicy::Reject`](crate::MagnetometerPolicy::Reject).
    pub fn update(
        &mut self,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
    ) -> Result<UnitQuaternion<f32>> {
        let accelerometer = self.settings.accelerometer_alignment.align(accelerometer);
        let magnetometer = self.settings.magnetometer_alignment.align(magnetometer);
        let magnetometer = self.settings.magnetometer_calibration.calibrate(magnetometer);

        if self.reference.ensure(magnetometer) {
            debug!("latched magnetic reference field {:?}", magnetometer);
        }
        let reference = self.reference.get().unwrap_or_else(Vector3::zeros);

        let attitude = fqa::solve(&self.settings.solver, accelerometer, magnetometer, reference)?;
        if attitude.heading == Heading::TiltOnly {
            log!(
                tilt_only_level(self.heading()),
                "no usable magnetic heading (magnetometer {:?}, reference {:?}), using tilt only",
                magnetometer,
                reference
            );
        }
        trace!("attitude {:?}", attitude.quaternion);

        self.attitude = Some(attitude);
        Ok(attitude.quaternion)
    }

    /// Sample both sensors and process the epoch
    pub fn update_from<A, M>(
        &mut self,
        accelerometer: &mut A,
        magnetometer: &mut M,
    ) -> Result<UnitQuaternion<f32>>
    where
        A: SensorSource + ?Sized,
        M: SensorSource + ?Sized,
    {
        let accel = accelerometer.sample()?;
        let mag = magnetometer.sample()?;
        self.update(accel, mag)
    }

    /// Orientation from the last successful epoch
    pub fn quaternion(&self) -> Option<UnitQuaternion<f32>> {
        self.attitude.map(|attitude| attitude.quaternion)
    }

    /// Heading source of the last successful epoch
    pub fn heading(&self) -> Option<Heading> {
        self.attitude.map(|attitude| attitude.heading)
    }

    /// Euler angles (radians) of the last successful epoch
    pub fn euler(&self) -> Option<EulerAngles> {
        self.attitude
            .map(|attitude| EulerAngles::from_quaternion(&attitude.quaternion))
    }

    /// Current yaw reference
    pub fn reference(&self) -> &ReferenceField {
        &self.reference
    }

    /// Forget the yaw reference; the next usable magnetometer sample defines zero yaw
    pub fn reset_reference(&mut self) {
        debug!("magnetic reference field reset");
        self.reference.reset();
    }
}

/// Warn when the heading is first lost, then stay quiet while it stays lost
fn tilt_only_level(previous: Option<Heading>) -> Level {
    match previous {
        Some(Heading::TiltOnly) => Level::Debug,
        _ => Level::Warn,
    }
}
