#![no_std]

//! FQA Attitude - closed-form attitude estimation from an accelerometer and a magnetometer
//!
//! This library fuses a single accelerometer reading and a single calibrated
//! magnetometer reading into an orientation quaternion using the Fast
//! Quaternion Algorithm (FQA). It is a deterministic per-sample solver: there
//! is no filter state, no gyroscope and no drift correction.
//!
//! # Features
//!
//! - Closed-form elevation, roll and azimuth quaternions built from half angles
//! - Magnetometer hard- and soft-iron calibration
//! - Per-sensor mounting alignment (single-axis or sequential X-Y-Z rotations)
//! - Yaw measured against a reference field latched on the first valid sample
//! - Graceful tilt-only output when the magnetometer carries no heading
//! - Support for NWU, ENU and NED body axes conventions
//! - `#![no_std]` compatible for embedded systems
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use fqa_attitude::{Estimator, EstimatorSettings};
//!
//! let mut estimator = Estimator::with_settings(EstimatorSettings::default());
//!
//! // Sensor readings
//! let accelerometer = Vector3::new(0.0, 0.0, 1.0);    // g
//! let magnetometer = Vector3::new(21.0, -4.0, -43.0); // uT
//!
//! // Solve this epoch
//! let quaternion = estimator.update(accelerometer, magnetometer).unwrap();
//!
//! // Convert to Euler angles (roll, pitch, yaw)
//! let euler = estimator.euler().unwrap().to_degrees();
//! ```

#[cfg(feature = "std")]
extern crate std;

pub mod axes;
pub mod calibration;
mod error;
mod estimator;
pub mod euler;
pub mod fqa;
pub mod math;
mod reference;
mod types;

// Re-export all public types and functions
pub use axes::{AlignmentSpec, align};
pub use calibration::{CalibrationModel, calibrate_magnetic};
pub use error::{Error, Result};
pub use estimator::{Estimator, SensorSource};
pub use euler::{EulerAngles, to_euler};
pub use fqa::{Attitude, estimate_orientation, estimate_tilt, solve};
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext, canonicalize};
pub use reference::ReferenceField;
#[cfg(feature = "std")]
pub use reference::SharedReference;
pub use types::*;
