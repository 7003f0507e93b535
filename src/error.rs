//! Error types for the attitude estimation pipeline

use thiserror::Error;

/// Errors produced by the algebra primitives, the solver and the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A vector or quaternion with zero (or non-finite) magnitude was passed
    /// where a direction is required.
    ///
    /// For the accelerometer this is fatal to the epoch. For the magnetometer
    /// it only surfaces when [`MagnetometerPolicy::Reject`](crate::MagnetometerPolicy::Reject)
    /// is configured.
    #[error("degenerate {quantity}: cannot normalize a zero-magnitude value")]
    DegenerateInput {
        /// Name of the offending quantity, e.g. `"accelerometer"`
        quantity: &'static str,
    },

    /// Operand shapes of a matrix product disagree.
    #[error("dimension mismatch: cannot multiply {left:?} by {right:?}")]
    DimensionMismatch {
        /// Shape (rows, columns) of the left operand
        left: (usize, usize),
        /// Shape (rows, columns) of the right operand
        right: (usize, usize),
    },

    /// A [`SensorSource`](crate::SensorSource) could not deliver a sample.
    #[error("{sensor} sample unavailable")]
    SampleUnavailable {
        /// Name of the sensor that failed
        sensor: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
