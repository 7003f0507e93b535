//! Magnetometer hard- and soft-iron calibration

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::error::{Error, Result};
use crate::math::mat_mul;

/// Applies magnetometer calibration (hard and soft iron correction)
///
/// Computes `soft_iron_matrix * (uncalibrated - hard_iron_offset)`.
///
/// # Arguments
/// * `uncalibrated` - Raw magnetometer reading
/// * `soft_iron_matrix` - 3x3 soft iron correction matrix
/// * `hard_iron_offset` - Hard iron offset vector
///
/// # Returns
/// Calibrated magnetometer reading
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use fqa_attitude::calibration::calibrate_magnetic;
///
/// let raw = Vector3::new(100.0, 200.0, 300.0);
/// let soft_iron = Matrix3::identity();
/// let hard_iron = Vector3::new(10.0, 20.0, 30.0);
///
/// let calibrated = calibrate_magnetic(raw, soft_iron, hard_iron);
/// assert_eq!(calibrated, Vector3::new(90.0, 180.0, 270.0));
/// ```
pub fn calibrate_magnetic(
    uncalibrated: Vector3<f32>,
    soft_iron_matrix: Matrix3<f32>,
    hard_iron_offset: Vector3<f32>,
) -> Vector3<f32> {
    soft_iron_matrix * (uncalibrated - hard_iron_offset)
}

/// Ellipsoid-to-sphere correction of a magnetometer
///
/// The bias `b` removes hard-iron distortion and the matrix `K` removes
/// soft-iron scaling and shear: `corrected = K * (raw - b)`. Both are fixed
/// per device and produced offline by an ellipsoid fit.
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use fqa_attitude::CalibrationModel;
///
/// let model = CalibrationModel::new(
///     Vector3::new(-3.2, 14.1, 7.9),
///     Matrix3::new(
///         1.02, 0.01, -0.02,
///         0.01, 0.97, 0.00,
///         -0.02, 0.00, 1.01,
///     ),
/// );
/// let corrected = model.calibrate(Vector3::new(20.0, -5.0, 41.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationModel {
    /// Hard-iron offset subtracted from the raw reading
    pub bias: Vector3<f32>,
    /// Soft-iron correction matrix
    pub matrix: Matrix3<f32>,
}

impl CalibrationModel {
    /// Model from a hard-iron bias and a soft-iron matrix
    pub fn new(bias: Vector3<f32>, matrix: Matrix3<f32>) -> Self {
        Self { bias, matrix }
    }

    /// No correction at all
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Matrix3::identity())
    }

    /// Hard-iron correction only
    pub fn from_hard_iron(bias: Vector3<f32>) -> Self {
        Self::new(bias, Matrix3::identity())
    }

    /// Build a model from dynamically sized configuration data
    ///
    /// Fails with [`Error::DimensionMismatch`] unless `bias` has three rows
    /// and `matrix` is 3x3.
    pub fn from_dynamic(bias: &DVector<f32>, matrix: &DMatrix<f32>) -> Result<Self> {
        if matrix.shape() != (3, 3) || bias.nrows() != matrix.ncols() {
            return Err(Error::DimensionMismatch {
                left: matrix.shape(),
                right: bias.shape(),
            });
        }
        Ok(Self::new(
            Vector3::from_column_slice(bias.as_slice()),
            Matrix3::from_iterator(matrix.iter().copied()),
        ))
    }

    /// Correct a single raw sample
    #[inline]
    pub fn calibrate(&self, raw: Vector3<f32>) -> Vector3<f32> {
        calibrate_magnetic(raw, self.matrix, self.bias)
    }

    /// Correct a block of samples stored one per column (3 x N)
    pub fn calibrate_block(&self, samples: &DMatrix<f32>) -> Result<DMatrix<f32>> {
        if samples.nrows() != 3 {
            return Err(Error::DimensionMismatch {
                left: (3, 3),
                right: samples.shape(),
            });
        }
        let centred = DMatrix::from_fn(3, samples.ncols(), |r, c| samples[(r, c)] - self.bias[r]);
        let matrix = DMatrix::from_iterator(3, 3, self.matrix.iter().copied());
        mat_mul(&matrix, &centred)
    }
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self::identity()
    }
}
