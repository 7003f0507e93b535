//! Mathematical utilities and nalgebra extensions for the attitude pipeline

use nalgebra::{DMatrix, DVector, Quaternion, UnitQuaternion, Vector3};

use crate::error::{Error, Result};
use crate::types::Axis;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Three-way sign: `-1`, `0` or `1`. Unlike `f32::signum`, zero maps to zero.
#[inline]
pub(crate) fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, failing with [`Error::DegenerateInput`] when the
    /// magnitude is zero or not finite
    fn checked_normalize(&self, quantity: &'static str) -> Result<Vector3<f32>>;

    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f32>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn checked_normalize(&self, quantity: &'static str) -> Result<Vector3<f32>> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Ok(*self / norm)
        } else {
            Err(Error::DegenerateInput { quantity })
        }
    }

    fn deg_to_rad(&self) -> Vector3<f32> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f32> {
        *self * RAD_TO_DEG
    }
}

/// Extension trait for quaternion operations
///
/// Products and conjugates come straight from nalgebra (`a * b` is the
/// Hamilton product, `q.conjugate()` negates the vector part).
pub trait QuaternionExt: Sized {
    /// Normalize to unit norm, failing with [`Error::DegenerateInput`] on a zero quaternion
    fn checked_normalize(&self, quantity: &'static str) -> Result<Self>;

    /// The representative of `{q, -q}` with a non-negative scalar part
    fn canonical(&self) -> Self;

    /// Rotation about `axis` built from its half-angle sine and cosine
    fn from_half_angle(axis: Axis, sin_half: f32, cos_half: f32) -> Self;
}

impl QuaternionExt for Quaternion<f32> {
    fn checked_normalize(&self, quantity: &'static str) -> Result<Self> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Ok(*self / norm)
        } else {
            Err(Error::DegenerateInput { quantity })
        }
    }

    fn canonical(&self) -> Self {
        if self.w < 0.0 { -*self } else { *self }
    }

    fn from_half_angle(axis: Axis, sin_half: f32, cos_half: f32) -> Self {
        match axis {
            Axis::X => Quaternion::new(cos_half, sin_half, 0.0, 0.0),
            Axis::Y => Quaternion::new(cos_half, 0.0, sin_half, 0.0),
            Axis::Z => Quaternion::new(cos_half, 0.0, 0.0, sin_half),
        }
    }
}

/// Select the representative of a unit quaternion with a non-negative scalar part
///
/// Applying it twice is the same as applying it once.
///
/// # Example
/// ```
/// use nalgebra::{Quaternion, UnitQuaternion};
/// use fqa_attitude::canonicalize;
///
/// let q = UnitQuaternion::new_normalize(Quaternion::new(-0.5, 0.5, -0.5, 0.5));
/// let c = canonicalize(q);
/// assert!(c.w >= 0.0);
/// assert_eq!(canonicalize(c), c);
/// ```
pub fn canonicalize(q: UnitQuaternion<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::new_unchecked(q.into_inner().canonical())
}

/// Matrix-vector product for arbitrary compatible dimensions
///
/// # Example
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use fqa_attitude::{Error, math::mat_vec_mul};
///
/// let m = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// let v = DVector::from_column_slice(&[1.0, 2.0, 3.0]);
/// assert_eq!(mat_vec_mul(&m, &v).unwrap(), DVector::from_column_slice(&[1.0, 2.0]));
///
/// let short = DVector::from_column_slice(&[1.0, 2.0]);
/// assert!(matches!(mat_vec_mul(&m, &short), Err(Error::DimensionMismatch { .. })));
/// ```
pub fn mat_vec_mul(m: &DMatrix<f32>, v: &DVector<f32>) -> Result<DVector<f32>> {
    if m.ncols() != v.nrows() {
        return Err(Error::DimensionMismatch {
            left: m.shape(),
            right: v.shape(),
        });
    }
    Ok(m * v)
}

/// Matrix-matrix product for arbitrary compatible dimensions
pub fn mat_mul(a: &DMatrix<f32>, b: &DMatrix<f32>) -> Result<DMatrix<f32>> {
    if a.ncols() != b.nrows() {
        return Err(Error::DimensionMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(a * b)
}
