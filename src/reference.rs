//! Magnetic reference capture
//!
//! Yaw is measured against the first valid calibrated magnetometer reading
//! of a session rather than against true or magnetic north. The reference is
//! latched once and kept until explicitly reset.

use nalgebra::Vector3;

/// Set-once holder of the navigation reference field
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fqa_attitude::ReferenceField;
///
/// let mut reference = ReferenceField::new();
/// assert!(!reference.ensure(Vector3::zeros()));          // ignored
/// assert!(reference.ensure(Vector3::new(20.0, 0.0, -40.0)));
/// assert!(!reference.ensure(Vector3::new(0.0, 20.0, -40.0))); // already latched
/// assert_eq!(reference.get(), Some(Vector3::new(20.0, 0.0, -40.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceField {
    field: Option<Vector3<f32>>,
}

impl ReferenceField {
    /// An empty reference; the next valid sample will be latched
    pub const fn new() -> Self {
        Self { field: None }
    }

    /// A reference preloaded with a known field
    pub const fn with_reference(field: Vector3<f32>) -> Self {
        Self { field: Some(field) }
    }

    /// Latch `sample` if no reference is held yet and the sample is non-zero.
    ///
    /// Returns `true` only when this call stored the sample.
    pub fn ensure(&mut self, sample: Vector3<f32>) -> bool {
        if self.field.is_some() || !is_usable(&sample) {
            return false;
        }
        self.field = Some(sample);
        true
    }

    /// The latched reference, if any
    pub fn get(&self) -> Option<Vector3<f32>> {
        self.field
    }

    /// Whether a reference has been latched
    pub fn is_set(&self) -> bool {
        self.field.is_some()
    }

    /// Forget the held reference; the next valid sample is latched again
    pub fn reset(&mut self) {
        self.field = None;
    }
}

fn is_usable(sample: &Vector3<f32>) -> bool {
    let norm_squared = sample.norm_squared();
    norm_squared > 0.0 && norm_squared.is_finite()
}

#[cfg(feature = "std")]
pub use shared::SharedReference;

#[cfg(feature = "std")]
mod shared {
    use std::sync::{Mutex, MutexGuard};

    use nalgebra::Vector3;

    use super::ReferenceField;

    /// [`ReferenceField`] behind a mutex, for several sampling tasks sharing
    /// one reference
    ///
    /// Every operation holds the lock for its whole duration, so a reader never
    /// observes a half-written reference.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use nalgebra::Vector3;
    /// use fqa_attitude::SharedReference;
    ///
    /// let reference = Arc::new(SharedReference::new());
    /// let worker = {
    ///     let reference = Arc::clone(&reference);
    ///     std::thread::spawn(move || reference.ensure(Vector3::new(1.0, 0.0, 0.0)))
    /// };
    /// worker.join().unwrap();
    /// assert!(reference.is_set());
    /// ```
    #[derive(Debug, Default)]
    pub struct SharedReference {
        inner: Mutex<ReferenceField>,
    }

    impl SharedReference {
        /// An empty shared reference
        pub const fn new() -> Self {
            Self {
                inner: Mutex::new(ReferenceField::new()),
            }
        }

        /// A shared reference preloaded with a known field
        pub fn with_reference(field: Vector3<f32>) -> Self {
            Self {
                inner: Mutex::new(ReferenceField::with_reference(field)),
            }
        }

        /// See [`ReferenceField::ensure`]
        pub fn ensure(&self, sample: Vector3<f32>) -> bool {
            self.lock().ensure(sample)
        }

        /// See [`ReferenceField::get`]
        pub fn get(&self) -> Option<Vector3<f32>> {
            self.lock().get()
        }

        /// See [`ReferenceField::is_set`]
        pub fn is_set(&self) -> bool {
            self.lock().is_set()
        }

        /// See [`ReferenceField::reset`]
        pub fn reset(&self) {
            self.lock().reset();
        }

        /// Copy of the current state
        pub fn snapshot(&self) -> ReferenceField {
            *self.lock()
        }

        // A panic while holding the lock cannot leave a torn Option behind,
        // so a poisoned mutex still holds a consistent value.
        fn lock(&self) -> MutexGuard<'_, ReferenceField> {
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }
}
