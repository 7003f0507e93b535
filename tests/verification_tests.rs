use approx::assert_relative_eq;
use core::f32::consts::{FRAC_PI_2, PI};
use fqa_attitude::{
    AlignmentSpec, CalibrationModel, Convention, Error, Estimator, EstimatorSettings, Heading,
    QuaternionExt, SolverSettings, canonicalize, estimate_orientation, estimate_tilt, solve,
    to_euler,
};
use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const EPSILON: f32 = 1e-5;

fn random_vector(rng: &mut Pcg64, scale: f32) -> Vector3<f32> {
    Vector3::new(
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
    )
}

/// Every solvable epoch yields a canonical unit quaternion
#[test]
fn test_output_is_canonical_unit_quaternion() {
    let mut rng = Pcg64::seed_from_u64(0x5eed);

    for _ in 0..2000 {
        let accel = random_vector(&mut rng, 1.5);
        if accel.norm() < 0.05 {
            continue;
        }
        let mag = random_vector(&mut rng, 60.0);
        let reference = random_vector(&mut rng, 60.0);

        let q = estimate_orientation(accel, mag, reference).unwrap();
        assert!((q.quaternion().norm() - 1.0).abs() < EPSILON);
        assert!(q.w >= 0.0);
    }
}

/// Sign flip is applied once and only once
#[test]
fn test_canonicalization_idempotence() {
    let mut rng = Pcg64::seed_from_u64(7);

    for _ in 0..500 {
        let raw = Quaternion::new(
            rng.random_range(-1.0f32..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );

        let once = raw.canonical();
        assert!(once.w >= 0.0);
        assert_eq!(once.canonical(), once);
        if raw.w < 0.0 {
            assert_eq!(once, -raw);
        }

        if let Some(unit) = UnitQuaternion::try_new(raw, 1e-6) {
            let canonical = canonicalize(unit);
            assert_eq!(canonicalize(canonical), canonical);
            assert!(canonical.angle_to(&unit) < 1e-3);
        }
    }
}

/// Flat, level, and pointing along the reference gives zero angles
#[test]
fn test_level_round_trip() {
    let accel = Vector3::new(0.0, 0.0, 1.0);
    for mag in [
        Vector3::new(22.0, -4.0, -41.0),
        Vector3::new(-15.0, 30.0, -38.0),
        Vector3::new(0.0, -18.0, 45.0),
    ] {
        let euler = to_euler(&estimate_orientation(accel, mag, mag).unwrap());
        assert_relative_eq!(euler.roll, 0.0, epsilon = 1e-3);
        assert_relative_eq!(euler.pitch, 0.0, epsilon = 1e-3);
        assert_relative_eq!(euler.yaw, 0.0, epsilon = 1e-3);
    }
}

/// Gravity along the forward axis is a quarter-turn pitch
#[test]
fn test_pure_tilt_pitch() {
    let mag = Vector3::new(20.0, 0.0, -40.0);
    let q = estimate_orientation(Vector3::new(1.0, 0.0, 0.0), mag, mag).unwrap();
    assert_relative_eq!(to_euler(&q).pitch, FRAC_PI_2, epsilon = 1e-3);

    // Intermediate elevations follow asin(a.x) without clamping
    for degrees in [10.0f32, 30.0, 45.0, 60.0, 80.0] {
        let theta = degrees.to_radians();
        let accel = Vector3::new(theta.sin(), 0.0, theta.cos());
        let q = estimate_orientation(accel, Vector3::zeros(), Vector3::zeros()).unwrap();
        let euler = to_euler(&q);
        assert_relative_eq!(euler.pitch, theta, epsilon = 1e-3);
        assert!(euler.pitch.abs() < FRAC_PI_2);
    }
}

#[test]
fn test_degenerate_accelerometer() {
    let mag = Vector3::new(20.0, 0.0, -40.0);
    assert_eq!(
        estimate_orientation(Vector3::zeros(), mag, mag),
        Err(Error::DegenerateInput {
            quantity: "accelerometer"
        })
    );
}

/// A zero magnetometer degrades to the tilt-only quaternion
#[test]
fn test_degenerate_magnetometer() {
    let accel = Vector3::new(-0.2, 0.4, 0.85);
    let reference = Vector3::new(20.0, 0.0, -40.0);

    let attitude = solve(&SolverSettings::default(), accel, Vector3::zeros(), reference).unwrap();
    assert_eq!(attitude.heading, Heading::TiltOnly);
    assert!((attitude.quaternion.quaternion().norm() - 1.0).abs() < EPSILON);

    let tilt = estimate_tilt(&SolverSettings::default(), accel).unwrap();
    assert_eq!(attitude.quaternion, tilt);
}

/// Calibrating `K^-1 * corrected + b` recovers `corrected`
#[test]
fn test_calibration_round_trip() {
    let mut rng = Pcg64::seed_from_u64(42);
    let matrix = Matrix3::new(1.08, 0.03, -0.02, 0.03, 0.94, 0.05, -0.02, 0.05, 1.12);
    let bias = Vector3::new(-12.5, 4.25, 30.0);
    let inverse = matrix.try_inverse().unwrap();
    let model = CalibrationModel::new(bias, matrix);

    for _ in 0..100 {
        let corrected = random_vector(&mut rng, 60.0);
        let raw = inverse * corrected + bias;
        assert_relative_eq!(model.calibrate(raw), corrected, epsilon = 1e-3);
    }
}

#[test]
fn test_zero_alignment_is_identity() {
    let spec = AlignmentSpec::Sequential {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    let v = Vector3::new(0.3, -9.7, 1.2);
    assert_eq!(spec.align(v), v);
}

/// Synthesised readings from a known orientation are solved back to it
#[test]
fn test_recovers_random_orientations() {
    let settings = SolverSettings {
        convention: Convention::Ned,
        ..Default::default()
    };
    let mut rng = Pcg64::seed_from_u64(2024);

    for _ in 0..500 {
        let roll: f32 = rng.random_range(-PI..PI);
        let pitch = rng.random_range(-1.4..1.4);
        let yaw = rng.random_range(-PI..PI);
        let truth = UnitQuaternion::from_euler_angles(roll, pitch, yaw);

        let field = Vector3::new(
            rng.random_range(10.0f32..30.0),
            rng.random_range(-10.0..10.0),
            rng.random_range(30.0..50.0),
        );
        let accel = truth.inverse_transform_vector(&Vector3::new(0.0, 0.0, -1.0));
        let mag = truth.inverse_transform_vector(&field);

        let attitude = solve(&settings, accel, mag, field).unwrap();
        assert_eq!(attitude.heading, Heading::Referenced);
        assert!(
            attitude.quaternion.angle_to(&truth) < 5e-3,
            "roll={roll} pitch={pitch} yaw={yaw} error={}",
            attitude.quaternion.angle_to(&truth)
        );
    }
}

/// Board mounting plus calibration, run through the estimator
#[test]
fn test_estimator_pipeline_with_mounted_sensors() {
    let mounting = AlignmentSpec::Sequential {
        x: 0.0,
        y: 180.0,
        z: 90.0,
    };
    let bias = Vector3::new(5.0, -3.0, 8.0);
    let settings = EstimatorSettings {
        accelerometer_alignment: mounting,
        magnetometer_alignment: AlignmentSpec::Identity,
        magnetometer_calibration: CalibrationModel::from_hard_iron(bias),
        ..Default::default()
    };
    let mut estimator = Estimator::with_settings(settings);

    // Level device as seen through the mounting rotation
    let accel = mounting.inverse_align(Vector3::new(0.0, 0.0, 1.0));
    let field = Vector3::new(21.0, -2.0, -43.0);

    estimator.update(accel, field + bias).unwrap();
    assert_relative_eq!(estimator.reference().get().unwrap(), field, epsilon = 1e-4);

    let euler = estimator.euler().unwrap();
    assert_relative_eq!(euler.roll, 0.0, epsilon = 1e-3);
    assert_relative_eq!(euler.pitch, 0.0, epsilon = 1e-3);
    assert_relative_eq!(euler.yaw, 0.0, epsilon = 1e-3);

    // Device turned a quarter turn about the vertical
    let turned = Vector3::new(-field.y, field.x, field.z);
    estimator.update(accel, turned + bias).unwrap();
    assert_relative_eq!(estimator.euler().unwrap().yaw.abs(), FRAC_PI_2, epsilon = 1e-3);
}

#[cfg(feature = "serde")]
#[test]
fn test_settings_json_round_trip() {
    let settings = EstimatorSettings {
        accelerometer_alignment: AlignmentSpec::Sequential {
            x: 0.0,
            y: 180.0,
            z: 90.0,
        },
        magnetometer_calibration: CalibrationModel::new(
            Vector3::new(1.5, -2.25, 3.0),
            Matrix3::identity() * 1.1,
        ),
        solver: SolverSettings {
            convention: Convention::Enu,
            ..Default::default()
        },
        ..Default::default()
    };

    let json = serde_json::to_string(&settings).unwrap();
    let parsed: EstimatorSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, settings);

    // Missing fields fall back to defaults
    let partial: EstimatorSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(partial, EstimatorSettings::default());
}
