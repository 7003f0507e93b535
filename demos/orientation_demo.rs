//! Attitude estimation demonstration
//!
//! Simulates a board with a rotated accelerometer and a magnetometer carrying
//! hard-iron bias, slowly turning about the vertical while rocking in pitch,
//! and prints the estimated orientation each epoch.
//!
//! Run with: `RUST_LOG=debug cargo run --example orientation_demo`

use fqa_attitude::{
    AlignmentSpec, CalibrationModel, Estimator, EstimatorSettings, Heading, SensorSource,
};
use nalgebra::{UnitQuaternion, Vector3};
use std::f32::consts::PI;

const SAMPLE_PERIOD: f32 = 0.1; // 100 ms sample period

/// Earth field at the test site in the navigation frame (uT)
const FIELD: Vector3<f32> = Vector3::new(21.0, -1.5, -43.0);

/// Accelerometer is mounted flipped and quarter-turned on the board
const ACCELEROMETER_MOUNTING: AlignmentSpec = AlignmentSpec::Sequential {
    x: 0.0,
    y: 180.0,
    z: 90.0,
};

/// Simulated sensor pair following a scripted motion
struct SimulatedBoard {
    time: f32,
    hard_iron: Vector3<f32>,
}

impl SimulatedBoard {
    fn orientation(&self) -> UnitQuaternion<f32> {
        let yaw = 0.2 * PI * self.time;
        let pitch = 0.3 * (0.5 * PI * self.time).sin();
        UnitQuaternion::from_euler_angles(0.0, pitch, yaw)
    }

    fn advance(&mut self) {
        self.time += SAMPLE_PERIOD;
    }

    fn accelerometer(&self) -> Accelerometer<'_> {
        Accelerometer(self)
    }

    fn magnetometer(&self) -> Magnetometer<'_> {
        Magnetometer(self)
    }
}

struct Accelerometer<'a>(&'a SimulatedBoard);

impl SensorSource for Accelerometer<'_> {
    fn sample(&mut self) -> fqa_attitude::Result<Vector3<f32>> {
        // Body frame is forward-left-up: a resting device reads +1 g on Z
        let body = self
            .0
            .orientation()
            .inverse_transform_vector(&Vector3::new(0.0, 0.0, 1.0));
        Ok(ACCELEROMETER_MOUNTING.inverse_align(body))
    }
}

struct Magnetometer<'a>(&'a SimulatedBoard);

impl SensorSource for Magnetometer<'_> {
    fn sample(&mut self) -> fqa_attitude::Result<Vector3<f32>> {
        let body = self.0.orientation().inverse_transform_vector(&FIELD);
        Ok(body + self.0.hard_iron)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let hard_iron = Vector3::new(12.0, -4.5, 30.2);
    let settings = EstimatorSettings {
        accelerometer_alignment: ACCELEROMETER_MOUNTING,
        magnetometer_calibration: CalibrationModel::from_hard_iron(hard_iron),
        ..Default::default()
    };
    let mut estimator = Estimator::with_settings(settings);
    let mut board = SimulatedBoard {
        time: 0.0,
        hard_iron,
    };

    log::info!(
        "estimating attitude with {:?} convention",
        estimator.settings().solver.convention
    );

    for i in 0..50 {
        // this loop should repeat each time new sensor data is available
        let result = estimator.update_from(&mut board.accelerometer(), &mut board.magnetometer());

        match result {
            Ok(_) => {
                if let Some(euler) = estimator.euler() {
                    let euler = euler.to_degrees();
                    let heading = match estimator.heading() {
                        Some(Heading::TiltOnly) => " (tilt only)",
                        _ => "",
                    };
                    println!(
                        "Sample {:2}: Roll: {:7.2}, Pitch: {:7.2}, Yaw: {:7.2}{}",
                        i, euler.roll, euler.pitch, euler.yaw, heading
                    );
                }
            }
            Err(error) => log::error!("sample {} failed: {}", i, error),
        }

        board.advance();
    }
}
