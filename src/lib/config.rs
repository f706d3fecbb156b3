// Compile-time configuration of the flight core.

use crate::controller::mixer::MixerGeometry;
use crate::sensors::units::{AccelRange, GyroRange};

// Motor command band, in percent-style servo units
pub const MOTOR_MIN: u8 = 50;
pub const MOTOR_MAX: u8 = 105;
// Step used when the operating point is nudged up or down
pub const OPERATING_POINT_STEP: u8 = 1;

// Filter ring capacities
pub const SHORT_WINDOW: usize = 10;
pub const LONG_WINDOW: usize = 30;

// Latency between auxiliary sensor polls, in microseconds
pub const POLL2_INTERVAL_US: u64 = 50_000; // range finder
pub const POLL3_INTERVAL_US: u64 = 100_000; // magnetometer

// Gyro drift rates of (x,y,z) axes in deg/(s*us)
pub const GYRO_DRIFT_RATE_DPS_PER_US: (f32, f32, f32) = (-9e-10, 3e-10, -3e-11);

pub const ACCEL_RANGE: AccelRange = AccelRange::Gpm2;
pub const GYRO_RANGE: GyroRange = GyroRange::Dps250;
pub const MAG_UT_PER_LSB: f32 = 100.0 / 1100.0; // 1.3 gauss range
pub const ELEVATION_M_PER_LSB: f32 = 0.0127; // analog range finder, 10 bit ADC
pub const STANDARD_GRAVITY: f32 = 9.806_65;

// Number of at-rest readings averaged into each offset
pub const CALIBRATION_SAMPLES: usize = 30;

// Weight of the gyro-integrated angle in the complementary blend, 0..=1
pub const DEFAULT_GYRO_WEIGHT: f32 = 0.98;

pub const MICROS_PER_SECOND: f32 = 1_000_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatorConfig {
    /// Share of the gyro-integrated angle kept each update. The remainder
    /// comes from the accelerometer leveling angle.
    pub gyro_weight: f32,
    /// Linear gyro drift in deg/(s*us) for (x,y,z)
    pub drift_rate: (f32, f32, f32),
}

impl Default for EstimatorConfig {
    fn default() -> EstimatorConfig {
        EstimatorConfig {
            gyro_weight: DEFAULT_GYRO_WEIGHT,
            drift_rate: GYRO_DRIFT_RATE_DPS_PER_US,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixerConfig {
    pub min: u8,
    pub max: u8,
    pub geometry: MixerGeometry,
}

impl Default for MixerConfig {
    fn default() -> MixerConfig {
        MixerConfig {
            min: MOTOR_MIN,
            max: MOTOR_MAX,
            geometry: MixerGeometry::PLUS,
        }
    }
}
