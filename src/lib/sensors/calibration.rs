use crate::config;
use crate::error::Fault;
use crate::interfaces::SensorSource;
use crate::sensors::sample::{Axis, Channel, SensorSample};
use crate::sensors::units::ScaleFactors;

/// At-rest baseline of the accel and gyro channels, in SI units.
///
/// The accel z offset excludes gravity so a level vehicle still reads +1 g
/// on that axis after correction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetSet {
    pub accel: (f32, f32, f32),
    pub gyro: (f32, f32, f32),
}

impl OffsetSet {
    pub const ZERO: OffsetSet = OffsetSet {
        accel: (0.0, 0.0, 0.0),
        gyro: (0.0, 0.0, 0.0),
    };

    /// Offset subtracted from `channel`, zero for mag and elevation.
    pub fn offset(&self, channel: Channel) -> f32 {
        match channel {
            Channel::AccelX => self.accel.0,
            Channel::AccelY => self.accel.1,
            Channel::AccelZ => self.accel.2,
            Channel::GyroX => self.gyro.0,
            Channel::GyroY => self.gyro.1,
            Channel::GyroZ => self.gyro.2,
            _ => 0.0,
        }
    }

    pub fn gyro_offset(&self, axis: Axis) -> f32 {
        self.offset(Channel::gyro(axis))
    }

    pub fn correct(&self, sample: &SensorSample) -> SensorSample {
        let mut corrected = *sample;
        for channel in Channel::INERTIAL {
            corrected = corrected.with(channel, sample.get(channel) - self.offset(channel));
        }
        corrected
    }
}

/// Averages readings taken while the vehicle sits still into an [`OffsetSet`].
pub struct OffsetCalibrator {
    num_samples: usize,
    scale: ScaleFactors,
}

impl OffsetCalibrator {
    pub fn new(num_samples: usize, scale: ScaleFactors) -> Self {
        Self {
            num_samples: num_samples.max(1),
            scale,
        }
    }

    /// Reads the accel and gyro `num_samples` times and averages them.
    ///
    /// The caller guarantees the vehicle is at rest and level. Failed reads
    /// are skipped; a channel with no good reading at all fails the capture,
    /// and the caller is expected to fall back to [`OffsetSet::ZERO`].
    pub fn capture_offsets<S: SensorSource>(
        &self,
        source: &mut S,
    ) -> core::result::Result<OffsetSet, Fault> {
        let mut sums = [0.0f32; 6];
        let mut counts = [0usize; 6];

        for _ in 0..self.num_samples {
            for (i, channel) in Channel::INERTIAL.iter().enumerate() {
                if let Ok(raw) = source.read_raw(*channel) {
                    let value = self.scale.to_si(raw, channel.kind());
                    if value.is_finite() {
                        sums[i] += value;
                        counts[i] += 1;
                    }
                }
            }
        }

        if counts.iter().any(|count| *count == 0) {
            return Err(Fault::Calibration);
        }
        let mean = |i: usize| sums[i] / counts[i] as f32;

        Ok(OffsetSet {
            accel: (mean(0), mean(1), mean(2) - config::STANDARD_GRAVITY),
            gyro: (mean(3), mean(4), mean(5)),
        })
    }
}

impl Default for OffsetCalibrator {
    fn default() -> Self {
        Self::new(config::CALIBRATION_SAMPLES, ScaleFactors::board())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSensors;

    #[test]
    fn correct_leaves_mag_and_elevation_alone() {
        let offsets = OffsetSet {
            accel: (1.0, 2.0, 3.0),
            gyro: (0.5, 0.25, -1.0),
        };
        let sample = SensorSample {
            accel: (1.0, 2.0, 13.0),
            gyro: (1.0, 1.0, 1.0),
            mag: (7.0, 8.0, 9.0),
            elevation: 2.0,
        };
        let corrected = offsets.correct(&sample);
        assert_eq!(corrected.accel, (0.0, 0.0, 10.0));
        assert_eq!(corrected.gyro, (0.5, 0.75, 2.0));
        assert_eq!(corrected.mag, sample.mag);
        assert_eq!(corrected.elevation, sample.elevation);
    }

    #[test]
    fn at_rest_capture_keeps_gravity_on_z() {
        let scale = ScaleFactors::board();
        let mut sensors = MockSensors::at_rest();
        sensors.set_raw(Channel::GyroX, 131.0); // 1 deg/s of bias
        sensors.set_raw(Channel::AccelX, 164.0);

        let offsets = OffsetCalibrator::new(10, scale).capture_offsets(&mut sensors).unwrap();

        assert!((offsets.gyro.0 - 1.0).abs() < 1e-4);
        assert!((offsets.accel.0 - scale.to_si(164.0, Channel::AccelX.kind())).abs() < 1e-5);
        assert!(offsets.accel.2.abs() < 1e-3, "gravity leaked into z offset");
    }

    #[test]
    fn repeated_capture_converges_to_same_offsets() {
        let calibrator = OffsetCalibrator::default();
        let mut sensors = MockSensors::at_rest();
        sensors.set_raw(Channel::GyroY, -40.0);
        sensors.set_raw(Channel::AccelY, 300.0);

        let first = calibrator.capture_offsets(&mut sensors).unwrap();
        let second = calibrator.capture_offsets(&mut sensors).unwrap();
        assert!((first.gyro.1 - second.gyro.1).abs() < 1e-6);
        assert!((first.accel.1 - second.accel.1).abs() < 1e-6);
        assert!((first.accel.2 - second.accel.2).abs() < 1e-6);
    }

    #[test]
    fn unavailable_sensor_fails_capture() {
        let mut sensors = MockSensors::at_rest();
        sensors.fail_channel(Channel::GyroZ);
        let result = OffsetCalibrator::default().capture_offsets(&mut sensors);
        assert_eq!(result, Err(Fault::Calibration));
    }

    #[test]
    fn intermittent_reads_average_the_good_ones() {
        let mut sensors = MockSensors::at_rest();
        sensors.set_raw(Channel::GyroX, 262.0);
        sensors.fail_every(Channel::GyroX, 2);
        let offsets = OffsetCalibrator::new(8, ScaleFactors::board())
            .capture_offsets(&mut sensors)
            .unwrap();
        assert!((offsets.gyro.0 - 2.0).abs() < 1e-4);
    }
}
