// Gyro integration with linear drift compensation, leveled by the accelerometer.
//
// Roll and pitch are a complementary blend: the integrated gyro angle carries
// the short-term motion and the accelerometer tilt pulls the long-run mean
// back to gravity. Heading is integrated from the z rate alone.

use core::f32::consts::PI;
use libm::{atan2f, sqrtf};

use crate::config::{EstimatorConfig, MICROS_PER_SECOND};
use crate::sensors::calibration::OffsetSet;
use crate::sensors::sample::{Axis, SensorSample};

const RAD_TO_DEG: f32 = 180.0 / PI;
// below this the accel vector carries no usable direction (free fall)
const MIN_GRAVITY_NORM: f32 = 1e-3;

/// Running attitude estimate, all angles in degrees within (-180, 180].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttitudeState {
    pub alpha: f32,   // roll
    pub beta: f32,    // pitch
    pub heading: f32, // yaw
}

pub struct AttitudeEstimator {
    config: EstimatorConfig,
    state: AttitudeState,
    gyro_angles: (f32, f32, f32),
}

impl AttitudeEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config: EstimatorConfig {
                gyro_weight: config.gyro_weight.clamp(0.0, 1.0),
                ..config
            },
            state: AttitudeState::default(),
            gyro_angles: (0.0, 0.0, 0.0),
        }
    }

    pub fn state(&self) -> AttitudeState {
        self.state
    }

    /// Angles from gyro integration alone, never leveled. Useful to see how
    /// far the raw integral has wandered.
    pub fn gyro_angles(&self) -> (f32, f32, f32) {
        self.gyro_angles
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Zeroes the attitude and the gyro accumulators.
    pub fn reset(&mut self) {
        self.state = AttitudeState::default();
        self.gyro_angles = (0.0, 0.0, 0.0);
    }

    /// Levels roll and pitch back to zero, heading is kept.
    pub fn reset_pitch_roll(&mut self) {
        self.state.alpha = 0.0;
        self.state.beta = 0.0;
        self.gyro_angles.0 = 0.0;
        self.gyro_angles.1 = 0.0;
    }

    /// Rate subtracted from `axis` to cancel drift over `elapsed_us`, deg/s.
    pub fn drift_compensation(&self, axis: Axis, elapsed_us: u32) -> f32 {
        let drift_rate = match axis {
            Axis::X => self.config.drift_rate.0,
            Axis::Y => self.config.drift_rate.1,
            Axis::Z => self.config.drift_rate.2,
        };
        drift_rate * elapsed_us as f32
    }

    /// Advances the estimate by `elapsed_us`.
    ///
    /// `sample` holds filtered readings in SI units that still contain their
    /// at-rest offsets. Zero elapsed time, or a non-finite gyro rate, leaves
    /// the attitude untouched.
    pub fn update(
        &mut self,
        sample: &SensorSample,
        offsets: &OffsetSet,
        elapsed_us: u32,
    ) -> AttitudeState {
        if elapsed_us == 0 {
            return self.state;
        }
        let dt = elapsed_us as f32 / MICROS_PER_SECOND;
        let corrected = offsets.correct(sample);

        let rate = |axis: Axis, raw: f32| raw - self.drift_compensation(axis, elapsed_us);
        let wx = rate(Axis::X, corrected.gyro.0);
        let wy = rate(Axis::Y, corrected.gyro.1);
        let wz = rate(Axis::Z, corrected.gyro.2);
        if !(wx.is_finite() && wy.is_finite() && wz.is_finite()) {
            return self.state;
        }

        self.gyro_angles = (
            wrap_degrees(self.gyro_angles.0 + wx * dt),
            wrap_degrees(self.gyro_angles.1 + wy * dt),
            wrap_degrees(self.gyro_angles.2 + wz * dt),
        );

        let roll_gyro = self.state.alpha + wx * dt;
        let pitch_gyro = self.state.beta + wy * dt;
        let (alpha, beta) = match leveling(corrected.accel) {
            Some((roll_accel, pitch_accel)) => {
                // pull along the shorter arc so the blend holds across +-180
                let pull = 1.0 - self.config.gyro_weight;
                (
                    roll_gyro + pull * wrap_degrees(roll_accel - roll_gyro),
                    pitch_gyro + pull * wrap_degrees(pitch_accel - pitch_gyro),
                )
            }
            None => (roll_gyro, pitch_gyro),
        };

        self.state = AttitudeState {
            alpha: wrap_degrees(alpha),
            beta: wrap_degrees(beta),
            heading: wrap_degrees(self.state.heading + wz * dt),
        };
        self.state
    }
}

impl Default for AttitudeEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

/// Roll and pitch in degrees implied by the gravity vector in `accel`.
///
/// `None` when the vector is too short or non-finite to give a direction.
pub fn leveling(accel: (f32, f32, f32)) -> Option<(f32, f32)> {
    let (ax, ay, az) = accel;
    let norm = sqrtf(ax * ax + ay * ay + az * az);
    if !norm.is_finite() || norm < MIN_GRAVITY_NORM {
        return None;
    }
    let roll = atan2f(ay, az);
    let pitch = atan2f(-ax, sqrtf(ay * ay + az * az));
    Some((roll * RAD_TO_DEG, pitch * RAD_TO_DEG))
}

fn wrap_degrees(angle: f32) -> f32 {
    let mut wrapped = angle % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STANDARD_GRAVITY;

    const TICK_US: u32 = 10_000;

    fn level(gyro: (f32, f32, f32)) -> SensorSample {
        SensorSample {
            accel: (0.0, 0.0, STANDARD_GRAVITY),
            gyro,
            ..SensorSample::default()
        }
    }

    fn no_drift() -> EstimatorConfig {
        EstimatorConfig {
            drift_rate: (0.0, 0.0, 0.0),
            ..EstimatorConfig::default()
        }
    }

    #[test]
    fn zero_elapsed_is_a_no_op() {
        let mut estimator = AttitudeEstimator::default();
        for _ in 0..20 {
            estimator.update(&level((5.0, -3.0, 12.0)), &OffsetSet::ZERO, TICK_US);
        }
        let before = estimator.state();
        let gyro_before = estimator.gyro_angles();

        let after = estimator.update(&level((500.0, 500.0, 500.0)), &OffsetSet::ZERO, 0);

        assert_eq!(after.alpha.to_bits(), before.alpha.to_bits());
        assert_eq!(after.beta.to_bits(), before.beta.to_bits());
        assert_eq!(after.heading.to_bits(), before.heading.to_bits());
        assert_eq!(estimator.gyro_angles(), gyro_before);
    }

    #[test]
    fn drift_compensation_scales_with_elapsed_time() {
        let estimator = AttitudeEstimator::default();
        for axis in Axis::ALL {
            let single = estimator.drift_compensation(axis, 1_000);
            let double = estimator.drift_compensation(axis, 2_000);
            assert_eq!(double, 2.0 * single);
        }
        assert!(estimator.drift_compensation(Axis::X, 1_000) < 0.0);
        assert!(estimator.drift_compensation(Axis::Y, 1_000) > 0.0);
    }

    #[test]
    fn drift_compensation_is_subtracted_from_the_rate() {
        let config = EstimatorConfig {
            gyro_weight: 1.0,
            drift_rate: (1e-4, 0.0, 0.0),
        };
        let mut estimator = AttitudeEstimator::new(config);
        // 1e-4 * 10_000 us = 1 deg/s of compensation cancels the 1 deg/s input
        let state = estimator.update(&level((1.0, 0.0, 0.0)), &OffsetSet::ZERO, TICK_US);
        assert!(state.alpha.abs() < 1e-6);
    }

    #[test]
    fn offsets_are_removed_before_integration() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        let offsets = OffsetSet {
            gyro: (2.0, -2.0, 0.5),
            ..OffsetSet::ZERO
        };
        for _ in 0..100 {
            estimator.update(&level((2.0, -2.0, 0.5)), &offsets, TICK_US);
        }
        let state = estimator.state();
        assert!(state.alpha.abs() < 1e-5);
        assert!(state.beta.abs() < 1e-5);
        assert!(state.heading.abs() < 1e-5);
    }

    #[test]
    fn gyro_dominates_a_single_step() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        let state = estimator.update(&level((10.0, 0.0, 0.0)), &OffsetSet::ZERO, TICK_US);
        // 10 deg/s for 10 ms, weighted 0.98 against a level accelerometer
        assert!((state.alpha - 0.098).abs() < 1e-5);
    }

    #[test]
    fn accelerometer_pulls_toward_measured_tilt() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        let tilt = 30.0f32.to_radians();
        let sample = SensorSample {
            accel: (0.0, STANDARD_GRAVITY * tilt.sin(), STANDARD_GRAVITY * tilt.cos()),
            ..SensorSample::default()
        };
        for _ in 0..400 {
            estimator.update(&sample, &OffsetSet::ZERO, TICK_US);
        }
        assert!((estimator.state().alpha - 30.0).abs() < 0.1);
        assert!(estimator.state().beta.abs() < 1e-3);
    }

    #[test]
    fn roll_blend_crosses_the_seam_when_inverted() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        let inverted = |ay: f32| SensorSample {
            accel: (0.0, ay, -STANDARD_GRAVITY),
            ..SensorSample::default()
        };
        for _ in 0..600 {
            estimator.update(&inverted(0.1), &OffsetSet::ZERO, TICK_US);
        }
        let (before, _) = leveling(inverted(0.1).accel).unwrap();
        assert!(before > 179.0);
        assert!((estimator.state().alpha - before).abs() < 0.01);

        // roughly a one degree roll through the inverted attitude
        let (target, _) = leveling(inverted(-0.1).accel).unwrap();
        assert!(target < -179.0);
        let mut closest_to_upright = f32::MAX;
        for _ in 0..200 {
            let state = estimator.update(&inverted(-0.1), &OffsetSet::ZERO, TICK_US);
            closest_to_upright = closest_to_upright.min(state.alpha.abs());
        }
        assert!(closest_to_upright > 179.0, "roll passed {}", closest_to_upright);
        assert!((estimator.state().alpha - target).abs() < 0.1);
    }

    #[test]
    fn pitch_blend_takes_the_shorter_arc() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        // no gravity vector, so pitch is gyro-only until it reads 179
        let tumbling = SensorSample {
            gyro: (0.0, 179.0, 0.0),
            ..SensorSample::default()
        };
        for _ in 0..100 {
            estimator.update(&tumbling, &OffsetSet::ZERO, TICK_US);
        }
        assert!((estimator.state().beta - 179.0).abs() < 0.01);

        // accelerometer says -90, which is 91 degrees away across the seam
        let nose_down = SensorSample {
            accel: (STANDARD_GRAVITY, 0.0, 0.0),
            ..SensorSample::default()
        };
        let state = estimator.update(&nose_down, &OffsetSet::ZERO, TICK_US);
        assert!(state.beta < -179.0 && state.beta > -179.5, "pitch {}", state.beta);
    }

    #[test]
    fn leveling_bounds_constant_gyro_bias() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        for _ in 0..5_000 {
            estimator.update(&level((1.0, 0.0, 0.0)), &OffsetSet::ZERO, TICK_US);
        }
        // raw integral has run off by 50 degrees, the blend stays near 0.5
        assert!((estimator.gyro_angles().0 - 50.0).abs() < 0.1);
        assert!(estimator.state().alpha < 0.6);
    }

    #[test]
    fn heading_integrates_yaw_rate_and_wraps() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        for _ in 0..300 {
            estimator.update(&level((0.0, 0.0, 90.0)), &OffsetSet::ZERO, TICK_US);
        }
        // 270 degrees of rotation reads as -90
        assert!((estimator.state().heading + 90.0).abs() < 0.01);
        assert!(estimator.state().alpha.abs() < 1e-6);
    }

    #[test]
    fn non_finite_gyro_is_not_integrated() {
        let mut estimator = AttitudeEstimator::default();
        estimator.update(&level((4.0, 4.0, 4.0)), &OffsetSet::ZERO, TICK_US);
        let before = estimator.state();
        let after = estimator.update(&level((f32::NAN, 0.0, 0.0)), &OffsetSet::ZERO, TICK_US);
        assert_eq!(after, before);
    }

    #[test]
    fn free_fall_falls_back_to_gyro_only() {
        let mut estimator = AttitudeEstimator::new(no_drift());
        let sample = SensorSample {
            gyro: (10.0, 0.0, 0.0),
            ..SensorSample::default()
        };
        let state = estimator.update(&sample, &OffsetSet::ZERO, TICK_US);
        assert!((state.alpha - 0.1).abs() < 1e-6);
    }

    #[test]
    fn leveling_reads_pitch_from_x() {
        let (roll, pitch) = leveling((-STANDARD_GRAVITY, 0.0, 0.0)).unwrap();
        assert!((pitch - 90.0).abs() < 1e-3);
        assert!(roll.abs() < 1e-3);
        assert_eq!(leveling((0.0, 0.0, 0.0)), None);
        assert_eq!(leveling((f32::NAN, 0.0, 1.0)), None);
    }

    #[test]
    fn wrap_keeps_half_open_interval() {
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-370.0), -10.0);
    }
}
