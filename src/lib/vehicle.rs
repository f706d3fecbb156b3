//! One vehicle's worth of estimation and actuation state.
//!
//! [`Quadcopter`] owns the sensor, actuator and status collaborators together
//! with the offsets, filter rings, attitude and mixer, so several vehicles
//! (or simulations) can run side by side without shared globals. It is meant
//! to be driven from a single control loop; an outer loop running on another
//! thread must synchronize its reads of [`Quadcopter::attitude`] against
//! [`Quadcopter::update`].

use crate::config::{
    EstimatorConfig, MixerConfig, LONG_WINDOW, MICROS_PER_SECOND, OPERATING_POINT_STEP,
    POLL2_INTERVAL_US, POLL3_INTERVAL_US, SHORT_WINDOW,
};
use crate::controller::mixer::{Motor, MotorCommandSet, MotorMixer, MixerError};
use crate::error::Fault;
use crate::estimation::attitude::{AttitudeEstimator, AttitudeState};
use crate::filtering::bank::FilterBank;
use crate::interfaces::{ActuatorSink, LedSelector, SensorSource, StatusSignal};
use crate::sensors::calibration::{OffsetCalibrator, OffsetSet};
use crate::sensors::sample::{Channel, SensorSample};
use crate::sensors::units::ScaleFactors;
use crate::timing::{PollTimer, UpdateClock};

pub struct Quadcopter<S, A, L> {
    sensors: S,
    motors: A,
    status: L,
    scale: ScaleFactors,
    calibrator: OffsetCalibrator,
    offsets: OffsetSet,
    // gyro rates are averaged over the short window, everything else the long
    short: FilterBank<SHORT_WINDOW>,
    long: FilterBank<LONG_WINDOW>,
    latest: SensorSample,
    estimator: AttitudeEstimator,
    mixer: MotorMixer,
    clock: UpdateClock,
    range_poll: PollTimer,
    mag_poll: PollTimer,
    freq: u32,
}

impl<S, A, L> Quadcopter<S, A, L>
where
    S: SensorSource,
    A: ActuatorSink,
    L: StatusSignal,
{
    pub fn new(sensors: S, motors: A, status: L) -> Self {
        Self::with_config(
            sensors,
            motors,
            status,
            EstimatorConfig::default(),
            MixerConfig::default(),
        )
    }

    pub fn with_config(
        sensors: S,
        motors: A,
        status: L,
        estimator: EstimatorConfig,
        mixer: MixerConfig,
    ) -> Self {
        Self {
            sensors,
            motors,
            status,
            scale: ScaleFactors::board(),
            calibrator: OffsetCalibrator::default(),
            offsets: OffsetSet::ZERO,
            short: FilterBank::new(),
            long: FilterBank::new(),
            latest: SensorSample::default(),
            estimator: AttitudeEstimator::new(estimator),
            mixer: MotorMixer::new(mixer),
            clock: UpdateClock::new(),
            range_poll: PollTimer::new(POLL2_INTERVAL_US),
            mag_poll: PollTimer::new(POLL3_INTERVAL_US),
            freq: 0,
        }
    }

    /// Brings up the sensors and captures the at-rest offsets.
    ///
    /// The vehicle must be still and level. If the sensors do not come up the
    /// offsets stay at zero and false is returned.
    pub fn init_sensor(&mut self) -> bool {
        if !self.sensors.init_sensor() {
            log_error!("sensor initialization failed");
            self.offsets = OffsetSet::ZERO;
            self.report(Fault::Calibration);
            return false;
        }
        log_info!("sensors initialized");
        self.calibrate();
        true
    }

    /// Re-captures the offsets. Falls back to zero offsets on failure.
    pub fn calibrate(&mut self) {
        match self.calibrator.capture_offsets(&mut self.sensors) {
            Ok(offsets) => {
                self.offsets = offsets;
                log_info!(
                    "gyro offsets (deg/s): [{}, {}, {}]",
                    offsets.gyro.0,
                    offsets.gyro.1,
                    offsets.gyro.2
                );
                log_info!(
                    "accel offsets (m/s^2): [{}, {}, {}]",
                    offsets.accel.0,
                    offsets.accel.1,
                    offsets.accel.2
                );
            }
            Err(fault) => {
                self.offsets = OffsetSet::ZERO;
                self.report(fault);
            }
        }
    }

    /// Arms the motors at `start_speed`, which becomes the operating point.
    pub fn init_motors(&mut self, start_speed: u8) -> bool {
        let armed = self.mixer.init_motors(&mut self.motors, start_speed);
        if armed {
            log_info!("motors armed at {}", self.mixer.operating_point());
        } else {
            log_error!("motor initialization failed");
            self.status.error_led(LedSelector::Red);
        }
        armed
    }

    /// Reads the sensors that are due at `now_us` into the filter rings.
    ///
    /// Accel and gyro are read every call, elevation and magnetometer only
    /// once their poll interval has passed. A failed or non-finite reading
    /// is reported and skipped, so the ring keeps its last values.
    pub fn poll(&mut self, now_us: u64) {
        for channel in Channel::INERTIAL {
            self.read_channel(channel);
        }
        if self.range_poll.poll(now_us) {
            self.read_channel(Channel::Elevation);
        }
        if self.mag_poll.poll(now_us) {
            for channel in Channel::MAG {
                self.read_channel(channel);
            }
        }
    }

    /// Polls the sensors and advances the attitude to `now_us`.
    pub fn update_attitude(&mut self, now_us: u64) -> AttitudeState {
        self.poll(now_us);

        let first = self.clock.last().is_none();
        let elapsed_us = self.clock.tick(now_us);
        if elapsed_us == 0 {
            if !first {
                self.report(Fault::Timing);
            }
            return self.estimator.state();
        }
        self.freq = (MICROS_PER_SECOND / elapsed_us as f32) as u32;

        let sample = self.raw_filtered_sample();
        self.estimator.update(&sample, &self.offsets, elapsed_us)
    }

    /// Mixes the outer-loop corrections and writes the motor commands.
    pub fn update_motors(
        &mut self,
        pid_output_a: f32,
        pid_output_b: f32,
    ) -> Result<MotorCommandSet, MixerError> {
        if self.mixer.is_armed() {
            for motor in Motor::ALL {
                let mixed = self.mixer.mixed_value(motor, pid_output_a, pid_output_b);
                if !mixed.is_finite() {
                    self.report(Fault::ActuationBound(motor));
                }
            }
        }
        let result = self
            .mixer
            .update_motors(&mut self.motors, pid_output_a, pid_output_b);
        if let Err(MixerError::Actuator(motor, e)) = result {
            log_warn!("{} rejected command: {}", motor, e);
            self.status.error_led(LedSelector::Red);
        }
        result
    }

    /// One control cycle: poll, estimate, then actuate.
    pub fn update(
        &mut self,
        now_us: u64,
        pid_output_a: f32,
        pid_output_b: f32,
    ) -> Result<MotorCommandSet, MixerError> {
        self.update_attitude(now_us);
        self.update_motors(pid_output_a, pid_output_b)
    }

    pub fn attitude(&self) -> AttitudeState {
        self.estimator.state()
    }

    pub fn offsets(&self) -> OffsetSet {
        self.offsets
    }

    /// Filtered readings with the offsets removed, what the outer loop sees.
    pub fn filtered_sample(&self) -> SensorSample {
        self.offsets.correct(&self.raw_filtered_sample())
    }

    /// Last accepted reading of each channel, converted but unfiltered.
    pub fn latest_sample(&self) -> SensorSample {
        self.latest
    }

    /// Update rate measured over the last interval, Hz.
    pub fn freq(&self) -> u32 {
        self.freq
    }

    /// Commands currently held by the motors.
    pub fn motor_commands(&self) -> MotorCommandSet {
        self.mixer.last_commands()
    }

    pub fn is_armed(&self) -> bool {
        self.mixer.is_armed()
    }

    pub fn operating_point(&self) -> u8 {
        self.mixer.operating_point()
    }

    pub fn raise_operating_point(&mut self) -> u8 {
        self.mixer.raise_operating_point(OPERATING_POINT_STEP)
    }

    pub fn lower_operating_point(&mut self) -> u8 {
        self.mixer.lower_operating_point(OPERATING_POINT_STEP)
    }

    pub fn reset_pitch_roll(&mut self) {
        self.estimator.reset_pitch_roll();
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn motors(&self) -> &A {
        &self.motors
    }

    pub fn status(&self) -> &L {
        &self.status
    }

    fn read_channel(&mut self, channel: Channel) {
        let value = match self.sensors.read_raw(channel) {
            Ok(raw) => self.scale.to_si(raw, channel.kind()),
            Err(_) => f32::NAN,
        };
        if !value.is_finite() {
            self.report(Fault::SensorRead(channel));
            return;
        }
        self.latest = self.latest.with(channel, value);
        self.short.push(channel, value);
        self.long.push(channel, value);
    }

    fn raw_filtered_sample(&self) -> SensorSample {
        let mut sample = self.long.sample();
        for channel in [Channel::GyroX, Channel::GyroY, Channel::GyroZ] {
            sample = sample.with(channel, self.short.filtered(channel).unwrap_or(0.0));
        }
        sample
    }

    fn report(&mut self, fault: Fault) {
        log_warn!("fault: {}", fault);
        self.status.error_led(fault.led());
    }
}
