//! Synthetic hardware for tests and host-side simulation.

use crate::controller::mixer::{Motor, MotorCommandSet};
use crate::error::{DeviceError, Result};
use crate::interfaces::{ActuatorSink, LedSelector, SensorSource, StatusSignal};
use crate::sensors::sample::{Channel, NUM_CHANNELS};
use crate::sensors::units::ACCEL_SENSITIVITY_LSB_PER_G_GPM2;

/// Sensor source returning fixed raw counts per channel.
#[derive(Debug)]
pub struct MockSensors {
    raw: [f32; NUM_CHANNELS],
    failing: [bool; NUM_CHANNELS],
    fail_every: [Option<usize>; NUM_CHANNELS],
    reads: [usize; NUM_CHANNELS],
    init_ok: bool,
    initialized: bool,
}

impl MockSensors {
    /// All channels read zero.
    pub fn new() -> Self {
        Self {
            raw: [0.0; NUM_CHANNELS],
            failing: [false; NUM_CHANNELS],
            fail_every: [None; NUM_CHANNELS],
            reads: [0; NUM_CHANNELS],
            init_ok: true,
            initialized: false,
        }
    }

    /// Level and still: 1 g on z at the +-2 g range, everything else zero.
    pub fn at_rest() -> Self {
        let mut sensors = Self::new();
        sensors.set_raw(Channel::AccelZ, ACCEL_SENSITIVITY_LSB_PER_G_GPM2);
        sensors
    }

    pub fn set_raw(&mut self, channel: Channel, raw: f32) {
        self.raw[channel.index()] = raw;
    }

    pub fn fail_channel(&mut self, channel: Channel) {
        self.failing[channel.index()] = true;
    }

    pub fn restore_channel(&mut self, channel: Channel) {
        self.failing[channel.index()] = false;
        self.fail_every[channel.index()] = None;
    }

    /// Fails every `n`th read of `channel`.
    pub fn fail_every(&mut self, channel: Channel, n: usize) {
        self.fail_every[channel.index()] = Some(n.max(1));
    }

    pub fn fail_init(&mut self) {
        self.init_ok = false;
    }

    pub fn reads(&self, channel: Channel) -> usize {
        self.reads[channel.index()]
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for MockSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for MockSensors {
    fn init_sensor(&mut self) -> bool {
        self.initialized = self.init_ok;
        self.init_ok
    }

    fn read_raw(&mut self, channel: Channel) -> Result<f32> {
        let i = channel.index();
        self.reads[i] += 1;
        if self.failing[i] {
            return Err(DeviceError::Unavailable);
        }
        if let Some(n) = self.fail_every[i] {
            if self.reads[i] % n == 0 {
                return Err(DeviceError::Bus);
            }
        }
        Ok(self.raw[i])
    }
}

/// Actuator that records the last command of each motor.
#[derive(Debug, Default)]
pub struct MockMotors {
    commands: MotorCommandSet,
    rejected: [bool; 4],
    writes: usize,
    init_fails: bool,
    initialized: bool,
}

impl MockMotors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> MotorCommandSet {
        self.commands
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn reject(&mut self, motor: Motor) {
        self.rejected[motor.index()] = true;
    }

    pub fn fail_init(&mut self) {
        self.init_fails = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ActuatorSink for MockMotors {
    fn init_motors(&mut self, start_speed: u8) -> bool {
        if self.init_fails {
            return false;
        }
        self.commands = MotorCommandSet::uniform(start_speed);
        self.initialized = true;
        true
    }

    fn set_motor(&mut self, motor: Motor, percent: u8) -> Result<()> {
        if !self.initialized || self.rejected[motor.index()] {
            return Err(DeviceError::Rejected);
        }
        self.writes += 1;
        match motor {
            Motor::M1 => self.commands.motor1 = percent,
            Motor::M2 => self.commands.motor2 = percent,
            Motor::M3 => self.commands.motor3 = percent,
            Motor::M4 => self.commands.motor4 = percent,
        }
        Ok(())
    }
}

/// Status output counting how often each LED was raised.
#[derive(Debug, Default)]
pub struct MockStatus {
    counts: [usize; 3],
    last: Option<LedSelector>,
}

impl MockStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, selector: LedSelector) -> usize {
        self.counts[selector as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn last(&self) -> Option<LedSelector> {
        self.last
    }
}

impl StatusSignal for MockStatus {
    fn error_led(&mut self, selector: LedSelector) {
        self.counts[selector as usize] += 1;
        self.last = Some(selector);
    }
}
