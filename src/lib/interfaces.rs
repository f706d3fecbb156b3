//! Capabilities the flight core needs from the hardware.
//!
//! Board code implements these over its drivers. Tests and simulations use
//! the synthetic implementations in `mock`.

use crate::controller::mixer::Motor;
use crate::error::Result;
use crate::sensors::Channel;

/// Source of raw accel, gyro, magnetometer and elevation readings.
pub trait SensorSource {
    /// Brings the sensors up, true on success.
    fn init_sensor(&mut self) -> bool;

    /// Latest raw reading of `channel` in device counts.
    ///
    /// An `Err` leaves the previously filtered value in place.
    fn read_raw(&mut self, channel: Channel) -> Result<f32>;
}

/// Sink for the four motor commands.
pub trait ActuatorSink {
    /// Arms the motor outputs and drives all four to `start_speed`.
    fn init_motors(&mut self, start_speed: u8) -> bool;

    /// Sets one motor to a percent-style command. Drivers must reject or
    /// clamp values they cannot represent.
    fn set_motor(&mut self, motor: Motor, percent: u8) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedSelector {
    Green,
    Red,
    Yellow,
}

/// Visual status output for non-fatal faults.
pub trait StatusSignal {
    fn error_led(&mut self, selector: LedSelector);
}
