//! Fault taxonomy of the flight core.
//!
//! Nothing here is fatal. Each fault is reported through the status LEDs and
//! the control cycle carries on with a safe substitute value.

use core::fmt;

use crate::controller::mixer::Motor;
use crate::interfaces::LedSelector;
use crate::sensors::Channel;

/// Result type for collaborator calls
pub type Result<T> = core::result::Result<T, DeviceError>;

/// Failures reported by sensor and actuator collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Device not initialized or not responding
    Unavailable,
    /// Reading outside the device's representable range
    InvalidReading,
    /// Command refused by the driver
    Rejected,
    /// Bus transaction failed
    Bus,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Unavailable => write!(f, "device unavailable"),
            DeviceError::InvalidReading => write!(f, "invalid reading"),
            DeviceError::Rejected => write!(f, "command rejected"),
            DeviceError::Bus => write!(f, "bus error"),
        }
    }
}

/// Faults detected by the core while running the control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Offset capture failed, running with zero offsets
    Calibration,
    /// A channel had no valid reading this cycle, last value kept
    SensorRead(Channel),
    /// Zero elapsed time between updates, integration skipped
    Timing,
    /// Non-finite motor command replaced by the lower bound
    ActuationBound(Motor),
}

impl Fault {
    /// Status LED used to signal this fault.
    pub fn led(&self) -> LedSelector {
        match self {
            Fault::Calibration => LedSelector::Yellow,
            Fault::SensorRead(_) => LedSelector::Red,
            Fault::Timing => LedSelector::Yellow,
            Fault::ActuationBound(_) => LedSelector::Red,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Calibration => write!(f, "calibration failed, using zero offsets"),
            Fault::SensorRead(channel) => write!(f, "no valid {} reading", channel),
            Fault::Timing => write!(f, "zero elapsed time"),
            Fault::ActuationBound(motor) => write!(f, "invalid command for {}", motor),
        }
    }
}
