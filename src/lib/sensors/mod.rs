pub mod calibration;
pub mod sample;
pub mod units;

pub use calibration::{OffsetCalibrator, OffsetSet};
pub use sample::{Axis, Channel, ChannelKind, SensorSample};
pub use units::{to_si, AccelRange, GyroRange, ScaleFactors};
