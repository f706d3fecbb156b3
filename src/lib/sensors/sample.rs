use core::fmt;

pub const NUM_CHANNELS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Physical quantity measured by a channel, selects the unit conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    Accel,
    Gyro,
    Mag,
    Elevation,
}

/// One of the ten sensor channels polled every cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    AccelX = 0,
    AccelY = 1,
    AccelZ = 2,
    GyroX = 3,
    GyroY = 4,
    GyroZ = 5,
    MagX = 6,
    MagY = 7,
    MagZ = 8,
    Elevation = 9,
}

impl Channel {
    pub const ALL: [Channel; NUM_CHANNELS] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
        Channel::MagX,
        Channel::MagY,
        Channel::MagZ,
        Channel::Elevation,
    ];

    // read on every update, at the main cadence
    pub const INERTIAL: [Channel; 6] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    pub const MAG: [Channel; 3] = [Channel::MagX, Channel::MagY, Channel::MagZ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn accel(axis: Axis) -> Channel {
        Channel::ALL[axis.index()]
    }

    pub fn gyro(axis: Axis) -> Channel {
        Channel::ALL[3 + axis.index()]
    }

    pub fn mag(axis: Axis) -> Channel {
        Channel::ALL[6 + axis.index()]
    }

    pub fn kind(self) -> ChannelKind {
        match self {
            Channel::AccelX | Channel::AccelY | Channel::AccelZ => ChannelKind::Accel,
            Channel::GyroX | Channel::GyroY | Channel::GyroZ => ChannelKind::Gyro,
            Channel::MagX | Channel::MagY | Channel::MagZ => ChannelKind::Mag,
            Channel::Elevation => ChannelKind::Elevation,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::AccelX => "accel x",
            Channel::AccelY => "accel y",
            Channel::AccelZ => "accel z",
            Channel::GyroX => "gyro x",
            Channel::GyroY => "gyro y",
            Channel::GyroZ => "gyro z",
            Channel::MagX => "mag x",
            Channel::MagY => "mag y",
            Channel::MagZ => "mag z",
            Channel::Elevation => "elevation",
        };
        f.write_str(name)
    }
}

/// One reading of every channel in SI units.
///
/// accel in m/s^2, gyro in deg/s, mag in uT, elevation in m
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorSample {
    pub accel: (f32, f32, f32), // (ax, ay, az)
    pub gyro: (f32, f32, f32),  // (wx, wy, wz)
    pub mag: (f32, f32, f32),   // (mx, my, mz)
    pub elevation: f32,
}

impl SensorSample {
    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::AccelX => self.accel.0,
            Channel::AccelY => self.accel.1,
            Channel::AccelZ => self.accel.2,
            Channel::GyroX => self.gyro.0,
            Channel::GyroY => self.gyro.1,
            Channel::GyroZ => self.gyro.2,
            Channel::MagX => self.mag.0,
            Channel::MagY => self.mag.1,
            Channel::MagZ => self.mag.2,
            Channel::Elevation => self.elevation,
        }
    }

    pub fn with(mut self, channel: Channel, value: f32) -> SensorSample {
        match channel {
            Channel::AccelX => self.accel.0 = value,
            Channel::AccelY => self.accel.1 = value,
            Channel::AccelZ => self.accel.2 = value,
            Channel::GyroX => self.gyro.0 = value,
            Channel::GyroY => self.gyro.1 = value,
            Channel::GyroZ => self.gyro.2 = value,
            Channel::MagX => self.mag.0 = value,
            Channel::MagY => self.mag.1 = value,
            Channel::MagZ => self.mag.2 = value,
            Channel::Elevation => self.elevation = value,
        }
        self
    }
}
