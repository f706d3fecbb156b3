// Raw counts to SI units.
// Sensitivities follow the 16-bit full-scale encoding of the accel and gyro.

use crate::config;
use crate::sensors::sample::ChannelKind;

pub const ACCEL_SENSITIVITY_LSB_PER_G_GPM2: f32 = 16_384.0;
pub const ACCEL_SENSITIVITY_LSB_PER_G_GPM4: f32 = 8_192.0;
pub const ACCEL_SENSITIVITY_LSB_PER_G_GPM8: f32 = 4_096.0;
pub const ACCEL_SENSITIVITY_LSB_PER_G_GPM16: f32 = 2_048.0;

pub const GYRO_SENSITIVITY_LSB_PER_DPS_250: f32 = 131.0;
pub const GYRO_SENSITIVITY_LSB_PER_DPS_500: f32 = 65.5;
pub const GYRO_SENSITIVITY_LSB_PER_DPS_1000: f32 = 32.8;
pub const GYRO_SENSITIVITY_LSB_PER_DPS_2000: f32 = 16.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    Gpm2,
    Gpm4,
    Gpm8,
    Gpm16,
}

impl AccelRange {
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            AccelRange::Gpm2 => ACCEL_SENSITIVITY_LSB_PER_G_GPM2,
            AccelRange::Gpm4 => ACCEL_SENSITIVITY_LSB_PER_G_GPM4,
            AccelRange::Gpm8 => ACCEL_SENSITIVITY_LSB_PER_G_GPM8,
            AccelRange::Gpm16 => ACCEL_SENSITIVITY_LSB_PER_G_GPM16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            GyroRange::Dps250 => GYRO_SENSITIVITY_LSB_PER_DPS_250,
            GyroRange::Dps500 => GYRO_SENSITIVITY_LSB_PER_DPS_500,
            GyroRange::Dps1000 => GYRO_SENSITIVITY_LSB_PER_DPS_1000,
            GyroRange::Dps2000 => GYRO_SENSITIVITY_LSB_PER_DPS_2000,
        }
    }
}

/// Per-kind multipliers from raw counts to SI units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub accel: f32,     // m/s^2 per LSB
    pub gyro: f32,      // deg/s per LSB
    pub mag: f32,       // uT per LSB
    pub elevation: f32, // m per LSB
}

impl ScaleFactors {
    /// Factors for the board as configured in [`config`].
    pub fn board() -> ScaleFactors {
        ScaleFactors::new(config::ACCEL_RANGE, config::GYRO_RANGE)
    }

    pub fn new(accel: AccelRange, gyro: GyroRange) -> ScaleFactors {
        ScaleFactors {
            accel: config::STANDARD_GRAVITY / accel.lsb_per_g(),
            gyro: 1.0 / gyro.lsb_per_dps(),
            mag: config::MAG_UT_PER_LSB,
            elevation: config::ELEVATION_M_PER_LSB,
        }
    }

    pub fn to_si(&self, raw: f32, kind: ChannelKind) -> f32 {
        match kind {
            ChannelKind::Accel => raw * self.accel,
            ChannelKind::Gyro => raw * self.gyro,
            ChannelKind::Mag => raw * self.mag,
            ChannelKind::Elevation => raw * self.elevation,
        }
    }
}

impl Default for ScaleFactors {
    fn default() -> ScaleFactors {
        ScaleFactors::board()
    }
}

/// Converts a raw reading with the board scale factors.
pub fn to_si(raw: f32, kind: ChannelKind) -> f32 {
    ScaleFactors::board().to_si(raw, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        libm::fabsf(a - b) < 1e-4
    }

    #[test]
    fn one_g_of_counts_is_standard_gravity() {
        let factors = ScaleFactors::new(AccelRange::Gpm2, GyroRange::Dps250);
        assert!(close(
            factors.to_si(16_384.0, ChannelKind::Accel),
            config::STANDARD_GRAVITY
        ));
        let factors = ScaleFactors::new(AccelRange::Gpm8, GyroRange::Dps250);
        assert!(close(
            factors.to_si(-4_096.0, ChannelKind::Accel),
            -config::STANDARD_GRAVITY
        ));
    }

    #[test]
    fn gyro_counts_follow_full_scale_range() {
        let narrow = ScaleFactors::new(AccelRange::Gpm2, GyroRange::Dps250);
        let wide = ScaleFactors::new(AccelRange::Gpm2, GyroRange::Dps2000);
        assert!(close(narrow.to_si(131.0, ChannelKind::Gyro), 1.0));
        assert!(close(wide.to_si(164.0, ChannelKind::Gyro), 10.0));
    }

    #[test]
    fn board_conversion_matches_config() {
        assert!(close(
            to_si(100.0, ChannelKind::Mag),
            100.0 * config::MAG_UT_PER_LSB
        ));
        assert!(close(
            to_si(200.0, ChannelKind::Elevation),
            200.0 * config::ELEVATION_M_PER_LSB
        ));
        assert_eq!(to_si(0.0, ChannelKind::Gyro), 0.0);
    }
}
