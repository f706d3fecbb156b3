use osquad::config::MOTOR_MIN;

pub const SYSCLK_HZ: u32 = 48_000_000;
pub const SERIAL_BAUD: u32 = 115_200;
pub const I2C_FREQ_KHZ: u32 = 100;

pub const MICROS_PER_TICK: u64 = 1_000;

// ESCs need the idle pulse for a while before they accept throttle
pub const ARMING_DELAY_MS: u64 = 2_000;
pub const START_SPEED: u8 = MOTOR_MIN;

pub const CONTROL_PERIOD_MS: u64 = 10;
pub const TELEMETRY_PERIOD_MS: u64 = 500;

pub const ESC_FREQ_HZ: u32 = 50;
