// Board glue: the inertial sensors on I2C1 and the analog range finder.
// Accelerometer (0x19), rate gyro (0x69) and compass (0x1E) are read one
// axis at a time as signed 16-bit counts.

use osquad::interfaces::SensorSource;
use osquad::sensors::{Axis, Channel};
use osquad::DeviceError;
use stm32f4xx_hal::{
    adc::{config::SampleTime, Adc},
    gpio::{Analog, PA0, PB8, PB9},
    i2c::I2c,
    pac::{ADC1, I2C1},
    prelude::*,
};

const ACCEL_ADDRESS: u8 = 0x19;
const GYRO_ADDRESS: u8 = 0x69;
const MAG_ADDRESS: u8 = 0x1E;

// accelerometer
const CTRL_REG1_A: u8 = 0x20;
const CTRL_REG4_A: u8 = 0x23;
const OUT_X_L_A: u8 = 0x28;
const AUTO_INCREMENT: u8 = 0x80;

// gyro
const PWR_MGMT_1: u8 = 0x6B;
const CONFIG: u8 = 0x1A;
const GYRO_CONFIG: u8 = 0x1B;
const GYRO_XOUT_H: u8 = 0x43;
const GYRO_DLPF: u8 = 6;

// compass
const CRA_REG_M: u8 = 0x00;
const CRB_REG_M: u8 = 0x01;
const MR_REG_M: u8 = 0x02;
const OUT_X_H_M: u8 = 0x03;
const MAG_OVERFLOW: i16 = -4096;

pub struct Board {
    i2c: I2c<I2C1, (PB8, PB9)>,
    adc: Adc<ADC1>,
    range_pin: PA0<Analog>,
}

impl Board {
    pub fn new(i2c: I2c<I2C1, (PB8, PB9)>, adc: Adc<ADC1>, range_pin: PA0<Analog>) -> Self {
        Self {
            i2c,
            adc,
            range_pin,
        }
    }

    fn write_reg(&mut self, address: u8, reg: u8, value: u8) -> osquad::Result<()> {
        self.i2c
            .write(address, &[reg, value])
            .map_err(|_| DeviceError::Bus)
    }

    fn read_pair(&mut self, address: u8, reg: u8) -> osquad::Result<[u8; 2]> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(address, &[reg], &mut buf)
            .map_err(|_| DeviceError::Bus)?;
        Ok(buf)
    }

    fn configure(&mut self) -> osquad::Result<()> {
        // 100 Hz, all axes, +-2 g high resolution
        self.write_reg(ACCEL_ADDRESS, CTRL_REG1_A, 0x57)?;
        self.write_reg(ACCEL_ADDRESS, CTRL_REG4_A, 0x08)?;

        // wake first, then DLPF and +-250 dps
        self.write_reg(GYRO_ADDRESS, PWR_MGMT_1, 0x00)?;
        self.write_reg(GYRO_ADDRESS, CONFIG, GYRO_DLPF)?;
        self.write_reg(GYRO_ADDRESS, GYRO_CONFIG, 0x00)?;

        // 15 Hz, 1.3 gauss, continuous
        self.write_reg(MAG_ADDRESS, CRA_REG_M, 0x10)?;
        self.write_reg(MAG_ADDRESS, CRB_REG_M, 0x20)?;
        self.write_reg(MAG_ADDRESS, MR_REG_M, 0x00)
    }

    fn read_accel(&mut self, axis: Axis) -> osquad::Result<f32> {
        let reg = (OUT_X_L_A + 2 * axis.index() as u8) | AUTO_INCREMENT;
        let buf = self.read_pair(ACCEL_ADDRESS, reg)?;
        Ok(i16::from_le_bytes(buf) as f32)
    }

    fn read_gyro(&mut self, axis: Axis) -> osquad::Result<f32> {
        let buf = self.read_pair(GYRO_ADDRESS, GYRO_XOUT_H + 2 * axis.index() as u8)?;
        Ok(i16::from_be_bytes(buf) as f32)
    }

    fn read_mag(&mut self, axis: Axis) -> osquad::Result<f32> {
        // output registers are ordered x, z, y
        let slot = match axis {
            Axis::X => 0,
            Axis::Z => 1,
            Axis::Y => 2,
        };
        let value = i16::from_be_bytes(self.read_pair(MAG_ADDRESS, OUT_X_H_M + 2 * slot)?);
        if value == MAG_OVERFLOW {
            return Err(DeviceError::InvalidReading);
        }
        Ok(value as f32)
    }

    fn read_range(&mut self) -> osquad::Result<f32> {
        let counts: u16 = self.adc.convert(&self.range_pin, SampleTime::Cycles_480);
        // full scale means the input is floating
        if counts >= 0x0FFF {
            return Err(DeviceError::InvalidReading);
        }
        // 12 bit conversion scaled to the 10 bit counts the range factor expects
        Ok((counts >> 2) as f32)
    }
}

impl SensorSource for Board {
    fn init_sensor(&mut self) -> bool {
        self.configure().is_ok()
    }

    fn read_raw(&mut self, channel: Channel) -> osquad::Result<f32> {
        match channel {
            Channel::AccelX => self.read_accel(Axis::X),
            Channel::AccelY => self.read_accel(Axis::Y),
            Channel::AccelZ => self.read_accel(Axis::Z),
            Channel::GyroX => self.read_gyro(Axis::X),
            Channel::GyroY => self.read_gyro(Axis::Y),
            Channel::GyroZ => self.read_gyro(Axis::Z),
            Channel::MagX => self.read_mag(Axis::X),
            Channel::MagY => self.read_mag(Axis::Y),
            Channel::MagZ => self.read_mag(Axis::Z),
            Channel::Elevation => self.read_range(),
        }
    }
}
