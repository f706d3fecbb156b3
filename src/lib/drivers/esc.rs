// Servo-style ESC outputs.
// Commands are written like a hobby servo angle: 0..=180 maps onto a
// 544..=2400 us pulse in a 20 ms frame.

use embedded_hal::PwmPin;

use crate::controller::mixer::Motor;
use crate::error::{DeviceError, Result};
use crate::interfaces::ActuatorSink;

pub const SERVO_PERIOD_US: u32 = 20_000;
pub const MIN_PULSE_US: u32 = 544;
pub const MAX_PULSE_US: u32 = 2_400;
pub const MAX_COMMAND: u8 = 180;

pub fn command_to_pulse_us(command: u8) -> u32 {
    let command = command.min(MAX_COMMAND) as u32;
    MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * command / MAX_COMMAND as u32
}

pub fn pulse_to_duty(pulse_us: u32, max_duty: u16) -> u16 {
    let pulse_us = pulse_us.min(SERVO_PERIOD_US) as u64;
    (pulse_us * max_duty as u64 / SERVO_PERIOD_US as u64) as u16
}

pub struct Esc<P> {
    pwm: P,
}

impl<P> Esc<P>
where
    P: PwmPin<Duty = u16>,
{
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn start(&mut self) {
        self.pwm.enable();
    }

    /// Rejects commands past the servo range instead of wrapping them.
    pub fn write(&mut self, command: u8) -> Result<()> {
        if command > MAX_COMMAND {
            return Err(DeviceError::Rejected);
        }
        let duty = pulse_to_duty(command_to_pulse_us(command), self.pwm.get_max_duty());
        self.pwm.set_duty(duty);
        Ok(())
    }

    pub fn get_duty(&self) -> u16 {
        self.pwm.get_duty()
    }
}

/// Four ESCs driven as one actuator.
pub struct QuadEsc<P1, P2, P3, P4> {
    motor1: Esc<P1>,
    motor2: Esc<P2>,
    motor3: Esc<P3>,
    motor4: Esc<P4>,
    started: bool,
}

impl<P1, P2, P3, P4> QuadEsc<P1, P2, P3, P4>
where
    P1: PwmPin<Duty = u16>,
    P2: PwmPin<Duty = u16>,
    P3: PwmPin<Duty = u16>,
    P4: PwmPin<Duty = u16>,
{
    pub fn new(motor1: P1, motor2: P2, motor3: P3, motor4: P4) -> Self {
        Self {
            motor1: Esc::new(motor1),
            motor2: Esc::new(motor2),
            motor3: Esc::new(motor3),
            motor4: Esc::new(motor4),
            started: false,
        }
    }

    pub fn duties(&self) -> (u16, u16, u16, u16) {
        (
            self.motor1.get_duty(),
            self.motor2.get_duty(),
            self.motor3.get_duty(),
            self.motor4.get_duty(),
        )
    }
}

impl<P1, P2, P3, P4> ActuatorSink for QuadEsc<P1, P2, P3, P4>
where
    P1: PwmPin<Duty = u16>,
    P2: PwmPin<Duty = u16>,
    P3: PwmPin<Duty = u16>,
    P4: PwmPin<Duty = u16>,
{
    fn init_motors(&mut self, start_speed: u8) -> bool {
        self.motor1.start();
        self.motor2.start();
        self.motor3.start();
        self.motor4.start();
        self.started = true;
        Motor::ALL
            .iter()
            .all(|motor| self.set_motor(*motor, start_speed).is_ok())
    }

    fn set_motor(&mut self, motor: Motor, percent: u8) -> Result<()> {
        if !self.started {
            return Err(DeviceError::Unavailable);
        }
        match motor {
            Motor::M1 => self.motor1.write(percent),
            Motor::M2 => self.motor2.write(percent),
            Motor::M3 => self.motor3.write(percent),
            Motor::M4 => self.motor4.write(percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePwm {
        duty: u16,
        max_duty: u16,
        enabled: bool,
    }

    impl FakePwm {
        fn new(max_duty: u16) -> Self {
            Self {
                duty: 0,
                max_duty,
                enabled: false,
            }
        }
    }

    impl PwmPin for FakePwm {
        type Duty = u16;
        fn disable(&mut self) {
            self.enabled = false;
        }
        fn enable(&mut self) {
            self.enabled = true;
        }
        fn get_duty(&self) -> u16 {
            self.duty
        }
        fn get_max_duty(&self) -> u16 {
            self.max_duty
        }
        fn set_duty(&mut self, duty: u16) {
            self.duty = duty;
        }
    }

    #[test]
    fn pulse_spans_servo_range() {
        assert_eq!(command_to_pulse_us(0), MIN_PULSE_US);
        assert_eq!(command_to_pulse_us(90), 1_472);
        assert_eq!(command_to_pulse_us(180), MAX_PULSE_US);
        assert_eq!(command_to_pulse_us(255), MAX_PULSE_US);
    }

    #[test]
    fn duty_is_pulse_share_of_frame() {
        assert_eq!(pulse_to_duty(2_000, 20_000), 2_000);
        assert_eq!(pulse_to_duty(1_000, 40_000), 2_000);
        assert_eq!(pulse_to_duty(50_000, 100), 100);
    }

    #[test]
    fn esc_rejects_commands_past_range() {
        let mut esc = Esc::new(FakePwm::new(20_000));
        assert_eq!(esc.write(181), Err(DeviceError::Rejected));
        assert_eq!(esc.get_duty(), 0);
        esc.write(180).unwrap();
        assert_eq!(esc.get_duty(), 2_400);
    }

    #[test]
    fn quad_esc_needs_init_before_commands() {
        let mut escs = QuadEsc::new(
            FakePwm::new(20_000),
            FakePwm::new(20_000),
            FakePwm::new(20_000),
            FakePwm::new(20_000),
        );
        assert_eq!(escs.set_motor(Motor::M1, 60), Err(DeviceError::Unavailable));
        assert!(escs.init_motors(50));
        let idle = pulse_to_duty(command_to_pulse_us(50), 20_000);
        assert_eq!(escs.duties(), (idle, idle, idle, idle));

        escs.set_motor(Motor::M3, 105).unwrap();
        assert_eq!(escs.duties().2, pulse_to_duty(command_to_pulse_us(105), 20_000));
        assert_eq!(escs.duties().0, idle);
    }
}
