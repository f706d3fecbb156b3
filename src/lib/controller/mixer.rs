use core::fmt;
use core::ops::Mul;

use libm::roundf;

use crate::config::MixerConfig;
use crate::error::DeviceError;
use crate::interfaces::ActuatorSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motor {
    M1 = 0,
    M2 = 1,
    M3 = 2,
    M4 = 3,
}

impl Motor {
    pub const ALL: [Motor; 4] = [Motor::M1, Motor::M2, Motor::M3, Motor::M4];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "motor {}", self.index() + 1)
    }
}

/// How a motor responds to one of the two control corrections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Negative = -1,
    Neutral = 0,
    Positive = 1,
}
impl Mul<f32> for Sign {
    type Output = f32;
    fn mul(self, rhs: f32) -> Self::Output {
        match self {
            // a motor off this axis ignores the correction, even a non-finite one
            Sign::Neutral => 0.0,
            _ => self as i32 as f32 * rhs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotorMix {
    pub a: Sign,
    pub b: Sign,
}

/// Sign of each correction per motor. Depends on how the frame is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MixerGeometry {
    pub motor1: MotorMix,
    pub motor2: MotorMix,
    pub motor3: MotorMix,
    pub motor4: MotorMix,
}

impl MixerGeometry {
    /// Motors on the arms: 1 and 2 opposite on the `a` axis, 3 and 4 on `b`.
    pub const PLUS: MixerGeometry = MixerGeometry {
        motor1: MotorMix { a: Sign::Positive, b: Sign::Neutral },
        motor2: MotorMix { a: Sign::Negative, b: Sign::Neutral },
        motor3: MotorMix { a: Sign::Neutral, b: Sign::Positive },
        motor4: MotorMix { a: Sign::Neutral, b: Sign::Negative },
    };

    /// Motors between the arms, each corrects both axes.
    pub const X: MixerGeometry = MixerGeometry {
        motor1: MotorMix { a: Sign::Positive, b: Sign::Positive },
        motor2: MotorMix { a: Sign::Negative, b: Sign::Positive },
        motor3: MotorMix { a: Sign::Negative, b: Sign::Negative },
        motor4: MotorMix { a: Sign::Positive, b: Sign::Negative },
    };

    pub fn mix(&self, motor: Motor) -> MotorMix {
        match motor {
            Motor::M1 => self.motor1,
            Motor::M2 => self.motor2,
            Motor::M3 => self.motor3,
            Motor::M4 => self.motor4,
        }
    }
}

/// Percent-style command for each motor, always within the configured band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommandSet {
    pub motor1: u8,
    pub motor2: u8,
    pub motor3: u8,
    pub motor4: u8,
}
impl MotorCommandSet {
    pub fn uniform(value: u8) -> MotorCommandSet {
        MotorCommandSet {
            motor1: value,
            motor2: value,
            motor3: value,
            motor4: value,
        }
    }

    pub fn get(&self, motor: Motor) -> u8 {
        match motor {
            Motor::M1 => self.motor1,
            Motor::M2 => self.motor2,
            Motor::M3 => self.motor3,
            Motor::M4 => self.motor4,
        }
    }
}
impl IntoIterator for MotorCommandSet {
    type Item = u8;
    type IntoIter = core::array::IntoIter<u8, 4>;
    fn into_iter(self) -> Self::IntoIter {
        [self.motor1, self.motor2, self.motor3, self.motor4].into_iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmState {
    Uninitialized,
    Armed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixerError {
    /// `init_motors` has not succeeded yet
    NotArmed,
    /// The actuator refused a command, the other motors were still written
    Actuator(Motor, DeviceError),
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::NotArmed => write!(f, "motors not armed"),
            MixerError::Actuator(motor, e) => write!(f, "{}: {}", motor, e),
        }
    }
}

/// Turns two control corrections into four clamped motor commands.
pub struct MotorMixer {
    min: u8,
    max: u8,
    geometry: MixerGeometry,
    operating_point: u8,
    state: ArmState,
    last: MotorCommandSet,
}

impl MotorMixer {
    pub fn new(config: MixerConfig) -> MotorMixer {
        let (min, max) = if config.min <= config.max {
            (config.min, config.max)
        } else {
            (config.max, config.min)
        };
        MotorMixer {
            min,
            max,
            geometry: config.geometry,
            operating_point: min,
            state: ArmState::Uninitialized,
            last: MotorCommandSet::uniform(min),
        }
    }

    pub fn state(&self) -> ArmState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == ArmState::Armed
    }

    /// Hover base every motor receives before corrections.
    pub fn operating_point(&self) -> u8 {
        self.operating_point
    }

    /// Last command set handed to the actuator.
    pub fn last_commands(&self) -> MotorCommandSet {
        self.last
    }

    /// Arms the motors, driving all four to `start_speed` (clamped to the band).
    ///
    /// The idle value becomes the operating point. Returns false and stays
    /// uninitialized if the actuator does not come up.
    pub fn init_motors<A: ActuatorSink>(&mut self, sink: &mut A, start_speed: u8) -> bool {
        let idle = self.limit(start_speed as f32);
        if !sink.init_motors(idle) {
            return false;
        }
        for motor in Motor::ALL {
            if sink.set_motor(motor, idle).is_err() {
                return false;
            }
        }
        self.operating_point = idle;
        self.last = MotorCommandSet::uniform(idle);
        self.state = ArmState::Armed;
        true
    }

    /// Mixes the corrections onto the operating point and clamps each result.
    ///
    /// A non-finite mix becomes the lower bound.
    pub fn compute_commands(&self, pid_output_a: f32, pid_output_b: f32) -> MotorCommandSet {
        let command = |motor: Motor| self.limit(self.mixed_value(motor, pid_output_a, pid_output_b));
        MotorCommandSet {
            motor1: command(Motor::M1),
            motor2: command(Motor::M2),
            motor3: command(Motor::M3),
            motor4: command(Motor::M4),
        }
    }

    /// Unclamped mix for one motor, may be out of band or non-finite.
    pub fn mixed_value(&self, motor: Motor, pid_output_a: f32, pid_output_b: f32) -> f32 {
        let mix = self.geometry.mix(motor);
        self.operating_point as f32 + mix.a * pid_output_a + mix.b * pid_output_b
    }

    /// Computes and writes the commands for this cycle.
    pub fn update_motors<A: ActuatorSink>(
        &mut self,
        sink: &mut A,
        pid_output_a: f32,
        pid_output_b: f32,
    ) -> Result<MotorCommandSet, MixerError> {
        if !self.is_armed() {
            return Err(MixerError::NotArmed);
        }
        let commands = self.compute_commands(pid_output_a, pid_output_b);
        let mut result = Ok(commands);
        for motor in Motor::ALL {
            if let Err(e) = sink.set_motor(motor, commands.get(motor)) {
                result = Err(MixerError::Actuator(motor, e));
            }
        }
        self.last = commands;
        result
    }

    pub fn raise_operating_point(&mut self, step: u8) -> u8 {
        self.operating_point = self.limit(self.operating_point as f32 + step as f32);
        self.operating_point
    }

    pub fn lower_operating_point(&mut self, step: u8) -> u8 {
        self.operating_point = self.limit(self.operating_point as f32 - step as f32);
        self.operating_point
    }

    /// Clamps to `[min, max]`, mapping NaN and infinities to `min`.
    pub fn limit(&self, value: f32) -> u8 {
        if !value.is_finite() {
            return self.min;
        }
        roundf(value).clamp(self.min as f32, self.max as f32) as u8
    }
}

impl Default for MotorMixer {
    fn default() -> Self {
        MotorMixer::new(MixerConfig::default())
    }
}
