pub mod mixer;
pub mod pid_params;

pub use mixer::{Motor, MotorCommandSet, MotorMixer};
pub use pid_params::TuningParams;
