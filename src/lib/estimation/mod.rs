pub mod attitude;

pub use attitude::{leveling, AttitudeEstimator, AttitudeState};
