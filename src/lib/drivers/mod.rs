pub mod esc;
pub mod status;

pub use esc::{Esc, QuadEsc};
pub use status::StatusLeds;
