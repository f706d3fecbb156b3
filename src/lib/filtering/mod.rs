pub mod bank;
pub mod sma;

pub use bank::FilterBank;
pub use sma::SmaFilter;
