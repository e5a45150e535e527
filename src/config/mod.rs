//! Configuration: environment-driven settings plus shared constants
//! (defaults, hashing cost, lifecycle messages, validation tables).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
