//! Shared types: values, constants and the projection engine.

mod constants;
mod projection;
mod value;

pub use constants::*;
pub use projection::*;
pub use value::*;
