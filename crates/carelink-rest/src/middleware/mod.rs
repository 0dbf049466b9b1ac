//! HTTP middleware.

mod gate;
mod logging;

pub use gate::*;
pub use logging::*;
