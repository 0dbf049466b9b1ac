//! Custom Axum extractors.

mod current_profile;
mod validated;

pub use current_profile::*;
pub use validated::*;
