//! Domain model for the hospital network.
//!
//! Profiles carry the authorization-relevant fields consulted by the request
//! gate; master data covers the reference lists rendered on most pages.

pub mod master_data;
pub mod profile;
pub mod role;
pub mod status;

pub use master_data::*;
pub use profile::*;
pub use role::*;
pub use status::*;
