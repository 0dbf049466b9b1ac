//! # CareLink Security
//!
//! Identity resolution for the request gate. Tokens carry the profile
//! identity only; role, approval status and hospital link always come from
//! the authorization profile cache.

pub mod jwt;

pub use jwt::*;
