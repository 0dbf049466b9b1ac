//! # CareLink REST
//!
//! HTTP surface of the CareLink backend, built on Axum.
//!
//! Every request passes the request gate ([`middleware::gate_middleware`])
//! which resolves the caller's authorization profile through the profile
//! cache and applies the route policy in [`policy`] before any handler runs.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod policy;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
