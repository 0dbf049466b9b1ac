//! # CareLink Config
//!
//! Configuration management for the CareLink hospital network.
//! Supports layered configuration from files and environment variables,
//! validated up front, with runtime reload.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
