//! # CareLink Server Library
//!
//! Dependency injection wiring and the serve/shutdown sequence of the
//! CareLink backend.

pub mod app;
pub mod di;
pub mod startup;
