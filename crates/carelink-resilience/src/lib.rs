//! # CareLink Resilience
//!
//! Resilience patterns for the CareLink hospital network.
//! Provides bounded retry with exponential backoff and deadline races that
//! honour a shutdown cancellation token.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
