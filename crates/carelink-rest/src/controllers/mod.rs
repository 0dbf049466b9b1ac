//! REST API controllers.

pub mod health_controller;
pub mod master_data_controller;
pub mod me_controller;
pub mod profile_controller;
