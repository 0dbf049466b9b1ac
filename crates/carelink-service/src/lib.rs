//! # CareLink Service
//!
//! The caching layer and the server actions built on it.
//!
//! - [`ProfileCache`]: per-identity role, approval status and hospital link,
//!   read on every gated request.
//! - [`MasterDataCache`]: locations, services and specialties.
//! - [`ProfileAdminService`] / [`MasterDataService`]: row mutations that
//!   invalidate the affected cache entries before returning.
//!
//! Cache writes run in the background under a [`TaskSupervisor`] so that
//! shutdown can cancel pending reads and drain pending writes.

pub mod background;
pub mod cache;
pub mod dto;
pub mod master_data_cache;
pub mod master_data_service;
pub mod profile_admin_service;
pub mod profile_cache;

#[cfg(test)]
mod test_support;

pub use background::*;
pub use cache::*;
pub use dto::*;
pub use master_data_cache::*;
pub use master_data_service::*;
pub use profile_admin_service::*;
pub use profile_cache::*;
