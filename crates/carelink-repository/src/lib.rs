//! # CareLink Repository
//!
//! Data access for the relational store behind the caches:
//!
//! ```text
//! ProfileCache / MasterDataCache / admin services
//!   ↓  Arc<dyn ProfileRepository>, Arc<dyn MasterDataRepository>
//! PgProfileRepository, PgMasterDataRepository   (Postgres / SQLx)
//! InMemory*Repository                           (tests, local runs)
//! ```
//!
//! Tables: `profiles`, `locations`, `services_list`, `specialties_list`.
//! Migrations live in the workspace `migrations/` directory.

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
