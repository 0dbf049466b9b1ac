//! Postgres implementations backed by SQLx.

mod master_data_repository;
mod profile_repository;

pub use master_data_repository::PgMasterDataRepository;
pub use profile_repository::PgProfileRepository;
