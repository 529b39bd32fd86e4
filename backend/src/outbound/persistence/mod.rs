//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types; no business logic lives here. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) stay internal to this module. Connections
//! come from a `bb8` pool with native async support via `diesel-async`, and
//! every database error is mapped to the owning port's error enum.

mod diesel_digital_coin_repository;
mod diesel_signup_repository;
mod diesel_user_export_repository;
mod models;
mod pool;
mod schema;

pub use diesel_digital_coin_repository::DieselDigitalCoinRepository;
pub use diesel_signup_repository::DieselSignupRepository;
pub use diesel_user_export_repository::DieselUserExportRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
