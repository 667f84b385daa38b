//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations backed by PostgreSQL via Diesel with async
//! support through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic capacity**: seat reservation is one guarded `UPDATE`.
//! - **Strongly typed errors**: database failures map to the port's
//!   persistence error.
//!
//! # Example
//!
//! ```ignore
//! use travel_backend::outbound::persistence::{
//!     DbPool, DieselTripRepository, PoolConfig, run_migrations,
//! };
//!
//! let config = PoolConfig::new("postgres://localhost/travel");
//! run_migrations(config.database_url()).await?;
//! let pool = DbPool::new(config).await?;
//! let trips = DieselTripRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_trip_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
