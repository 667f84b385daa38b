//! In-process adapters for running without PostgreSQL.
//!
//! Used when no database URL is configured and by the integration tests.
//! State lives behind a `tokio::sync::RwLock` and is lost on restart.

mod memory_trip_repository;
mod memory_user_repository;

pub use memory_trip_repository::MemoryTripRepository;
pub use memory_user_repository::MemoryUserRepository;
