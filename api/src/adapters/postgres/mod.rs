//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod sequence_repo;

pub use sequence_repo::PostgresSequenceRepository;
