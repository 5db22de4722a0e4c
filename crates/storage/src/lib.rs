//! Storage layer for liftlog
//!
//! PostgreSQL persistence for routines and workouts, with an in-memory
//! backend behind the same store traits.

mod backend;
pub mod error;
mod memory;
mod pg_migrations;
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::{DuplicateKey, StorageError};
pub use memory::MemoryStorage;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
pub use traits::{ExerciseStore, RoutineStore, WorkoutStore};
