//! Service layer for liftlog
//!
//! Centralizes business logic between the HTTP handlers and storage. Every
//! mutator applies one delta and returns the freshly reloaded aggregate.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]

pub mod error;
mod exercise_service;
mod routine_service;
mod stats_service;
mod workout_service;

#[cfg(test)]
mod tests;

pub use error::ServiceError;
pub use exercise_service::ExerciseService;
pub use routine_service::RoutineService;
pub use stats_service::StatsService;
pub use workout_service::WorkoutService;

pub type Result<T> = std::result::Result<T, ServiceError>;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
