//! Storage backend trait abstraction
//!
//! Async domain traits implemented by every backend. Structural workout
//! writes are single deltas: each one checks, atomically with the write,
//! that the parent exists and that the workout is still open.

pub mod exercise;
pub mod routine;
pub mod workout;

pub use exercise::ExerciseStore;
pub use routine::RoutineStore;
pub use workout::WorkoutStore;
