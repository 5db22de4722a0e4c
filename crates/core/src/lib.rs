//! Core types for liftlog
//!
//! Domain aggregates (routines, workouts, logged sets), their validation and
//! lifecycle rules, and the single derived-metrics computation shared by
//! every read path.

mod constants;
mod env_config;
mod error;
mod exercise;
mod json_utils;
mod lifecycle;
mod metrics;
mod ordering;
mod pagination;
mod routine;
mod stats;
mod validation;
mod workout;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use exercise::*;
pub use json_utils::*;
pub use lifecycle::*;
pub use metrics::*;
pub use ordering::*;
pub use pagination::*;
pub use routine::*;
pub use stats::*;
pub use validation::*;
pub use workout::*;
