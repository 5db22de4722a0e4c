//! HTTP client for the liftlog API.
//!
//! [`LiftlogClient`] mirrors every server operation one call per request,
//! with a fixed timeout and no retries. [`WorkoutHandle`] keeps one workout
//! aggregate in sync by replacing it wholesale with each mutation result.

#![allow(clippy::missing_errors_doc, reason = "Every call can fail with ClientError")]

mod client;
mod error;
mod handle;

#[cfg(test)]
mod handle_tests;

pub use client::{DEFAULT_TIMEOUT_SECS, LiftlogClient, ServerVersion};
pub use error::ClientError;
pub use handle::WorkoutHandle;
