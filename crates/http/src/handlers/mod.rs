#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod dashboard;
pub mod exercises;
pub mod routines;
pub mod workouts;
