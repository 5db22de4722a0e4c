//! Field-level validation rules enforced by the authoritative holder.

use crate::constants::{MAX_COUNT_VALUE, MAX_NAME_LEN, RPE_MAX, RPE_MIN};
use crate::error::{DomainError, Result};

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

/// Convert a request counter to its stored width, rejecting anything below
/// `min` or above [`MAX_COUNT_VALUE`] as a field error.
fn counter(field: &'static str, value: i64, min: i64) -> Result<u32> {
    if value < min {
        let message =
            if min == 0 { "must not be negative".to_owned() } else { format!("must be at least {min}") };
        return Err(DomainError::validation(field, message));
    }
    if value > MAX_COUNT_VALUE {
        return Err(DomainError::validation(field, format!("must be at most {MAX_COUNT_VALUE}")));
    }
    u32::try_from(value).map_err(|_| DomainError::validation(field, "is out of range"))
}

/// Reps are required and must be at least 1.
pub fn validate_reps(reps: Option<i64>) -> Result<u32> {
    match reps {
        None => Err(DomainError::validation("reps", "is required")),
        Some(r) => counter("reps", r, 1),
    }
}

pub fn validate_weight(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() => Err(DomainError::validation("weight", "must be a finite number")),
        Some(w) if w < 0.0 => Err(DomainError::validation("weight", "must not be negative")),
        _ => Ok(()),
    }
}

pub fn validate_rpe(rpe: Option<i64>) -> Result<Option<u8>> {
    let Some(r) = rpe else {
        return Ok(None);
    };
    if !(i64::from(RPE_MIN)..=i64::from(RPE_MAX)).contains(&r) {
        return Err(DomainError::validation(
            "rpe",
            format!("must be between {RPE_MIN} and {RPE_MAX}"),
        ));
    }
    u8::try_from(r).map(Some).map_err(|_| DomainError::validation("rpe", "is out of range"))
}

pub fn validate_set_number(set_number: Option<i64>) -> Result<Option<u32>> {
    set_number.map(|n| counter("set_number", n, 1)).transpose()
}

/// Sibling position; zero-based.
pub fn validate_order(order: Option<i64>) -> Result<Option<u32>> {
    order.map(|o| counter("order", o, 0)).transpose()
}

/// Prescription targets (`target_sets`, `target_reps`) must be at least 1.
pub fn validate_target(field: &'static str, value: i64) -> Result<u32> {
    counter(field, value, 1)
}
