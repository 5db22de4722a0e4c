//! Sibling ordering rules shared by routines and workouts.
//!
//! `order` values are unique among siblings but need not be dense; removing a
//! child never renumbers the rest.

use crate::error::{DomainError, Result};

/// Default position for a new child: the current child count, or one past the
/// highest used value when the count is already taken.
pub fn default_order(existing: &[u32]) -> u32 {
    let count = u32::try_from(existing.len()).unwrap_or(u32::MAX);
    if existing.contains(&count) {
        existing.iter().max().map_or(count, |max| max.saturating_add(1))
    } else {
        count
    }
}

/// Reject an explicit order already held by a sibling.
pub fn ensure_order_free(existing: &[u32], order: u32) -> Result<()> {
    if existing.contains(&order) {
        return Err(DomainError::validation(
            "order",
            format!("position {order} is already taken"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_is_count_when_free() {
        assert_eq!(default_order(&[]), 0);
        assert_eq!(default_order(&[0, 1]), 2);
        assert_eq!(default_order(&[1, 5]), 2);
    }

    #[test]
    fn test_default_order_skips_past_max_after_removal() {
        // 0,1,2 with 0 removed: count is 2, which is taken.
        assert_eq!(default_order(&[1, 2]), 3);
    }

    #[test]
    fn test_explicit_collision_is_validation_error() {
        let err = ensure_order_free(&[0, 3], 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "order", .. }));
        assert!(ensure_order_free(&[0, 3], 2).is_ok());
    }
}
