use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};

/// One page of a list result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> PaginatedResult<T> {
    /// Slice an already-ordered full list.
    pub fn from_all(all: Vec<T>, offset: usize, limit: Option<usize>) -> Self {
        let limit = capped_limit(limit);
        let total = all.len();
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self { items, total, offset, limit }
    }
}

/// Apply the default and clamp to the DoS ceiling.
pub fn capped_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_QUERY_LIMIT).clamp(1, MAX_QUERY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_through_list() {
        let page = PaginatedResult::from_all((0..10).collect::<Vec<_>>(), 8, Some(5));
        assert_eq!(page.items, vec![8, 9]);
        assert_eq!(page.total, 10);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(capped_limit(None), DEFAULT_QUERY_LIMIT);
        assert_eq!(capped_limit(Some(usize::MAX)), MAX_QUERY_LIMIT);
        assert_eq!(capped_limit(Some(0)), 1);
    }
}
