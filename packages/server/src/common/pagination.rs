//! Page/limit pagination types shared by the per-type listing endpoints and
//! the catalog federator.
//!
//! # Usage
//!
//! ```rust,ignore
//! let args = PageArgs { page: Some(2), limit: Some(10) }.validate();
//! let docs = store.find_page(filter, &args).await?;
//! let (items, has_more) = trim_results(docs, args.limit);
//! ```

use serde::Deserialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw pagination input as it arrives in query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageArgs {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Requested page size.
    pub limit: Option<i64>,
}

impl PageArgs {
    /// Normalize pagination input: pages start at 1, the page size is
    /// clamped to `1..=MAX_PAGE_SIZE` with `DEFAULT_PAGE_SIZE` as fallback.
    pub fn validate(&self) -> ValidatedPageArgs {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        ValidatedPageArgs { page, limit }
    }
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPageArgs {
    /// 1-based page number.
    pub page: i64,
    /// Number of items to fetch (1..=MAX_PAGE_SIZE).
    pub limit: i64,
}

impl ValidatedPageArgs {
    /// Number of documents to skip for this page.
    pub fn skip(&self) -> u64 {
        ((self.page - 1) * self.limit) as u64
    }

    /// Store-level fetch limit (limit + 1 to detect has_more).
    pub fn fetch_limit(&self) -> i64 {
        self.limit + 1
    }
}

/// Trim results to the requested limit and determine if there are more.
///
/// Store queries fetch `limit + 1` items. This trims to the actual limit
/// and returns whether there were more items beyond the page.
pub fn trim_results<T>(results: Vec<T>, limit: i64) -> (Vec<T>, bool) {
    let has_more = results.len() > limit as usize;
    let results = if has_more {
        results.into_iter().take(limit as usize).collect()
    } else {
        results
    };
    (results, has_more)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let args = PageArgs::default().validate();
        assert_eq!(args.page, 1);
        assert_eq!(args.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_validate_clamps_limit() {
        let args = PageArgs {
            page: Some(3),
            limit: Some(500),
        }
        .validate();
        assert_eq!(args.limit, MAX_PAGE_SIZE);

        let args = PageArgs {
            page: Some(1),
            limit: Some(0),
        }
        .validate();
        assert_eq!(args.limit, 1);
    }

    #[test]
    fn test_validate_clamps_page() {
        let args = PageArgs {
            page: Some(-4),
            limit: None,
        }
        .validate();
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_skip_and_fetch_limit() {
        let args = PageArgs {
            page: Some(3),
            limit: Some(10),
        }
        .validate();
        assert_eq!(args.skip(), 20);
        assert_eq!(args.fetch_limit(), 11);
    }

    #[test]
    fn test_trim_results() {
        let items: Vec<i32> = (1..=12).collect();
        let (trimmed, has_more) = trim_results(items, 10);
        assert_eq!(trimmed.len(), 10);
        assert!(has_more);

        let items: Vec<i32> = (1..=5).collect();
        let (trimmed, has_more) = trim_results(items, 10);
        assert_eq!(trimmed.len(), 5);
        assert!(!has_more);
    }
}
