//! Domain models decoded from the bookstore backend.
//!
//! The backend speaks camelCase JSON. Optional fields are tolerated
//! liberally since older records are missing many of them.

pub mod hero;
pub mod order;
pub mod product;
pub mod session;

pub use hero::*;
pub use order::*;
pub use product::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Server-side pagination block returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total matching items across all pages.
    pub total: u64,
    /// Total page count.
    pub pages: u32,
}

/// Number of pages needed to show `total` items at `limit` per page.
///
/// Never returns less than 1, so an empty list still has a page to sit on.
#[must_use]
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
