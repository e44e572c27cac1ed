//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    Asc,
    Desc,
}

/// Pagination parameters shared across all list endpoints.
///
/// - `per_page`: 1–100, default 10
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    10
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `per_page` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// Row offset for the page. Widens to u64 before multiplying so a
    /// hostile `page` value cannot overflow u32.
    pub fn offset(self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.per_page as u64
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(page: PageRequest, total_count: u64) -> Self {
        let page = page.clamped();
        let total_pages = total_count.div_ceil(page.per_page as u64).max(1) as u32;
        Self {
            current_page: page.page,
            per_page: page.per_page,
            total_count,
            total_pages,
        }
    }
}
