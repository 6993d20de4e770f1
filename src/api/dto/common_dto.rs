//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to 1–100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Zero-based offset of the first item on this page. Saturates so an
    /// out-of-range page yields an empty slice instead of overflowing.
    #[must_use]
    pub fn offset(&self) -> usize {
        let offset =
            u64::from(self.page.max(1) - 1).saturating_mul(u64::from(self.per_page));
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

impl PaginationMeta {
    /// Builds metadata for `total` items under the given parameters.
    #[must_use]
    pub fn for_total(params: &PaginationParams, total: u32) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(params.per_page)
        };
        Self {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_walks_pages() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            page: 3,
            per_page: 20,
        };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn offset_saturates_on_huge_page_numbers() {
        let params = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        }
        .clamped();
        let offset = params.offset();
        let expected = u64::from(u32::MAX - 1).saturating_mul(100);
        assert_eq!(offset, usize::try_from(expected).unwrap_or(usize::MAX));

        // Skipping past the end of any real collection yields an empty page.
        let rows: Vec<u32> = (0..50).collect();
        assert_eq!(rows.into_iter().skip(offset).count(), 0);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let params = PaginationParams {
            page: 0,
            per_page: 20,
        }
        .clamped();
        assert_eq!(params.page, 1);
        assert_eq!(params.offset(), 0);
    }
}
