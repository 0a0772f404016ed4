// ABOUTME: Page-number pagination module for list endpoints
// ABOUTME: Computes offsets, validates page bounds, and shapes count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

use crate::{
    constants::{limits, messages},
    errors::{AppError, AppResult, ErrorCode},
};

/// Requested page, resolved against configured defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl PageRequest {
    /// Resolve raw query values
    ///
    /// `limit` falls back to `default_limit` when absent or zero and is capped at `max_limit`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for page zero
    pub fn resolve(
        page: Option<u32>,
        limit: Option<u32>,
        default_limit: u32,
        max_limit: u32,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                messages::INVALID_PAGE,
            ));
        }
        let limit = match limit {
            Some(0) | None => default_limit,
            Some(value) => value.min(max_limit),
        };
        Ok(Self { page, limit })
    }

    /// SQL `OFFSET` for this page
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// SQL `LIMIT` for this page
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Number of pages needed for `count` items (at least one)
    #[must_use]
    pub fn page_count(&self, count: u64) -> u64 {
        count.div_ceil(u64::from(self.limit)).max(1)
    }

    /// Ensure the page exists for `count` items
    ///
    /// The first page always exists, even when empty.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the page is past the end
    pub fn ensure_in_range(&self, count: u64) -> AppResult<()> {
        if u64::from(self.page) > self.page_count(count) {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                messages::INVALID_PAGE,
            ));
        }
        Ok(())
    }

    /// Whether a page follows this one
    #[must_use]
    pub fn has_next(&self, count: u64) -> bool {
        u64::from(self.page) < self.page_count(count)
    }

    /// Whether a page precedes this one
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: limits::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Create a new page
    #[must_use]
    pub const fn new(
        results: Vec<T>,
        count: u64,
        next: Option<String>,
        previous: Option<String>,
    ) -> Self {
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the items of this page, keeping the envelope
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
