// asmr-catalog - asmr.one catalog aggregation client
// Copyright (C) 2026 asmr-catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Uniform pagination over catalog listing calls
//!
//! Every list-returning endpoint (search, popular, recommended, tag feed,
//! playlist works, favorites) reports the same `pagination` object. This
//! module derives the continuation-token convention from it: tokens are
//! opaque strings to callers; internally they encode the page number to
//! fetch, defaulting to page 1 when absent or unparsable.

use serde::Deserialize;

/// Pagination state returned by every listing call.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(rename = "currentPage", alias = "page")]
    pub current_page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

impl Pagination {
    /// An empty zero-page marker, used for listings that require a login the
    /// caller does not have.
    pub fn empty() -> Self {
        Self {
            current_page: 0,
            page_size: 0,
            total_count: 0,
        }
    }

    /// Whether another page exists after the current one.
    pub fn has_more(&self) -> bool {
        u64::from(self.current_page) * u64::from(self.page_size) < self.total_count
    }

    /// Continuation token for the next page, or `None` on the last page.
    pub fn next_continuation(&self) -> Option<String> {
        self.has_more().then(|| (self.current_page + 1).to_string())
    }
}

/// Decode a continuation token into the page number to request.
///
/// Absent or non-numeric tokens mean page 1. The numeric encoding is an
/// implementation detail, not a compatibility guarantee to callers.
pub fn parse_continuation(token: Option<&str>) -> u32 {
    token.and_then(|t| t.parse().ok()).unwrap_or(1).max(1)
}

/// One page of a listing plus the token to resume after it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub continuation: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: &Pagination) -> Self {
        Self {
            items,
            continuation: pagination.next_continuation(),
        }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            continuation: None,
        }
    }
}
