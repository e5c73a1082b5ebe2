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

//! Error types for asmr-catalog
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (catalog transport, translation batching,
//! input validation) so callers can distinguish a failed remote call from a
//! broken translation batch.
//!
//! Two conditions deliberately do *not* surface here: tree lookups that find
//! nothing return `Option`/empty collections, and `get_folder` on an
//! unresolvable path silently returns the deepest folder it reached. Both are
//! part of the tree contract, not error cases.

use thiserror::Error;

/// Result type alias using our AsmrError type
pub type Result<T> = std::result::Result<T, AsmrError>;

/// Main error type for asmr-catalog
#[derive(Error, Debug)]
pub enum AsmrError {
    // ===== Catalog / translation transport =====

    /// The remote service answered with a non-success status
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
        /// Endpoint that failed
        endpoint: Option<String>,
    },

    /// The remote service answered with a body we could not decode
    #[error("Invalid API response: {message}")]
    InvalidApiResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    /// Connection-level failure (timeout, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    // ===== Translation batching =====

    /// Constructed chunks do not cover the input list. This means the
    /// chunking algorithm itself is broken; it is never recoverable.
    #[error("Chunking produced {actual} items for an input of {expected}")]
    ChunkingIntegrity { expected: usize, actual: usize },

    /// A translated chunk did not split back into the expected number of
    /// items, or the reassembled total differs from the input size.
    #[error("Translation returned {actual} items for an input of {expected}")]
    TranslationMismatch { expected: usize, actual: usize },

    // ===== Input validation =====

    /// Caller passed something we cannot work with (bad URL, bad header value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AsmrError {
    /// Convenience constructor for transport failures
    pub fn api_failed(
        message: impl Into<String>,
        status_code: Option<u16>,
        endpoint: Option<String>,
    ) -> Self {
        Self::ApiRequestFailed {
            message: message.into(),
            status_code,
            endpoint,
        }
    }
}
