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

//! Client-side aggregator for the asmr.one audio-content catalog.
//!
//! The crate fetches hierarchical work media trees and catalog listings,
//! machine-translates titles and subtitles on demand, and exposes everything
//! through a stable content model:
//!
//! - [`api`] — HTTP transport, serde models, and the [`api::AsmrApi`]
//!   operation set (trees, listings, playlists, tags, ratings).
//! - [`tree`] — traversal and path algorithms over a work's media tree.
//! - [`translate`] — batched title translation with chunking, integrity
//!   checks and a result cache.
//! - [`lyrics`] — WebVTT subtitle parsing and translation.
//! - [`cache`] — the capacity-bounded LRU both caches are built on.
//! - [`pagination`] — the continuation-token convention listings share.

pub mod api;
pub mod cache;
pub mod error;
pub mod lyrics;
pub mod pagination;
pub mod settings;
pub mod translate;
pub mod tree;

pub use api::{AsmrApi, Folder, MediaTreeNode, Playlist, SortOrder, SortType, Tag, Work};
pub use error::{AsmrError, Result};
pub use lyrics::{LyricLine, TimedLyrics};
pub use pagination::Page;
pub use settings::Settings;
pub use translate::{GoogleTranslator, TranslationTransport, Translator};
