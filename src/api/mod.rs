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

//! Catalog API client
//!
//! `client` owns the HTTP plumbing, `models` the serde mappings, and
//! `catalog` the operation set built on both.

pub mod catalog;
pub mod client;
pub mod models;

pub use catalog::{AsmrApi, SortOrder, SortType};
pub use client::AsmrClient;
pub use models::{
    AudioFile, Folder, LoginResponse, MediaTreeNode, Playlist, PlaylistsResponse, Tag, TextFile,
    Work, WorksResponse,
};
