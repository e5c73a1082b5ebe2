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

//! Client configuration
//!
//! The catalog and translation layers are language- and filter-agnostic; these
//! settings are read by the high-level API before/after invoking them.

/// User-facing settings for the catalog client.
///
/// Handed to [`crate::api::AsmrApi`] at construction. There is no ambient
/// global configuration; a host embedding two clients with different mirrors
/// or languages gets two independent instances.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Mirror subdomain used to build the API base URL, e.g. `asmr-200`
    /// resolves to `https://api.asmr-200.com/api`.
    pub site_mirror: String,
    /// Target language code for title/subtitle translation, e.g. `en`.
    pub translation_language: String,
    /// Drop works without subtitles from every listing response.
    pub only_show_subtitled: bool,
    /// Force listings into SFW ordering regardless of the requested sort.
    pub only_show_sfw: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_mirror: "asmr-200".to_string(),
            translation_language: "en".to_string(),
            only_show_subtitled: false,
            only_show_sfw: false,
        }
    }
}

impl Settings {
    /// API base URL for the configured mirror.
    pub fn api_base_url(&self) -> String {
        format!("https://api.{}.com/api", self.site_mirror)
    }
}
