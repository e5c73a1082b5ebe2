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

//! Catalog data models
//!
//! Serde mappings for the catalog's JSON responses. Field names use
//! snake_case with `#[serde(rename)]` where the wire format differs. Only the
//! fields the client operates on are mapped; unknown fields are ignored.
//!
//! The central type is [`MediaTreeNode`], the closed tagged union over the
//! folder/file kinds a work's media tree is built from. Traversal and path
//! algorithms over it live in [`crate::tree`].

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

// ============================================================================
// MEDIA TREE
// ============================================================================

/// One node of a work's media tree.
///
/// The kind set is fixed and closed; every traversal site matches
/// exhaustively. All variants share a `title` (mutable, rewritten by the
/// translation pipeline) and an `untranslated_title` (set once after
/// deserialization, never changed afterwards — the stable lookup key
/// independent of translation state).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaTreeNode {
    Folder(Folder),
    Audio(AudioFile),
    Text(TextFile),
    Image(MediaFile),
    Other(MediaFile),
}

impl MediaTreeNode {
    pub fn title(&self) -> &str {
        match self {
            Self::Folder(f) => &f.title,
            Self::Audio(a) => &a.title,
            Self::Text(t) => &t.title,
            Self::Image(m) | Self::Other(m) => &m.title,
        }
    }

    pub fn untranslated_title(&self) -> &str {
        match self {
            Self::Folder(f) => &f.untranslated_title,
            Self::Audio(a) => &a.untranslated_title,
            Self::Text(t) => &t.untranslated_title,
            Self::Image(m) | Self::Other(m) => &m.untranslated_title,
        }
    }

    pub(crate) fn set_title(&mut self, title: String) {
        match self {
            Self::Folder(f) => f.title = title,
            Self::Audio(a) => a.title = title,
            Self::Text(t) => t.title = title,
            Self::Image(m) | Self::Other(m) => m.title = title,
        }
    }
}

/// Container node; child order is insertion order from the source listing and
/// is preserved through copies and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub title: String,
    /// Original title before translation. Absent on the wire; sealed from
    /// `title` right after the tree is deserialized.
    #[serde(default, rename = "untranslatedTitle")]
    pub untranslated_title: String,
    #[serde(default)]
    pub children: Vec<MediaTreeNode>,
}

impl Folder {
    /// Synthetic root wrapping a work's top-level entries.
    pub fn root(children: Vec<MediaTreeNode>) -> Self {
        let mut root = Self {
            title: "root".to_string(),
            untranslated_title: "root".to_string(),
            children,
        };
        root.seal_untranslated_titles();
        root
    }

    /// Fix `untranslated_title` to the as-delivered `title` on every node
    /// that does not carry one yet. Runs once at construction; titles sealed
    /// here never change again.
    fn seal_untranslated_titles(&mut self) {
        fn seal(node: &mut MediaTreeNode) {
            let title = node.title().to_string();
            match node {
                MediaTreeNode::Folder(f) => {
                    if f.untranslated_title.is_empty() {
                        f.untranslated_title = title;
                    }
                    f.children.iter_mut().for_each(seal);
                }
                MediaTreeNode::Audio(a) => {
                    if a.untranslated_title.is_empty() {
                        a.untranslated_title = title;
                    }
                }
                MediaTreeNode::Text(t) => {
                    if t.untranslated_title.is_empty() {
                        t.untranslated_title = title;
                    }
                }
                MediaTreeNode::Image(m) | MediaTreeNode::Other(m) => {
                    if m.untranslated_title.is_empty() {
                        m.untranslated_title = title;
                    }
                }
            }
        }
        self.children.iter_mut().for_each(seal);
    }
}

/// Playable audio leaf. `hash` is the stable content identifier, unique
/// within a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFile {
    pub title: String,
    #[serde(default, rename = "untranslatedTitle")]
    pub untranslated_title: String,
    pub hash: String,
    pub work: WorkRef,
    #[serde(rename = "workTitle")]
    pub work_title: String,
    #[serde(rename = "mediaStreamUrl")]
    pub media_stream_url: String,
    #[serde(rename = "mediaDownloadUrl")]
    pub media_download_url: String,
    #[serde(default, rename = "streamLowQualityUrl")]
    pub stream_low_quality_url: Option<String>,
    /// Seconds, fractional.
    pub duration: f64,
    /// Bytes.
    pub size: u64,
}

/// Subtitle/lyrics leaf (`.vtt`, `.lrc`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFile {
    pub title: String,
    #[serde(default, rename = "untranslatedTitle")]
    pub untranslated_title: String,
    pub hash: String,
    pub work: WorkRef,
    #[serde(rename = "workTitle")]
    pub work_title: String,
    #[serde(rename = "mediaStreamUrl")]
    pub media_stream_url: String,
    #[serde(rename = "mediaDownloadUrl")]
    pub media_download_url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub size: u64,
}

/// Image or uncategorized leaf; identifying fields only, no playback
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    pub title: String,
    #[serde(default, rename = "untranslatedTitle")]
    pub untranslated_title: String,
    pub hash: String,
    pub work: WorkRef,
    #[serde(rename = "workTitle")]
    pub work_title: String,
    #[serde(rename = "mediaStreamUrl")]
    pub media_stream_url: String,
    #[serde(rename = "mediaDownloadUrl")]
    pub media_download_url: String,
    pub size: u64,
}

/// Back-reference from a tree leaf to its owning work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRef {
    pub id: u64,
    #[serde(rename = "source_id")]
    pub source_id: String,
    #[serde(rename = "source_type")]
    pub source_type: String,
}

// ============================================================================
// WORKS & LISTINGS
// ============================================================================

/// A top-level catalog item (an audio release).
#[derive(Debug, Clone, Deserialize)]
pub struct Work {
    pub id: u64,
    /// Translation target.
    pub title: String,
    /// Circle (publisher) display name; also a translation target.
    pub name: String,
    pub nsfw: bool,
    /// Release date, `yyyy-MM-dd`.
    pub release: String,
    #[serde(rename = "dl_count")]
    pub dl_count: u64,
    pub price: u64,
    #[serde(rename = "review_count")]
    pub review_count: u64,
    #[serde(rename = "rate_count")]
    pub rate_count: u64,
    #[serde(rename = "rate_average_2dp")]
    pub rate_average: f64,
    #[serde(rename = "has_subtitle")]
    pub has_subtitle: bool,
    #[serde(default, rename = "create_date")]
    pub create_date: String,
    /// Total runtime in seconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub vas: Vec<VoiceActor>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(rename = "source_id")]
    pub source_id: String,
    #[serde(default, rename = "source_url")]
    pub source_url: String,
    #[serde(default, rename = "userRating")]
    pub user_rating: Option<i32>,
    pub circle: Circle,
    #[serde(default, rename = "samCoverUrl")]
    pub sam_cover_url: String,
    #[serde(default, rename = "thumbnailCoverUrl")]
    pub thumbnail_cover_url: String,
    #[serde(default, rename = "mainCoverUrl")]
    pub main_cover_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceActor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Circle {
    pub id: u64,
    pub name: String,
    #[serde(rename = "source_id")]
    pub source_id: String,
    #[serde(rename = "source_type")]
    pub source_type: String,
}

/// One page of works plus its pagination state.
#[derive(Debug, Clone, Deserialize)]
pub struct WorksResponse {
    pub works: Vec<Work>,
    pub pagination: Pagination,
}

impl WorksResponse {
    pub fn empty() -> Self {
        Self {
            works: Vec::new(),
            pagination: Pagination::empty(),
        }
    }

    /// Apply the "only show subtitled" filter when enabled.
    pub fn retain_subtitled(mut self, only_subtitled: bool) -> Self {
        if only_subtitled {
            self.works.retain(|work| work.has_subtitle);
        }
        self
    }
}

// ============================================================================
// TAGS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub i18n: TagI18n,
}

impl Tag {
    /// English display name, falling back to the canonical name.
    pub fn english_name(&self) -> &str {
        self.i18n.en_us.name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagI18n {
    #[serde(rename = "en-us")]
    pub en_us: LocalizedName,
    #[serde(default, rename = "ja-jp")]
    pub ja_jp: LocalizedName,
    #[serde(default, rename = "zh-cn")]
    pub zh_cn: LocalizedName,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedName {
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// PLAYLISTS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(rename = "user_name")]
    pub user_name: String,
    pub privacy: i32,
    pub locale: String,
    #[serde(rename = "playback_count")]
    pub playback_count: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "created_at")]
    pub created_at: String,
    #[serde(rename = "updated_at")]
    pub updated_at: String,
    #[serde(rename = "works_count")]
    pub works_count: u64,
    #[serde(default, rename = "latestWorkID")]
    pub latest_work_id: Option<u64>,
    #[serde(default, rename = "mainCoverUrl")]
    pub main_cover_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
    pub pagination: Pagination,
}

impl PlaylistsResponse {
    pub fn empty() -> Self {
        Self {
            playlists: Vec::new(),
            pagination: Pagination::empty(),
        }
    }
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    /// Opaque bearer token for authenticated calls.
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "loggedIn")]
    pub logged_in: bool,
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "recommenderUuid")]
    pub recommender_uuid: String,
}
