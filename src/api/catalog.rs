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

//! High-level catalog operations
//!
//! [`AsmrApi`] composes the HTTP transport, the translation batcher, the
//! work-tree cache and the user's settings into the operation set a player
//! frontend consumes: media trees, listings (popular, recommended, all-works,
//! search, tag feed, related), favorites, playlists, tags, ratings, and
//! subtitle downloads.
//!
//! Listing responses all flow through the same post-processing: the
//! subtitled-only filter, a soft-fail batch translation of titles and circle
//! names, and conversion into a [`Page`] with a continuation token.
//!
//! Mirror-specific endpoints are built from [`Settings::api_base_url`];
//! account endpoints (auth, playlists, ratings) always go to the canonical
//! host.

use serde_json::json;
use tokio::sync::Mutex;

use crate::api::client::AsmrClient;
use crate::api::models::{
    Folder, LoginResponse, MediaTreeNode, Playlist, PlaylistsResponse, Tag, Work, WorksResponse,
};
use crate::cache::TimeBasedLruCache;
use crate::error::Result;
use crate::pagination::{parse_continuation, Page};
use crate::settings::Settings;
use crate::translate::{GoogleTranslator, TranslationTransport, Translator};

/// Media trees are expensive to fetch and translate; a handful of recently
/// opened works covers typical browsing.
const WORK_TREE_CACHE_CAPACITY: usize = 20;

/// Account endpoints live on the canonical host regardless of mirror.
const ACCOUNT_BASE_URL: &str = "https://api.asmr.one/api";

/// Default page size for playlist listings.
const PLAYLIST_PAGE_SIZE: u32 = 96;

/// Keyword the search endpoint treats as "match everything".
const EMPTY_KEYWORD: &str = " ";

/// Listing sort key, with the string value the API expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Release,
    Newest,
    MyRating,
    Price,
    Rating,
    ReviewCount,
    RjCode,
    /// Ascending puts SFW works first.
    Nsfw,
    Random,
}

impl SortOrder {
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Newest => "create_date",
            Self::MyRating => "rating",
            Self::Price => "price",
            Self::Rating => "rate_average_2dp",
            Self::ReviewCount => "review_count",
            Self::RjCode => "id",
            Self::Nsfw => "nsfw",
            Self::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortType {
    Asc,
    #[default]
    Desc,
}

impl SortType {
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Catalog client over one mirror, one account session and one translation
/// transport.
pub struct AsmrApi<T: TranslationTransport = GoogleTranslator> {
    client: AsmrClient,
    settings: Settings,
    translator: Translator<T>,
    work_tree_cache: TimeBasedLruCache<Folder>,
    tags: Mutex<Option<Vec<Tag>>>,
}

impl AsmrApi<GoogleTranslator> {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_transport(settings, GoogleTranslator::new()?)
    }
}

impl<T: TranslationTransport> AsmrApi<T> {
    /// Build the client over a custom translation transport.
    pub fn with_transport(settings: Settings, transport: T) -> Result<Self> {
        Ok(Self {
            client: AsmrClient::new()?,
            settings,
            translator: Translator::new(transport),
            work_tree_cache: TimeBasedLruCache::new(WORK_TREE_CACHE_CAPACITY),
            tags: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn base_url(&self) -> String {
        self.settings.api_base_url()
    }

    fn lang(&self) -> &str {
        &self.settings.translation_language
    }

    /// Sort key after the SFW override: with `only_show_sfw` every listing is
    /// forced into `nsfw asc` ordering so SFW works front-load the feed.
    fn order_value(&self, order: SortOrder) -> &'static str {
        if self.settings.only_show_sfw {
            SortOrder::Nsfw.api_value()
        } else {
            order.api_value()
        }
    }

    fn sort_value(&self, sort: SortType) -> &'static str {
        if self.settings.only_show_sfw {
            SortType::Asc.api_value()
        } else {
            sort.api_value()
        }
    }

    /// Shared listing post-processing: subtitle filter, then a soft-fail
    /// batch translation that leaves the page untranslated on failure.
    async fn finish_listing(&self, response: WorksResponse) -> Result<WorksResponse> {
        let mut response = response.retain_subtitled(self.settings.only_show_subtitled);
        self.translator
            .translate_works(&mut response, self.lang())
            .await?;
        Ok(response)
    }

    // ------------------------------------------------------------------
    // auth

    /// Log in and install the returned credentials on this client. Later
    /// calls carry the bearer token and recommendations use the account UUID.
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{ACCOUNT_BASE_URL}/auth/me");
        let body = json!({ "name": name, "password": password });
        let response: LoginResponse = self.client.post(&url, &body).await?;
        self.client.set_user(
            response.user.recommender_uuid.clone(),
            response.token.clone(),
        );
        Ok(response)
    }

    // ------------------------------------------------------------------
    // media trees

    /// Fetch a work's media tree: top-level entries wrapped in a synthetic
    /// root, titles translated, and the result cached. Both the cache store
    /// and the cache hit hand out independent copies, so callers may mutate
    /// their tree freely.
    pub async fn work_media_tree(&self, work_id: &str) -> Result<Folder> {
        if let Some(cached) = self.work_tree_cache.get(work_id) {
            tracing::debug!(work_id, "work tree cache hit");
            return Ok(cached);
        }

        let url = format!("{}/tracks/{}?v=1", self.base_url(), work_id);
        let children: Vec<MediaTreeNode> = self.client.get(&url).await?;
        let mut root = Folder::root(children);
        self.translator.translate_folder(&mut root, self.lang()).await?;

        self.work_tree_cache.put(work_id.to_string(), root.clone());
        Ok(root)
    }

    /// Work metadata with a translated title. Title translation here is a
    /// single string, so a transport failure is a hard error.
    pub async fn work(&self, work_id: &str) -> Result<Work> {
        let url = format!("{}/workInfo/{}", self.base_url(), work_id);
        let mut work: Work = self.client.get(&url).await?;
        self.translator.translate_work(&mut work, self.lang()).await?;
        Ok(work)
    }

    // ------------------------------------------------------------------
    // listings

    pub async fn popular_works(&self, page: u32) -> Result<WorksResponse> {
        let url = format!("{}/recommender/popular", self.base_url());
        let body = json!({ "keyword": EMPTY_KEYWORD, "page": page, "subtitle": 0 });
        let response: WorksResponse = self.client.post(&url, &body).await?;
        self.finish_listing(response).await
    }

    pub async fn recommended_works(&self, page: u32) -> Result<WorksResponse> {
        let url = format!("{}/recommender/recommend-for-user", self.base_url());
        let body = json!({
            "keyword": EMPTY_KEYWORD,
            "recommenderUuid": self.client.recommender_uuid(),
            "page": page,
            "subtitle": 0,
        });
        let response: WorksResponse = self.client.post(&url, &body).await?;
        self.finish_listing(response).await
    }

    pub async fn works(&self, page: u32, order: SortOrder, sort: SortType) -> Result<WorksResponse> {
        let url = format!("{}/works", self.base_url());
        let query = [
            ("order", self.order_value(order).to_string()),
            ("sort", self.sort_value(sort).to_string()),
            ("page", page.to_string()),
            ("subtitle", "0".to_string()),
        ];
        let response: WorksResponse = self.client.get_query(&url, &query).await?;
        self.finish_listing(response).await
    }

    pub async fn search_works(
        &self,
        page: u32,
        keyword: &str,
        order: SortOrder,
        sort: SortType,
    ) -> Result<WorksResponse> {
        let url = format!("{}/search/{}", self.base_url(), encode_keyword(keyword));
        let query = [
            ("page", page.to_string()),
            ("order", self.order_value(order).to_string()),
            ("sort", self.sort_value(sort).to_string()),
            ("seed", "64".to_string()),
            ("subtitle", "0".to_string()),
            ("includeTranslationWorks", "true".to_string()),
        ];
        let response: WorksResponse = self.client.get_query(&url, &query).await?;
        self.finish_listing(response).await
    }

    pub async fn related_works(&self, item_id: &str) -> Result<WorksResponse> {
        let url = format!("{}/recommender/item-neighbors", self.base_url());
        let body = json!({ "keyword": EMPTY_KEYWORD, "itemId": item_id });
        let response: WorksResponse = self.client.post(&url, &body).await?;
        self.finish_listing(response).await
    }

    /// Rated works for the logged-in user; an empty page when no user is
    /// logged in.
    pub async fn favorites(
        &self,
        page: u32,
        order: SortOrder,
        sort: SortType,
    ) -> Result<WorksResponse> {
        if !self.client.has_token() {
            return Ok(WorksResponse::empty());
        }
        let url = format!("{}/review", self.base_url());
        let query = [
            ("order", self.order_value(order).to_string()),
            ("sort", self.sort_value(sort).to_string()),
            ("page", page.to_string()),
        ];
        let response: WorksResponse = self.client.get_query(&url, &query).await?;
        self.finish_listing(response).await
    }

    // ------------------------------------------------------------------
    // playlists

    pub async fn playlists(&self, page: u32) -> Result<PlaylistsResponse> {
        if !self.client.has_token() {
            return Ok(PlaylistsResponse::empty());
        }
        let url = format!("{ACCOUNT_BASE_URL}/playlist/get-playlists");
        let query = [
            ("page", page.to_string()),
            ("pageSize", PLAYLIST_PAGE_SIZE.to_string()),
            ("filterBy", "all".to_string()),
        ];
        self.client.get_query(&url, &query).await
    }

    pub async fn playlist_works(&self, playlist_id: &str, page: u32) -> Result<WorksResponse> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/get-playlist-works");
        let query = [
            ("id", playlist_id.to_string()),
            ("page", page.to_string()),
            ("pageSize", PLAYLIST_PAGE_SIZE.to_string()),
        ];
        let response: WorksResponse = self.client.get_query(&url, &query).await?;
        self.finish_listing(response).await
    }

    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        privacy: i32,
        works: &[String],
    ) -> Result<Playlist> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/create-playlist");
        let body = json!({
            "name": name,
            "privacy": privacy,
            "locale": "en",
            "description": description,
            "works": works,
        });
        self.client.post(&url, &body).await
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/delete-playlist");
        let body = json!({ "id": playlist_id });
        self.client.post_unit(&url, &body).await
    }

    pub async fn edit_playlist(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
        privacy: i32,
    ) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/edit-playlist-metadata");
        let body = json!({
            "id": playlist_id,
            "data": { "name": name, "privacy": privacy, "description": description },
        });
        self.client.post_unit(&url, &body).await
    }

    pub async fn add_works_to_playlist(
        &self,
        playlist_id: &str,
        work_ids: &[String],
    ) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/add-works-to-playlist");
        let body = json!({ "id": playlist_id, "works": work_ids });
        self.client.post_unit(&url, &body).await
    }

    pub async fn remove_works_from_playlist(
        &self,
        playlist_id: &str,
        work_ids: &[String],
    ) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/playlist/remove-works-from-playlist");
        let body = json!({ "id": playlist_id, "works": work_ids });
        self.client.post_unit(&url, &body).await
    }

    // ------------------------------------------------------------------
    // tags, ratings, subtitles

    /// The full tag list, sorted by English display name and memoized for the
    /// lifetime of the client.
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        let mut cached = self.tags.lock().await;
        if let Some(ref tags) = *cached {
            return Ok(tags.clone());
        }
        let url = format!("{}/tags/", self.base_url());
        let mut tags: Vec<Tag> = self.client.get(&url).await?;
        tags.sort_by(|a, b| a.english_name().cmp(b.english_name()));
        *cached = Some(tags.clone());
        Ok(tags)
    }

    /// Rate a work 1-5; the work shows up in favorites afterwards.
    pub async fn rate_work(&self, work_id: &str, rating: i32) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/review");
        let body = json!({ "work_id": work_id, "rating": rating });
        self.client.put_unit(&url, &body).await
    }

    pub async fn delete_rating(&self, work_id: &str) -> Result<()> {
        let url = format!("{ACCOUNT_BASE_URL}/review");
        self.client.delete_unit(&url, &[("work_id", work_id)]).await
    }

    /// Raw subtitle file body (`.vtt` / `.lrc`) from its download URL.
    pub async fn subtitle_file(&self, url: &str) -> Result<String> {
        self.client.get_text(url).await
    }

    pub(crate) fn translator(&self) -> &Translator<T> {
        &self.translator
    }

    // ------------------------------------------------------------------
    // paged variants
    //
    // Continuation-token wrappers over the listings above; every feed a
    // frontend renders goes through one of these.

    pub async fn popular_page(&self, continuation: Option<&str>) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self.popular_works(page).await?;
        Ok(Page::new(response.works, &response.pagination))
    }

    pub async fn recommended_page(&self, continuation: Option<&str>) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self.recommended_works(page).await?;
        Ok(Page::new(response.works, &response.pagination))
    }

    pub async fn works_page(
        &self,
        order: SortOrder,
        sort: SortType,
        continuation: Option<&str>,
    ) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self.works(page, order, sort).await?;
        Ok(Page::new(response.works, &response.pagination))
    }

    pub async fn search_page(
        &self,
        keyword: &str,
        continuation: Option<&str>,
    ) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self
            .search_works(page, keyword, SortOrder::default(), SortType::default())
            .await?;
        Ok(Page::new(response.works, &response.pagination))
    }

    /// Search feed scoped to a single tag via the `$tag:name$` search syntax.
    pub async fn tag_feed_page(&self, tag: &Tag, continuation: Option<&str>) -> Result<Page<Work>> {
        let keyword = format!("$tag:{}$", tag.english_name());
        self.search_page(&keyword, continuation).await
    }

    pub async fn favorites_page(&self, continuation: Option<&str>) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self
            .favorites(page, SortOrder::default(), SortType::default())
            .await?;
        Ok(Page::new(response.works, &response.pagination))
    }

    pub async fn playlists_page(&self, continuation: Option<&str>) -> Result<Page<Playlist>> {
        let page = parse_continuation(continuation);
        let response = self.playlists(page).await?;
        Ok(Page::new(response.playlists, &response.pagination))
    }

    pub async fn playlist_works_page(
        &self,
        playlist_id: &str,
        continuation: Option<&str>,
    ) -> Result<Page<Work>> {
        let page = parse_continuation(continuation);
        let response = self.playlist_works(playlist_id, page).await?;
        Ok(Page::new(response.works, &response.pagination))
    }
}

/// Percent-encode a search keyword for use as a path segment. Spaces become
/// `%20`, not `+`; the search route does not decode form encoding.
fn encode_keyword(keyword: &str) -> String {
    urlencoding::encode(keyword).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_values_match_the_api_contract() {
        assert_eq!(SortOrder::Release.api_value(), "release");
        assert_eq!(SortOrder::Newest.api_value(), "create_date");
        assert_eq!(SortOrder::Rating.api_value(), "rate_average_2dp");
        assert_eq!(SortOrder::MyRating.api_value(), "rating");
        assert_eq!(SortOrder::RjCode.api_value(), "id");
        assert_eq!(SortType::Asc.api_value(), "asc");
        assert_eq!(SortType::Desc.api_value(), "desc");
    }

    #[test]
    fn keyword_encoding_uses_percent_twenty() {
        assert_eq!(encode_keyword("ear cleaning"), "ear%20cleaning");
        assert_eq!(encode_keyword("$tag:Binaural$"), "%24tag%3ABinaural%24");
    }

    #[test]
    fn defaults_are_release_desc() {
        assert_eq!(SortOrder::default(), SortOrder::Release);
        assert_eq!(SortType::default(), SortType::Desc);
    }
}
