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

//! HTTP client for the catalog API
//!
//! A thin wrapper around `reqwest::Client` that owns the cross-cutting
//! request concerns: the browser-equivalent `Origin`/`Referer` headers the
//! API expects, the bearer token once a user has logged in, and uniform
//! error mapping (non-success statuses and unparsable bodies both surface as
//! typed errors carrying the endpoint and a body excerpt).
//!
//! Requests are not retried. A failed tree or listing fetch propagates to
//! the caller immediately; the UI layer decides whether to ask again.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, ORIGIN, REFERER};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AsmrError, Result};

/// Connect/read timeout applied to every request.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Origin the API validates requests against.
const SITE_ORIGIN: &str = "https://asmr.one";

/// Per-session credentials. The recommender UUID identifies an anonymous
/// session to the recommendation endpoints; a login replaces it with the
/// account's UUID and adds the bearer token.
#[derive(Debug, Clone)]
struct Session {
    recommender_uuid: String,
    token: Option<String>,
}

/// HTTP transport shared by all catalog operations.
#[derive(Debug)]
pub struct AsmrClient {
    client: Client,
    session: Mutex<Session>,
}

impl AsmrClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static("https://asmr.one/"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            session: Mutex::new(Session {
                recommender_uuid: Uuid::new_v4().to_string(),
                token: None,
            }),
        })
    }

    /// Install the credentials returned by a successful login. Subsequent
    /// requests carry the bearer token, and recommendation calls use the
    /// account UUID instead of the anonymous one.
    pub fn set_user(&self, uuid: String, token: String) {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        session.recommender_uuid = uuid;
        session.token = Some(token);
    }

    /// Whether a login token is installed.
    pub fn has_token(&self) -> bool {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        session.token.is_some()
    }

    /// UUID sent to the recommendation endpoints.
    pub fn recommender_uuid(&self) -> String {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        session.recommender_uuid.clone()
    }

    fn builder(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, url);
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref token) = session.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AsmrError::InvalidInput(format!("Invalid auth token: {e}")))?;
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.builder(Method::GET, url)?.send().await?;
        self.parse_response(url, response).await
    }

    pub async fn get_query<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.builder(Method::GET, url)?.query(query).send().await?;
        self.parse_response(url, response).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.builder(Method::POST, url)?.json(body).send().await?;
        self.parse_response(url, response).await
    }

    /// POST whose response body is irrelevant; only the status is checked.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        let response = self.builder(Method::POST, url)?.json(body).send().await?;
        self.check_status(url, response).await.map(drop)
    }

    pub async fn put_unit<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        let response = self.builder(Method::PUT, url)?.json(body).send().await?;
        self.check_status(url, response).await.map(drop)
    }

    pub async fn delete_unit<Q: Serialize + ?Sized>(&self, url: &str, query: &Q) -> Result<()> {
        let response = self
            .builder(Method::DELETE, url)?
            .query(query)
            .send()
            .await?;
        self.check_status(url, response).await.map(drop)
    }

    /// Fetch a plain-text resource (subtitle files).
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.builder(Method::GET, url)?.send().await?;
        let response = self.check_status(url, response).await?;
        Ok(response.text().await?)
    }

    async fn check_status(&self, url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, url, "request rejected");
        Err(AsmrError::api_failed(
            format!("API request failed: {body}"),
            Some(status.as_u16()),
            Some(endpoint_of(url)),
        ))
    }

    async fn parse_response<T: DeserializeOwned>(&self, url: &str, response: Response) -> Result<T> {
        let response = self.check_status(url, response).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AsmrError::api_failed(
                format!("Failed to read response body: {e}"),
                Some(status.as_u16()),
                Some(endpoint_of(url)),
            )
        })?;

        serde_json::from_str(&body).map_err(|e| {
            // Keep a window around the failure point so the log stays useful
            // on multi-megabyte listing bodies.
            let col = e.column();
            let start = col.saturating_sub(200);
            let end = (col + 200).min(body.len());
            // May land off a char boundary on CJK bodies; the full body is
            // still attached below.
            let context = body.get(start..end).unwrap_or("");
            AsmrError::InvalidApiResponse {
                message: format!("Parse error: {e} at col {col}. Context: ...{context}..."),
                response_body: Some(body.clone()),
            }
        })
    }
}

/// Path component of a request URL, for error payloads.
fn endpoint_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_client_has_anonymous_session() {
        let client = AsmrClient::new().unwrap();
        assert!(!client.has_token());
        // Anonymous recommender identity is a valid v4 UUID.
        assert!(Uuid::parse_str(&client.recommender_uuid()).is_ok());
    }

    #[test]
    fn login_replaces_session_identity() {
        let client = AsmrClient::new().unwrap();
        client.set_user("user-uuid".to_string(), "token".to_string());
        assert!(client.has_token());
        assert_eq!(client.recommender_uuid(), "user-uuid");
    }

    #[test]
    fn endpoint_extraction_keeps_the_path() {
        assert_eq!(
            endpoint_of("https://api.asmr-200.com/api/tracks/RJ123?v=1"),
            "/api/tracks/RJ123"
        );
        assert_eq!(endpoint_of("not a url"), "not a url");
    }
}
