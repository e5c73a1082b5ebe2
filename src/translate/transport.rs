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

//! Translation transport
//!
//! The batcher only needs one primitive: translate a single text payload into
//! a target language. The production transport goes through the public
//! Google Translate endpoint; tests substitute their own implementation.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::{AsmrError, Result};

/// Per-call connect/read timeout, matching the catalog transport.
const TRANSLATE_TIMEOUT_SECS: u64 = 10;

/// One-shot text translation used for every chunk the batcher dispatches.
///
/// Implementations must preserve line boundaries: the batcher joins chunk
/// items with `"\n"` and splits the response on `"\n"` again, so a transport
/// that merges or drops lines surfaces as a translation mismatch.
pub trait TranslationTransport: Send + Sync {
    /// Translate `text` into `target_lang` (BCP-47-ish code, e.g. `en`).
    fn translate(
        &self,
        text: &str,
        target_lang: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Transport over the unauthenticated `translate_a/single` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
}

impl GoogleTranslator {
    const ENDPOINT: &'static str = "https://translate.googleapis.com/translate_a/single";

    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(TRANSLATE_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TRANSLATE_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    /// Concatenate the translated segments out of the endpoint's nested-array
    /// response: `[[["translated", "source", ...], ...], ...]`.
    fn collect_segments(body: &Value) -> Option<String> {
        let segments = body.get(0)?.as_array()?;
        let mut out = String::new();
        for segment in segments {
            if let Some(text) = segment.get(0).and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        Some(out)
    }
}

impl TranslationTransport for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let url = Url::parse_with_params(
            Self::ENDPOINT,
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| AsmrError::InvalidInput(format!("Invalid translate URL: {e}")))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AsmrError::api_failed(
                format!("Translation request failed: {body}"),
                Some(status.as_u16()),
                Some("translate_a/single".to_string()),
            ));
        }

        let body: Value = response.json().await?;
        Self::collect_segments(&body).ok_or_else(|| AsmrError::InvalidApiResponse {
            message: "Translation response missing segment array".to_string(),
            response_body: Some(body.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_concatenate_in_order() {
        let body: Value = serde_json::from_str(
            r#"[[["Hello\n", "こんにちは\n", null], ["World", "世界", null]], null, "ja"]"#,
        )
        .unwrap();
        assert_eq!(
            GoogleTranslator::collect_segments(&body).as_deref(),
            Some("Hello\nWorld")
        );
    }

    #[test]
    fn malformed_body_yields_none() {
        let body: Value = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert_eq!(GoogleTranslator::collect_segments(&body), None);
    }
}
