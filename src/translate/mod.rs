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

//! Batched title translation
//!
//! The translation service caps a single request at [`MAX_CHUNK_CHARS`]
//! characters, while a listing page or media tree can easily carry more title
//! text than that. [`Translator::translate_list`] splits the batch into
//! size-bounded chunks, dispatches them concurrently, and reassembles the
//! responses in original order with strict count checks, so every input
//! string maps back to exactly one translated string — or the whole batch is
//! rejected. Finished batches are cached by a fingerprint of the input list.
//!
//! Chunk items are joined with `"\n"` on the wire; embedded newlines in the
//! inputs are flattened to spaces first so the line count stays the item
//! count.

pub mod transport;

use std::collections::HashMap;

use futures_util::future::join_all;
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::api::models::{Folder, Work, WorksResponse};
use crate::cache::TimeBasedLruCache;
use crate::error::{AsmrError, Result};
pub use transport::{GoogleTranslator, TranslationTransport};

/// Maximum characters (Unicode scalars) per translation request.
pub const MAX_CHUNK_CHARS: usize = 1800;

/// Finished-batch cache capacity.
const TRANSLATION_CACHE_CAPACITY: usize = 1000;

lazy_static! {
    /// A bracket-delimited tag (ASCII `[...]` or full-width `【...】`) at the
    /// very start of a string.
    static ref LEADING_TAG: Regex =
        Regex::new(r"^([\[【][^\]】]*[\]】])").expect("leading-tag regex is valid");
}

/// Relocate a leading bracket tag to the end of the string.
///
/// Source-site titles front-load release tags (`[RJ123456] Title`); after
/// translation the tag is noise, so it moves to the tail. Strings without a
/// leading tag pass through unchanged, which also makes the rewrite
/// idempotent once the tag has moved.
pub fn move_first_group_to_end(text: &str) -> String {
    match LEADING_TAG.find(text) {
        Some(tag) => format!("{}{}", &text[tag.end()..], tag.as_str()),
        None => text.to_string(),
    }
}

/// Batching translator with a finished-result cache.
///
/// Constructed once at startup and passed by reference; the cache is internal
/// and serialized per instance.
pub struct Translator<T: TranslationTransport> {
    transport: T,
    cache: TimeBasedLruCache<HashMap<String, String>>,
}

impl<T: TranslationTransport> Translator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: TimeBasedLruCache::new(TRANSLATION_CACHE_CAPACITY),
        }
    }

    /// Translate a single string; skips chunking entirely. The bracket-tag
    /// relocation is applied the same as for batched results.
    pub async fn translate_one(&self, text: &str, target_lang: &str) -> Result<String> {
        let translated = self.transport.translate(text, target_lang).await?;
        Ok(move_first_group_to_end(&translated))
    }

    /// Translate an ordered list of strings into a `original → translated`
    /// map with no reordering and no silent drops.
    ///
    /// With `hard_fail`, chunking/reassembly integrity failures and transport
    /// failures abort with an error (used where a partial result would
    /// corrupt alignment, e.g. timed subtitles). Without it they yield
    /// `Ok(None)` and the caller falls back to untranslated titles.
    pub async fn translate_list(
        &self,
        items: &[String],
        target_lang: &str,
        hard_fail: bool,
    ) -> Result<Option<HashMap<String, String>>> {
        if items.is_empty() {
            return Ok(Some(HashMap::new()));
        }

        let cache_key = fingerprint(items);
        if let Some(cached) = self.cache.get(&cache_key) {
            if items.iter().all(|item| cached.contains_key(item)) {
                tracing::debug!(items = items.len(), "translation cache hit");
                return Ok(Some(cached));
            }
        }

        // The wire format is newline-separated, so inputs may not carry
        // their own newlines.
        let sanitized: Vec<String> = items.iter().map(|s| s.replace('\n', " ")).collect();
        let chunks = split_into_chunks(&sanitized);

        let chunked_total: usize = chunks.iter().map(Vec::len).sum();
        if chunked_total != items.len() {
            tracing::warn!(
                expected = items.len(),
                actual = chunked_total,
                "chunking did not cover the input list"
            );
            let err = AsmrError::ChunkingIntegrity {
                expected: items.len(),
                actual: chunked_total,
            };
            return if hard_fail { Err(err) } else { Ok(None) };
        }

        // Fan out one request per chunk; completion order must not matter,
        // so all results are awaited and reassembled in chunk order. The
        // joined payloads must outlive the borrowing request futures.
        let payloads: Vec<String> = chunks.iter().map(|chunk| chunk.join("\n")).collect();
        let requests = payloads
            .iter()
            .map(|payload| self.transport.translate(payload, target_lang));
        let responses = join_all(requests).await;

        let mut translated_items: Vec<String> = Vec::with_capacity(items.len());
        for (chunk, response) in chunks.iter().zip(responses) {
            let translated = match response {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(error = %err, "chunk translation failed");
                    return if hard_fail { Err(err) } else { Ok(None) };
                }
            };
            let lines: Vec<&str> = translated.split('\n').collect();
            if lines.len() != chunk.len() {
                tracing::warn!(
                    expected = chunk.len(),
                    actual = lines.len(),
                    "chunk response does not split back into its items"
                );
                let err = AsmrError::TranslationMismatch {
                    expected: chunk.len(),
                    actual: lines.len(),
                };
                return if hard_fail { Err(err) } else { Ok(None) };
            }
            translated_items.extend(lines.iter().map(|line| move_first_group_to_end(line)));
        }

        if translated_items.len() != items.len() {
            let err = AsmrError::TranslationMismatch {
                expected: items.len(),
                actual: translated_items.len(),
            };
            return if hard_fail { Err(err) } else { Ok(None) };
        }

        let result: HashMap<String, String> = items
            .iter()
            .cloned()
            .zip(translated_items)
            .collect();
        self.cache.put(cache_key, result.clone());
        Ok(Some(result))
    }

    /// Rewrite one work's title in place. Propagates transport failures.
    pub async fn translate_work(&self, work: &mut Work, target_lang: &str) -> Result<()> {
        work.title = self.translate_one(&work.title, target_lang).await?;
        Ok(())
    }

    /// Rewrite titles and circle names across a listing page in one batch.
    /// Translation failures leave the page untranslated.
    pub async fn translate_works(
        &self,
        response: &mut WorksResponse,
        target_lang: &str,
    ) -> Result<()> {
        let batch: Vec<String> = response
            .works
            .iter()
            .map(|work| work.title.clone())
            .chain(response.works.iter().map(|work| work.name.clone()))
            .collect();
        let Some(translations) = self.translate_list(&batch, target_lang, false).await? else {
            return Ok(());
        };
        for work in &mut response.works {
            if let Some(title) = translations.get(&work.title) {
                work.title = title.clone();
            }
            if let Some(name) = translations.get(&work.name) {
                work.name = name.clone();
            }
        }
        Ok(())
    }

    /// Rewrite every title in a media tree from one batched translation.
    /// Translation failures leave the tree untranslated.
    pub async fn translate_folder(&self, folder: &mut Folder, target_lang: &str) -> Result<()> {
        let titles = folder.get_all_titles();
        let Some(translations) = self.translate_list(&titles, target_lang, false).await? else {
            return Ok(());
        };
        folder.apply_translations(&translations);
        Ok(())
    }
}

/// Deterministic cache key over an input list: SHA-256 of the concatenation.
fn fingerprint(items: &[String]) -> String {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Split `list` into chunks whose joined length (one separator per boundary)
/// stays within [`MAX_CHUNK_CHARS`]. Items are never split; a list that fits
/// the budget comes back as a single chunk.
fn split_into_chunks(list: &[String]) -> Vec<Vec<String>> {
    let total: usize =
        list.iter().map(|s| s.chars().count()).sum::<usize>() + list.len().saturating_sub(1);
    if total <= MAX_CHUNK_CHARS {
        return vec![list.to_vec()];
    }

    let mut chunks: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    for item in list {
        let item_len = item.chars().count();
        let needed = item_len + usize::from(!current.is_empty());
        if current_len + needed > MAX_CHUNK_CHARS && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current_len += item_len + usize::from(!current.is_empty());
        current.push(item.clone());
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    rebalance_tail(&mut chunks);
    chunks
}

/// Greedy chunking can leave a tiny trailing chunk, wasting a remote call.
/// When the last chunk holds fewer than a third of the previous chunk's
/// items, merge the two and re-split near the midpoint (still within the
/// size budget).
fn rebalance_tail(chunks: &mut Vec<Vec<String>>) {
    if chunks.len() < 2 {
        return;
    }
    let last = &chunks[chunks.len() - 1];
    let second_last = &chunks[chunks.len() - 2];
    if last.len() >= second_last.len() / 3 {
        return;
    }

    let last = chunks.pop().expect("len checked above");
    let mut combined = chunks.pop().expect("len checked above");
    combined.extend(last);

    let half = combined.len() / 2;
    let mut first_half_len = 0usize;
    let mut split_index = 0usize;
    for (i, item) in combined.iter().enumerate() {
        let item_len = item.chars().count() + usize::from(i > 0);
        if first_half_len + item_len > MAX_CHUNK_CHARS || i >= half {
            split_index = i;
            break;
        }
        first_half_len += item_len;
    }
    let tail = combined.split_off(split_index.max(1));
    chunks.push(combined);
    chunks.push(tail);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_ascii_tag_moves_to_the_end() {
        assert_eq!(move_first_group_to_end("[RJ01] Title"), " Title[RJ01]");
    }

    #[test]
    fn leading_fullwidth_tag_moves_to_the_end() {
        assert_eq!(
            move_first_group_to_end("【耳舐め】ささやき"),
            "ささやき【耳舐め】"
        );
    }

    #[test]
    fn interior_tags_stay_put() {
        assert_eq!(move_first_group_to_end("Title [RJ01]"), "Title [RJ01]");
    }

    #[test]
    fn tag_relocation_is_idempotent_without_leading_tag() {
        let once = move_first_group_to_end("[tag] body");
        let twice = move_first_group_to_end(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = vec!["one".to_string(), "two".to_string()];
        let b = vec!["two".to_string(), "one".to_string()];
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), fingerprint(&a.clone()));
    }

    fn strings(lengths: &[usize]) -> Vec<String> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, len)| {
                let c = char::from(b'a' + (i % 26) as u8);
                std::iter::repeat(c).take(*len).collect()
            })
            .collect()
    }

    #[test]
    fn within_budget_is_a_single_chunk() {
        let list = strings(&[600, 600, 597]); // 1797 + 2 separators = 1799
        let chunks = split_into_chunks(&list);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], list);
    }

    #[test]
    fn over_budget_splits_without_loss_or_reorder() {
        // Five 800-char titles: 4000 chars against an 1800 budget.
        let list = strings(&[800, 800, 800, 800, 800]);
        let chunks = split_into_chunks(&list);

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            let joined: usize = chunk.iter().map(|s| s.chars().count()).sum::<usize>()
                + chunk.len().saturating_sub(1);
            assert!(joined <= MAX_CHUNK_CHARS);
        }
        let flattened: Vec<String> = chunks.concat();
        assert_eq!(flattened, list);
    }

    #[test]
    fn tiny_tail_chunk_gets_rebalanced() {
        // Eleven 170-char titles: greedy chunking leaves [10, 1]; the tail is
        // below a third of the previous chunk, so the two merge and re-split
        // near the midpoint.
        let list = strings(&[170; 11]);
        let chunks = split_into_chunks(&list);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 5);
        assert_eq!(chunks[1].len(), 6);
        assert_eq!(chunks.concat(), list);
    }

    #[test]
    fn healthy_tail_is_left_alone() {
        // Twenty 170-char titles split [10, 10]; no rebalancing.
        let list = strings(&[170; 20]);
        let chunks = split_into_chunks(&list);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[1].len(), 10);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        // Two 890-char CJK titles: within budget by character count even
        // though the byte length is far over it.
        let item: String = std::iter::repeat('あ').take(890).collect();
        let list = vec![item.clone(), item];
        assert_eq!(split_into_chunks(&list).len(), 1);
    }
}
