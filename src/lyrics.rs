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

//! Timed subtitles
//!
//! Works ship per-track subtitle files (`.vtt`, occasionally `.lrc`) inside
//! their media tree. This module parses WebVTT-style cue lists into
//! [`TimedLyrics`] and translates cue text as one hard-fail batch: lyrics are
//! positional, so a partially translated cue list is worse than none.

use crate::api::catalog::AsmrApi;
use crate::api::models::MediaTreeNode;
use crate::error::{AsmrError, Result};
use crate::translate::{TranslationTransport, Translator};

/// One subtitle cue.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// An ordered cue list for one track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimedLyrics {
    pub lines: Vec<LyricLine>,
}

impl TimedLyrics {
    /// Translate every cue in one batch, in place. Any chunking or transport
    /// failure is an error; cue count and order are preserved exactly.
    pub async fn translate<T: TranslationTransport>(
        &mut self,
        translator: &Translator<T>,
        target_lang: &str,
    ) -> Result<()> {
        let texts: Vec<String> = self.lines.iter().map(|line| line.text.clone()).collect();
        if let Some(translations) = translator.translate_list(&texts, target_lang, true).await? {
            for line in &mut self.lines {
                if let Some(text) = translations.get(&line.text) {
                    line.text = text.clone();
                }
            }
        }
        Ok(())
    }
}

/// Parse a WebVTT-style document into cues.
///
/// Accepts the header line (`WEBVTT`), numeric cue-index lines (skipped),
/// `start --> end` timestamp lines in `HH:MM:SS.mmm` or `MM:SS.mmm` form, and
/// multi-line cue text terminated by a blank line. Text without a preceding
/// timestamp is ignored, so non-cue content degrades to an empty list rather
/// than an error; malformed timestamps on a cue line do error.
pub fn parse_vtt(content: &str) -> Result<TimedLyrics> {
    let mut lines = content.lines();
    let mut pending = lines.next();
    if pending.map(str::trim) == Some("WEBVTT") {
        pending = None;
    }

    let mut cues: Vec<LyricLine> = Vec::new();
    let mut current_span: Option<(u64, u64)> = None;
    let mut current_text = String::new();

    let mut flush = |span: &mut Option<(u64, u64)>, text: &mut String| {
        if let Some((start_ms, end_ms)) = span.take() {
            if !text.is_empty() {
                cues.push(LyricLine {
                    text: std::mem::take(text).trim().to_string(),
                    start_ms,
                    end_ms,
                });
            }
        }
        text.clear();
    };

    for line in pending.into_iter().chain(lines) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut current_span, &mut current_text);
        } else if trimmed.contains("-->") {
            current_span = Some(parse_cue_span(trimmed)?);
        } else if !is_index_line(trimmed) && current_span.is_some() {
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }
    }
    flush(&mut current_span, &mut current_text);

    Ok(TimedLyrics { lines: cues })
}

fn parse_cue_span(line: &str) -> Result<(u64, u64)> {
    let mut parts = line.splitn(2, "-->");
    let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
        return Err(AsmrError::InvalidInput(format!(
            "Invalid timestamp line: {line}"
        )));
    };
    Ok((
        parse_time_to_millis(start.trim())?,
        parse_time_to_millis(end.trim())?,
    ))
}

/// `HH:MM:SS.mmm` or `MM:SS.mmm`; fractional part optional and padded or
/// truncated to milliseconds.
fn parse_time_to_millis(timestamp: &str) -> Result<u64> {
    let invalid = || AsmrError::InvalidInput(format!("Invalid timestamp: {timestamp}"));

    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(invalid());
    }

    let hours: u64 = if parts.len() == 3 {
        parts[0].parse().map_err(|_| invalid())?
    } else {
        0
    };
    let minutes: u64 = parts[parts.len() - 2].parse().map_err(|_| invalid())?;

    let mut seconds_parts = parts[parts.len() - 1].splitn(2, '.');
    let seconds: u64 = seconds_parts
        .next()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;
    let millis: u64 = match seconds_parts.next() {
        Some(fraction) => {
            let mut digits: String = fraction.chars().take(3).collect();
            while digits.len() < 3 {
                digits.push('0');
            }
            digits.parse().map_err(|_| invalid())?
        }
        None => 0,
    };

    Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

/// Bare cue-index lines (`1`, `2`, ...) carry no content.
fn is_index_line(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

impl<T: TranslationTransport> AsmrApi<T> {
    /// Timed lyrics for a track, located in the work's media tree by its
    /// untranslated title: `"{title}.vtt"` first, then the `.lrc` fallback
    /// with any `.mp3`/`.wav` suffix stripped. `Ok(None)` when the work has
    /// no subtitle file for this track.
    pub async fn timed_lyrics(
        &self,
        work_id: &str,
        untranslated_title: &str,
    ) -> Result<Option<TimedLyrics>> {
        let tree = self.work_media_tree(work_id).await?;

        let vtt_title = format!("{untranslated_title}.vtt");
        let lrc_title = format!(
            "{}.lrc",
            untranslated_title
                .trim_end_matches(".mp3")
                .trim_end_matches(".wav")
        );
        let file = match tree
            .find_file(&vtt_title)
            .or_else(|| tree.find_file(&lrc_title))
        {
            Some(MediaTreeNode::Text(file)) => file,
            _ => return Ok(None),
        };

        let content = self.subtitle_file(&file.media_download_url).await?;
        let mut lyrics = parse_vtt(&content)?;
        lyrics
            .translate(self.translator(), &self.settings().translation_language)
            .await?;
        Ok(Some(lyrics))
    }
}
