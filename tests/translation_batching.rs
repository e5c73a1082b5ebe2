//! End-to-end behavior of the translation batcher against mock transports:
//! chunk fan-out, result caching, failure policies, and the listing/tree
//! fallback paths built on top of it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use asmr_catalog::api::models::{Folder, MediaTreeNode};
use asmr_catalog::error::{AsmrError, Result};
use asmr_catalog::{
    AsmrApi, LyricLine, Settings, TimedLyrics, TranslationTransport, Translator,
};

/// Appends `~` to every line, so each input maps to a distinct, predictable
/// output while the line count stays intact. The call counter is shared so
/// tests can observe fan-out and cache hits from outside.
#[derive(Clone, Default)]
struct EchoTransport {
    calls: Arc<AtomicUsize>,
}

impl TranslationTransport for EchoTransport {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lines: Vec<String> = text.split('\n').map(|line| format!("{line}~")).collect();
        Ok(lines.join("\n"))
    }
}

/// Echoes like [`EchoTransport`] but stalls the first request it receives,
/// so later chunks complete before earlier ones.
#[derive(Clone, Default)]
struct SlowFirstTransport {
    calls: Arc<AtomicUsize>,
}

impl TranslationTransport for SlowFirstTransport {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        let lines: Vec<String> = text.split('\n').map(|line| format!("{line}~")).collect();
        Ok(lines.join("\n"))
    }
}

/// Drops the first line of every chunk, breaking the per-chunk count check.
struct DroppingTransport;

impl TranslationTransport for DroppingTransport {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        let lines: Vec<&str> = text.split('\n').skip(1).collect();
        Ok(lines.join("\n"))
    }
}

fn items(prefix: &str, count: usize, len: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let mut s = format!("{prefix}{i}-");
            while s.chars().count() < len {
                s.push('x');
            }
            s
        })
        .collect()
}

#[tokio::test]
async fn small_batch_is_one_transport_call() {
    let transport = EchoTransport::default();
    let calls = transport.calls.clone();
    let translator = Translator::new(transport);
    let list = items("t", 3, 10);

    let map = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(map.len(), 3);
    for item in &list {
        assert_eq!(map[item], format!("{item}~"));
    }
}

#[tokio::test]
async fn oversized_batch_fans_out_and_keeps_the_mapping() {
    let transport = EchoTransport::default();
    let calls = transport.calls.clone();
    let translator = Translator::new(transport);
    // Five 800-char items cannot fit one 1800-char request.
    let list = items("big", 5, 800);

    let map = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    assert!(calls.load(Ordering::SeqCst) >= 3);
    assert_eq!(map.len(), 5);
    for item in &list {
        assert_eq!(map[item], format!("{item}~"));
    }
}

#[tokio::test]
async fn completion_order_does_not_affect_reassembly() {
    let transport = SlowFirstTransport::default();
    let calls = transport.calls.clone();
    let translator = Translator::new(transport);
    // Multiple chunks, with the first chunk's request finishing last.
    let list = items("slow", 5, 800);

    let map = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    assert!(calls.load(Ordering::SeqCst) >= 3);
    for item in &list {
        assert_eq!(map[item], format!("{item}~"));
    }
}

#[tokio::test]
async fn repeated_batch_is_served_from_cache() {
    let transport = EchoTransport::default();
    let calls = transport.calls.clone();
    let translator = Translator::new(transport);
    let list = items("c", 4, 20);

    let first = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();
    let calls_after_first = calls.load(Ordering::SeqCst);

    let second = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), calls_after_first);
    assert_eq!(first, second);
}

#[tokio::test]
async fn duplicate_items_collapse_in_the_result_map() {
    let translator = Translator::new(EchoTransport::default());
    let list = vec!["same".to_string(), "same".to_string(), "other".to_string()];

    let map = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map["same"], "same~");
    assert_eq!(map["other"], "other~");
}

#[tokio::test]
async fn line_count_mismatch_is_soft_or_hard_by_flag() {
    let translator = Translator::new(DroppingTransport);
    let list = items("m", 3, 10);

    let soft = translator.translate_list(&list, "en", false).await.unwrap();
    assert!(soft.is_none());

    let hard = translator.translate_list(&list, "en", true).await;
    assert!(matches!(
        hard,
        Err(AsmrError::TranslationMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[tokio::test]
async fn leading_bracket_tags_move_to_the_tail() {
    let translator = Translator::new(EchoTransport::default());
    let list = vec!["[RJ123456] Whisper".to_string()];

    let map = translator
        .translate_list(&list, "en", false)
        .await
        .unwrap()
        .unwrap();

    // The echo transport returns "[RJ123456] Whisper~"; normalization then
    // relocates the tag.
    assert_eq!(map["[RJ123456] Whisper"], " Whisper~[RJ123456]");
}

#[tokio::test]
async fn failed_folder_translation_keeps_original_titles() {
    let translator = Translator::new(DroppingTransport);
    let mut root = Folder::root(vec![
        MediaTreeNode::Folder(Folder {
            title: "mp3".to_string(),
            untranslated_title: String::new(),
            children: Vec::new(),
        }),
        MediaTreeNode::Folder(Folder {
            title: "おまけ".to_string(),
            untranslated_title: String::new(),
            children: Vec::new(),
        }),
    ]);

    translator.translate_folder(&mut root, "en").await.unwrap();

    assert_eq!(root.children[0].title(), "mp3");
    assert_eq!(root.children[1].title(), "おまけ");
}

#[tokio::test]
async fn lyrics_translation_is_hard_fail() {
    let mut lyrics = TimedLyrics {
        lines: vec![
            LyricLine {
                text: "line one".to_string(),
                start_ms: 0,
                end_ms: 1000,
            },
            LyricLine {
                text: "line two".to_string(),
                start_ms: 1000,
                end_ms: 2000,
            },
        ],
    };

    let result = lyrics
        .translate(&Translator::new(DroppingTransport), "en")
        .await;
    assert!(result.is_err());

    // With a healthy transport the cue order and timing are untouched.
    let mut lyrics_ok = lyrics.clone();
    lyrics_ok
        .translate(&Translator::new(EchoTransport::default()), "en")
        .await
        .unwrap();
    assert_eq!(lyrics_ok.lines[0].text, "line one~");
    assert_eq!(lyrics_ok.lines[1].text, "line two~");
    assert_eq!(lyrics_ok.lines[0].start_ms, 0);
    assert_eq!(lyrics_ok.lines[1].end_ms, 2000);
}

#[tokio::test]
async fn unauthenticated_account_listings_are_empty_pages() {
    let api = AsmrApi::with_transport(Settings::default(), EchoTransport::default()).unwrap();

    let favorites = api.favorites_page(None).await.unwrap();
    assert!(favorites.items.is_empty());
    assert!(favorites.continuation.is_none());

    let playlists = api.playlists_page(None).await.unwrap();
    assert!(playlists.items.is_empty());
    assert!(playlists.continuation.is_none());
}
