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

//! Media-tree traversal and path algorithms
//!
//! A work's media tree is an arbitrarily nested folder structure that may
//! bundle several quality/format folders ("mp3", "wav", bonus material).
//! These algorithms locate playable audio inside it, resolve `/`-delimited
//! title paths, and collect/rewrite titles for the translation pipeline.
//!
//! All traversals are deterministic pre-order walks over the insertion-order
//! child list. Lookups never fail: a missing file or hash is `None`/empty,
//! and an unresolvable path resolves to the deepest folder reached.

use std::collections::HashMap;

use crate::api::models::{AudioFile, Folder, MediaTreeNode};

impl Folder {
    /// Pick the "best" folder of playable audio in this tree.
    ///
    /// Folders titled `"mp3"` (case-insensitive) are preferred: among them,
    /// the one with the most direct audio children wins, first-found breaking
    /// ties. If no such folder exists or all are empty, falls back to a
    /// global scan for the folder (the root included) with the most direct
    /// audio children.
    ///
    /// Returns `None` only if no folder anywhere has a direct audio child.
    pub fn find_main_audio_folder(&self) -> Option<String> {
        let mp3_paths = self.find_all_folders_with_title("mp3");
        let mut best: Option<(&str, usize)> = None;
        for path in &mp3_paths {
            let count = self.get_folder(path).get_all_audio_files(false).len();
            if count == 0 {
                continue;
            }
            // Strictly greater, so the first-found path wins ties.
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((path, count));
            }
        }
        if let Some((path, _)) = best {
            return Some(path.to_string());
        }
        self.find_folder_with_most_audio_files().0
    }

    /// Pre-order collection of the paths of every folder whose title equals
    /// `title` case-insensitively. Matching folders are not descended into.
    pub fn find_all_folders_with_title(&self, title: &str) -> Vec<String> {
        fn walk(folder: &Folder, title: &str, current_path: &str, result: &mut Vec<String>) {
            for item in &folder.children {
                let MediaTreeNode::Folder(child) = item else {
                    continue;
                };
                let item_path = if current_path.is_empty() {
                    child.title.clone()
                } else {
                    format!("{current_path}/{}", child.title)
                };
                if child.title.eq_ignore_ascii_case(title) {
                    result.push(item_path);
                } else {
                    walk(child, title, &item_path, result);
                }
            }
        }
        let mut result = Vec::new();
        walk(self, title, "", &mut result);
        result
    }

    /// Path and direct-audio-child count of the fullest folder in the
    /// subtree, the root itself included (its path is the empty string).
    /// Pre-order with strictly-greater comparisons: the first-found folder
    /// wins ties.
    pub fn find_folder_with_most_audio_files(&self) -> (Option<String>, usize) {
        fn walk(folder: &Folder, current_path: &str) -> (Option<String>, usize) {
            let mut max_count = 0;
            let mut max_path = None;
            let own_count = folder.get_all_audio_files(false).len();
            if own_count > 0 {
                max_count = own_count;
                max_path = Some(current_path.to_string());
            }
            for item in &folder.children {
                if let MediaTreeNode::Folder(child) = item {
                    let item_path = if current_path.is_empty() {
                        child.title.clone()
                    } else {
                        format!("{current_path}/{}", child.title)
                    };
                    let (sub_path, sub_count) = walk(child, &item_path);
                    if sub_path.is_some() && sub_count > max_count {
                        max_count = sub_count;
                        max_path = sub_path;
                    }
                }
            }
            (max_path, max_count)
        }
        walk(self, "")
    }

    /// Navigate a `/`-delimited sequence of folder titles from this folder.
    ///
    /// On the first unmatched segment, traversal stops and the deepest
    /// successfully reached folder is returned. This silent partial match is
    /// part of the contract: callers needing strict resolution must validate
    /// the returned folder themselves.
    pub fn get_folder(&self, path: &str) -> &Folder {
        let mut current = self;
        for segment in path.split('/') {
            let next = current.children.iter().find_map(|item| match item {
                MediaTreeNode::Folder(child) if child.title == segment => Some(child),
                _ => None,
            });
            match next {
                Some(folder) => current = folder,
                None => break,
            }
        }
        current
    }

    /// Direct `Audio` children in original order, or with `recursive` every
    /// `Audio` leaf anywhere in the subtree in depth-first order.
    pub fn get_all_audio_files(&self, recursive: bool) -> Vec<&AudioFile> {
        let mut result = Vec::new();
        for item in &self.children {
            match item {
                MediaTreeNode::Audio(audio) => result.push(audio),
                MediaTreeNode::Folder(child) if recursive => {
                    result.extend(child.get_all_audio_files(true));
                }
                _ => {}
            }
        }
        result
    }

    /// Parent folder whose direct children contain an `Audio` with the given
    /// hash; first match in pre-order.
    pub fn find_folder_with_audio(&self, hash: &str) -> Option<&Folder> {
        for item in &self.children {
            match item {
                MediaTreeNode::Audio(audio) if audio.hash == hash => return Some(self),
                MediaTreeNode::Folder(child) => {
                    if let Some(found) = child.find_folder_with_audio(hash) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// First node in pre-order whose `title` or `untranslated_title` equals
    /// the given string. Used to locate a subtitle file by track title under
    /// either its translated or original name.
    pub fn find_file(&self, title: &str) -> Option<&MediaTreeNode> {
        for item in &self.children {
            if item.title() == title || item.untranslated_title() == title {
                return Some(item);
            }
            if let MediaTreeNode::Folder(child) = item {
                if let Some(found) = child.find_file(title) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Pre-order collection of every subfolder's and leaf's current title.
    /// Pairs with [`Folder::apply_translations`].
    pub fn get_all_titles(&self) -> Vec<String> {
        let mut result = Vec::new();
        for item in &self.children {
            result.push(item.title().to_string());
            if let MediaTreeNode::Folder(child) = item {
                result.extend(child.get_all_titles());
            }
        }
        result
    }

    /// Rewrite every subfolder's and leaf's title from the translation map,
    /// in the same pre-order as [`Folder::get_all_titles`]. Titles absent
    /// from the map are left as-is.
    pub fn apply_translations(&mut self, translations: &HashMap<String, String>) {
        for item in &mut self.children {
            if let Some(translated) = translations.get(item.title()) {
                item.set_title(translated.clone());
            }
            if let MediaTreeNode::Folder(child) = item {
                child.apply_translations(translations);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::WorkRef;

    fn work_ref() -> WorkRef {
        WorkRef {
            id: 1,
            source_id: "RJ00001".to_string(),
            source_type: "DLSITE".to_string(),
        }
    }

    fn audio(title: &str, hash: &str) -> MediaTreeNode {
        MediaTreeNode::Audio(AudioFile {
            title: title.to_string(),
            untranslated_title: title.to_string(),
            hash: hash.to_string(),
            work: work_ref(),
            work_title: "work".to_string(),
            media_stream_url: format!("https://stream/{hash}"),
            media_download_url: format!("https://download/{hash}"),
            stream_low_quality_url: None,
            duration: 90.5,
            size: 1024,
        })
    }

    fn folder(title: &str, children: Vec<MediaTreeNode>) -> MediaTreeNode {
        MediaTreeNode::Folder(Folder {
            title: title.to_string(),
            untranslated_title: title.to_string(),
            children,
        })
    }

    /// root ── mp3 ── [a1 a2 a3]
    ///      ── wav ── [b1..b5]
    ///      ── extra ── mp3 ── [c1]
    fn sample_tree() -> Folder {
        Folder::root(vec![
            folder("mp3", vec![audio("t1", "a1"), audio("t2", "a2"), audio("t3", "a3")]),
            folder(
                "wav",
                vec![
                    audio("t1", "b1"),
                    audio("t2", "b2"),
                    audio("t3", "b3"),
                    audio("t4", "b4"),
                    audio("t5", "b5"),
                ],
            ),
            folder("extra", vec![folder("MP3", vec![audio("bonus", "c1")])]),
        ])
    }

    #[test]
    fn mp3_preference_overrides_raw_count() {
        // wav holds more audio, but an mp3 folder with any audio wins.
        let tree = sample_tree();
        assert_eq!(tree.find_main_audio_folder().as_deref(), Some("mp3"));
    }

    #[test]
    fn fullest_mp3_folder_wins_among_equals() {
        let tree = Folder::root(vec![
            folder("disc1", vec![folder("mp3", vec![audio("x", "a")])]),
            folder(
                "disc2",
                vec![folder("mp3", vec![audio("y", "b"), audio("z", "c")])],
            ),
        ]);
        assert_eq!(tree.find_main_audio_folder().as_deref(), Some("disc2/mp3"));
    }

    #[test]
    fn falls_back_to_global_scan_without_mp3_folders() {
        let tree = Folder::root(vec![
            folder("wav", vec![audio("x", "a")]),
            folder("flac", vec![audio("y", "b"), audio("z", "c")]),
        ]);
        assert_eq!(tree.find_main_audio_folder().as_deref(), Some("flac"));
    }

    #[test]
    fn empty_mp3_folder_does_not_shadow_fallback() {
        let tree = Folder::root(vec![
            folder("mp3", vec![]),
            folder("wav", vec![audio("x", "a")]),
        ]);
        assert_eq!(tree.find_main_audio_folder().as_deref(), Some("wav"));
    }

    #[test]
    fn no_audio_anywhere_yields_none() {
        let tree = Folder::root(vec![folder("art", vec![])]);
        assert_eq!(tree.find_main_audio_folder(), None);
    }

    #[test]
    fn ties_go_to_first_in_preorder() {
        let tree = Folder::root(vec![
            folder("first", vec![audio("x", "a"), audio("y", "b")]),
            folder("second", vec![audio("x", "c"), audio("y", "d")]),
        ]);
        let (path, count) = tree.find_folder_with_most_audio_files();
        assert_eq!(path.as_deref(), Some("first"));
        assert_eq!(count, 2);
    }

    #[test]
    fn get_folder_resolves_exact_paths() {
        let tree = sample_tree();
        assert_eq!(tree.get_folder("extra/MP3").title, "MP3");
        assert_eq!(tree.get_folder("mp3").title, "mp3");
    }

    #[test]
    fn get_folder_partial_match_returns_deepest_reached() {
        let tree = sample_tree();
        // "extra" resolves, "nope" does not: traversal stops at "extra".
        assert_eq!(tree.get_folder("extra/nope/deeper").title, "extra");
        // Nothing resolves: the root itself comes back.
        assert_eq!(tree.get_folder("missing").title, "root");
    }

    #[test]
    fn direct_audio_listing_preserves_order() {
        let tree = sample_tree();
        let direct: Vec<&str> = tree
            .get_folder("wav")
            .get_all_audio_files(false)
            .iter()
            .map(|a| a.hash.as_str())
            .collect();
        assert_eq!(direct, ["b1", "b2", "b3", "b4", "b5"]);
        // Root has no direct audio children.
        assert!(tree.get_all_audio_files(false).is_empty());
    }

    #[test]
    fn recursive_audio_listing_covers_the_subtree() {
        let tree = sample_tree();
        let all: Vec<&str> = tree
            .get_all_audio_files(true)
            .iter()
            .map(|a| a.hash.as_str())
            .collect();
        assert_eq!(all, ["a1", "a2", "a3", "b1", "b2", "b3", "b4", "b5", "c1"]);
    }

    #[test]
    fn find_folder_with_audio_returns_the_parent() {
        let tree = sample_tree();
        let parent = tree.find_folder_with_audio("c1").expect("should find c1");
        assert_eq!(parent.title, "MP3");
        assert!(tree.find_folder_with_audio("missing").is_none());
    }

    #[test]
    fn find_file_matches_translated_and_original_names() {
        let mut tree = sample_tree();
        let translations =
            HashMap::from([("t1".to_string(), "translated one".to_string())]);
        tree.apply_translations(&translations);

        let by_translated = tree.find_file("translated one").expect("by new title");
        let by_original = tree.find_file("t1").expect("by original title");
        assert_eq!(by_translated.untranslated_title(), "t1");
        assert_eq!(by_original.untranslated_title(), "t1");
        assert!(tree.find_file("never existed").is_none());
    }

    #[test]
    fn titles_round_trip_through_apply_translations() {
        let mut tree = sample_tree();
        let titles = tree.get_all_titles();
        assert!(titles.contains(&"mp3".to_string()));
        assert!(titles.contains(&"bonus".to_string()));

        let translations: HashMap<String, String> = titles
            .iter()
            .map(|t| (t.clone(), format!("{t}-en")))
            .collect();
        tree.apply_translations(&translations);

        assert_eq!(tree.get_folder("mp3-en").title, "mp3-en");
        assert_eq!(
            tree.get_folder("mp3-en").get_all_audio_files(false)[0].title,
            "t1-en"
        );
        // Untranslated titles are untouched.
        assert_eq!(
            tree.get_folder("mp3-en").get_all_audio_files(false)[0].untranslated_title,
            "t1"
        );
    }

    #[test]
    fn clone_is_a_full_deep_copy() {
        let tree = sample_tree();
        let mut copy = tree.clone();
        copy.apply_translations(&HashMap::from([(
            "t1".to_string(),
            "mutated".to_string(),
        )]));

        // The copy changed; the source did not.
        assert!(copy.find_file("mutated").is_some());
        assert!(tree.find_file("mutated").is_none());
        assert_eq!(tree.get_folder("mp3").get_all_audio_files(false)[0].title, "t1");
    }
}
