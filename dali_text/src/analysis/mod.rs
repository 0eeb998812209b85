// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis: line and word break opportunities, character directions and the
//! character to glyph maps.
//!
//! These are the per-character buffers the [`LayoutEngine`](crate::LayoutEngine) consumes.

mod bidi;

use icu_segmenter::options::{LineBreakOptions, WordBreakInvariantOptions};
use icu_segmenter::{LineSegmenter, WordSegmenter};
use text_primitives::{
    is_new_paragraph, CharacterDirection, Length, LineBreakInfo, WordBreakInfo,
};
use unicode_bidi::BidiInfo;

use crate::layout::CharacterGlyphMap;

pub use bidi::bidirectional_line_runs;

/// The per-character analysis of a text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextAnalysis {
    /// The characters of the text.
    pub text: Vec<char>,
    /// Line break info, per character.
    pub line_break_info: Vec<LineBreakInfo>,
    /// Word break info, per character.
    pub word_break_info: Vec<WordBreakInfo>,
    /// Character directions; `None` when there is no right-to-left content.
    pub character_directions: Option<Vec<CharacterDirection>>,
    /// Whether the text ends with a paragraph separator.
    pub is_last_new_paragraph: bool,
}

impl TextAnalysis {
    /// Analyzes a text.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            line_break_info: line_break_info(text),
            word_break_info: word_break_info(text),
            character_directions: character_directions(text),
            is_last_new_paragraph: text.chars().next_back().is_some_and(is_new_paragraph),
        }
    }
}

/// Computes the line break opportunity after every character.
///
/// The character before a break opportunity gets [`LineBreakInfo::AllowBreak`]; paragraph
/// separators and the last character get [`LineBreakInfo::MustBreak`].
pub fn line_break_info(text: &str) -> Vec<LineBreakInfo> {
    let characters: Vec<char> = text.chars().collect();
    let mut info = vec![LineBreakInfo::NoBreak; characters.len()];
    if characters.is_empty() {
        return info;
    }

    let starts = character_starts(text);
    let segmenter = LineSegmenter::new_auto(LineBreakOptions::default());
    for boundary in segmenter.segment_str(text) {
        let next = starts.partition_point(|&start| start < boundary);
        if next > 0 {
            info[next - 1] = LineBreakInfo::AllowBreak;
        }
    }

    for (index, &character) in characters.iter().enumerate() {
        // A CR LF pair ends a single paragraph, after the LF.
        let is_cr_before_lf = character == '\r' && characters.get(index + 1) == Some(&'\n');
        if is_new_paragraph(character) {
            info[index] = if is_cr_before_lf {
                LineBreakInfo::NoBreak
            } else {
                LineBreakInfo::MustBreak
            };
        }
    }

    if let Some(last) = info.last_mut() {
        *last = LineBreakInfo::MustBreak;
    }
    info
}

/// Computes the word boundaries: the last character of every word, of every run of white
/// spaces and of every punctuation gets [`WordBreakInfo::WordBreak`].
pub fn word_break_info(text: &str) -> Vec<WordBreakInfo> {
    let starts = character_starts(text);
    let mut info = vec![WordBreakInfo::NoBreak; starts.len()];

    let segmenter = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
    for boundary in segmenter.segment_str(text) {
        let next = starts.partition_point(|&start| start < boundary);
        if next > 0 {
            info[next - 1] = WordBreakInfo::WordBreak;
        }
    }
    info
}

/// Resolves the direction of every character with the Unicode bidirectional algorithm.
///
/// Returns `None` when the text has no right-to-left content.
pub fn character_directions(text: &str) -> Option<Vec<CharacterDirection>> {
    let bidi_info = BidiInfo::new(text, None);
    if !bidi_info.has_rtl() {
        return None;
    }
    Some(
        text.char_indices()
            .map(|(byte, _)| CharacterDirection::from_rtl(bidi_info.levels[byte].is_rtl()))
            .collect(),
    )
}

/// Builds the character to glyph tables from the number of characters of each glyph.
///
/// Glyphs shaped from zero characters belong to the character of the next glyph.
pub fn glyph_character_maps(characters_per_glyph: &[Length]) -> CharacterGlyphMap {
    let mut glyphs_per_character = Vec::with_capacity(characters_per_glyph.len());
    let mut zero_characters_per_glyph = 0;
    for &count in characters_per_glyph {
        if count == 0 {
            zero_characters_per_glyph += 1;
        } else {
            glyphs_per_character.extend(core::iter::repeat_n(0, count as usize - 1));
            glyphs_per_character.push(1 + zero_characters_per_glyph);
            zero_characters_per_glyph = 0;
        }
    }

    let mut characters_to_glyphs = Vec::with_capacity(glyphs_per_character.len());
    let mut glyph_index = 0;
    let mut character_index = 0;
    for &count in characters_per_glyph {
        let mut number_of_glyphs = 0;
        for _ in 0..count {
            characters_to_glyphs.push(glyph_index);
            number_of_glyphs += glyphs_per_character
                .get(character_index)
                .copied()
                .unwrap_or_default();
            character_index += 1;
        }
        glyph_index += number_of_glyphs;
    }

    CharacterGlyphMap {
        characters_to_glyphs,
        glyphs_per_character,
    }
}

/// Byte offset of the start of every character.
fn character_starts(text: &str) -> Vec<usize> {
    text.char_indices().map(|(byte, _)| byte).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_primitives::LineBreakInfo::{AllowBreak, MustBreak, NoBreak};
    use text_primitives::WordBreakInfo as W;

    #[test]
    fn line_breaks() {
        assert_eq!(
            line_break_info("ab cd"),
            [NoBreak, NoBreak, AllowBreak, NoBreak, MustBreak]
        );
        assert_eq!(
            line_break_info("a\nb"),
            [NoBreak, MustBreak, MustBreak]
        );
        assert_eq!(
            line_break_info("a\r\nb"),
            [NoBreak, NoBreak, MustBreak, MustBreak]
        );
        assert!(line_break_info("").is_empty());
    }

    #[test]
    fn word_breaks() {
        assert_eq!(
            word_break_info("ab cd"),
            [W::NoBreak, W::WordBreak, W::WordBreak, W::NoBreak, W::WordBreak]
        );
    }

    #[test]
    fn directions() {
        assert_eq!(character_directions("hello"), None);

        let directions = character_directions("ab \u{05D0}\u{05D1}").unwrap();
        assert_eq!(
            directions,
            [
                CharacterDirection::LeftToRight,
                CharacterDirection::LeftToRight,
                CharacterDirection::LeftToRight,
                CharacterDirection::RightToLeft,
                CharacterDirection::RightToLeft,
            ]
        );
    }

    #[test]
    fn ligatures_and_multi_glyph_characters() {
        // A ligature of two characters, then a character shaped into two glyphs.
        let map = glyph_character_maps(&[2, 1, 0, 1]);
        assert_eq!(map.glyphs_per_character, [0, 1, 1, 2]);
        assert_eq!(map.characters_to_glyphs, [0, 0, 1, 2]);
    }

    #[test]
    fn analysis_of_a_paragraph() {
        let analysis = TextAnalysis::new("one\n");
        assert_eq!(analysis.text.len(), 4);
        assert!(analysis.is_last_new_paragraph);
        assert!(analysis.character_directions.is_none());
        assert_eq!(analysis.line_break_info[3], MustBreak);
    }
}
