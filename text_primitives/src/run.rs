// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::{CharacterIndex, GlyphIndex, Length};

/// A contiguous run of glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphRun {
    /// Index of the first glyph.
    pub glyph_index: GlyphIndex,
    /// Number of glyphs in the run.
    pub number_of_glyphs: Length,
}

impl GlyphRun {
    /// Creates a new glyph run.
    pub const fn new(glyph_index: GlyphIndex, number_of_glyphs: Length) -> Self {
        Self {
            glyph_index,
            number_of_glyphs,
        }
    }

    /// Returns whether `index` falls inside the run.
    #[inline]
    pub fn contains(&self, index: GlyphIndex) -> bool {
        self.glyph_index <= index && index < self.glyph_index + self.number_of_glyphs
    }

    /// The run as a range of buffer indices.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.glyph_index as usize..(self.glyph_index + self.number_of_glyphs) as usize
    }
}

/// A contiguous run of characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CharacterRun {
    /// Index of the first character.
    pub character_index: CharacterIndex,
    /// Number of characters in the run.
    pub number_of_characters: Length,
}

impl CharacterRun {
    /// Creates a new character run.
    pub const fn new(character_index: CharacterIndex, number_of_characters: Length) -> Self {
        Self {
            character_index,
            number_of_characters,
        }
    }

    /// The run as a range of buffer indices.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.character_index as usize
            ..(self.character_index + self.number_of_characters) as usize
    }
}
