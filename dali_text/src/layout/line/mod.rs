// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line candidates and the edge overhang rules.

pub(crate) mod greedy;

use text_primitives::{
    CharacterDirection, CharacterIndex, FontMetrics, GlyphIndex, GlyphInfo, Length,
};

/// A candidate line, or the tentative part of one, while glyphs are being added to it.
///
/// Values are combined with [`merged`](Self::merged) and snapshotted by copy, so rolling back a
/// glyph that didn't fit is a plain restore of a previous value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineLayout {
    /// Index of the first glyph.
    pub(crate) glyph_index: GlyphIndex,
    /// Index of the first character.
    pub(crate) character_index: CharacterIndex,
    /// Number of glyphs that fit.
    pub(crate) number_of_glyphs: Length,
    /// Number of characters that fit.
    pub(crate) number_of_characters: Length,
    /// Sum of the advances, excluding trailing white spaces.
    pub(crate) length: f32,
    /// Leading overhang of the first glyph.
    pub(crate) extra_bearing: f32,
    /// Trailing overhang of the last glyph.
    pub(crate) extra_width: f32,
    /// Length of the white spaces at the end.
    pub(crate) ws_length_end_of_line: f32,
    /// Maximum ascender of the fonts.
    pub(crate) ascender: f32,
    /// Minimum descender of the fonts; `f32::MAX` while no font has been seen.
    pub(crate) descender: f32,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            glyph_index: 0,
            character_index: 0,
            number_of_glyphs: 0,
            number_of_characters: 0,
            length: 0.0,
            extra_bearing: 0.0,
            extra_width: 0.0,
            ws_length_end_of_line: 0.0,
            ascender: 0.0,
            descender: f32::MAX,
        }
    }
}

impl LineLayout {
    /// An empty line starting at the given glyph and character.
    pub(crate) fn starting_at(glyph_index: GlyphIndex, character_index: CharacterIndex) -> Self {
        Self {
            glyph_index,
            character_index,
            ..Self::default()
        }
    }

    /// Grows the line height to accommodate a font.
    pub(crate) fn update_height(&mut self, metrics: &FontMetrics) {
        self.ascender = self.ascender.max(metrics.ascender);
        self.descender = self.descender.min(metrics.descender);
    }

    /// Appends the tentative part `tail` to this line.
    ///
    /// White spaces at the end of `self` become inner spaces, and count towards the length, only
    /// if `tail` adds some length.
    #[must_use]
    pub(crate) fn merged(self, tail: &Self) -> Self {
        let (length, ws_length_end_of_line) = if tail.length > 0.0 {
            (
                self.length + tail.length + self.ws_length_end_of_line,
                tail.ws_length_end_of_line,
            )
        } else {
            (
                self.length + tail.length,
                self.ws_length_end_of_line + tail.ws_length_end_of_line,
            )
        };
        Self {
            number_of_characters: self.number_of_characters + tail.number_of_characters,
            number_of_glyphs: self.number_of_glyphs + tail.number_of_glyphs,
            length,
            ws_length_end_of_line,
            ascender: self.ascender.max(tail.ascender),
            descender: self.descender.min(tail.descender),
            ..self
        }
    }

    #[must_use]
    pub(crate) fn with_overhangs(self, overhangs: EdgeOverhangs) -> Self {
        Self {
            extra_bearing: overhangs.extra_bearing,
            extra_width: overhangs.extra_width,
            ..self
        }
    }
}

/// The overhangs at both ends of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeOverhangs {
    /// How much the glyph at the left edge pokes out to the left.
    pub extra_bearing: f32,
    /// How much the glyph at the right edge pokes out to the right.
    pub extra_width: f32,
}

impl EdgeOverhangs {
    /// The overhangs of a line made of one glyph.
    pub fn of_glyph(glyph: &GlyphInfo) -> Self {
        Self {
            extra_bearing: glyph.leading_overhang(),
            extra_width: glyph.overhang(),
        }
    }
}

/// Updates the edge overhangs of a line after a non white space glyph is appended to it.
///
/// A line is laid out in logical order but its edges are visual: depending on the direction of
/// the new glyph's character relative to the paragraph, to the first character of the line and
/// to the previous character, the glyph may become the leftmost or the rightmost of the line.
/// Paragraph direction `->`, `L`/`R` the new glyph:
///
/// ```text
/// same as paragraph, LTR:          |lllL    |   the glyph is at the right edge
/// same as paragraph, RTL:          |   Rrrrr|   the glyph is at the left edge
/// direction change, RTL in LTR:    |lllR    |   the glyph is at the right edge
/// direction change, LTR in RTL:    |   Lrrrr|   the glyph is at the left edge
/// same as first char, RTL in LTR:  |Rr      |   the glyph is at the left edge
/// same as first char, LTR in RTL:  |     llL|   the glyph is at the right edge
/// ```
///
/// In any other case the edges don't change.
pub fn edge_overhangs(
    current: EdgeOverhangs,
    glyph: &GlyphInfo,
    direction: CharacterDirection,
    paragraph_direction: CharacterDirection,
    first_direction: CharacterDirection,
    previous_direction: CharacterDirection,
) -> EdgeOverhangs {
    let at_left_edge = if direction == paragraph_direction {
        direction.is_rtl()
    } else if direction != previous_direction {
        !direction.is_rtl()
    } else if direction == first_direction {
        direction.is_rtl()
    } else {
        return current;
    };

    if at_left_edge {
        EdgeOverhangs {
            extra_bearing: glyph.leading_overhang(),
            ..current
        }
    } else {
        EdgeOverhangs {
            extra_width: glyph.overhang(),
            ..current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{edge_overhangs, EdgeOverhangs, LineLayout};
    use text_primitives::{CharacterDirection, GlyphInfo};

    const L: CharacterDirection = CharacterDirection::LeftToRight;
    const R: CharacterDirection = CharacterDirection::RightToLeft;

    fn current() -> EdgeOverhangs {
        EdgeOverhangs {
            extra_bearing: 100.0,
            extra_width: 200.0,
        }
    }

    // Pokes out 2 on the left and 3 on the right.
    fn glyph() -> GlyphInfo {
        GlyphInfo::new(1, 1, 10.0).with_bounds(-2.0, 8.0, 15.0, 8.0)
    }

    #[test]
    fn edge_overhang_cases() {
        // (direction, paragraph, first, previous, updates the left edge)
        let cases = [
            (L, L, L, L, Some(false)),
            (R, R, R, R, Some(true)),
            (R, L, L, L, Some(false)),
            (L, R, R, R, Some(true)),
            (R, L, R, R, Some(true)),
            (L, R, L, L, Some(false)),
            (R, L, L, R, None),
            (L, R, R, L, None),
        ];
        for (direction, paragraph, first, previous, left_edge) in cases {
            let result = edge_overhangs(current(), &glyph(), direction, paragraph, first, previous);
            let expected = match left_edge {
                Some(true) => EdgeOverhangs {
                    extra_bearing: 2.0,
                    ..current()
                },
                Some(false) => EdgeOverhangs {
                    extra_width: 3.0,
                    ..current()
                },
                None => current(),
            };
            assert_eq!(
                result, expected,
                "direction {direction:?} in paragraph {paragraph:?}, first {first:?}, previous {previous:?}"
            );
        }
    }

    #[test]
    fn merge_keeps_inner_white_spaces() {
        let line = LineLayout {
            number_of_glyphs: 5,
            number_of_characters: 5,
            length: 50.0,
            ws_length_end_of_line: 4.0,
            ascender: 8.0,
            descender: -2.0,
            ..LineLayout::default()
        };
        let word = LineLayout {
            number_of_glyphs: 3,
            number_of_characters: 3,
            length: 30.0,
            ascender: 10.0,
            descender: -1.0,
            ..LineLayout::default()
        };
        let merged = line.merged(&word);
        assert_eq!(merged.number_of_glyphs, 8);
        assert_eq!(merged.length, 84.0);
        assert_eq!(merged.ws_length_end_of_line, 0.0);
        assert_eq!(merged.ascender, 10.0);
        assert_eq!(merged.descender, -2.0);

        let spaces = LineLayout {
            number_of_glyphs: 2,
            number_of_characters: 2,
            ws_length_end_of_line: 8.0,
            ..LineLayout::default()
        };
        let merged = line.merged(&spaces);
        assert_eq!(merged.length, 50.0);
        assert_eq!(merged.ws_length_end_of_line, 12.0);
        assert_eq!(merged.descender, -2.0);
    }
}
