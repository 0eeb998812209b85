// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line fitting.

use log::trace;
use text_primitives::{
    is_white_space, CharacterDirection, GlyphIndex, LineBreakInfo, MetricsProvider,
    WordBreakInfo,
};

use super::{edge_overhangs, EdgeOverhangs, LineLayout};
use crate::layout::{LayoutEngine, LayoutMode, LayoutParameters};

/// Computes the longest run of glyphs starting at `glyph_index` that fits in one line.
///
/// The glyphs are laid out as if they were all left to right; only the overhangs at the edges
/// of the line take the character directions into account.
///
/// In multi-line mode words are kept together: a word that doesn't fit is moved to the next
/// line, unless it's the first word of the line, in which case it's split by character. With
/// `completely_fill` the line is always filled up to the last glyph that fits.
///
/// `paragraph_direction` is updated with the direction of the next paragraph when the line ends
/// at a paragraph separator.
///
/// A returned line with zero glyphs means that not even one glyph fits in the box.
pub(crate) fn line_layout_for_box<M: MetricsProvider>(
    engine: &LayoutEngine<M>,
    parameters: &LayoutParameters<'_>,
    glyph_index: GlyphIndex,
    paragraph_direction: &mut CharacterDirection,
    completely_fill: bool,
) -> LineLayout {
    let options = engine.options();
    let is_multiline = options.layout == LayoutMode::MultiLineBox;
    let box_width = parameters.bounding_box.width;
    let total_number_of_glyphs = parameters.total_number_of_glyphs();
    let last_glyph_index = total_number_of_glyphs.saturating_sub(1);

    let first_glyph = &parameters.glyphs[glyph_index as usize];
    let mut line = LineLayout::starting_at(
        glyph_index,
        parameters.glyphs_to_characters[glyph_index as usize],
    );
    let first_direction = parameters.direction(line.character_index);
    let mut previous_direction = first_direction;

    // The first glyph is at both edges of the line.
    let mut overhangs = EdgeOverhangs::of_glyph(first_glyph);

    // Room for the cursor. It takes part in the fit test but isn't part of the line's length.
    let cursor_width = options.cursor_width;

    // The part of the line that hasn't been committed yet, usually the current word.
    let mut tentative = LineLayout::default();

    let mut last_font_id = first_glyph.font_id;
    tentative.update_height(&engine.metrics().font_metrics(last_font_id));

    let mut one_word_laid_out = false;

    for index in glyph_index..total_number_of_glyphs {
        let is_last_glyph = index == last_glyph_index;
        let glyph = &parameters.glyphs[index as usize];

        if last_font_id != glyph.font_id {
            tentative.update_height(&engine.metrics().font_metrics(glyph.font_id));
            last_font_id = glyph.font_id;
        }

        // The break info of a glyph shaped from several characters is the one of its last
        // character.
        let characters_per_glyph = parameters.characters_per_glyph[index as usize];
        let character_first_index = parameters.glyphs_to_characters[index as usize];
        let character_last_index = character_first_index + characters_per_glyph.max(1) - 1;
        let line_break = parameters.line_break_info[character_last_index as usize];
        let word_break = parameters.word_break_info[character_last_index as usize];

        let snapshot = (tentative, overhangs);

        tentative.number_of_characters += characters_per_glyph;
        tentative.number_of_glyphs += 1;

        let is_white_space = is_white_space(parameters.text[character_first_index as usize]);
        let direction = parameters.direction(character_first_index);

        if is_white_space {
            // White spaces have no width; the advance is what they take.
            tentative.ws_length_end_of_line += glyph.advance;
        } else {
            tentative.length += tentative.ws_length_end_of_line + glyph.advance;
            overhangs = edge_overhangs(
                overhangs,
                glyph,
                direction,
                *paragraph_direction,
                first_direction,
                previous_direction,
            );
            tentative.ws_length_end_of_line = 0.0;
        }

        if (completely_fill || is_multiline)
            && !is_white_space
            && cursor_width
                + overhangs.extra_bearing
                + line.length
                + line.ws_length_end_of_line
                + tentative.length
                + overhangs.extra_width
                > box_width
        {
            if !one_word_laid_out || completely_fill {
                trace!("glyph {index} doesn't fit, splitting the word by character");
                // The white spaces before the glyph that doesn't fit are dropped.
                let (previous, previous_overhangs) = snapshot;
                tentative = LineLayout {
                    ws_length_end_of_line: 0.0,
                    ..previous
                };
                overhangs = previous_overhangs;
                line = line.merged(&tentative);
            } else {
                trace!("the word ending at glyph {index} doesn't fit, moved to the next line");
            }
            return line.with_overhangs(overhangs);
        }

        if (is_multiline || is_last_glyph) && line_break == LineBreakInfo::MustBreak {
            line = line.merged(&tentative);
            if !is_last_glyph {
                if let Some(directions) = parameters.character_directions {
                    if let Some(next) = directions.get(character_last_index as usize + 1) {
                        *paragraph_direction = *next;
                    }
                }
            }
            trace!("must break after glyph {index}");
            return line.with_overhangs(overhangs);
        }

        if is_multiline && word_break == WordBreakInfo::WordBreak {
            // The glyph ends a word: commit it to the line.
            one_word_laid_out = true;
            line = line.merged(&tentative);
            tentative = LineLayout::default();
        }

        previous_direction = direction;
    }

    // End of text without a mandatory break.
    line.merged(&tentative).with_overhangs(overhangs)
}
