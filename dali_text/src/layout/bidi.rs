// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual re-layout of right-to-left lines.

use log::trace;
use text_primitives::{GlyphInfo, Vector2};

use super::{BidirectionalLineInfoRun, CharacterGlyphMap, LayoutParameters};
use crate::Error;

pub(super) fn relayout_right_to_left_lines(
    parameters: &LayoutParameters<'_>,
    bidirectional_lines: &[BidirectionalLineInfoRun],
    map: &CharacterGlyphMap,
    glyph_positions: &mut [Vector2],
) -> Result<(), Error> {
    validate(parameters, bidirectional_lines, map, glyph_positions.len())?;

    for bidi_line in bidirectional_lines {
        let first_character = bidi_line.character_run.character_index;
        let Some(&first_visual) = bidi_line.visual_to_logical_map.first() else {
            continue;
        };
        trace!(
            "re-laying out {} characters from {first_character} in visual order",
            bidi_line.character_run.number_of_characters
        );

        let first_glyph = map.characters_to_glyphs[(first_character + first_visual) as usize];
        let mut pen_x = parameters
            .glyphs
            .get(first_glyph as usize)
            .map_or(0.0, GlyphInfo::leading_overhang);

        for &logical in bidi_line
            .visual_to_logical_map
            .iter()
            .take(bidi_line.character_run.number_of_characters as usize)
        {
            let character = (first_character + logical) as usize;
            let first_glyph = map.characters_to_glyphs[character] as usize;
            let number_of_glyphs = map.glyphs_per_character[character] as usize;

            for glyph_index in first_glyph..first_glyph + number_of_glyphs {
                let glyph = &parameters.glyphs[glyph_index];
                glyph_positions[glyph_index].x = pen_x + glyph.x_bearing;
                pen_x += glyph.advance;
            }
        }
    }
    Ok(())
}

/// Checks that every character of the runs, and every glyph of those characters, is in the
/// buffers.
fn validate(
    parameters: &LayoutParameters<'_>,
    bidirectional_lines: &[BidirectionalLineInfoRun],
    map: &CharacterGlyphMap,
    number_of_positions: usize,
) -> Result<(), Error> {
    let number_of_glyphs = parameters.glyphs.len().min(number_of_positions);
    for bidi_line in bidirectional_lines {
        let characters = bidi_line.character_run.range();
        if characters.end > map.characters_to_glyphs.len()
            || characters.end > map.glyphs_per_character.len()
        {
            return Err(Error::inconsistent_buffers("characters_to_glyphs"));
        }
        let out_of_run = bidi_line
            .visual_to_logical_map
            .iter()
            .take(characters.len())
            .any(|&logical| logical as usize >= characters.len());
        if out_of_run {
            return Err(Error::inconsistent_buffers("visual_to_logical_map"));
        }
        let out_of_glyphs = characters.clone().any(|character| {
            map.characters_to_glyphs[character] as usize
                + map.glyphs_per_character[character] as usize
                > number_of_glyphs
        });
        if out_of_glyphs {
            return Err(Error::inconsistent_buffers("glyph_positions"));
        }
    }
    Ok(())
}
