// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text layout driver.

use log::{debug, trace};
use text_primitives::{
    CharacterDirection, CharacterRun, GlyphInfo, GlyphRun, MetricsProvider, Size, Vector2,
};

use super::line::greedy::line_layout_for_box;
use super::line::LineLayout;
use super::{len_u32, LayoutEngine, LayoutMode, LayoutOutput, LayoutParameters, LineRun};
use crate::Error;

pub(super) fn layout_text<M: MetricsProvider>(
    engine: &LayoutEngine<M>,
    parameters: &LayoutParameters<'_>,
) -> Result<LayoutOutput, Error> {
    let options = engine.options();
    let bounding_box = parameters.bounding_box;
    let is_multiline = options.layout == LayoutMode::MultiLineBox;
    let total_number_of_glyphs = parameters.total_number_of_glyphs();

    debug!(
        "laying out {total_number_of_glyphs} glyphs in a {}x{} box",
        bounding_box.width, bounding_box.height
    );

    let mut output = LayoutOutput {
        glyph_positions: vec![Vector2::ZERO; total_number_of_glyphs as usize],
        lines: Vec::new(),
        actual_size: Size::ZERO,
    };

    let mut paragraph_direction = parameters
        .character_directions
        .and_then(|directions| directions.first().copied())
        .unwrap_or_default();

    let mut pen_y = 0.0;
    let mut index = 0;
    while index < total_number_of_glyphs {
        let current_paragraph_direction = paragraph_direction;

        let layout = line_layout_for_box(engine, parameters, index, &mut paragraph_direction, false);
        trace!(
            "line at glyph {index}: {} glyphs, {} characters, length {}",
            layout.number_of_glyphs,
            layout.number_of_characters,
            layout.length
        );

        if layout.number_of_glyphs == 0 {
            debug!("the box is too narrow to lay out glyph {index}");
            return Err(Error::box_too_narrow(index));
        }

        pen_y += layout.ascender;

        let overflows_height = pen_y - layout.descender > bounding_box.height;
        let overflows_width = options.layout == LayoutMode::SingleLineBox
            && options.cursor_width + layout.extra_bearing + layout.length + layout.extra_width
                > bounding_box.width;

        if options.ellipsis_enabled && (overflows_height || overflows_width) {
            // No more lines fit. The last line is laid out again, filling it up completely,
            // even if that splits a word.
            let start = match output.lines.pop() {
                Some(last) => {
                    pen_y -= layout.ascender - last.descender;
                    output.actual_size.height -= last.height();
                    last.glyph_run.glyph_index
                }
                None => 0,
            };

            let mut direction = current_paragraph_direction;
            let filled = line_layout_for_box(engine, parameters, start, &mut direction, true);
            let line = LineRun {
                extra_length: trailing_length(&filled),
                ellipsis: true,
                ..line_run(start, &filled, filled.length)
            };
            debug!(
                "ellipsis at line {}: {} glyphs fit",
                output.lines.len(),
                line.glyph_run.number_of_glyphs
            );

            output.actual_size.width = bounding_box.width;
            output.actual_size.height += line.height();

            set_glyph_positions(
                &parameters.glyphs[line.glyph_run.range()],
                pen_y,
                &mut output.glyph_positions[line.glyph_run.range()],
            );
            output.lines.push(line);
            break;
        }

        let is_last_line = index + layout.number_of_glyphs == total_number_of_glyphs;

        let line = if is_last_line && !parameters.is_last_new_paragraph {
            // The trailing white spaces of the text count towards its width.
            let width = layout.extra_bearing
                + layout.length
                + layout.extra_width
                + layout.ws_length_end_of_line;
            let width = if is_multiline {
                width.min(bounding_box.width)
            } else {
                width
            };
            line_run(index, &layout, width)
        } else {
            LineRun {
                extra_length: trailing_length(&layout),
                ..line_run(
                    index,
                    &layout,
                    layout.extra_bearing + layout.length + layout.extra_width,
                )
            }
        };

        output.actual_size.width = output.actual_size.width.max(line.width);
        output.actual_size.height += line.height();

        set_glyph_positions(
            &parameters.glyphs[line.glyph_run.range()],
            pen_y,
            &mut output.glyph_positions[line.glyph_run.range()],
        );
        output.lines.push(line);

        pen_y -= layout.descender;
        index += layout.number_of_glyphs;

        if is_last_line && parameters.is_last_new_paragraph && is_multiline {
            // An empty line after the last paragraph separator. It has no glyphs but takes the
            // height of the last glyph's font.
            let last_glyph = &parameters.glyphs[total_number_of_glyphs as usize - 1];
            let metrics = engine.metrics().font_metrics(last_glyph.font_id);
            let line = LineRun {
                glyph_run: GlyphRun::new(total_number_of_glyphs, 0),
                character_run: CharacterRun::new(len_u32(parameters.text.len()), 0),
                ascender: metrics.ascender,
                descender: metrics.descender,
                ..LineRun::default()
            };
            output.actual_size.height += line.height();
            output.lines.push(line);
        }
    }

    debug!(
        "laid out {} lines, actual size {}x{}",
        output.lines.len(),
        output.actual_size.width,
        output.actual_size.height
    );

    Ok(output)
}

fn line_run(glyph_index: u32, layout: &LineLayout, width: f32) -> LineRun {
    LineRun {
        glyph_run: GlyphRun::new(glyph_index, layout.number_of_glyphs),
        character_run: CharacterRun::new(layout.character_index, layout.number_of_characters),
        width,
        extra_length: 0.0,
        ascender: layout.ascender,
        descender: layout.descender,
        direction: CharacterDirection::LeftToRight,
        alignment_offset: 0.0,
        ellipsis: false,
    }
}

/// The trailing white spaces not covered by the overhang of the last glyph.
fn trailing_length(layout: &LineLayout) -> f32 {
    if layout.ws_length_end_of_line > 0.0 {
        layout.ws_length_end_of_line - layout.extra_width
    } else {
        0.0
    }
}

/// Places the glyphs of a line along the baseline at `pen_y`.
///
/// The pen starts far enough to the right for the first glyph not to poke out of the line.
pub(crate) fn set_glyph_positions(glyphs: &[GlyphInfo], pen_y: f32, positions: &mut [Vector2]) {
    let Some(first) = glyphs.first() else {
        return;
    };
    let mut pen_x = first.leading_overhang();
    for (glyph, position) in glyphs.iter().zip(positions) {
        position.x = pen_x + glyph.x_bearing;
        position.y = pen_y - glyph.y_bearing;
        pen_x += glyph.advance;
    }
}
