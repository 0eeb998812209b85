// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer's view of a finished layout.

use log::trace;
use smallvec::SmallVec;
use text_primitives::{FontClient, GlyphIndex, GlyphInfo, Length, Size, Vector2};

use crate::layout::{LayoutOutput, LineRun};

/// A finished layout, as seen by a renderer.
#[derive(Clone, Copy, Debug)]
pub struct TextView<'a> {
    glyphs: &'a [GlyphInfo],
    glyph_positions: &'a [Vector2],
    lines: &'a [LineRun],
    control_size: Size,
}

impl<'a> TextView<'a> {
    /// Creates a view of laid-out glyphs.
    pub fn new(
        glyphs: &'a [GlyphInfo],
        glyph_positions: &'a [Vector2],
        lines: &'a [LineRun],
        control_size: Size,
    ) -> Self {
        Self {
            glyphs,
            glyph_positions,
            lines,
            control_size,
        }
    }

    /// Creates a view of the output of a layout pass.
    pub fn from_layout(glyphs: &'a [GlyphInfo], output: &'a LayoutOutput, control_size: Size) -> Self {
        Self::new(glyphs, &output.glyph_positions, &output.lines, control_size)
    }

    /// The size of the control the text is rendered into.
    pub fn control_size(&self) -> Size {
        self.control_size
    }

    /// The laid-out lines.
    pub fn lines(&self) -> &'a [LineRun] {
        self.lines
    }

    /// The number of glyphs with a position.
    pub fn number_of_glyphs(&self) -> Length {
        crate::layout::len_u32(self.glyphs.len().min(self.glyph_positions.len()))
    }

    /// The index of the first line and the number of lines that hold glyphs of the given range.
    pub fn number_of_lines_in_glyph_range(
        &self,
        glyph_index: GlyphIndex,
        number_of_glyphs: Length,
    ) -> (usize, usize) {
        let last_glyph_index = glyph_index.saturating_add(number_of_glyphs);
        let mut first_line = 0;
        let mut number_of_lines = 0;
        for line in self.lines {
            let run = line.glyph_run;
            if run.glyph_index + run.number_of_glyphs > glyph_index
                && last_glyph_index > run.glyph_index
            {
                number_of_lines += 1;
            } else if last_glyph_index <= run.glyph_index {
                break;
            } else if number_of_lines == 0 {
                first_line += 1;
            }
        }
        (first_line, number_of_lines)
    }

    /// The lines that hold glyphs of the given range.
    pub fn lines_of_glyph_range(&self, glyph_index: GlyphIndex, number_of_glyphs: Length) -> &'a [LineRun] {
        let (first_line, number_of_lines) =
            self.number_of_lines_in_glyph_range(glyph_index, number_of_glyphs);
        &self.lines[first_line..first_line + number_of_lines]
    }

    /// Retrieves the glyphs to render and their positions, with the alignment offset of their
    /// lines applied.
    ///
    /// When the last line is elided, only the glyphs up to its end are returned and the last
    /// glyphs that make room for it are replaced by the ellipsis glyph of `font_client`.
    ///
    /// The range is clamped to the laid-out glyphs; a range past them gives no glyphs.
    pub fn get_glyphs(
        &self,
        font_client: &impl FontClient,
        glyph_index: GlyphIndex,
        number_of_glyphs: Length,
    ) -> (Vec<GlyphInfo>, Vec<Vector2>) {
        let Some(last_line) = self.lines.last() else {
            return (Vec::new(), Vec::new());
        };
        if glyph_index >= self.number_of_glyphs() {
            return (Vec::new(), Vec::new());
        }

        let mut end = glyph_index
            .saturating_add(number_of_glyphs)
            .min(self.number_of_glyphs());
        if last_line.ellipsis {
            end = end.min(last_line.glyph_run.glyph_index + last_line.glyph_run.number_of_glyphs);
        }
        let range = glyph_index as usize..(end as usize).max(glyph_index as usize);
        let mut glyphs = self.glyphs[range.clone()].to_vec();
        let mut positions = self.glyph_positions[range.clone()].to_vec();

        let lines: SmallVec<[&LineRun; 8]> = self
            .lines_of_glyph_range(glyph_index, end.saturating_sub(glyph_index))
            .iter()
            .collect();
        for line in lines {
            let line_range = line.glyph_run.range();
            let start = line_range.start.max(range.start);
            let end = line_range.end.min(range.end);
            for position in positions.get_mut(start - range.start..end.max(start) - range.start).into_iter().flatten() {
                position.x += line.alignment_offset;
            }
        }

        if glyphs.len() > 1 && last_line.ellipsis {
            let kept = insert_ellipsis(font_client, &mut glyphs, &mut positions);
            glyphs.truncate(kept);
            positions.truncate(kept);
        }

        (glyphs, positions)
    }
}

/// Replaces the last glyphs by the ellipsis glyph, removing as many as needed to make room
/// for it. Returns the number of glyphs to keep.
fn insert_ellipsis(
    font_client: &impl FontClient,
    glyphs: &mut [GlyphInfo],
    positions: &mut [Vector2],
) -> usize {
    let mut number_of_removed_glyphs = 0;
    // The pen at the first removed glyph, used when right-to-left text is elided.
    let mut first_pen: Option<(f32, f32)> = None;
    let mut removed_glyphs_width = 0.0;

    for index in (0..glyphs.len()).rev() {
        let glyph_to_remove = glyphs[index];

        // The glyph of a new-line character has no font.
        if glyph_to_remove.font_id != 0 {
            // The font of the removed glyph may have a different size.
            let ellipsis_glyph =
                font_client.ellipsis_glyph(font_client.point_size(glyph_to_remove.font_id));

            let (first_pen_x, pen_y) = match first_pen {
                Some(pen) => pen,
                None => {
                    let position = positions[index];
                    let pen_y = position.y + glyph_to_remove.y_bearing;
                    // Don't exceed the bounding box when right-to-left text is elided.
                    let first_pen_x =
                        (position.x - glyph_to_remove.x_bearing).max(-ellipsis_glyph.x_bearing);
                    removed_glyphs_width = -ellipsis_glyph.x_bearing;
                    first_pen = Some((first_pen_x, pen_y));
                    (first_pen_x, pen_y)
                }
            };

            removed_glyphs_width += glyph_to_remove
                .advance
                .min(glyph_to_remove.x_bearing + glyph_to_remove.width);

            let ellipsis_glyph_width = ellipsis_glyph.width + ellipsis_glyph.x_bearing;
            if ellipsis_glyph_width < removed_glyphs_width {
                let position = &mut positions[index];
                position.x -= glyph_to_remove.x_bearing.min(0.0);
                if position.x > first_pen_x {
                    position.x = first_pen_x + removed_glyphs_width - ellipsis_glyph_width;
                }
                position.x += ellipsis_glyph.x_bearing;
                position.y = pen_y - ellipsis_glyph.y_bearing;

                glyphs[index] = ellipsis_glyph;
                trace!("ellipsis glyph replaces glyph {index}, {number_of_removed_glyphs} removed after it");
                return glyphs.len() - number_of_removed_glyphs;
            }
        }

        number_of_removed_glyphs += 1;
    }

    trace!("no room for the ellipsis glyph");
    0
}
