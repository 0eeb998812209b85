// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_primitives::Size;

use super::{HorizontalAlignment, LineRun, VerticalAlignment};

pub(crate) fn align(alignment: HorizontalAlignment, layout_size: Size, lines: &mut [LineRun]) {
    let number_of_lines = lines.len();
    for (index, line) in lines.iter_mut().enumerate() {
        let is_last_line = index + 1 == number_of_lines;
        line.alignment_offset = line_offset(alignment, layout_size.width, line, is_last_line);
    }
}

/// The alignment offset of one line.
///
/// The trailing white spaces of a line are excluded from its width, except on the last line of
/// a left-to-right text. In right-to-left lines they are visually at the beginning, so the
/// offset is shifted to hide them.
fn line_offset(
    alignment: HorizontalAlignment,
    box_width: f32,
    line: &LineRun,
    is_last_line: bool,
) -> f32 {
    let is_rtl = line.direction.is_rtl();
    let extra_length = line.extra_length;
    let mut line_length = line.width;

    match (alignment, is_rtl) {
        (HorizontalAlignment::Begin, false) | (HorizontalAlignment::End, true) => {
            if is_rtl {
                let mut offset = -extra_length;
                if is_last_line {
                    offset += extra_length.min(box_width - line_length);
                }
                offset
            } else {
                0.0
            }
        }
        (HorizontalAlignment::Center, _) => {
            if is_last_line && !is_rtl {
                line_length += extra_length;
                if line_length > box_width {
                    return 0.0;
                }
            }

            let mut offset = 0.5 * (box_width - line_length);
            if is_rtl {
                offset -= extra_length;
                if is_last_line {
                    offset += 0.5 * extra_length.min(box_width - line_length);
                }
            }
            // Avoids sub-pixel positions.
            offset.floor()
        }
        (HorizontalAlignment::End, false) | (HorizontalAlignment::Begin, true) => {
            if is_last_line && !is_rtl {
                line_length += extra_length;
                if line_length > box_width {
                    return 0.0;
                }
            }
            if is_rtl {
                line_length += extra_length;
            }
            box_width - line_length
        }
    }
}

pub(crate) fn vertical_offset(
    alignment: VerticalAlignment,
    box_height: f32,
    layout_height: f32,
) -> f32 {
    match alignment {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Center => (0.5 * (box_height - layout_height)).floor(),
        VerticalAlignment::Bottom => box_height - layout_height,
    }
}

pub(crate) fn horizontal_offset(
    alignment: HorizontalAlignment,
    box_width: f32,
    layout_width: f32,
    rtl: bool,
) -> f32 {
    match (alignment, rtl) {
        (HorizontalAlignment::Begin, false) | (HorizontalAlignment::End, true) => 0.0,
        (HorizontalAlignment::Center, _) => (0.5 * (box_width - layout_width)).floor(),
        (HorizontalAlignment::End, false) | (HorizontalAlignment::Begin, true) => {
            box_width - layout_width
        }
    }
}
