// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reordering of laid-out lines.

use text_primitives::{CharacterDirection, CharacterRun};
use unicode_bidi::BidiInfo;

use crate::layout::{len_u32, BidirectionalLineInfoRun, LineRun};

/// Computes the visual order of the characters of every line of a paragraph with
/// right-to-left content.
///
/// Sets the direction of those lines to the direction of their paragraph, which the
/// alignment pass depends on. Lines of paragraphs without right-to-left content are left
/// untouched and get no run.
pub fn bidirectional_line_runs(text: &str, lines: &mut [LineRun]) -> Vec<BidirectionalLineInfoRun> {
    let bidi_info = BidiInfo::new(text, None);
    if !bidi_info.has_rtl() {
        return Vec::new();
    }

    // Byte offset of every character, plus the end of the text.
    let starts: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(core::iter::once(text.len()))
        .collect();
    let character_of_byte = |byte: usize| starts.partition_point(|&start| start < byte);

    let mut runs = Vec::new();
    for paragraph in &bidi_info.paragraphs {
        if !bidi_info.levels[paragraph.range.clone()]
            .iter()
            .any(|level| level.is_rtl())
        {
            continue;
        }

        let direction = CharacterDirection::from_rtl(paragraph.level.is_rtl());
        let paragraph_start = character_of_byte(paragraph.range.start);
        let paragraph_end = character_of_byte(paragraph.range.end);

        for line in lines.iter_mut() {
            // A single line may hold several paragraphs; only its part in this one is reordered.
            let line_range = line.character_run.range();
            let start = line_range.start.max(paragraph_start);
            let end = line_range.end.min(paragraph_end);
            if start >= end {
                continue;
            }

            line.direction = direction;

            let levels = bidi_info.reordered_levels_per_char(paragraph, starts[start]..starts[end]);
            let visual_to_logical_map = BidiInfo::reorder_visual(&levels[start..end])
                .into_iter()
                .map(len_u32)
                .collect();

            runs.push(BidirectionalLineInfoRun {
                character_run: CharacterRun::new(len_u32(start), len_u32(end - start)),
                visual_to_logical_map,
                direction,
            });
        }
    }
    runs
}
