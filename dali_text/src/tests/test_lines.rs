// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use dali_text_dev::{FixedFontClient, TextSamples, DEFAULT_METRICS};
use text_primitives::{CharacterRun, GlyphRun, LineBreakInfo, Size, Vector2};

use super::utils::{assert_lines_cover_glyphs, TestText};
use crate::{ErrorKind, HorizontalAlignment, LayoutMode, VerticalAlignment};

#[test]
fn two_glyphs_in_one_line() {
    let text = TestText::with_client("AB", FixedFontClient::new().with_advance('B', 12.0));
    let output = text.layout(LayoutMode::SingleLineBox, 100.0, 20.0);

    assert_eq!(output.lines.len(), 1);
    let line = &output.lines[0];
    assert_eq!(line.glyph_run, GlyphRun::new(0, 2));
    assert_eq!(line.character_run, CharacterRun::new(0, 2));
    // The room for the cursor isn't part of the width.
    assert_eq!(line.width, 22.0);
    assert_eq!(line.ascender, DEFAULT_METRICS.ascender);
    assert!(!line.ellipsis);

    // The glyphs are as tall as the ascender, so their tops are at the top of the line.
    assert_eq!(output.glyph_positions, [Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]);
    assert_eq!(output.actual_size, Size::new(22.0, 10.0));
}

#[test]
fn single_line_keeps_trailing_white_spaces() {
    let output = TestText::new("ab ").layout(LayoutMode::SingleLineBox, 100.0, 20.0);
    assert_eq!(output.lines.len(), 1);
    assert_eq!(output.lines[0].width, 24.0);
    assert_eq!(output.lines[0].extra_length, 0.0);
}

#[test]
fn single_line_overflows_without_ellipsis() {
    let output = TestText::new("abcdefghij").layout(LayoutMode::SingleLineBox, 50.0, 20.0);
    assert_eq!(output.lines.len(), 1);
    assert_eq!(output.lines[0].glyph_run.number_of_glyphs, 10);
    assert_eq!(output.actual_size.width, 100.0);
}

#[test]
fn multi_line_wraps_at_words() {
    let samples = TextSamples::new();
    let text = TestText::new(samples.latin.text);
    let output = text.layout(LayoutMode::MultiLineBox, 100.0, 1000.0);

    assert_lines_cover_glyphs(&output, text.shaped.glyphs.len() as u32);
    let lines: Vec<String> = output
        .lines
        .iter()
        .map(|line| {
            text.analysis.text[line.character_run.range()]
                .iter()
                .collect()
        })
        .collect();
    assert_eq!(
        lines,
        [
            "Hello ",
            "world, ",
            "this is ",
            "some text.\n",
            "A second ",
            "paragraph ",
            "follows.",
        ]
    );

    // No word is split: every line ends at a break opportunity.
    for line in &output.lines {
        let last = line.character_run.range().end - 1;
        assert_ne!(text.analysis.line_break_info[last], LineBreakInfo::NoBreak);
    }

    // The trailing white spaces of the inner lines are kept apart.
    assert_eq!(output.lines[0].width, 50.0);
    assert_eq!(output.lines[0].extra_length, 4.0);
    assert_eq!(output.lines[3].width, 94.0);
}

#[test]
fn actual_size_accumulates_lines() {
    let samples = TextSamples::new();
    let text = TestText::new(samples.latin.text);
    for width in [60.0, 100.0, 150.0, 400.0] {
        let output = text.layout(LayoutMode::MultiLineBox, width, 1000.0);
        assert_lines_cover_glyphs(&output, text.shaped.glyphs.len() as u32);

        let height: f32 = output.lines.iter().map(|line| line.height()).sum();
        assert_eq!(output.actual_size.height, height, "width {width}");

        let widest = output
            .lines
            .iter()
            .map(|line| line.width)
            .fold(0.0, f32::max);
        assert_eq!(output.actual_size.width, widest, "width {width}");
        assert!(output.lines.iter().all(|line| line.width <= width));
    }
}

#[test]
fn long_word_is_split_by_character() {
    let text = TestText::new("abcdefghij klm");
    let output = text.layout(LayoutMode::MultiLineBox, 45.0, 1000.0);
    assert_lines_cover_glyphs(&output, 14);
    // Four glyphs and the cursor take 41 pixels; a fifth doesn't fit.
    let glyphs: Vec<u32> = output
        .lines
        .iter()
        .map(|line| line.glyph_run.number_of_glyphs)
        .collect();
    assert_eq!(glyphs, [4, 4, 3, 3]);
}

#[test]
fn paragraph_separator_ends_line_and_adds_empty_line() {
    let text = TestText::new("one\n");
    let output = text.layout(LayoutMode::MultiLineBox, 100.0, 100.0);
    assert_eq!(output.lines.len(), 2);
    assert_eq!(output.lines[0].glyph_run, GlyphRun::new(0, 4));

    let empty = &output.lines[1];
    assert_eq!(empty.glyph_run, GlyphRun::new(4, 0));
    assert_eq!(empty.character_run, CharacterRun::new(4, 0));
    assert_eq!(empty.height(), DEFAULT_METRICS.height);
    assert_eq!(output.actual_size.height, 2.0 * DEFAULT_METRICS.height);
}

#[test]
fn glyphs_go_down_line_by_line() {
    let text = TestText::new("ab\ncd");
    let output = text.layout(LayoutMode::MultiLineBox, 100.0, 100.0);
    assert_eq!(output.lines.len(), 2);
    assert_eq!(output.glyph_positions[0], Vector2::new(0.0, 0.0));
    assert_eq!(output.glyph_positions[3], Vector2::new(0.0, 10.0));
    assert_eq!(output.glyph_positions[4], Vector2::new(10.0, 10.0));
}

#[test]
fn box_narrower_than_a_glyph() {
    let text = TestText::new("AB");
    let error = text
        .engine(LayoutMode::MultiLineBox)
        .layout_text(&text.parameters(5.0, 100.0))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::BoxTooNarrow);
    assert_eq!(error.glyph_index(), Some(0));
}

#[test]
fn inconsistent_buffers_are_rejected() {
    let text = TestText::new("AB");
    let mut parameters = text.parameters(100.0, 100.0);
    parameters.line_break_info = &parameters.line_break_info[..1];
    let error = text
        .engine(LayoutMode::SingleLineBox)
        .layout_text(&parameters)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InconsistentBuffers);
}

#[test]
fn empty_text_has_no_lines() {
    let output = TestText::new("").layout(LayoutMode::MultiLineBox, 100.0, 100.0);
    assert!(output.lines.is_empty());
    assert_eq!(output.actual_size, Size::ZERO);
}

#[test]
fn horizontal_alignment_offsets() {
    let text = TestText::with_client("AB", FixedFontClient::new().with_advance('B', 12.0));
    let mut engine = text.engine(LayoutMode::MultiLineBox);
    let mut output = engine.layout_text(&text.parameters(100.0, 100.0)).unwrap();
    let box_size = Size::new(100.0, 100.0);

    engine.align(box_size, &mut output.lines);
    assert_eq!(output.lines[0].alignment_offset, 0.0);

    engine.set_horizontal_alignment(HorizontalAlignment::End);
    engine.align(box_size, &mut output.lines);
    assert_eq!(output.lines[0].alignment_offset, 78.0);

    engine.set_horizontal_alignment(HorizontalAlignment::Center);
    engine.align(box_size, &mut output.lines);
    assert_eq!(output.lines[0].alignment_offset, 39.0);
}

#[test]
fn vertical_alignment_offsets() {
    let text = TestText::new("AB");
    let mut engine = text.engine(LayoutMode::SingleLineBox);
    assert_eq!(engine.vertical_alignment_offset(30.0, 10.0), 0.0);
    engine.set_vertical_alignment(VerticalAlignment::Center);
    assert_eq!(engine.vertical_alignment_offset(30.0, 10.0), 10.0);
    engine.set_vertical_alignment(VerticalAlignment::Bottom);
    assert_eq!(engine.vertical_alignment_offset(30.0, 10.0), 20.0);
}

#[test]
fn engine_options() {
    let text = TestText::new("AB");
    let mut engine = text.engine(LayoutMode::SingleLineBox);
    assert_eq!(*engine.options(), crate::LayoutOptions::default());
    assert_eq!(engine.cursor_width(), crate::CURSOR_WIDTH);
    assert!(!engine.text_ellipsis_enabled());

    engine.set_layout(LayoutMode::MultiLineBox);
    engine.set_text_ellipsis_enabled(true);
    engine.set_cursor_width(2.0);
    assert_eq!(engine.layout(), LayoutMode::MultiLineBox);
    assert!(engine.text_ellipsis_enabled());
    assert_eq!(engine.cursor_width(), 2.0);
    assert_eq!(engine.horizontal_alignment(), HorizontalAlignment::Begin);
    assert_eq!(engine.vertical_alignment(), VerticalAlignment::Top);
}
