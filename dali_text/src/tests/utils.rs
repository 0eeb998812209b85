// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use dali_text_dev::{FixedFontClient, ShapedText, DEFAULT_FONT};
use text_primitives::Size;

use crate::analysis::TextAnalysis;
use crate::{LayoutEngine, LayoutMode, LayoutOutput, LayoutParameters};

/// A text analyzed and shaped with a [`FixedFontClient`].
pub(crate) struct TestText {
    pub(crate) text: String,
    pub(crate) client: FixedFontClient,
    pub(crate) analysis: TextAnalysis,
    pub(crate) shaped: ShapedText,
}

impl TestText {
    pub(crate) fn new(text: &str) -> Self {
        Self::with_client(text, FixedFontClient::new())
    }

    pub(crate) fn with_client(text: &str, client: FixedFontClient) -> Self {
        let shaped = client.shape(text, DEFAULT_FONT);
        Self {
            text: text.to_owned(),
            analysis: TextAnalysis::new(text),
            client,
            shaped,
        }
    }

    pub(crate) fn parameters(&self, width: f32, height: f32) -> LayoutParameters<'_> {
        LayoutParameters {
            bounding_box: Size::new(width, height),
            text: &self.analysis.text,
            line_break_info: &self.analysis.line_break_info,
            word_break_info: &self.analysis.word_break_info,
            character_directions: self.analysis.character_directions.as_deref(),
            glyphs: &self.shaped.glyphs,
            glyphs_to_characters: &self.shaped.glyphs_to_characters,
            characters_per_glyph: &self.shaped.characters_per_glyph,
            is_last_new_paragraph: self.analysis.is_last_new_paragraph,
        }
    }

    pub(crate) fn engine(&self, layout: LayoutMode) -> LayoutEngine<&FixedFontClient> {
        let mut engine = LayoutEngine::new(&self.client);
        engine.set_layout(layout);
        engine
    }

    pub(crate) fn layout(&self, layout: LayoutMode, width: f32, height: f32) -> LayoutOutput {
        self.engine(layout)
            .layout_text(&self.parameters(width, height))
            .unwrap()
    }
}

/// Asserts that the lines cover all the glyphs, in order and without gaps.
pub(crate) fn assert_lines_cover_glyphs(output: &LayoutOutput, number_of_glyphs: u32) {
    let mut next = 0;
    for (index, line) in output.lines.iter().enumerate() {
        assert_eq!(line.glyph_run.glyph_index, next, "line {index} doesn't follow");
        next += line.glyph_run.number_of_glyphs;
    }
    assert_eq!(next, number_of_glyphs, "the lines don't cover every glyph");
}
