// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use dali_text::analysis::{bidirectional_line_runs, glyph_character_maps, TextAnalysis};
use dali_text::{LayoutEngine, LayoutOptions, LayoutOutput, LayoutParameters, TextView};
use dali_text_atlas::{AtlasGlyphManager, AtlasRenderer, RenderOutput};
use dali_text_dev::{FixedFontClient, ShapedText, DEFAULT_FONT};
use text_primitives::Size;

/// A text going through analysis, shaping, layout, bidi re-layout and alignment.
pub(crate) struct Pipeline {
    pub(crate) text: String,
    pub(crate) client: FixedFontClient,
    pub(crate) analysis: TextAnalysis,
    pub(crate) shaped: ShapedText,
    pub(crate) options: LayoutOptions,
}

/// A finished layout of a [`Pipeline`].
pub(crate) struct Laid<'a> {
    pub(crate) pipeline: &'a Pipeline,
    pub(crate) output: LayoutOutput,
    pub(crate) control_size: Size,
}

impl Pipeline {
    pub(crate) fn new(text: &str, options: LayoutOptions) -> Self {
        Self::with_client(text, options, FixedFontClient::new())
    }

    pub(crate) fn with_client(text: &str, options: LayoutOptions, client: FixedFontClient) -> Self {
        let shaped = client.shape(text, DEFAULT_FONT);
        Self {
            text: text.to_owned(),
            analysis: TextAnalysis::new(text),
            client,
            shaped,
            options,
        }
    }

    fn parameters(&self, control_size: Size) -> LayoutParameters<'_> {
        LayoutParameters {
            bounding_box: control_size,
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

    /// Lays out the text in a control of the given size.
    pub(crate) fn lay_out(&self, width: f32, height: f32) -> Laid<'_> {
        let control_size = Size::new(width, height);
        let engine = LayoutEngine::with_options(&self.client, self.options);
        let parameters = self.parameters(control_size);
        let mut output = engine.layout_text(&parameters).unwrap();

        let runs = bidirectional_line_runs(&self.text, &mut output.lines);
        if !runs.is_empty() {
            let map = glyph_character_maps(&self.shaped.characters_per_glyph);
            engine
                .relayout_right_to_left_lines(&parameters, &runs, &map, &mut output.glyph_positions)
                .unwrap();
        }
        engine.align(control_size, &mut output.lines);

        Laid {
            pipeline: self,
            output,
            control_size,
        }
    }
}

impl Laid<'_> {
    pub(crate) fn view(&self) -> TextView<'_> {
        TextView::from_layout(&self.pipeline.shaped.glyphs, &self.output, self.control_size)
    }

    pub(crate) fn render(
        &self,
        renderer: &mut AtlasRenderer,
        glyph_manager: &mut AtlasGlyphManager,
    ) -> RenderOutput {
        renderer.render(&self.view(), glyph_manager, &self.pipeline.client, 0)
    }
}

/// Options for a multi-line layout.
pub(crate) fn multi_line() -> LayoutOptions {
    LayoutOptions {
        layout: dali_text::LayoutMode::MultiLineBox,
        ..LayoutOptions::default()
    }
}

/// The glyph index of a character.
pub(crate) fn glyph(character: char) -> u32 {
    u32::from(character)
}

/// Number of quads of every actor of a render.
pub(crate) fn quad_count(output: &RenderOutput) -> usize {
    output
        .actors
        .iter()
        .map(|actor| actor.text().mesh.quad_count())
        .sum()
}
