// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout types and the layout engine.

mod alignment;
mod bidi;
mod line;
mod text;

use text_primitives::{
    CharacterDirection, CharacterIndex, CharacterRun, GlyphIndex, GlyphInfo, GlyphRun, Length,
    LineBreakInfo, MetricsProvider, Size, Vector2, WordBreakInfo,
};

use crate::Error;

pub use line::{edge_overhangs, EdgeOverhangs};

/// Default width reserved for the cursor at the start of every line.
pub const CURSOR_WIDTH: f32 = 1.0;

/// How the text is broken into lines.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum LayoutMode {
    /// All the text goes in one line; only the end of the text ends the line.
    #[default]
    SingleLineBox,
    /// The text wraps at word boundaries (or characters, when a word doesn't fit)
    /// and at paragraph separators.
    MultiLineBox,
}

/// Horizontal alignment of the lines within the box.
///
/// `Begin` and `End` are relative to the direction of each line's paragraph.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum HorizontalAlignment {
    /// Left for left-to-right paragraphs, right for right-to-left ones.
    #[default]
    Begin,
    /// Centered.
    Center,
    /// Right for left-to-right paragraphs, left for right-to-left ones.
    End,
}

/// Vertical alignment of the laid-out text within the box.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum VerticalAlignment {
    /// Aligned to the top of the box.
    #[default]
    Top,
    /// Centered.
    Center,
    /// Aligned to the bottom of the box.
    Bottom,
}

/// Options that drive the layout engine.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LayoutOptions {
    /// Single or multi line layout.
    pub layout: LayoutMode,
    /// Horizontal alignment of each line.
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical alignment of the whole text.
    pub vertical_alignment: VerticalAlignment,
    /// Whether text that doesn't fit is elided.
    pub ellipsis_enabled: bool,
    /// Width kept free at the start of every line for a cursor. It counts when checking
    /// whether glyphs fit, not in the width of the lines.
    pub cursor_width: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layout: LayoutMode::SingleLineBox,
            horizontal_alignment: HorizontalAlignment::Begin,
            vertical_alignment: VerticalAlignment::Top,
            ellipsis_enabled: false,
            cursor_width: CURSOR_WIDTH,
        }
    }
}

/// The input of a layout pass.
///
/// Buffers indexed by character have one entry per character of `text`; buffers indexed by
/// glyph have one entry per glyph of `glyphs`.
#[derive(Clone, Copy, Debug)]
pub struct LayoutParameters<'a> {
    /// The size of the box the text is laid out into.
    pub bounding_box: Size,
    /// The text.
    pub text: &'a [char],
    /// Line break info, per character.
    pub line_break_info: &'a [LineBreakInfo],
    /// Word break info, per character.
    pub word_break_info: &'a [WordBreakInfo],
    /// Direction of each character; `None` when the text has no right-to-left content.
    pub character_directions: Option<&'a [CharacterDirection]>,
    /// The shaped glyphs.
    pub glyphs: &'a [GlyphInfo],
    /// Index of the first character of each glyph.
    pub glyphs_to_characters: &'a [CharacterIndex],
    /// Number of characters shaped into each glyph.
    pub characters_per_glyph: &'a [Length],
    /// Whether the last character of the text is a paragraph separator.
    pub is_last_new_paragraph: bool,
}

impl LayoutParameters<'_> {
    /// Total number of glyphs.
    #[inline]
    pub fn total_number_of_glyphs(&self) -> Length {
        len_u32(self.glyphs.len())
    }

    /// Checks that every buffer has the length its indexing requires.
    pub fn validate(&self) -> Result<(), Error> {
        let characters = self.text.len();
        if self.line_break_info.len() != characters {
            return Err(Error::inconsistent_buffers("line_break_info"));
        }
        if self.word_break_info.len() != characters {
            return Err(Error::inconsistent_buffers("word_break_info"));
        }
        if self
            .character_directions
            .is_some_and(|directions| directions.len() != characters)
        {
            return Err(Error::inconsistent_buffers("character_directions"));
        }
        let glyphs = self.glyphs.len();
        if self.glyphs_to_characters.len() != glyphs {
            return Err(Error::inconsistent_buffers("glyphs_to_characters"));
        }
        if self.characters_per_glyph.len() != glyphs {
            return Err(Error::inconsistent_buffers("characters_per_glyph"));
        }
        let out_of_range = self
            .glyphs_to_characters
            .iter()
            .zip(self.characters_per_glyph)
            .any(|(&first, &count)| first as usize + count.max(1) as usize > characters);
        if out_of_range {
            return Err(Error::inconsistent_buffers("glyphs_to_characters"));
        }
        Ok(())
    }

    pub(crate) fn direction(&self, index: CharacterIndex) -> CharacterDirection {
        self.character_directions
            .map(|directions| directions[index as usize])
            .unwrap_or_default()
    }
}

/// One laid-out line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineRun {
    /// The glyphs of the line.
    pub glyph_run: GlyphRun,
    /// The characters of the line.
    pub character_run: CharacterRun,
    /// The width of the line, including the overhang of its first and last glyphs.
    pub width: f32,
    /// The length of the trailing white spaces not included in `width`.
    pub extra_length: f32,
    /// The maximum ascender of the fonts of the line.
    pub ascender: f32,
    /// The minimum (most negative) descender of the fonts of the line.
    pub descender: f32,
    /// The direction of the line's paragraph.
    pub direction: CharacterDirection,
    /// The horizontal offset computed by the alignment pass.
    pub alignment_offset: f32,
    /// Whether the text has been elided at the end of this line.
    pub ellipsis: bool,
}

impl LineRun {
    /// The height of the line: `ascender - descender`.
    #[inline]
    pub fn height(&self) -> f32 {
        self.ascender - self.descender
    }
}

/// The visual order of the characters of one line that has right-to-left content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BidirectionalLineInfoRun {
    /// The characters of the line.
    pub character_run: CharacterRun,
    /// For each visual position, the logical index of the character relative to the
    /// start of `character_run`.
    pub visual_to_logical_map: Vec<CharacterIndex>,
    /// The direction of the line's paragraph.
    pub direction: CharacterDirection,
}

/// The character to glyph conversion tables.
///
/// These are the inverse of [`LayoutParameters::glyphs_to_characters`] and
/// [`LayoutParameters::characters_per_glyph`], and are only needed to re-lay out right-to-left
/// lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterGlyphMap {
    /// Index of the first glyph of each character.
    pub characters_to_glyphs: Vec<GlyphIndex>,
    /// Number of glyphs of each character.
    pub glyphs_per_character: Vec<Length>,
}

/// The result of a layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutOutput {
    /// One pen-relative position per glyph. Glyphs after an ellipsis keep a zero position.
    pub glyph_positions: Vec<Vector2>,
    /// The laid-out lines.
    pub lines: Vec<LineRun>,
    /// The size of the laid-out text: the widest line and the accumulated line heights.
    pub actual_size: Size,
}

/// Breaks shaped text into lines, positions its glyphs and aligns the lines.
///
/// The engine reads font metrics through a [`MetricsProvider`].
#[derive(Clone, Debug)]
pub struct LayoutEngine<M> {
    options: LayoutOptions,
    metrics: M,
}

impl<M: MetricsProvider> LayoutEngine<M> {
    /// Creates an engine with default options.
    pub fn new(metrics: M) -> Self {
        Self::with_options(metrics, LayoutOptions::default())
    }

    /// Creates an engine with the given options.
    pub fn with_options(metrics: M, options: LayoutOptions) -> Self {
        Self { options, metrics }
    }

    /// The current options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replaces the metrics provider.
    pub fn set_metrics(&mut self, metrics: M) {
        self.metrics = metrics;
    }

    /// The metrics provider.
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Sets the layout mode.
    pub fn set_layout(&mut self, layout: LayoutMode) {
        self.options.layout = layout;
    }

    /// The layout mode.
    pub fn layout(&self) -> LayoutMode {
        self.options.layout
    }

    /// Enables or disables the ellipsis.
    pub fn set_text_ellipsis_enabled(&mut self, enabled: bool) {
        self.options.ellipsis_enabled = enabled;
    }

    /// Whether the ellipsis is enabled.
    pub fn text_ellipsis_enabled(&self) -> bool {
        self.options.ellipsis_enabled
    }

    /// Sets the horizontal alignment.
    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.options.horizontal_alignment = alignment;
    }

    /// The horizontal alignment.
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.options.horizontal_alignment
    }

    /// Sets the vertical alignment.
    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.options.vertical_alignment = alignment;
    }

    /// The vertical alignment.
    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.options.vertical_alignment
    }

    /// Sets the width reserved for the cursor.
    pub fn set_cursor_width(&mut self, width: f32) {
        self.options.cursor_width = width;
    }

    /// The width reserved for the cursor.
    pub fn cursor_width(&self) -> f32 {
        self.options.cursor_width
    }

    /// Lays out the text into lines and computes the glyph positions.
    ///
    /// Fails with [`ErrorKind::BoxTooNarrow`](crate::ErrorKind::BoxTooNarrow) if a line can't
    /// hold a single glyph.
    pub fn layout_text(&self, parameters: &LayoutParameters<'_>) -> Result<LayoutOutput, Error> {
        parameters.validate()?;
        text::layout_text(self, parameters)
    }

    /// Re-positions the glyphs of the right-to-left lines in visual order.
    ///
    /// Only the `x` of the positions is modified. Fails with
    /// [`ErrorKind::InconsistentBuffers`](crate::ErrorKind::InconsistentBuffers), leaving the
    /// positions untouched, if a run names characters or glyphs the buffers don't have.
    pub fn relayout_right_to_left_lines(
        &self,
        parameters: &LayoutParameters<'_>,
        bidirectional_lines: &[BidirectionalLineInfoRun],
        map: &CharacterGlyphMap,
        glyph_positions: &mut [Vector2],
    ) -> Result<(), Error> {
        bidi::relayout_right_to_left_lines(parameters, bidirectional_lines, map, glyph_positions)
    }

    /// Computes the alignment offset of every line for a layout of the given size.
    pub fn align(&self, layout_size: Size, lines: &mut [LineRun]) {
        alignment::align(self.options.horizontal_alignment, layout_size, lines);
    }

    /// The vertical offset of a layout of `layout_height` within a box of `box_height`.
    pub fn vertical_alignment_offset(&self, box_height: f32, layout_height: f32) -> f32 {
        alignment::vertical_offset(self.options.vertical_alignment, box_height, layout_height)
    }

    /// The horizontal offset of a layout of `layout_width` within a box of `box_width`.
    ///
    /// `rtl` is the direction of the text's first paragraph; it swaps `Begin` and `End`.
    pub fn horizontal_alignment_offset(&self, box_width: f32, layout_width: f32, rtl: bool) -> f32 {
        alignment::horizontal_offset(
            self.options.horizontal_alignment,
            box_width,
            layout_width,
            rtl,
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Text buffers are indexed with 32 bit indices."
)]
#[inline]
pub(crate) fn len_u32(len: usize) -> u32 {
    len as u32
}
