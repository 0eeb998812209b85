// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # DALi Text Dev
//!
//! This crate provides utilities for developing the DALi text crates: a font client with
//! fixed, predictable metrics, a trivial shaper and a few text samples.

use core::cell::Cell;

use hashbrown::{HashMap, HashSet};
use text_primitives::{
    is_new_paragraph, is_white_space, CharacterIndex, FontClient, FontId, FontMetrics,
    GlyphBitmap, GlyphIndex, GlyphInfo, Length, MetricsProvider, PixelFormat, PointSize26Dot6,
};

/// The font every glyph is shaped with unless told otherwise.
pub const DEFAULT_FONT: FontId = 1;

/// Glyph index of the ellipsis glyph ("…").
pub const ELLIPSIS_GLYPH_INDEX: GlyphIndex = 0x2026;

/// The metrics of [`DEFAULT_FONT`].
pub const DEFAULT_METRICS: FontMetrics = FontMetrics {
    ascender: 8.0,
    descender: -2.0,
    height: 10.0,
    underline_position: -1.0,
    underline_thickness: 1.0,
};

/// The advance of every glyph without a specific one.
pub const DEFAULT_ADVANCE: f32 = 10.0;

/// The advance of a space.
pub const SPACE_ADVANCE: f32 = 4.0;

/// A font client with fixed metrics.
///
/// Glyph indices are the code points of the characters they're shaped from. Unless configured
/// otherwise every glyph has a [`DEFAULT_ADVANCE`] advance, no bearing and a bitmap as wide as
/// its advance and as tall as the font's ascender. White spaces have no bitmap.
#[derive(Debug)]
pub struct FixedFontClient {
    fonts: HashMap<FontId, FontMetrics>,
    advances: HashMap<char, f32>,
    bounds: HashMap<char, (f32, f32, f32, f32)>,
    color_fonts: HashSet<FontId>,
    failing_glyphs: HashSet<(FontId, GlyphIndex)>,
    malformed_glyphs: HashSet<(FontId, GlyphIndex)>,
    bitmap_sizes: HashMap<(FontId, GlyphIndex), (u32, u32)>,
    ellipsis_advance: f32,
    bitmaps_created: Cell<u32>,
}

impl Default for FixedFontClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedFontClient {
    /// Creates a client with [`DEFAULT_FONT`].
    pub fn new() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(DEFAULT_FONT, DEFAULT_METRICS);
        let mut advances = HashMap::new();
        advances.insert(' ', SPACE_ADVANCE);
        Self {
            fonts,
            advances,
            bounds: HashMap::new(),
            color_fonts: HashSet::new(),
            failing_glyphs: HashSet::new(),
            malformed_glyphs: HashSet::new(),
            bitmap_sizes: HashMap::new(),
            ellipsis_advance: 6.0,
            bitmaps_created: Cell::new(0),
        }
    }

    /// Adds a font.
    #[must_use]
    pub fn with_font(mut self, font_id: FontId, metrics: FontMetrics) -> Self {
        self.fonts.insert(font_id, metrics);
        self
    }

    /// Makes a font rasterize into RGBA bitmaps.
    #[must_use]
    pub fn with_color_font(mut self, font_id: FontId, metrics: FontMetrics) -> Self {
        self.color_fonts.insert(font_id);
        self.with_font(font_id, metrics)
    }

    /// Sets the advance, and the bitmap width, of a character's glyph.
    #[must_use]
    pub fn with_advance(mut self, character: char, advance: f32) -> Self {
        self.advances.insert(character, advance);
        self
    }

    /// Sets the bearings and bitmap extent of a character's glyph.
    #[must_use]
    pub fn with_bounds(
        mut self,
        character: char,
        x_bearing: f32,
        y_bearing: f32,
        width: f32,
        height: f32,
    ) -> Self {
        self.bounds
            .insert(character, (x_bearing, y_bearing, width, height));
        self
    }

    /// Overrides the size of a rasterized glyph.
    #[must_use]
    pub fn with_bitmap_size(
        mut self,
        font_id: FontId,
        glyph_index: GlyphIndex,
        width: u32,
        height: u32,
    ) -> Self {
        self.bitmap_sizes
            .insert((font_id, glyph_index), (width, height));
        self
    }

    /// Makes the rasterization of a glyph fail.
    #[must_use]
    pub fn with_failing_glyph(mut self, font_id: FontId, glyph_index: GlyphIndex) -> Self {
        self.failing_glyphs.insert((font_id, glyph_index));
        self
    }

    /// Makes a glyph rasterize to a bitmap with no pixel data.
    #[must_use]
    pub fn with_malformed_glyph(mut self, font_id: FontId, glyph_index: GlyphIndex) -> Self {
        self.malformed_glyphs.insert((font_id, glyph_index));
        self
    }

    /// Sets the advance of the ellipsis glyph.
    #[must_use]
    pub fn with_ellipsis_advance(mut self, advance: f32) -> Self {
        self.ellipsis_advance = advance;
        self
    }

    /// Number of bitmaps rasterized so far.
    pub fn bitmaps_created(&self) -> u32 {
        self.bitmaps_created.get()
    }

    /// The glyph of a character in a font.
    pub fn glyph(&self, font_id: FontId, character: char) -> GlyphInfo {
        if is_new_paragraph(character) {
            // Paragraph separators are shaped into a glyph with no font.
            return GlyphInfo::new(0, 0, 0.0);
        }
        let advance = self
            .advances
            .get(&character)
            .copied()
            .unwrap_or(DEFAULT_ADVANCE);
        let glyph = GlyphInfo::new(font_id, u32::from(character), advance);
        if let Some(&(x_bearing, y_bearing, width, height)) = self.bounds.get(&character) {
            return glyph.with_bounds(x_bearing, y_bearing, width, height);
        }
        if is_white_space(character) {
            return glyph;
        }
        let ascender = self.font_metrics(font_id).ascender;
        glyph.with_bounds(0.0, ascender, advance, ascender)
    }

    /// Shapes a text with one glyph per character.
    pub fn shape(&self, text: &str, font_id: FontId) -> ShapedText {
        let glyphs: Vec<GlyphInfo> = text.chars().map(|c| self.glyph(font_id, c)).collect();
        let count = index(glyphs.len());
        ShapedText {
            glyphs_to_characters: (0..count).collect(),
            characters_per_glyph: vec![1; glyphs.len()],
            glyphs,
        }
    }
}

impl MetricsProvider for FixedFontClient {
    fn font_metrics(&self, font_id: FontId) -> FontMetrics {
        self.fonts.get(&font_id).copied().unwrap_or(DEFAULT_METRICS)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Test fonts and glyphs are a few pixels in size."
)]
impl FontClient for FixedFontClient {
    fn point_size(&self, font_id: FontId) -> PointSize26Dot6 {
        // The font height in 26.6 fixed point.
        (self.font_metrics(font_id).height.max(0.0) * 64.0) as u32
    }

    fn ellipsis_glyph(&self, point_size: PointSize26Dot6) -> GlyphInfo {
        let font_id = self
            .fonts
            .keys()
            .copied()
            .filter(|&font_id| self.point_size(font_id) == point_size)
            .min()
            .unwrap_or(DEFAULT_FONT);
        let ascender = self.font_metrics(font_id).ascender;
        GlyphInfo::new(font_id, ELLIPSIS_GLYPH_INDEX, self.ellipsis_advance).with_bounds(
            0.0,
            ascender,
            self.ellipsis_advance,
            ascender,
        )
    }

    fn create_bitmap(&self, font_id: FontId, glyph_index: GlyphIndex) -> Option<GlyphBitmap> {
        if self.failing_glyphs.contains(&(font_id, glyph_index)) {
            return None;
        }
        self.bitmaps_created.set(self.bitmaps_created.get() + 1);

        let (width, height) = match self.bitmap_sizes.get(&(font_id, glyph_index)) {
            Some(&size) => size,
            None => {
                let glyph = match char::from_u32(glyph_index) {
                    _ if glyph_index == ELLIPSIS_GLYPH_INDEX => {
                        self.ellipsis_glyph(self.point_size(font_id))
                    }
                    Some(character) => self.glyph(font_id, character),
                    None => GlyphInfo::new(font_id, glyph_index, DEFAULT_ADVANCE),
                };
                (glyph.width.ceil() as u32, glyph.height.ceil() as u32)
            }
        };
        let format = if self.color_fonts.contains(&font_id) {
            PixelFormat::Rgba8888
        } else {
            PixelFormat::L8
        };
        if self.malformed_glyphs.contains(&(font_id, glyph_index)) {
            return Some(GlyphBitmap {
                width,
                height,
                format,
                data: Vec::new(),
            });
        }
        Some(GlyphBitmap::filled(width, height, format, 0xff))
    }
}

/// The glyph buffers of a shaped text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedText {
    /// The glyphs.
    pub glyphs: Vec<GlyphInfo>,
    /// Index of the first character of each glyph.
    pub glyphs_to_characters: Vec<CharacterIndex>,
    /// Number of characters of each glyph.
    pub characters_per_glyph: Vec<Length>,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Sample texts are short."
)]
fn index(len: usize) -> u32 {
    len as u32
}

/// A sample to be used for development.
#[derive(Debug)]
pub struct Sample {
    /// The name of the sample.
    pub name: &'static str,
    /// The text of the sample.
    pub text: &'static str,
}

/// A collection of text samples.
#[derive(Debug)]
pub struct TextSamples {
    /// Left to right text in a few paragraphs.
    pub latin: Sample,
    /// Right to left text.
    pub hebrew: Sample,
    /// Left to right text with an embedded right to left run.
    pub mixed: Sample,
}

impl TextSamples {
    /// Creates a new collection of text samples.
    pub const fn new() -> Self {
        Self {
            latin: Sample {
                name: "latin",
                text: "Hello world, this is some text.\nA second paragraph follows.",
            },
            hebrew: Sample {
                name: "hebrew",
                text: "\u{05E9}\u{05DC}\u{05D5}\u{05DD} \u{05E2}\u{05D5}\u{05DC}\u{05DD}",
            },
            mixed: Sample {
                name: "mixed",
                text: "abc \u{05D0}\u{05D1}\u{05D2} def",
            },
        }
    }
}

impl Default for TextSamples {
    fn default() -> Self {
        Self::new()
    }
}
