// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Identifier of a font, as handed out by the font client. `0` is reserved for "no font",
/// which is what glyphs shaped from a new-line character carry.
pub type FontId = u32;

/// Index of a glyph, either within a font or within a glyph buffer.
pub type GlyphIndex = u32;

/// Index of a character within the text buffer.
pub type CharacterIndex = u32;

/// A count of glyphs or characters.
pub type Length = u32;

/// One shaped glyph.
///
/// Produced by shaping and immutable for the duration of a layout pass. All the
/// metrics are in pixels; `y_bearing` is measured upwards from the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphInfo {
    /// The font the glyph belongs to.
    pub font_id: FontId,
    /// The glyph index within the font.
    pub index: GlyphIndex,
    /// Horizontal distance from the left edge of the glyph's bitmap to the pen.
    pub x_bearing: f32,
    /// Vertical distance from the baseline to the top of the glyph's bitmap.
    pub y_bearing: f32,
    /// Width of the glyph's bitmap.
    pub width: f32,
    /// Height of the glyph's bitmap.
    pub height: f32,
    /// Distance the pen moves after the glyph.
    pub advance: f32,
    /// Factor applied when a fixed-size (bitmap) font has to be down-scaled; `0.0` when unused.
    pub scale_factor: f32,
}

impl GlyphInfo {
    /// Creates a glyph with an advance and no bitmap extent (such as a white space).
    pub const fn new(font_id: FontId, index: GlyphIndex, advance: f32) -> Self {
        Self {
            font_id,
            index,
            x_bearing: 0.0,
            y_bearing: 0.0,
            width: 0.0,
            height: 0.0,
            advance,
            scale_factor: 0.0,
        }
    }

    /// Sets the bearings and bitmap extent of the glyph.
    #[must_use]
    pub const fn with_bounds(mut self, x_bearing: f32, y_bearing: f32, width: f32, height: f32) -> Self {
        self.x_bearing = x_bearing;
        self.y_bearing = y_bearing;
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the down-scale factor of a fixed-size font glyph.
    #[must_use]
    pub const fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// The amount the glyph's bitmap pokes out on the left of the pen, clamped to `>= 0`.
    #[inline]
    pub fn leading_overhang(&self) -> f32 {
        if self.x_bearing < 0.0 {
            -self.x_bearing
        } else {
            0.0
        }
    }

    /// The amount the glyph's bitmap exceeds the advance on the right, clamped to `>= 0`.
    #[inline]
    pub fn overhang(&self) -> f32 {
        let extra = self.x_bearing + self.width - self.advance;
        if extra > 0.0 {
            extra
        } else {
            0.0
        }
    }

    /// Whether the glyph has a bitmap to draw.
    #[inline]
    pub fn has_extent(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}
