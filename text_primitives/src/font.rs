// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::{FontId, GlyphIndex, GlyphInfo, MetricsProvider};

/// Pixel layout of a rasterized glyph or of an atlas texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One byte of coverage per pixel.
    #[default]
    L8,
    /// Four bytes per pixel: red, green, blue and alpha.
    Rgba8888,
}

impl PixelFormat {
    /// Number of bytes used to store one pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::L8 => 1,
            Self::Rgba8888 => 4,
        }
    }
}

/// A rasterized glyph, tightly packed row by row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `data`.
    pub format: PixelFormat,
    /// `width * height * format.bytes_per_pixel()` bytes.
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// Creates a bitmap filled with `value` in every byte.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel() as usize;
        Self {
            width,
            height,
            format,
            data: alloc::vec![value; len],
        }
    }

    /// Number of bytes in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel() as usize
    }

    /// Whether `data` holds exactly `width * height` pixels.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.stride() * self.height as usize
    }
}

/// Point size of a font in 26.6 fixed point, as font clients usually report it.
pub type PointSize26Dot6 = u32;

/// The font system as seen by the text view and the atlas renderer.
///
/// Extends [`MetricsProvider`] with rasterization and the ellipsis glyph lookup.
pub trait FontClient: MetricsProvider {
    /// Point size of the given font.
    fn point_size(&self, font_id: FontId) -> PointSize26Dot6;

    /// The shaped ellipsis glyph ("…") for a font of the given point size.
    fn ellipsis_glyph(&self, point_size: PointSize26Dot6) -> GlyphInfo;

    /// Rasterizes a glyph. Returns `None` when the font can't produce a bitmap for it.
    fn create_bitmap(&self, font_id: FontId, glyph_index: GlyphIndex) -> Option<GlyphBitmap>;
}

impl<T: FontClient + ?Sized> FontClient for &T {
    fn point_size(&self, font_id: FontId) -> PointSize26Dot6 {
        (**self).point_size(font_id)
    }

    fn ellipsis_glyph(&self, point_size: PointSize26Dot6) -> GlyphInfo {
        (**self).ellipsis_glyph(point_size)
    }

    fn create_bitmap(&self, font_id: FontId, glyph_index: GlyphIndex) -> Option<GlyphBitmap> {
        (**self).create_bitmap(font_id, glyph_index)
    }
}

#[cfg(test)]
mod tests {
    use super::{GlyphBitmap, PixelFormat};

    #[test]
    fn filled_bitmap_is_consistent() {
        let bitmap = GlyphBitmap::filled(3, 2, PixelFormat::Rgba8888, 0xff);
        assert_eq!(bitmap.stride(), 12);
        assert_eq!(bitmap.data.len(), 24);
        assert!(bitmap.is_consistent());
    }
}
