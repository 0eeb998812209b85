// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::FontId;

/// Vertical metrics of a font, in pixels.
///
/// The descender follows the usual font convention of being negative below the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the lowest glyph (negative).
    pub descender: f32,
    /// Total height of a line set in this font.
    pub height: f32,
    /// Offset of the underline from the baseline.
    pub underline_position: f32,
    /// Thickness of the underline.
    pub underline_thickness: f32,
}

/// Supplies font metrics for a font identifier.
///
/// This is the seam between the layout engine and the font system.
pub trait MetricsProvider {
    /// Returns the metrics of the given font.
    fn font_metrics(&self, font_id: FontId) -> FontMetrics;
}

impl<T: MetricsProvider + ?Sized> MetricsProvider for &T {
    fn font_metrics(&self, font_id: FontId) -> FontMetrics {
        (**self).font_metrics(font_id)
    }
}
