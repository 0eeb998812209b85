// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text layout for shaped glyph runs.
//!
//! The [`LayoutEngine`] takes the output of shaping and text analysis (glyphs, the
//! glyph/character maps and the per-character break and direction info) and breaks it
//! into [`LineRun`]s that fit a bounding box, computing a pen-relative position for every
//! glyph. Right-to-left lines are re-positioned in visual order by a second pass and every
//! line gets a horizontal alignment offset.
//!
//! [`analysis`] computes break and direction info from a plain string, and [`TextView`]
//! presents a finished layout to a renderer, applying alignment offsets and replacing
//! elided text with an ellipsis glyph.
//!
//! ## Example
//!
//! ```
//! use dali_text::{LayoutEngine, LayoutMode, LayoutParameters};
//! use text_primitives::{FontId, FontMetrics, GlyphInfo, LineBreakInfo, MetricsProvider, Size, WordBreakInfo};
//!
//! struct Metrics;
//!
//! impl MetricsProvider for Metrics {
//!     fn font_metrics(&self, _: FontId) -> FontMetrics {
//!         FontMetrics { ascender: 8.0, descender: -2.0, height: 10.0, ..Default::default() }
//!     }
//! }
//!
//! let text = ['A', 'B'];
//! let glyphs = [
//!     GlyphInfo::new(1, 36, 10.0).with_bounds(0.0, 8.0, 10.0, 8.0),
//!     GlyphInfo::new(1, 37, 12.0).with_bounds(0.0, 8.0, 12.0, 8.0),
//! ];
//! let params = LayoutParameters {
//!     bounding_box: Size::new(100.0, 20.0),
//!     text: &text,
//!     line_break_info: &[LineBreakInfo::NoBreak, LineBreakInfo::MustBreak],
//!     word_break_info: &[WordBreakInfo::NoBreak, WordBreakInfo::WordBreak],
//!     character_directions: None,
//!     glyphs: &glyphs,
//!     glyphs_to_characters: &[0, 1],
//!     characters_per_glyph: &[1, 1],
//!     is_last_new_paragraph: false,
//! };
//!
//! let mut engine = LayoutEngine::new(Metrics);
//! engine.set_layout(LayoutMode::SingleLineBox);
//! let output = engine.layout_text(&params).unwrap();
//! assert_eq!(output.lines.len(), 1);
//! assert_eq!(output.glyph_positions[1].x, 10.0);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use text_primitives;

mod error;
mod view;

pub mod analysis;
pub mod layout;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};
pub use layout::{
    BidirectionalLineInfoRun, CharacterGlyphMap, HorizontalAlignment, LayoutEngine, LayoutMode,
    LayoutOptions, LayoutOutput, LayoutParameters, LineRun, VerticalAlignment, CURSOR_WIDTH,
};
pub use view::TextView;
