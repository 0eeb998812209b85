// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fundamental text types shared by the layout engine and the glyph atlas renderer.
//!
//! This crate is a lightweight, `no_std`-friendly vocabulary layer. Shaping, segmentation and
//! bidirectional analysis happen upstream; their results reach the layout engine as the
//! per-glyph and per-character buffers described here:
//!
//! - [`GlyphInfo`]: one shaped glyph.
//! - [`CharacterDirection`], [`LineBreakInfo`], [`WordBreakInfo`]: per-character analysis.
//! - [`FontMetrics`] and the [`MetricsProvider`] seam through which font metrics are queried.
//! - [`GlyphRun`] and [`CharacterRun`]: `(index, count)` ranges over the glyph and character buffers.
//! - [`FontClient`], [`GlyphBitmap`] and [`PixelFormat`]: rasterization for the atlas renderer.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
//! - `bytemuck`: Implement traits from `bytemuck` on [`Vector2`] and the break-info enums.
//!
//! ## Example
//!
//! ```
//! use text_primitives::{GlyphInfo, is_white_space};
//!
//! let glyph = GlyphInfo::new(1, 36, 10.0).with_bounds(0.0, 12.0, 9.0, 12.0);
//! assert_eq!(glyph.overhang(), 0.0);
//! assert!(is_white_space(' '));
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
#![no_std]

extern crate alloc;

mod font;
mod geometry;
mod glyph;
#[cfg(feature = "bytemuck")]
mod impl_bytemuck;
mod metrics;
mod run;
mod text;

pub use font::{FontClient, GlyphBitmap, PixelFormat, PointSize26Dot6};
pub use geometry::{Size, Vector2};
pub use glyph::{CharacterIndex, FontId, GlyphIndex, GlyphInfo, Length};
pub use metrics::{FontMetrics, MetricsProvider};
pub use run::{CharacterRun, GlyphRun};
pub use text::{
    is_new_paragraph, is_white_space, CharacterDirection, LineBreakInfo, WordBreakInfo,
};
