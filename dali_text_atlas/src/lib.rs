// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph atlases and mesh generation for rendering laid-out DALi text.
//!
//! - [`AtlasManager`] packs images in block based atlas textures and builds the quads that
//!   draw them.
//! - [`AtlasGlyphManager`] caches rasterized glyphs in those atlases, with a reference count
//!   per glyph so texts share them.
//! - [`AtlasRenderer`] turns a [`TextView`](dali_text::TextView) into [`MeshActor`]s, one per
//!   atlas and color, with underlines and drop shadows.
//!
//! Atlas pixels are kept in memory and meshes expose their buffers as bytes; uploading them to
//! a GPU is up to the caller.
//!
//! ## Example
//!
//! ```
//! use dali_text_atlas::{AtlasGlyphManager, AtlasRenderer, TextStyle};
//! use dali_text::{LineRun, TextView};
//! use text_primitives::{
//!     FontClient, FontId, FontMetrics, GlyphBitmap, GlyphIndex, GlyphInfo, GlyphRun,
//!     MetricsProvider, PixelFormat, PointSize26Dot6, Size, Vector2,
//! };
//!
//! struct Client;
//!
//! impl MetricsProvider for Client {
//!     fn font_metrics(&self, _: FontId) -> FontMetrics {
//!         FontMetrics { ascender: 8.0, descender: -2.0, height: 10.0, ..Default::default() }
//!     }
//! }
//!
//! impl FontClient for Client {
//!     fn point_size(&self, _: FontId) -> PointSize26Dot6 { 640 }
//!     fn ellipsis_glyph(&self, _: PointSize26Dot6) -> GlyphInfo { GlyphInfo::new(1, 0, 6.0) }
//!     fn create_bitmap(&self, _: FontId, _: GlyphIndex) -> Option<GlyphBitmap> {
//!         Some(GlyphBitmap::filled(8, 8, PixelFormat::L8, 0xff))
//!     }
//! }
//!
//! let glyphs = [GlyphInfo::new(1, 36, 10.0).with_bounds(0.0, 8.0, 8.0, 8.0)];
//! let positions = [Vector2::ZERO];
//! let lines = [LineRun { glyph_run: GlyphRun::new(0, 1), ..LineRun::default() }];
//! let view = TextView::new(&glyphs, &positions, &lines, Size::new(100.0, 20.0));
//!
//! let mut glyph_manager = AtlasGlyphManager::new();
//! let mut renderer = AtlasRenderer::with_style(TextStyle::default());
//! let output = renderer.render(&view, &mut glyph_manager, &Client, 0);
//! assert_eq!(output.actors.len(), 1);
//! assert_eq!(glyph_manager.metrics().glyph_count, 1);
//! renderer.release(&mut glyph_manager);
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

pub mod atlas;

mod error;
mod glyph_manager;
mod material;
mod renderer;

pub use atlas::{
    AddFailPolicy, AddedImage, AtlasConfig, AtlasId, AtlasManager, AtlasMetrics,
    AtlasMetricsEntry, AtlasSlot, ImageId, Mesh2D, Vertex2D,
};
pub use error::{Error, ErrorKind};
pub use glyph_manager::{
    AtlasGlyphManager, FontGlyphCounts, GlyphManagerMetrics, GlyphState, GlyphTransition,
};
pub use material::{
    Material, ShaderKind, FRAGMENT_SHADER_L8, FRAGMENT_SHADER_RGBA, VERTEX_SHADER,
};
pub use renderer::{
    AtlasRenderer, MeshActor, MissingGlyph, RenderOutput, RenderableActor, ShadowedActor,
    TextStyle, CONTENT_DEPTH_INDEX,
};

#[expect(
    clippy::cast_possible_truncation,
    reason = "Atlases hold far fewer than u32::MAX blocks, images and vertices."
)]
pub(crate) fn len_u32(len: usize) -> u32 {
    len as u32
}
