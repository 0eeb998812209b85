// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns a laid-out text into meshes over glyph atlases.

use hashbrown::HashMap;
use log::{debug, log_enabled, trace, warn, Level};
use peniko::color::palette::css;
use peniko::Color;
use smallvec::SmallVec;
use text_primitives::{
    FontClient, FontId, FontMetrics, GlyphIndex, GlyphInfo, GlyphRun, Size, Vector2,
};

use dali_text::TextView;

use crate::atlas::{append_mesh, AtlasConfig, AtlasId, AtlasSlot, Mesh2D, Vertex2D};
use crate::{AtlasGlyphManager, Error, ErrorKind, Material};

/// Depth index of text content; the depth passed to [`AtlasRenderer::render`] is added to it.
pub const CONTENT_DEPTH_INDEX: i32 = 0;

const DEFAULT_ATLAS_WIDTH: u32 = 512;
const DEFAULT_ATLAS_HEIGHT: u32 = 512;

/// How a text is decorated.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// The color of the glyphs.
    pub text_color: Color,
    /// Offset of the drop shadow; no shadow is drawn when it's zero.
    pub shadow_offset: Vector2,
    /// The color of the drop shadow.
    pub shadow_color: Color,
    /// Whether every glyph is underlined.
    pub underline_enabled: bool,
    /// The color of underlines.
    pub underline_color: Color,
    /// The thickness of underlines; zero to use the thickness of the font.
    pub underline_height: f32,
    /// Underlined glyphs when `underline_enabled` is false, sorted by glyph index.
    pub underline_runs: Vec<GlyphRun>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text_color: css::BLACK,
            shadow_offset: Vector2::ZERO,
            shadow_color: css::BLACK,
            underline_enabled: false,
            underline_color: css::BLACK,
            underline_height: 0.0,
            underline_runs: Vec::new(),
        }
    }
}

impl TextStyle {
    /// Whether a drop shadow is drawn.
    pub fn has_shadow(&self) -> bool {
        self.shadow_offset.x.abs() > f32::EPSILON || self.shadow_offset.y.abs() > f32::EPSILON
    }

    /// Whether the glyph at `index` is underlined.
    pub fn is_glyph_underlined(&self, index: GlyphIndex) -> bool {
        if self.underline_enabled {
            return true;
        }
        let run = self
            .underline_runs
            .partition_point(|run| run.glyph_index + run.number_of_glyphs <= index);
        self.underline_runs
            .get(run)
            .is_some_and(|run| run.contains(index))
    }
}

/// One drawable mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshActor {
    /// The geometry, relative to the center of the actor.
    pub mesh: Mesh2D,
    /// The atlas and shader to draw with.
    pub material: Material,
    /// The color the glyph coverage is multiplied with.
    pub color: Color,
    /// The size of the actor.
    pub size: Size,
    /// The value of the `uOffset` uniform.
    pub offset: Vector2,
    /// The depth index of the renderer.
    pub depth_index: i32,
}

/// A text mesh drawn over its drop shadow.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowedActor {
    /// The shadow: the same geometry, offset and drawn below.
    pub shadow: MeshActor,
    /// The text.
    pub text: MeshActor,
}

/// A renderable result of [`AtlasRenderer::render`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderableActor {
    /// A text mesh.
    Mesh(MeshActor),
    /// A text mesh with a drop shadow.
    Shadowed(ShadowedActor),
}

impl RenderableActor {
    /// The text mesh.
    pub fn text(&self) -> &MeshActor {
        match self {
            Self::Mesh(actor) => actor,
            Self::Shadowed(actor) => &actor.text,
        }
    }

    /// The shadow mesh, if any.
    pub fn shadow(&self) -> Option<&MeshActor> {
        match self {
            Self::Mesh(_) => None,
            Self::Shadowed(actor) => Some(&actor.shadow),
        }
    }
}

/// A glyph that couldn't be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingGlyph {
    /// Position of the glyph in the rendered glyphs.
    pub glyph_index: u32,
    /// The font of the glyph.
    pub font_id: FontId,
    /// The glyph index in the font.
    pub index: GlyphIndex,
    /// Why it's missing.
    pub reason: ErrorKind,
}

/// The result of [`AtlasRenderer::render`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOutput {
    /// One actor per atlas and color.
    pub actors: Vec<RenderableActor>,
    /// The glyphs that aren't drawn.
    pub missing_glyphs: Vec<MissingGlyph>,
}

/// Renders laid-out text with glyphs cached in an [`AtlasGlyphManager`].
///
/// The renderer holds a reference on every glyph of its last render, so they stay in the
/// atlases while the text is displayed. Call [`release`](Self::release) to return them.
#[derive(Debug, Default)]
pub struct AtlasRenderer {
    style: TextStyle,
    /// Block size needed by the glyphs of each font.
    block_sizes: HashMap<FontId, (u32, u32)>,
    /// The glyphs referenced by the last render.
    text_cache: Vec<(FontId, GlyphIndex)>,
}

impl AtlasRenderer {
    /// Creates a renderer with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer with the given style.
    pub fn with_style(style: TextStyle) -> Self {
        Self {
            style,
            block_sizes: HashMap::new(),
            text_cache: Vec::new(),
        }
    }

    /// The style of the rendered text.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Sets the style of the next renders.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    /// Builds the meshes of a laid-out text.
    ///
    /// Glyphs are cached in `glyph_manager`, rasterizing with `font_client` the ones that
    /// aren't. The references held for the previous render are released afterwards, so glyphs
    /// shared by both renders stay in their atlas.
    pub fn render(
        &mut self,
        view: &TextView<'_>,
        glyph_manager: &mut AtlasGlyphManager,
        font_client: &impl FontClient,
        depth: i32,
    ) -> RenderOutput {
        let (glyphs, positions) = view.get_glyphs(font_client, 0, view.number_of_glyphs());
        self.add_glyphs(
            view.control_size(),
            &glyphs,
            &positions,
            glyph_manager,
            font_client,
            depth,
        )
    }

    /// Releases the references held for the last render.
    pub fn remove_text(&mut self, glyph_manager: &mut AtlasGlyphManager) {
        for (font_id, index) in self.text_cache.drain(..) {
            glyph_manager.adjust_reference_count(font_id, index, -1);
        }
    }

    /// Releases the references held for the last render and drops the renderer.
    pub fn release(mut self, glyph_manager: &mut AtlasGlyphManager) {
        self.remove_text(glyph_manager);
    }

    fn add_glyphs(
        &mut self,
        control_size: Size,
        glyphs: &[GlyphInfo],
        positions: &[Vector2],
        glyph_manager: &mut AtlasGlyphManager,
        font_client: &impl FontClient,
        depth: i32,
    ) -> RenderOutput {
        let half_actor_size = control_size.to_vector() * 0.5;
        let text_color = self.style.text_color;

        let mut records: Vec<MeshRecord> = Vec::new();
        let mut extents: SmallVec<[Extent; 4]> = SmallVec::new();
        let mut missing_glyphs = Vec::new();
        let mut underline = UnderlineMetrics {
            position: 0.0,
            thickness: self.style.underline_height,
        };
        let mut last_underlined_font_id = 0;

        self.calculate_block_sizes(glyphs, font_client);

        // The old text keeps its references until the new one has taken its own.
        let mut new_text_cache = Vec::with_capacity(glyphs.len());

        for (glyph_index, (glyph, &position)) in glyphs.iter().zip(positions).enumerate() {
            let glyph_index = crate::len_u32(glyph_index);
            let underline_glyph = self.style.is_glyph_underlined(glyph_index);

            // White spaces aren't drawn.
            if !glyph.has_extent() {
                continue;
            }

            if underline_glyph && glyph.font_id != last_underlined_font_id {
                underline = UnderlineMetrics::new(
                    &font_client.font_metrics(glyph.font_id),
                    self.style.underline_height,
                );
                last_underlined_font_id = glyph.font_id;
            }

            let slot = match glyph_manager.is_cached(glyph.font_id, glyph.index) {
                Some(slot) => {
                    glyph_manager.adjust_reference_count(glyph.font_id, glyph.index, 1);
                    slot
                }
                None => match self.cache_glyph(glyph, glyph_manager, font_client) {
                    Ok(slot) => slot,
                    Err(err) => {
                        warn!(
                            "glyph {glyph_index} (font: {} index: {}) is not drawn: {err}",
                            glyph.font_id, glyph.index
                        );
                        missing_glyphs.push(MissingGlyph {
                            glyph_index,
                            font_id: glyph.font_id,
                            index: glyph.index,
                            reason: err.kind(),
                        });
                        continue;
                    }
                },
            };
            new_text_cache.push((glyph.font_id, glyph.index));

            // The mesh origin is the center of the actor.
            let position = position - half_actor_size;
            let mut mesh = match glyph_manager.generate_mesh_data(slot.image_id, position) {
                Ok(mesh) => mesh,
                Err(err) => {
                    warn!("no mesh for glyph {glyph_index}: {err}");
                    missing_glyphs.push(MissingGlyph {
                        glyph_index,
                        font_id: glyph.font_id,
                        index: glyph.index,
                        reason: err.kind(),
                    });
                    continue;
                }
            };

            // Fixed size fonts may be down-scaled.
            if glyph.scale_factor > 0.0 {
                for vertex in &mut mesh.vertices {
                    vertex.position = position + (vertex.position - position) * glyph.scale_factor;
                }
            }

            stitch_text_mesh(
                &mut records,
                &mut extents,
                &mesh,
                slot.atlas_id,
                text_color,
                position.y + glyph.y_bearing,
                underline_glyph.then_some(underline),
            );
        }

        self.remove_text(glyph_manager);
        self.text_cache = new_text_cache;

        generate_underlines(
            &mut records,
            &extents,
            glyph_manager,
            self.style.underline_color,
            text_color,
        );

        let actors = records
            .into_iter()
            .map(|record| self.create_actor(record, control_size, glyph_manager, depth))
            .collect();

        log_metrics(glyph_manager);

        RenderOutput {
            actors,
            missing_glyphs,
        }
    }

    /// Rasterizes a glyph and stores it, growing the block size of its font when the bitmap
    /// doesn't fit.
    fn cache_glyph(
        &mut self,
        glyph: &GlyphInfo,
        glyph_manager: &mut AtlasGlyphManager,
        font_client: &impl FontClient,
    ) -> Result<AtlasSlot, Error> {
        let block_size = self
            .block_sizes
            .entry(glyph.font_id)
            .or_insert_with(|| needed_block_size(&font_client.font_metrics(glyph.font_id)));
        glyph_manager.set_new_atlas_size(new_atlas_size(*block_size));

        let Some(bitmap) = font_client.create_bitmap(glyph.font_id, glyph.index) else {
            return Err(Error::rasterization_failed());
        };

        // Future atlases of this font must take the bitmap.
        if bitmap.width > block_size.0 || bitmap.height > block_size.1 {
            block_size.0 = block_size.0.max(bitmap.width);
            block_size.1 = block_size.1.max(bitmap.height);
            trace!(
                "block size of font {} grows to {}x{}",
                glyph.font_id,
                block_size.0,
                block_size.1
            );
            glyph_manager.set_new_atlas_size(new_atlas_size(*block_size));
        }

        glyph_manager.add(glyph.font_id, glyph.index, &bitmap)
    }

    /// Records the block size needed by the fonts not seen before: their height.
    fn calculate_block_sizes(&mut self, glyphs: &[GlyphInfo], font_client: &impl FontClient) {
        for glyph in glyphs {
            self.block_sizes
                .entry(glyph.font_id)
                .or_insert_with(|| needed_block_size(&font_client.font_metrics(glyph.font_id)));
        }
    }

    fn create_actor(
        &self,
        record: MeshRecord,
        size: Size,
        glyph_manager: &AtlasGlyphManager,
        depth: i32,
    ) -> RenderableActor {
        let material = glyph_manager.material(record.atlas_id).unwrap_or_else(|| {
            let format = glyph_manager
                .pixel_format(record.atlas_id)
                .unwrap_or_default();
            Material::for_atlas(record.atlas_id, format)
        });
        let text = MeshActor {
            mesh: record.mesh,
            material,
            color: record.color,
            size,
            offset: Vector2::ZERO,
            depth_index: CONTENT_DEPTH_INDEX + depth,
        };
        if !self.style.has_shadow() {
            return RenderableActor::Mesh(text);
        }
        let shadow = MeshActor {
            mesh: text.mesh.clone(),
            color: self.style.shadow_color,
            offset: self.style.shadow_offset,
            depth_index: text.depth_index - 1,
            ..text
        };
        RenderableActor::Shadowed(ShadowedActor { shadow, text })
    }
}

impl Drop for AtlasRenderer {
    fn drop(&mut self) {
        if !self.text_cache.is_empty() {
            warn!(
                "text renderer dropped without release, {} glyph references are kept",
                self.text_cache.len()
            );
        }
    }
}

/// The glyphs of one atlas drawn with one color.
#[derive(Debug)]
struct MeshRecord {
    atlas_id: AtlasId,
    color: Color,
    mesh: Mesh2D,
}

/// The underline of one line of text.
#[derive(Clone, Copy, Debug)]
struct Extent {
    baseline: f32,
    left: f32,
    right: f32,
    underline: UnderlineMetrics,
    mesh_record_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct UnderlineMetrics {
    /// Distance of the underline below the baseline.
    position: f32,
    thickness: f32,
}

impl UnderlineMetrics {
    /// The underline of a font, `underline_height` overriding its thickness when not zero.
    fn new(metrics: &FontMetrics, underline_height: f32) -> Self {
        let descender = metrics.descender.abs().ceil();
        let mut position = metrics.underline_position.abs().ceil();

        let thickness = if underline_height == 0.0 {
            // At least a pixel high.
            if metrics.underline_thickness < 1.0 {
                1.0
            } else {
                metrics.underline_thickness.ceil()
            }
        } else {
            underline_height
        };

        // Not below the descender; broken fonts get an underline one pixel down.
        if position > descender {
            position = descender;
        }
        if position == 0.0 {
            position = 1.0;
        }
        Self {
            position,
            thickness,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Font heights are a few hundred pixels at most."
)]
fn needed_block_size(metrics: &FontMetrics) -> (u32, u32) {
    let height = metrics.height.max(0.0) as u32;
    (height, height)
}

fn new_atlas_size((block_width, block_height): (u32, u32)) -> AtlasConfig {
    AtlasConfig {
        width: DEFAULT_ATLAS_WIDTH,
        height: DEFAULT_ATLAS_HEIGHT,
        block_width,
        block_height,
    }
}

/// Appends a glyph mesh to the record of its atlas and color, creating it if needed, and
/// extends the underline of its line.
fn stitch_text_mesh(
    records: &mut Vec<MeshRecord>,
    extents: &mut SmallVec<[Extent; 4]>,
    mesh: &Mesh2D,
    atlas_id: AtlasId,
    color: Color,
    baseline: f32,
    underline: Option<UnderlineMetrics>,
) {
    let (Some(top_left), Some(top_right)) = (mesh.vertices.first(), mesh.vertices.get(1)) else {
        return;
    };
    let (left, right) = (top_left.position.x, top_right.position.x);

    let index = match records
        .iter()
        .position(|record| record.atlas_id == atlas_id && record.color == color)
    {
        Some(index) => {
            append_mesh(&mut records[index].mesh, mesh);
            index
        }
        None => {
            records.push(MeshRecord {
                atlas_id,
                color,
                mesh: mesh.clone(),
            });
            records.len() - 1
        }
    };

    if let Some(underline) = underline {
        adjust_extents(extents, index, left, right, baseline, underline);
    }
}

fn adjust_extents(
    extents: &mut SmallVec<[Extent; 4]>,
    mesh_record_index: usize,
    left: f32,
    right: f32,
    baseline: f32,
    underline: UnderlineMetrics,
) {
    match extents
        .iter_mut()
        .find(|extent| (extent.baseline - baseline).abs() < f32::EPSILON)
    {
        Some(extent) => {
            extent.left = extent.left.min(left);
            extent.right = extent.right.max(right);
            extent.underline.position = extent.underline.position.max(underline.position);
            extent.underline.thickness = extent.underline.thickness.max(underline.thickness);
        }
        None => extents.push(Extent {
            baseline,
            left,
            right,
            underline,
            mesh_record_index,
        }),
    }
}

/// Adds a quad per line of underlined text. The quads sample the filled pixel at the top
/// left of the atlas.
fn generate_underlines(
    records: &mut Vec<MeshRecord>,
    extents: &[Extent],
    glyph_manager: &AtlasGlyphManager,
    underline_color: Color,
    text_color: Color,
) {
    for extent in extents {
        let index = extent.mesh_record_index;
        let Some(atlas_id) = records.get(index).map(|record| record.atlas_id) else {
            continue;
        };
        let Some(atlas_size) = glyph_manager.atlas_size(atlas_id) else {
            continue;
        };

        // Half a texel, to stay inside the filled pixel.
        let u = 0.5 / atlas_size.width as f32;
        let v = 0.5 / atlas_size.height as f32;
        let thickness = extent.underline.thickness;
        let top = extent.baseline + extent.underline.position - thickness * 0.5;
        let bottom = top + thickness;

        let mut mesh = Mesh2D::default();
        mesh.push_quad([
            Vertex2D {
                position: Vector2::new(extent.left, top),
                tex_coords: Vector2::new(0.0, 0.0),
            },
            Vertex2D {
                position: Vector2::new(extent.right, top),
                tex_coords: Vector2::new(u, 0.0),
            },
            Vertex2D {
                position: Vector2::new(extent.left, bottom),
                tex_coords: Vector2::new(0.0, v),
            },
            Vertex2D {
                position: Vector2::new(extent.right, bottom),
                tex_coords: Vector2::new(u, v),
            },
        ]);

        if underline_color == text_color {
            append_mesh(&mut records[index].mesh, &mesh);
        } else {
            records.push(MeshRecord {
                atlas_id,
                color: underline_color,
                mesh,
            });
        }
    }
}

fn log_metrics(glyph_manager: &AtlasGlyphManager) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    let metrics = glyph_manager.metrics();
    debug!(
        "glyph count: {}, atlas count: {}, texture memory used: {}K",
        metrics.glyph_count,
        metrics.atlas_metrics.atlas_count,
        metrics.atlas_metrics.texture_memory_used / 1024
    );
    trace!("{metrics}");
    for (index, atlas) in metrics.atlas_metrics.atlases.iter().enumerate() {
        trace!(
            "atlas [{}] pixels: {:?} size: {}x{}, block size: {}x{}, blocks used: {}/{}",
            index + 1,
            atlas.pixel_format,
            atlas.size.width,
            atlas.size.height,
            atlas.size.block_width,
            atlas.size.block_height,
            atlas.blocks_used,
            atlas.total_blocks
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{AtlasRenderer, RenderableActor, TextStyle, UnderlineMetrics, CONTENT_DEPTH_INDEX};
    use crate::{AtlasGlyphManager, ErrorKind, ShaderKind};
    use dali_text::{LineRun, TextView};
    use dali_text_dev::{FixedFontClient, DEFAULT_FONT, DEFAULT_METRICS};
    use peniko::color::palette::css;
    use text_primitives::{FontMetrics, GlyphInfo, GlyphRun, Size, Vector2};

    /// A single line of glyphs, laid out by advance.
    struct Line {
        glyphs: Vec<GlyphInfo>,
        positions: Vec<Vector2>,
        lines: Vec<LineRun>,
    }

    impl Line {
        fn new(client: &FixedFontClient, text: &str) -> Self {
            Self::from_glyphs(client.shape(text, DEFAULT_FONT).glyphs)
        }

        fn from_glyphs(glyphs: Vec<GlyphInfo>) -> Self {
            let mut pen = 0.0;
            let positions = glyphs
                .iter()
                .map(|glyph| {
                    let position = Vector2::new(pen + glyph.x_bearing, 8.0 - glyph.y_bearing);
                    pen += glyph.advance;
                    position
                })
                .collect();
            let count = u32::try_from(glyphs.len()).unwrap();
            let lines = vec![LineRun {
                glyph_run: GlyphRun::new(0, count),
                ascender: 8.0,
                descender: -2.0,
                ..LineRun::default()
            }];
            Self {
                glyphs,
                positions,
                lines,
            }
        }

        fn view(&self) -> TextView<'_> {
            TextView::new(
                &self.glyphs,
                &self.positions,
                &self.lines,
                Size::new(100.0, 20.0),
            )
        }
    }

    fn glyph(character: char) -> u32 {
        u32::from(character)
    }

    #[test]
    fn glyphs_are_shared_and_reference_counted() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();
        let line = Line::new(&client, "ab ab");

        let output = renderer.render(&line.view(), &mut manager, &client, 0);
        assert!(output.missing_glyphs.is_empty());
        assert_eq!(output.actors.len(), 1);
        let actor = output.actors[0].text();
        assert_eq!(actor.mesh.quad_count(), 4);
        assert_eq!(actor.material.shader, ShaderKind::L8);
        assert_eq!(actor.color, css::BLACK);
        assert_eq!(actor.depth_index, CONTENT_DEPTH_INDEX);
        assert_eq!(actor.size, Size::new(100.0, 20.0));
        assert!(output.actors[0].shadow().is_none());

        assert_eq!(client.bitmaps_created(), 2);
        assert_eq!(manager.state(DEFAULT_FONT, glyph('a')).reference_count(), 2);
        assert_eq!(manager.state(DEFAULT_FONT, glyph('b')).reference_count(), 2);

        // The first glyph is placed relative to the center of the actor, grown by half a pixel.
        assert_eq!(actor.mesh.vertices[0].position, Vector2::new(-50.5, -10.5));
    }

    #[test]
    fn rendering_again_changes_nothing() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();
        let line = Line::new(&client, "abc");

        let first = renderer.render(&line.view(), &mut manager, &client, 0);
        let slots: Vec<_> = "abc"
            .chars()
            .map(|c| manager.is_cached(DEFAULT_FONT, glyph(c)))
            .collect();
        let second = renderer.render(&line.view(), &mut manager, &client, 0);

        assert_eq!(first, second);
        assert_eq!(client.bitmaps_created(), 3);
        for (c, slot) in "abc".chars().zip(slots) {
            assert_eq!(manager.is_cached(DEFAULT_FONT, glyph(c)), slot);
            assert_eq!(manager.state(DEFAULT_FONT, glyph(c)).reference_count(), 1);
        }
    }

    #[test]
    fn old_text_is_released() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();

        renderer.render(&Line::new(&client, "ab").view(), &mut manager, &client, 0);
        renderer.render(&Line::new(&client, "bc").view(), &mut manager, &client, 0);
        assert_eq!(manager.is_cached(DEFAULT_FONT, glyph('a')), None);
        assert_eq!(manager.state(DEFAULT_FONT, glyph('b')).reference_count(), 1);
        assert_eq!(manager.metrics().glyph_count, 2);

        renderer.release(&mut manager);
        assert_eq!(manager.metrics().glyph_count, 0);
        assert_eq!(manager.metrics().atlas_metrics.atlases[0].blocks_used, 0);
    }

    #[test]
    fn block_size_grows_with_bitmaps() {
        let client = FixedFontClient::new().with_bitmap_size(DEFAULT_FONT, glyph('W'), 14, 12);
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();

        let output = renderer.render(&Line::new(&client, "aW").view(), &mut manager, &client, 0);
        assert!(output.missing_glyphs.is_empty());

        // 'a' fits the font height; 'W' needs larger blocks, in a new atlas.
        let a = manager.is_cached(DEFAULT_FONT, glyph('a')).unwrap();
        let w = manager.is_cached(DEFAULT_FONT, glyph('W')).unwrap();
        assert_ne!(a.atlas_id, w.atlas_id);
        let size = manager.atlas_size(a.atlas_id).unwrap();
        assert_eq!((size.width, size.block_width, size.block_height), (512, 12, 12));
        let size = manager.atlas_size(w.atlas_id).unwrap();
        assert_eq!((size.block_width, size.block_height), (16, 14));
        assert_eq!(output.actors.len(), 2);
        renderer.release(&mut manager);
    }

    #[test]
    fn underline_is_merged_with_text_of_the_same_color() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::with_style(TextStyle {
            underline_enabled: true,
            ..TextStyle::default()
        });

        let output = renderer.render(&Line::new(&client, "ab").view(), &mut manager, &client, 0);
        assert_eq!(output.actors.len(), 1);
        let mesh = &output.actors[0].text().mesh;
        assert_eq!(mesh.quad_count(), 3);

        // Baseline at -2, one pixel below it and one pixel thick.
        let underline = &mesh.vertices[8..];
        assert_eq!(underline[0].position, Vector2::new(-50.5, -1.5));
        assert_eq!(underline[3].position, Vector2::new(-29.5, -0.5));
        assert_eq!(underline[0].tex_coords, Vector2::ZERO);
        assert_eq!(underline[3].tex_coords, Vector2::new(0.5 / 512.0, 0.5 / 512.0));
        assert_eq!(mesh.indices[12..], [9, 8, 10, 10, 11, 9]);
        renderer.release(&mut manager);
    }

    #[test]
    fn underline_runs_with_their_own_color() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::with_style(TextStyle {
            underline_color: css::RED,
            underline_runs: vec![GlyphRun::new(1, 1)],
            ..TextStyle::default()
        });

        let output = renderer.render(&Line::new(&client, "abc").view(), &mut manager, &client, 0);
        assert_eq!(output.actors.len(), 2);
        assert_eq!(output.actors[0].text().mesh.quad_count(), 3);
        let underline = output.actors[1].text();
        assert_eq!(underline.color, css::RED);
        assert_eq!(underline.mesh.quad_count(), 1);
        assert_eq!(underline.mesh.vertices[0].position.x, -40.5);
        assert_eq!(underline.mesh.vertices[1].position.x, -29.5);
        renderer.release(&mut manager);
    }

    #[test]
    fn underline_metrics_are_clamped() {
        let metrics = FontMetrics {
            underline_position: -5.0,
            descender: -2.3,
            underline_thickness: 0.4,
            ..DEFAULT_METRICS
        };
        let underline = UnderlineMetrics::new(&metrics, 0.0);
        assert_eq!((underline.position, underline.thickness), (3.0, 1.0));

        let metrics = FontMetrics {
            underline_position: 0.0,
            underline_thickness: 1.2,
            ..DEFAULT_METRICS
        };
        let underline = UnderlineMetrics::new(&metrics, 0.0);
        assert_eq!((underline.position, underline.thickness), (1.0, 2.0));

        let underline = UnderlineMetrics::new(&metrics, 2.5);
        assert_eq!(underline.thickness, 2.5);
    }

    #[test]
    fn shadow_duplicates_the_mesh() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::with_style(TextStyle {
            text_color: css::WHITE,
            shadow_offset: Vector2::new(2.0, 2.0),
            shadow_color: css::GRAY,
            ..TextStyle::default()
        });

        let output = renderer.render(&Line::new(&client, "ab").view(), &mut manager, &client, 3);
        let RenderableActor::Shadowed(actor) = &output.actors[0] else {
            panic!("expected a shadowed actor");
        };
        assert_eq!(actor.text.color, css::WHITE);
        assert_eq!(actor.text.offset, Vector2::ZERO);
        assert_eq!(actor.text.depth_index, CONTENT_DEPTH_INDEX + 3);
        assert_eq!(actor.shadow.color, css::GRAY);
        assert_eq!(actor.shadow.offset, Vector2::new(2.0, 2.0));
        assert_eq!(actor.shadow.depth_index, CONTENT_DEPTH_INDEX + 2);
        assert_eq!(actor.shadow.mesh, actor.text.mesh);
        assert_eq!(actor.shadow.material, actor.text.material);
        renderer.release(&mut manager);
    }

    #[test]
    fn missing_glyphs_are_reported() {
        let client = FixedFontClient::new().with_failing_glyph(DEFAULT_FONT, glyph('x'));
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();

        let output = renderer.render(&Line::new(&client, "axb").view(), &mut manager, &client, 0);
        assert_eq!(output.missing_glyphs.len(), 1);
        let missing = output.missing_glyphs[0];
        assert_eq!(missing.glyph_index, 1);
        assert_eq!(missing.index, glyph('x'));
        assert_eq!(missing.reason, ErrorKind::RasterizationFailed);
        assert_eq!(output.actors[0].text().mesh.quad_count(), 2);
        assert_eq!(manager.metrics().glyph_count, 2);
        renderer.release(&mut manager);
    }

    #[test]
    fn malformed_bitmaps_are_reported_and_not_cached() {
        let client = FixedFontClient::new().with_malformed_glyph(DEFAULT_FONT, glyph('x'));
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();

        for _ in 0..2 {
            let output =
                renderer.render(&Line::new(&client, "axb").view(), &mut manager, &client, 0);
            assert_eq!(output.missing_glyphs.len(), 1);
            let missing = output.missing_glyphs[0];
            assert_eq!(missing.glyph_index, 1);
            assert_eq!(missing.index, glyph('x'));
            assert_eq!(missing.reason, ErrorKind::InvalidBitmap);
            assert_eq!(output.actors[0].text().mesh.quad_count(), 2);
            assert_eq!(manager.is_cached(DEFAULT_FONT, glyph('x')), None);
        }
        assert_eq!(manager.metrics().glyph_count, 2);
        renderer.release(&mut manager);
    }

    #[test]
    fn scaled_glyphs_shrink_around_their_position() {
        let client = FixedFontClient::new();
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();
        let glyphs = vec![client.glyph(DEFAULT_FONT, 'a').with_scale_factor(0.5)];

        let output = renderer.render(&Line::from_glyphs(glyphs).view(), &mut manager, &client, 0);
        let vertices = &output.actors[0].text().mesh.vertices;
        // The unscaled quad spans -50.5..-39.5 around the position -50.
        assert_eq!(vertices[0].position, Vector2::new(-50.25, -10.25));
        assert_eq!(vertices[3].position.x, -44.75);
        renderer.release(&mut manager);
    }

    #[test]
    fn colored_glyphs_use_their_own_atlas() {
        let client = FixedFontClient::new().with_color_font(2, DEFAULT_METRICS);
        let mut manager = AtlasGlyphManager::new();
        let mut renderer = AtlasRenderer::new();
        let glyphs = vec![
            client.glyph(DEFAULT_FONT, 'a'),
            client.glyph(2, 'a'),
        ];

        let output = renderer.render(&Line::from_glyphs(glyphs).view(), &mut manager, &client, 0);
        assert_eq!(output.actors.len(), 2);
        assert_eq!(output.actors[1].text().material.shader, ShaderKind::Rgba);
        renderer.release(&mut manager);
    }
}
