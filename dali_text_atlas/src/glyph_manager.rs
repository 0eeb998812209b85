// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference counted glyph cache over an [`AtlasManager`].
//!
//! Every text renderer of an application shares one [`AtlasGlyphManager`], so a glyph used by
//! many texts is stored once. Each glyph is in a [`GlyphState`] that only changes through
//! [`GlyphState::transition`].

use core::fmt;
use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::{debug, error};
use text_primitives::{FontId, GlyphBitmap, GlyphIndex, PixelFormat, Vector2};

use crate::atlas::{AtlasConfig, AtlasId, AtlasManager, AtlasMetrics, AtlasSlot, ImageId, Mesh2D};
use crate::{Error, Material};

/// The cache state of one glyph of one font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlyphState {
    /// The glyph isn't in any atlas.
    #[default]
    Uncached,
    /// The glyph is stored in an atlas.
    Cached {
        /// Where the glyph is.
        slot: AtlasSlot,
        /// Number of uses of the glyph, never zero.
        reference_count: u32,
    },
}

/// A change to the [`GlyphState`] of a glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphTransition {
    /// The glyph was stored in an atlas.
    Cache(AtlasSlot),
    /// The glyph gets one more use.
    Retain,
    /// The glyph has one use less.
    Release,
}

impl GlyphState {
    /// The state after a transition.
    ///
    /// A cached glyph stays in its slot when cached again, so a glyph is never in two slots.
    /// Retaining or releasing an uncached glyph leaves it uncached.
    #[must_use]
    pub fn transition(self, transition: GlyphTransition) -> Self {
        match (self, transition) {
            (Self::Uncached, GlyphTransition::Cache(slot)) => Self::Cached {
                slot,
                reference_count: 1,
            },
            (Self::Uncached, _) => Self::Uncached,
            (
                Self::Cached {
                    slot,
                    reference_count,
                },
                GlyphTransition::Cache(_) | GlyphTransition::Retain,
            ) => Self::Cached {
                slot,
                reference_count: reference_count
                    + u32::from(transition == GlyphTransition::Retain),
            },
            (
                Self::Cached {
                    slot,
                    reference_count,
                },
                GlyphTransition::Release,
            ) => match reference_count {
                0 | 1 => Self::Uncached,
                _ => Self::Cached {
                    slot,
                    reference_count: reference_count - 1,
                },
            },
        }
    }

    /// The slot of a cached glyph.
    pub fn slot(self) -> Option<AtlasSlot> {
        match self {
            Self::Uncached => None,
            Self::Cached { slot, .. } => Some(slot),
        }
    }

    /// Number of uses of the glyph.
    pub fn reference_count(self) -> u32 {
        match self {
            Self::Uncached => 0,
            Self::Cached {
                reference_count, ..
            } => reference_count,
        }
    }
}

/// The cached glyphs of one font, for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontGlyphCounts {
    /// The font.
    pub font_id: FontId,
    /// The cached glyphs of the font and their reference counts, by glyph index.
    pub glyphs: Vec<(GlyphIndex, u32)>,
}

/// Usage of an [`AtlasGlyphManager`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphManagerMetrics {
    /// Number of cached glyphs.
    pub glyph_count: u32,
    /// The cached glyphs, by font.
    pub fonts: Vec<FontGlyphCounts>,
    /// Usage of the atlases.
    pub atlas_metrics: AtlasMetrics,
}

impl fmt::Display for GlyphManagerMetrics {
    /// Lists every cached glyph with its reference count, as `[FontId 1 Glyph 65(2) 66(1) ] `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for font in &self.fonts {
            write!(f, "[FontId {} Glyph ", font.font_id)?;
            for (index, count) in &font.glyphs {
                write!(f, "{index}({count}) ")?;
            }
            write!(f, "] ")?;
        }
        Ok(())
    }
}

/// A glyph cache shared by text renderers.
#[derive(Debug, Default)]
pub struct AtlasGlyphManager {
    atlas_manager: AtlasManager,
    glyphs: HashMap<(FontId, GlyphIndex), GlyphState>,
}

impl AtlasGlyphManager {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache storing glyphs in the given atlas manager.
    pub fn with_atlas_manager(atlas_manager: AtlasManager) -> Self {
        Self {
            atlas_manager,
            glyphs: HashMap::new(),
        }
    }

    /// The atlases, to read their pixels.
    pub fn atlas_manager(&self) -> &AtlasManager {
        &self.atlas_manager
    }

    /// Stores the bitmap of a glyph with a reference count of one.
    ///
    /// The atlas the glyph goes in gets a material if it has none yet. A glyph that is already
    /// cached keeps its slot and is retained instead.
    pub fn add(
        &mut self,
        font_id: FontId,
        index: GlyphIndex,
        bitmap: &GlyphBitmap,
    ) -> Result<AtlasSlot, Error> {
        if let Some(slot) = self.is_cached(font_id, index) {
            self.apply(font_id, index, GlyphTransition::Retain);
            return Ok(slot);
        }

        debug!("added glyph, font: {font_id} index: {index}");
        let added = self.atlas_manager.add(bitmap, None)?;
        let atlas_id = added.slot.atlas_id;
        if added.created_atlas || self.atlas_manager.material(atlas_id).is_none() {
            let format = self
                .atlas_manager
                .pixel_format(atlas_id)
                .unwrap_or(bitmap.format);
            self.atlas_manager
                .set_material(atlas_id, Material::for_atlas(atlas_id, format));
        }
        self.apply(font_id, index, GlyphTransition::Cache(added.slot));
        Ok(added.slot)
    }

    /// The slot of a cached glyph.
    pub fn is_cached(&self, font_id: FontId, index: GlyphIndex) -> Option<AtlasSlot> {
        self.state(font_id, index).slot()
    }

    /// The cache state of a glyph.
    pub fn state(&self, font_id: FontId, index: GlyphIndex) -> GlyphState {
        self.glyphs
            .get(&(font_id, index))
            .copied()
            .unwrap_or_default()
    }

    /// Changes the reference count of a cached glyph.
    ///
    /// The glyph is removed from its atlas when the count drops to zero. Returns the new
    /// state of the glyph.
    pub fn adjust_reference_count(
        &mut self,
        font_id: FontId,
        index: GlyphIndex,
        delta: i32,
    ) -> GlyphState {
        if delta == 0 {
            return self.state(font_id, index);
        }
        debug!("adjust reference count {delta}, font: {font_id} index: {index}");
        if !self.glyphs.contains_key(&(font_id, index)) {
            error!("failed to adjust reference count of uncached glyph, font: {font_id} index: {index}");
            return GlyphState::Uncached;
        }

        let transition = if delta > 0 {
            GlyphTransition::Retain
        } else {
            GlyphTransition::Release
        };
        let mut state = self.state(font_id, index);
        for _ in 0..delta.unsigned_abs() {
            state = self.apply(font_id, index, transition);
            if state == GlyphState::Uncached {
                break;
            }
        }
        state
    }

    /// Builds the quad of a cached glyph. Reference counts are left to the glyph manager.
    pub fn generate_mesh_data(&mut self, image_id: ImageId, position: Vector2) -> Result<Mesh2D, Error> {
        self.atlas_manager
            .generate_mesh_data(image_id, position, false)
    }

    /// Sets the size of the atlases created from now on; `size` gives the largest glyph they
    /// take.
    pub fn set_new_atlas_size(&mut self, size: AtlasConfig) {
        self.atlas_manager.set_new_atlas_size(size);
    }

    /// The size of an atlas and of its blocks.
    pub fn atlas_size(&self, atlas_id: AtlasId) -> Option<AtlasConfig> {
        self.atlas_manager.atlas_size(atlas_id)
    }

    /// The pixel format of an atlas.
    pub fn pixel_format(&self, atlas_id: AtlasId) -> Option<PixelFormat> {
        self.atlas_manager.pixel_format(atlas_id)
    }

    /// The material to draw the glyphs of an atlas with.
    pub fn material(&self, atlas_id: AtlasId) -> Option<Material> {
        self.atlas_manager.material(atlas_id).copied()
    }

    /// The cached glyphs and the usage of the atlases.
    pub fn metrics(&self) -> GlyphManagerMetrics {
        let mut fonts: BTreeMap<FontId, Vec<(GlyphIndex, u32)>> = BTreeMap::new();
        for (&(font_id, index), state) in &self.glyphs {
            fonts
                .entry(font_id)
                .or_default()
                .push((index, state.reference_count()));
        }
        let fonts: Vec<FontGlyphCounts> = fonts
            .into_iter()
            .map(|(font_id, mut glyphs)| {
                glyphs.sort_unstable();
                FontGlyphCounts { font_id, glyphs }
            })
            .collect();
        GlyphManagerMetrics {
            glyph_count: crate::len_u32(self.glyphs.len()),
            fonts,
            atlas_metrics: self.atlas_manager.metrics(),
        }
    }

    /// Applies a transition to a glyph, freeing its atlas block when it becomes uncached.
    fn apply(&mut self, font_id: FontId, index: GlyphIndex, transition: GlyphTransition) -> GlyphState {
        let key = (font_id, index);
        let previous = self.glyphs.get(&key).copied().unwrap_or_default();
        let next = previous.transition(transition);
        match (previous, next) {
            (GlyphState::Cached { slot, .. }, GlyphState::Uncached) => {
                self.glyphs.remove(&key);
                if let Err(err) = self.atlas_manager.remove(slot.image_id) {
                    error!("failed to remove glyph, font: {font_id} index: {index}: {err}");
                }
            }
            (_, GlyphState::Uncached) => {}
            (_, cached) => {
                self.glyphs.insert(key, cached);
            }
        }
        next
    }
}
