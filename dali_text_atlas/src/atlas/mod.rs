// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block based glyph atlases.
//!
//! The [`AtlasManager`] owns a list of atlas textures, each split in blocks of one size. An
//! image is stored in a block of the first atlas with the same pixel format and big enough
//! blocks; when there is none, a new atlas is created with the size set by
//! [`AtlasManager::set_new_atlas_size`], unless the [`AddFailPolicy`] says otherwise.
//!
//! Every atlas keeps its pixels in memory. Uploading them to the GPU is up to the caller.

mod mesh;
mod page;

use log::{debug, error};
use text_primitives::{GlyphBitmap, PixelFormat, Vector2};

use crate::{Error, Material};

pub use mesh::{append_mesh, create_quad, Mesh2D, Vertex2D};

use page::AtlasPage;

/// Padding in pixels kept clear around each image to prevent texture bleeding.
pub const PADDING: u32 = 1;

/// Size of an atlas and of its blocks, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasConfig {
    /// Width of the atlas.
    pub width: u32,
    /// Height of the atlas.
    pub height: u32,
    /// Width of a block.
    pub block_width: u32,
    /// Height of a block.
    pub block_height: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            block_width: 16,
            block_height: 16,
        }
    }
}

/// What [`AtlasManager::add`] does when no atlas has room for an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddFailPolicy {
    /// The image isn't added.
    FailOnAddFails,
    /// A new atlas is created for it.
    #[default]
    FailOnAddCreates,
}

/// Identifies an atlas of an [`AtlasManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasId(u32);

impl AtlasId {
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Index of the atlas in creation order.
    pub const fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an image stored by an [`AtlasManager`]. Ids of freed images are reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u32);

impl ImageId {
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where an image is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasSlot {
    /// The image.
    pub image_id: ImageId,
    /// The atlas holding it.
    pub atlas_id: AtlasId,
}

/// The result of a successful [`AtlasManager::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddedImage {
    /// Where the image went.
    pub slot: AtlasSlot,
    /// Whether a new atlas had to be created for it.
    pub created_atlas: bool,
}

/// Usage of one atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasMetricsEntry {
    /// Size of the atlas and of its blocks.
    pub size: AtlasConfig,
    /// Number of blocks holding an image.
    pub blocks_used: u32,
    /// Number of blocks of the atlas.
    pub total_blocks: u32,
    /// Pixel format of the atlas.
    pub pixel_format: PixelFormat,
}

/// Usage of all the atlases of an [`AtlasManager`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtlasMetrics {
    /// Number of atlases.
    pub atlas_count: u32,
    /// Bytes of texture memory taken by the atlases.
    pub texture_memory_used: u64,
    /// One entry per atlas, in creation order.
    pub atlases: Vec<AtlasMetricsEntry>,
}

#[derive(Clone, Copy, Debug)]
struct ImageRecord {
    atlas_id: AtlasId,
    block: u32,
    width: u32,
    height: u32,
    count: u32,
}

/// Stores images in block based atlases and builds the meshes that draw them.
#[derive(Clone, Debug, Default)]
pub struct AtlasManager {
    atlases: Vec<AtlasPage>,
    images: Vec<ImageRecord>,
    new_atlas_size: AtlasConfig,
    add_fail_policy: AddFailPolicy,
}

impl AtlasManager {
    /// Creates a manager without atlases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty atlas.
    pub fn create_atlas(&mut self, size: AtlasConfig, format: PixelFormat) -> Result<AtlasId, Error> {
        let page = AtlasPage::new(size, format)?;
        let atlas_id = AtlasId::new(crate::len_u32(self.atlases.len()));
        debug!(
            "created {format:?} atlas {} of {}x{} with {}x{} blocks",
            atlas_id.get(),
            size.width,
            size.height,
            size.block_width,
            size.block_height
        );
        self.atlases.push(page);
        Ok(atlas_id)
    }

    /// Sets what [`add`](Self::add) does when no atlas has room for an image.
    pub fn set_add_policy(&mut self, policy: AddFailPolicy) {
        self.add_fail_policy = policy;
    }

    /// What [`add`](Self::add) does when no atlas has room for an image.
    pub fn add_policy(&self) -> AddFailPolicy {
        self.add_fail_policy
    }

    /// Sets the size of the atlases created from now on.
    ///
    /// The blocks are grown by the padding kept around the images, so `size` gives the
    /// largest image the new atlases take.
    pub fn set_new_atlas_size(&mut self, size: AtlasConfig) {
        self.new_atlas_size = AtlasConfig {
            block_width: size.block_width + 2 * PADDING,
            block_height: size.block_height + 2 * PADDING,
            ..size
        };
    }

    /// The size of the atlases created from now on, padding included.
    pub fn new_atlas_size(&self) -> AtlasConfig {
        self.new_atlas_size
    }

    /// Stores an image, looking for room in `preferred` first.
    ///
    /// The image gets a reference count of one. An image whose data doesn't match its size is
    /// rejected before any atlas is created or block taken.
    pub fn add(&mut self, bitmap: &GlyphBitmap, preferred: Option<AtlasId>) -> Result<AddedImage, Error> {
        let (width, height, format) = (bitmap.width, bitmap.height, bitmap.format);
        if !bitmap.is_consistent() {
            error!("the data of a {width}x{height} {format:?} image doesn't match its size");
            return Err(Error::invalid_bitmap(width, height));
        }
        let fits = |atlases: &[AtlasPage], id: AtlasId| {
            atlases
                .get(id.index())
                .is_some_and(|atlas| atlas.fits(width, height, format))
        };

        let mut created_atlas = false;
        let found = preferred
            .filter(|&id| fits(&self.atlases, id))
            .or_else(|| {
                (0..crate::len_u32(self.atlases.len()))
                    .map(AtlasId::new)
                    .find(|&id| fits(&self.atlases, id))
            });
        let atlas_id = match found {
            Some(atlas_id) => atlas_id,
            None if self.add_fail_policy == AddFailPolicy::FailOnAddCreates => {
                let size = self.new_atlas_size;
                let atlas_id = self.create_atlas(size, format).inspect_err(|_| {
                    error!(
                        "failed to create an atlas of {}x{} with {}x{} blocks",
                        size.width, size.height, size.block_width, size.block_height
                    );
                })?;
                created_atlas = true;
                if !fits(&self.atlases, atlas_id) {
                    error!("failed to create an atlas under current policy");
                    return Err(Error::no_space());
                }
                atlas_id
            }
            None => {
                error!("no atlas has room for a {width}x{height} image");
                return Err(Error::no_space());
            }
        };

        let atlas = &mut self.atlases[atlas_id.index()];
        let block = atlas.next_block().ok_or_else(Error::no_space)?;
        atlas.upload(block, bitmap)?;
        atlas.take_next_block();

        let record = ImageRecord {
            atlas_id,
            block,
            width,
            height,
            count: 1,
        };
        let image_id = match self.images.iter().position(|image| image.count == 0) {
            Some(index) => {
                self.images[index] = record;
                ImageId::new(crate::len_u32(index))
            }
            None => {
                self.images.push(record);
                ImageId::new(crate::len_u32(self.images.len() - 1))
            }
        };

        Ok(AddedImage {
            slot: AtlasSlot { image_id, atlas_id },
            created_atlas,
        })
    }

    /// Builds the quad that draws an image at `position`.
    ///
    /// With `add_reference` the image's reference count is incremented.
    pub fn generate_mesh_data(
        &mut self,
        image_id: ImageId,
        position: Vector2,
        add_reference: bool,
    ) -> Result<Mesh2D, Error> {
        let Some(image) = self
            .images
            .get_mut(image_id.index())
            .filter(|image| image.count > 0)
        else {
            error!("cannot generate mesh with invalid image id {}", image_id.get());
            return Err(Error::invalid_image_id(image_id));
        };
        let Some(atlas) = self.atlases.get(image.atlas_id.index()) else {
            return Err(Error::invalid_image_id(image_id));
        };

        let mesh = create_quad(image.width, image.height, image.block, &atlas.config, position);
        if add_reference {
            image.count += 1;
        }
        Ok(mesh)
    }

    /// Decrements the reference count of an image and frees its block when the count drops
    /// below two.
    ///
    /// Returns whether the block was freed.
    pub fn remove(&mut self, image_id: ImageId) -> Result<bool, Error> {
        let Some(image) = self.images.get_mut(image_id.index()) else {
            error!("atlas was asked to free an invalid image id {}", image_id.get());
            return Err(Error::invalid_image_id(image_id));
        };
        if image.count == 0 {
            error!(
                "atlas was asked to free image id {}, that has already been freed",
                image_id.get()
            );
            return Err(Error::already_freed(image_id));
        }

        image.count -= 1;
        if image.count >= 2 {
            return Ok(false);
        }
        image.count = 0;
        if let Some(atlas) = self.atlases.get_mut(image.atlas_id.index()) {
            atlas.free_block(image.block);
        }
        Ok(true)
    }

    /// The atlas holding an image.
    pub fn atlas_of(&self, image_id: ImageId) -> Option<AtlasId> {
        self.images
            .get(image_id.index())
            .filter(|image| image.count > 0)
            .map(|image| image.atlas_id)
    }

    /// The size of an atlas and of its blocks.
    pub fn atlas_size(&self, atlas_id: AtlasId) -> Option<AtlasConfig> {
        self.atlases.get(atlas_id.index()).map(|atlas| atlas.config)
    }

    /// Number of blocks still available in an atlas.
    pub fn free_blocks(&self, atlas_id: AtlasId) -> u32 {
        self.atlases
            .get(atlas_id.index())
            .map_or(0, AtlasPage::free_block_count)
    }

    /// Number of atlases.
    pub fn atlas_count(&self) -> usize {
        self.atlases.len()
    }

    /// The pixel format of an atlas.
    pub fn pixel_format(&self, atlas_id: AtlasId) -> Option<PixelFormat> {
        self.atlases.get(atlas_id.index()).map(|atlas| atlas.format)
    }

    /// The pixels of an atlas, row by row.
    pub fn pixels(&self, atlas_id: AtlasId) -> Option<&[u8]> {
        self.atlases.get(atlas_id.index()).map(AtlasPage::pixels)
    }

    /// The material used to draw an atlas.
    pub fn material(&self, atlas_id: AtlasId) -> Option<&Material> {
        self.atlases
            .get(atlas_id.index())
            .and_then(|atlas| atlas.material.as_ref())
    }

    /// Sets the material used to draw an atlas.
    pub fn set_material(&mut self, atlas_id: AtlasId, material: Material) {
        if let Some(atlas) = self.atlases.get_mut(atlas_id.index()) {
            atlas.material = Some(material);
        }
    }

    /// Usage of every atlas.
    pub fn metrics(&self) -> AtlasMetrics {
        let atlases: Vec<AtlasMetricsEntry> = self
            .atlases
            .iter()
            .map(|atlas| AtlasMetricsEntry {
                size: atlas.config,
                blocks_used: atlas.blocks_used(),
                total_blocks: atlas.total_blocks,
                pixel_format: atlas.format,
            })
            .collect();
        let texture_memory_used = atlases
            .iter()
            .map(|entry| {
                u64::from(entry.size.width)
                    * u64::from(entry.size.height)
                    * u64::from(entry.pixel_format.bytes_per_pixel())
            })
            .sum();
        AtlasMetrics {
            atlas_count: crate::len_u32(atlases.len()),
            texture_memory_used,
            atlases,
        }
    }
}
