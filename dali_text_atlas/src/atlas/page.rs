// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One atlas texture and its block bookkeeping.

use std::collections::VecDeque;

use log::error;
use text_primitives::{GlyphBitmap, PixelFormat};

use super::{AtlasConfig, PADDING};
use crate::{Error, Material};

/// An atlas texture split in fixed-size blocks, one image per block.
///
/// Blocks are handed out in order until all have been used once; after that only blocks
/// returned to the free list can be reused.
#[derive(Clone, Debug)]
pub(crate) struct AtlasPage {
    pub(crate) config: AtlasConfig,
    pub(crate) format: PixelFormat,
    pixels: Vec<u8>,
    pub(crate) total_blocks: u32,
    available_blocks: u32,
    /// Freed blocks, reused oldest first.
    free_blocks: VecDeque<u32>,
    pub(crate) material: Option<Material>,
}

impl AtlasPage {
    /// Creates a cleared atlas with its top-left pixel filled.
    pub(crate) fn new(config: AtlasConfig, format: PixelFormat) -> Result<Self, Error> {
        let required_width = config.block_width + 2 * PADDING + 1;
        let required_height = config.block_height + 2 * PADDING + 1;
        if config.block_width == 0
            || config.block_height == 0
            || required_width > config.width
            || required_height > config.height
        {
            error!(
                "atlas {}x{} too small, dimensions need to be at least {required_width}x{required_height}",
                config.width, config.height
            );
            return Err(Error::atlas_too_small(required_width, required_height));
        }

        let total_blocks =
            ((config.width - 1) / config.block_width) * ((config.height - 1) / config.block_height);
        let len = config.width as usize
            * config.height as usize
            * format.bytes_per_pixel() as usize;
        let mut page = Self {
            config,
            format,
            pixels: vec![0; len],
            total_blocks,
            available_blocks: total_blocks,
            free_blocks: VecDeque::new(),
            material: None,
        };
        // Underlines sample this pixel.
        page.fill(0, 0, 1, 1, 0xff);
        Ok(page)
    }

    /// The pixels, row by row.
    pub(crate) fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of blocks that can still be handed out.
    pub(crate) fn free_block_count(&self) -> u32 {
        self.available_blocks + crate::len_u32(self.free_blocks.len())
    }

    /// Number of blocks holding an image.
    pub(crate) fn blocks_used(&self) -> u32 {
        self.total_blocks - self.free_block_count()
    }

    /// Whether an image of the given size and format can go in this atlas.
    pub(crate) fn fits(&self, width: u32, height: u32, format: PixelFormat) -> bool {
        format == self.format
            && self.free_block_count() > 0
            && width + 2 * PADDING <= self.config.block_width
            && height + 2 * PADDING <= self.config.block_height
    }

    /// The block the next image would go in.
    pub(crate) fn next_block(&self) -> Option<u32> {
        if self.available_blocks > 0 {
            Some(self.total_blocks - self.available_blocks)
        } else {
            self.free_blocks.front().copied()
        }
    }

    /// Marks the block returned by [`next_block`](Self::next_block) as used.
    pub(crate) fn take_next_block(&mut self) {
        if self.available_blocks > 0 {
            self.available_blocks -= 1;
        } else {
            self.free_blocks.pop_front();
        }
    }

    /// Returns a block to the free list.
    pub(crate) fn free_block(&mut self, block: u32) {
        self.free_blocks.push_back(block);
    }

    /// Copies an image into a block, one pixel in from the block origin, and clears the
    /// padding around it.
    ///
    /// Nothing is written when the image's data doesn't match its size or the image doesn't
    /// fit in the atlas.
    pub(crate) fn upload(&mut self, block: u32, bitmap: &GlyphBitmap) -> Result<(), Error> {
        if bitmap.format != self.format {
            error!("cannot upload an image with a different pixel format to the atlas");
            return Err(Error::pixel_format_mismatch(bitmap.format, self.format));
        }

        let AtlasConfig {
            width: atlas_width,
            height: atlas_height,
            block_width,
            block_height,
        } = self.config;
        let width_in_blocks = (atlas_width - 1) / block_width;
        let block_x = (block % width_in_blocks) * block_width + 1;
        let block_y = (block / width_in_blocks) * block_height + 1;
        let (width, height) = (bitmap.width, bitmap.height);
        let strip_height = block_height - 2 * PADDING;

        if !self.blit(block_x + PADDING, block_y + PADDING, bitmap) {
            error!("uploading image to atlas failed");
            return Err(Error::invalid_bitmap(width, height));
        }
        // Top and left strips.
        self.fill(block_x, block_y, block_width, PADDING, 0);
        self.fill(block_x, block_y + PADDING, PADDING, strip_height, 0);
        // Bottom and right strips, when they are inside the atlas.
        if block_y + height + 2 * PADDING <= atlas_height {
            self.fill(block_x, block_y + height + PADDING, block_width, PADDING, 0);
        }
        if block_x + width + 2 * PADDING <= atlas_width {
            self.fill(block_x + width + PADDING, block_y + PADDING, PADDING, strip_height, 0);
        }
        Ok(())
    }

    fn blit(&mut self, x: u32, y: u32, bitmap: &GlyphBitmap) -> bool {
        if !bitmap.is_consistent() || !self.contains(x, y, bitmap.width, bitmap.height) {
            return false;
        }
        let stride = bitmap.stride();
        if stride == 0 {
            return true;
        }
        for (row, source) in bitmap.data.chunks_exact(stride).enumerate() {
            let start = self.offset(x, y + crate::len_u32(row));
            self.pixels[start..start + stride].copy_from_slice(source);
        }
        true
    }

    fn fill(&mut self, x: u32, y: u32, width: u32, height: u32, value: u8) {
        if !self.contains(x, y, width, height) {
            error!("uploading a {width}x{height} strip at {x},{y} to atlas failed");
            return;
        }
        let bytes = width as usize * self.format.bytes_per_pixel() as usize;
        for row in y..y + height {
            let start = self.offset(x, row);
            self.pixels[start..start + bytes].fill(value);
        }
    }

    fn contains(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        x + width <= self.config.width && y + height <= self.config.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.config.width as usize + x as usize)
            * self.format.bytes_per_pixel() as usize
    }
}
