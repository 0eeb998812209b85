// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quad meshes over atlas blocks.

use bytemuck::{Pod, Zeroable};
use text_primitives::Vector2;

use super::AtlasConfig;

/// One vertex of a text mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex2D {
    /// Position relative to the center of the text actor.
    pub position: Vector2,
    /// Normalized texture coordinates in the atlas.
    pub tex_coords: Vector2,
}

/// An indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh2D {
    /// The vertices, four per quad.
    pub vertices: Vec<Vertex2D>,
    /// The indices, six per quad.
    pub indices: Vec<u32>,
}

impl Mesh2D {
    /// Whether the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Adds a quad made of four vertices in top-left, top-right, bottom-left, bottom-right
    /// order.
    pub fn push_quad(&mut self, vertices: [Vertex2D; 4]) {
        let first = crate::len_u32(self.vertices.len());
        self.vertices.extend(vertices);
        self.indices.extend(QUAD_INDICES.map(|index| first + index));
    }
}

/// The two triangles of a quad, counter clockwise.
const QUAD_INDICES: [u32; 6] = [1, 0, 2, 2, 3, 1];

/// Creates the quad that draws the image stored in `block` of an atlas.
///
/// The quad is grown by half a pixel on every side and samples the cleared padding around the
/// image, which keeps texture filtering from bleeding in the neighboring blocks.
pub fn create_quad(
    image_width: u32,
    image_height: u32,
    block: u32,
    atlas: &AtlasConfig,
    position: Vector2,
) -> Mesh2D {
    let atlas_width_in_blocks = (atlas.width - 1) / atlas.block_width;

    // The size of a texel in normalized coordinates.
    let texel_x = 1.0 / atlas.width as f32;
    let texel_y = 1.0 / atlas.height as f32;
    let texel_block_width = texel_x * atlas.block_width as f32;
    let texel_block_height = texel_y * atlas.block_height as f32;

    let mut pixels_x = image_width % atlas.block_width;
    let mut pixels_y = image_height % atlas.block_height;
    if pixels_x == 0 {
        pixels_x = atlas.block_width;
    }
    if pixels_y == 0 {
        pixels_y = atlas.block_height;
    }

    let texel_width = texel_x * pixels_x as f32;
    let texel_height = texel_y * pixels_y as f32;

    // Half a pixel more on each edge.
    let vertex_width = pixels_x as f32 + 1.0;
    let vertex_height = pixels_y as f32 + 1.0;
    let top_left = Vector2::new(position.x - 0.5, position.y - 0.5);

    // Skips the filled pixel at the top left of the atlas.
    let block_u = texel_block_width * (block % atlas_width_in_blocks) as f32 + texel_x;
    let block_v = texel_block_height * (block / atlas_width_in_blocks) as f32 + texel_y;
    let ndc_width = texel_width + texel_x;
    let ndc_height = texel_height + texel_y;

    let mut mesh = Mesh2D::default();
    mesh.push_quad([
        Vertex2D {
            position: top_left,
            tex_coords: Vector2::new(block_u, block_v),
        },
        Vertex2D {
            position: Vector2::new(top_left.x + vertex_width, top_left.y),
            tex_coords: Vector2::new(block_u + ndc_width, block_v),
        },
        Vertex2D {
            position: Vector2::new(top_left.x, top_left.y + vertex_height),
            tex_coords: Vector2::new(block_u, block_v + ndc_height),
        },
        Vertex2D {
            position: Vector2::new(top_left.x + vertex_width, top_left.y + vertex_height),
            tex_coords: Vector2::new(block_u + ndc_width, block_v + ndc_height),
        },
    ]);
    mesh
}

/// Appends `second` to `first`, rebasing its indices.
pub fn append_mesh(first: &mut Mesh2D, second: &Mesh2D) {
    let vertex_count = crate::len_u32(first.vertices.len());
    first.vertices.extend_from_slice(&second.vertices);
    first
        .indices
        .extend(second.indices.iter().map(|index| index + vertex_count));
}
