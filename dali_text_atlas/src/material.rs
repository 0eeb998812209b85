// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Materials and shader sources for drawing text meshes.

use text_primitives::PixelFormat;

use crate::atlas::AtlasId;

/// Vertex shader shared by every text material.
///
/// `uOffset` moves the mesh, which is how drop shadows reuse the text geometry.
pub const VERTEX_SHADER: &str = "\
attribute mediump vec2 aPosition;
attribute mediump vec2 aTexCoord;
uniform mediump vec2 uOffset;
uniform mediump mat4 uMvpMatrix;
varying mediump vec2 vTexCoord;

void main()
{
  mediump vec4 position = vec4(aPosition.xy + uOffset, 0.0, 1.0);
  gl_Position = uMvpMatrix * position;
  vTexCoord = aTexCoord;
}
";

/// Fragment shader for [`PixelFormat::L8`] atlases: the texture is the coverage of `uColor`.
pub const FRAGMENT_SHADER_L8: &str = "\
uniform lowp vec4 uColor;
uniform sampler2D sTexture;
varying mediump vec2 vTexCoord;

void main()
{
  mediump vec4 color = texture2D(sTexture, vTexCoord);
  gl_FragColor = vec4(uColor.rgb, uColor.a * color.r);
}
";

/// Fragment shader for [`PixelFormat::Rgba8888`] atlases, which hold colored glyphs.
pub const FRAGMENT_SHADER_RGBA: &str = "\
uniform sampler2D sTexture;
varying mediump vec2 vTexCoord;

void main()
{
  gl_FragColor = texture2D(sTexture, vTexCoord);
}
";

/// The shader program a material draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// [`VERTEX_SHADER`] with [`FRAGMENT_SHADER_L8`].
    L8,
    /// [`VERTEX_SHADER`] with [`FRAGMENT_SHADER_RGBA`].
    Rgba,
}

impl ShaderKind {
    /// The shader that samples atlases of the given format.
    pub const fn for_format(format: PixelFormat) -> Self {
        match format {
            PixelFormat::L8 => Self::L8,
            PixelFormat::Rgba8888 => Self::Rgba,
        }
    }

    /// The vertex shader source.
    pub const fn vertex_source(self) -> &'static str {
        VERTEX_SHADER
    }

    /// The fragment shader source.
    pub const fn fragment_source(self) -> &'static str {
        match self {
            Self::L8 => FRAGMENT_SHADER_L8,
            Self::Rgba => FRAGMENT_SHADER_RGBA,
        }
    }
}

/// How the meshes of one atlas are drawn: the atlas is bound as `sTexture`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    /// The atlas texture.
    pub atlas_id: AtlasId,
    /// The shader program.
    pub shader: ShaderKind,
    /// Whether blending is enabled.
    pub blend: bool,
}

impl Material {
    /// The blended material for an atlas of the given format.
    pub const fn for_atlas(atlas_id: AtlasId, format: PixelFormat) -> Self {
        Self {
            atlas_id,
            shader: ShaderKind::for_format(format),
            blend: true,
        }
    }
}
