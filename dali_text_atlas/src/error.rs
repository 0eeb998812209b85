// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_primitives::PixelFormat;

use crate::atlas::ImageId;

/// Error type for atlas operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the context the failing operation had at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The image the operation was about, if any.
    image_id: Option<ImageId>,

    /// The smallest atlas that would hold one block, for [`ErrorKind::AtlasTooSmall`], or the
    /// size of the rejected image, for [`ErrorKind::InvalidBitmap`].
    required_size: Option<(u32, u32)>,

    /// The pixel formats of the image and of the atlas, for [`ErrorKind::PixelFormatMismatch`].
    formats: Option<(PixelFormat, PixelFormat)>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The image the failed operation was about, if any.
    pub fn image_id(&self) -> Option<ImageId> {
        self.image_id
    }

    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            image_id: None,
            required_size: None,
            formats: None,
        }
    }

    pub(crate) fn atlas_too_small(required_width: u32, required_height: u32) -> Self {
        Self {
            required_size: Some((required_width, required_height)),
            ..Self::new(ErrorKind::AtlasTooSmall)
        }
    }

    pub(crate) fn no_space() -> Self {
        Self::new(ErrorKind::NoSpace)
    }

    pub(crate) fn pixel_format_mismatch(image: PixelFormat, atlas: PixelFormat) -> Self {
        Self {
            formats: Some((image, atlas)),
            ..Self::new(ErrorKind::PixelFormatMismatch)
        }
    }

    pub(crate) fn invalid_image_id(image_id: ImageId) -> Self {
        Self {
            image_id: Some(image_id),
            ..Self::new(ErrorKind::InvalidImageId)
        }
    }

    pub(crate) fn already_freed(image_id: ImageId) -> Self {
        Self {
            image_id: Some(image_id),
            ..Self::new(ErrorKind::AlreadyFreed)
        }
    }

    pub(crate) fn invalid_bitmap(width: u32, height: u32) -> Self {
        Self {
            required_size: Some((width, height)),
            ..Self::new(ErrorKind::InvalidBitmap)
        }
    }

    pub(crate) fn rasterization_failed() -> Self {
        Self::new(ErrorKind::RasterizationFailed)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::AtlasTooSmall => match self.required_size {
                Some((width, height)) => write!(
                    f,
                    "atlas too small, dimensions need to be at least {width}x{height}"
                ),
                None => write!(f, "atlas too small to hold a single block"),
            },
            ErrorKind::NoSpace => write!(f, "no atlas can take the image under the current policy"),
            ErrorKind::PixelFormatMismatch => match self.formats {
                Some((image, atlas)) => write!(
                    f,
                    "cannot upload a {image:?} image to a {atlas:?} atlas"
                ),
                None => write!(f, "cannot upload an image with a different pixel format"),
            },
            ErrorKind::InvalidImageId => match self.image_id {
                Some(id) => write!(f, "invalid image id {}", id.get()),
                None => write!(f, "invalid image id"),
            },
            ErrorKind::AlreadyFreed => match self.image_id {
                Some(id) => write!(f, "image id {} has already been freed", id.get()),
                None => write!(f, "image has already been freed"),
            },
            ErrorKind::InvalidBitmap => match self.required_size {
                Some((width, height)) => write!(
                    f,
                    "the data of the {width}x{height} image doesn't match its size or the atlas"
                ),
                None => write!(f, "the image data doesn't match its size"),
            },
            ErrorKind::RasterizationFailed => write!(f, "the font client could not rasterize the glyph"),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The atlas can't hold a single block of the requested size.
    AtlasTooSmall,

    /// No atlas has room for the image and the add policy forbids creating one.
    NoSpace,

    /// The image's pixel format differs from the atlas'.
    PixelFormatMismatch,

    /// The image id doesn't name an image of the atlas manager.
    InvalidImageId,

    /// The image has already been freed.
    AlreadyFreed,

    /// The image's data doesn't match its size, or the image doesn't fit in the atlas.
    InvalidBitmap,

    /// The font client returned no bitmap for the glyph.
    RasterizationFailed,
}
