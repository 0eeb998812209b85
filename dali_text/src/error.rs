// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_primitives::GlyphIndex;

/// Error type for layout operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the glyph index at which the layout
/// gave up, when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// Index of the first glyph of the line that couldn't be laid out.
    glyph_index: Option<GlyphIndex>,

    /// The buffer whose length disagrees with the others.
    buffer: Option<&'static str>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Index of the first glyph of the line that couldn't be laid out, if any.
    pub fn glyph_index(&self) -> Option<GlyphIndex> {
        self.glyph_index
    }

    pub(crate) fn box_too_narrow(glyph_index: GlyphIndex) -> Self {
        Self {
            kind: ErrorKind::BoxTooNarrow,
            glyph_index: Some(glyph_index),
            buffer: None,
        }
    }

    pub(crate) fn inconsistent_buffers(buffer: &'static str) -> Self {
        Self {
            kind: ErrorKind::InconsistentBuffers,
            glyph_index: None,
            buffer: Some(buffer),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::BoxTooNarrow => match self.glyph_index {
                Some(index) => write!(
                    f,
                    "the bounding box is too narrow to lay out glyph {index}"
                ),
                None => write!(f, "the bounding box is too narrow to lay out any glyph"),
            },
            ErrorKind::InconsistentBuffers => write!(
                f,
                "the length of the `{}` buffer disagrees with the glyph or character count",
                self.buffer.unwrap_or("unknown")
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Not even one glyph fits in a line: the layout is infeasible.
    BoxTooNarrow,

    /// The input buffers have mismatched lengths.
    InconsistentBuffers,
}
