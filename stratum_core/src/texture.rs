// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture identity, binding targets, and texture-coordinate matrices.

use core::fmt;

/// An opaque handle to the GPU texture backing a layer.
///
/// Backends assign texture IDs; core passes them to
/// [`ExternalStream::attach_to_texture`](crate::stream::ExternalStream::attach_to_texture)
/// without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// How a stream frame is bound for sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// A regular 2-D texture.
    #[default]
    Texture2d,
    /// An externally allocated image (e.g. a camera or video decoder buffer)
    /// that must be sampled through an external-image binding.
    External,
}

/// Column-major 4×4 matrix mapping layer texture coordinates to frame
/// buffer texture coordinates.
///
/// Streams report one per latched frame to express crops, flips, and
/// rotations of the producer's buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureMatrix(pub [f32; 16]);

impl TextureMatrix {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Matrix that flips the V coordinate (`v' = 1 - v`).
    pub const FLIP_V: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, 1.0,
    ]);

    /// Returns the matrix as a flat column-major array.
    #[inline]
    #[must_use]
    pub const fn to_cols_array(self) -> [f32; 16] {
        self.0
    }
}

impl Default for TextureMatrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}
