// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer uniform block and sampler-filter selection.

use bytemuck::{Pod, Zeroable};
use kurbo::Affine;
use stratum_core::layer::TextureLayerUpdate;
use stratum_core::paint::{CompositeMode, Opacity};
use stratum_core::texture::{TextureMatrix, TextureTarget};

/// WGSL declaration of [`LayerUniforms`], for inclusion in compositor
/// shaders.
///
/// Every member sits at the offset the `#[repr(C)]` Rust struct gives it,
/// and the block is 128 bytes in both languages.
pub const LAYER_UNIFORMS_WGSL: &str = "\
struct LayerUniforms {
    tex_matrix: mat4x4<f32>,
    transform: array<vec4<f32>, 2>,
    alpha: f32,
    mode: u32,
    opaque: u32,
    force_filter: u32,
    is_external: u32,
    has_color_filter: u32,
    _pad0: u32,
    _pad1: u32,
}
";

/// GPU-side description of how a layer is composited.
///
/// See [`LAYER_UNIFORMS_WGSL`] for the matching shader declaration.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LayerUniforms {
    /// Column-major texture-coordinate matrix.
    pub tex_matrix: [f32; 16],
    /// Layer transform as `[a, b, c, d, e, f, 0, 0]` (kurbo coefficient
    /// order), read in WGSL as two `vec4<f32>`.
    pub transform: [f32; 8],
    /// Alpha multiplier.
    pub alpha: f32,
    /// Composite mode index, see [`composite_mode_index`].
    pub mode: u32,
    /// Non-zero if the layer may skip blending.
    pub opaque: u32,
    /// Non-zero if sampling must filter.
    pub force_filter: u32,
    /// Non-zero if the texture is an external image.
    pub is_external: u32,
    /// Non-zero if the layer has a color filter. The filter itself is not
    /// part of the block; the compositor reads it from
    /// [`Layer::color_filter`](stratum_core::layer::Layer::color_filter).
    pub has_color_filter: u32,
    _pad: [u32; 2],
}

impl LayerUniforms {
    /// Builds the uniform block for a layer showing vector content.
    #[must_use]
    pub fn for_vector(opacity: Opacity, transform: Affine, blend: bool) -> Self {
        Self {
            tex_matrix: TextureMatrix::IDENTITY.to_cols_array(),
            transform: transform_to_f32(transform),
            alpha: opacity.alpha,
            mode: composite_mode_index(opacity.mode),
            opaque: u32::from(!blend),
            force_filter: 0,
            is_external: 0,
            has_color_filter: 0,
            _pad: [0; 2],
        }
    }

    /// Builds the uniform block for a layer showing a latched stream frame.
    #[must_use]
    pub fn for_texture(opacity: Opacity, transform: Affine, update: &TextureLayerUpdate) -> Self {
        Self {
            tex_matrix: update.matrix.to_cols_array(),
            transform: transform_to_f32(transform),
            alpha: opacity.alpha,
            mode: composite_mode_index(opacity.mode),
            opaque: u32::from(update.opaque),
            force_filter: u32::from(update.force_filter),
            is_external: u32::from(update.target == TextureTarget::External),
            has_color_filter: 0,
            _pad: [0; 2],
        }
    }

    /// Returns this block with the color-filter flag set to `has_filter`.
    #[must_use]
    pub fn with_color_filter(mut self, has_filter: bool) -> Self {
        self.has_color_filter = u32::from(has_filter);
        self
    }
}

/// Returns the stable shader-side index of `mode`.
#[must_use]
pub fn composite_mode_index(mode: CompositeMode) -> u32 {
    match mode {
        CompositeMode::Clear => 0,
        CompositeMode::Src => 1,
        CompositeMode::SrcOver => 2,
        CompositeMode::SrcIn => 3,
        CompositeMode::DstOut => 4,
        CompositeMode::Plus => 5,
        CompositeMode::Multiply => 6,
        CompositeMode::Screen => 7,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layer transforms are uploaded at shader precision"
)]
fn transform_to_f32(transform: Affine) -> [f32; 8] {
    let [a, b, c, d, e, f] = transform.as_coeffs().map(|v| v as f32);
    [a, b, c, d, e, f, 0.0, 0.0]
}

/// Chooses the sampler filter for a layer.
///
/// Filtering is linear when the frame must be resampled (`force_filter`) or
/// when `transform` does not map texels 1:1 onto whole pixels. Otherwise
/// nearest sampling keeps the layer pixel-exact.
#[must_use]
pub fn select_filter(force_filter: bool, transform: Affine) -> wgpu::FilterMode {
    if force_filter || !is_pixel_aligned(transform) {
        wgpu::FilterMode::Linear
    } else {
        wgpu::FilterMode::Nearest
    }
}

/// Returns whether `transform` is an integer translation.
fn is_pixel_aligned(transform: Affine) -> bool {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 && e.fract() == 0.0 && f.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use core::mem::offset_of;

    use super::*;

    #[test]
    fn field_offsets_match_wgsl_layout() {
        // Offsets a WGSL uniform block assigns to the members declared in
        // `LAYER_UNIFORMS_WGSL`.
        assert_eq!(offset_of!(LayerUniforms, tex_matrix), 0);
        assert_eq!(offset_of!(LayerUniforms, transform), 64);
        assert_eq!(offset_of!(LayerUniforms, alpha), 96);
        assert_eq!(offset_of!(LayerUniforms, mode), 100);
        assert_eq!(offset_of!(LayerUniforms, opaque), 104);
        assert_eq!(offset_of!(LayerUniforms, force_filter), 108);
        assert_eq!(offset_of!(LayerUniforms, is_external), 112);
        assert_eq!(offset_of!(LayerUniforms, has_color_filter), 116);
        assert_eq!(size_of::<LayerUniforms>(), 128);
    }

    #[test]
    fn vector_uniforms() {
        let u = LayerUniforms::for_vector(
            Opacity::new(0.5, CompositeMode::Plus),
            Affine::translate((3.0, 4.0)),
            false,
        );
        assert_eq!(u.alpha, 0.5);
        assert_eq!(u.mode, 5);
        assert_eq!(u.opaque, 1);
        assert_eq!(u.transform, [1.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 0.0]);
        assert_eq!(u.tex_matrix, TextureMatrix::IDENTITY.0);
        assert_eq!(u.has_color_filter, 0);
        assert_eq!(u.with_color_filter(true).has_color_filter, 1);
    }

    #[test]
    fn texture_uniforms_follow_update() {
        let update = TextureLayerUpdate {
            width: 64,
            height: 64,
            opaque: false,
            force_filter: true,
            target: TextureTarget::External,
            matrix: TextureMatrix::FLIP_V,
        };
        let u = LayerUniforms::for_texture(Opacity::OPAQUE, Affine::IDENTITY, &update);
        assert_eq!(u.opaque, 0);
        assert_eq!(u.force_filter, 1);
        assert_eq!(u.is_external, 1);
        assert_eq!(u.tex_matrix, TextureMatrix::FLIP_V.0);
        assert_eq!(bytemuck::bytes_of(&u).len(), 128);
    }

    #[test]
    fn filter_selection() {
        use wgpu::FilterMode::{Linear, Nearest};

        assert_eq!(select_filter(false, Affine::IDENTITY), Nearest);
        assert_eq!(select_filter(false, Affine::translate((10.0, -2.0))), Nearest);
        assert_eq!(select_filter(true, Affine::IDENTITY), Linear);
        assert_eq!(select_filter(false, Affine::translate((0.5, 0.0))), Linear);
        assert_eq!(select_filter(false, Affine::scale(2.0)), Linear);
        assert_eq!(select_filter(false, Affine::rotate(0.1)), Linear);
    }
}
