// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture-backed layers.

use kurbo::{Affine, Rect};
use stratum_core::layer::{Layer, TextureLayerUpdate, VectorContent};
use stratum_core::paint::{ColorFilterRef, Opacity, same_filter};
use stratum_core::region::DirtyRegion;
use stratum_core::texture::TextureId;

use crate::uniforms::{LayerUniforms, select_filter};

/// The renderer's shared samplers, one per filter mode.
#[derive(Clone, Debug)]
pub(crate) struct LayerSamplers {
    pub(crate) nearest: wgpu::Sampler,
    pub(crate) linear: wgpu::Sampler,
}

impl LayerSamplers {
    fn get(&self, filter: wgpu::FilterMode) -> &wgpu::Sampler {
        match filter {
            wgpu::FilterMode::Nearest => &self.nearest,
            wgpu::FilterMode::Linear => &self.linear,
        }
    }
}

/// A [`Layer`] whose storage is a `wgpu::Texture`.
///
/// Created by [`WgpuLayerRenderer::create_layer`](crate::WgpuLayerRenderer::create_layer).
/// The layer shows either vector content, rendered into its texture by the
/// embedder, or the frame most recently latched from an external stream.
///
/// Property setters keep [`filter`](Self::filter) in step with the layer's
/// transform and latched frame immediately. [`uniforms`](Self::uniforms)
/// reaches the GPU when the renderer flushes the layer at the end of every
/// `apply`, or through
/// [`WgpuLayerRenderer::write_uniforms`](crate::WgpuLayerRenderer::write_uniforms).
///
/// A color filter is only flagged in the uniform block
/// ([`LayerUniforms::has_color_filter`]); the compositor must read the filter
/// itself through [`Layer::color_filter`] and apply it.
pub struct WgpuLayer<C> {
    id: TextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    samplers: LayerSamplers,
    filter: wgpu::FilterMode,
    uniform_buffer: wgpu::Buffer,
    uniforms_dirty: bool,
    blend: bool,
    color_filter: Option<ColorFilterRef>,
    opacity: Opacity,
    transform: Affine,
    content: Option<C>,
    damage: DirtyRegion,
    texture_update: Option<TextureLayerUpdate>,
}

impl<C> core::fmt::Debug for WgpuLayer<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WgpuLayer")
            .field("id", &self.id)
            .field("size", &(self.texture.width(), self.texture.height()))
            .field("filter", &self.filter)
            .field("uniforms_dirty", &self.uniforms_dirty)
            .field("blend", &self.blend)
            .field("opacity", &self.opacity)
            .field("transform", &self.transform)
            .field("has_content", &self.content.is_some())
            .field("damage", &self.damage)
            .field("texture_update", &self.texture_update)
            .finish_non_exhaustive()
    }
}

impl<C> WgpuLayer<C> {
    pub(crate) fn new(
        id: TextureId,
        texture: wgpu::Texture,
        samplers: LayerSamplers,
        uniform_buffer: wgpu::Buffer,
    ) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            id,
            texture,
            view,
            samplers,
            filter: wgpu::FilterMode::Nearest,
            uniform_buffer,
            uniforms_dirty: true,
            blend: false,
            color_filter: None,
            opacity: Opacity::OPAQUE,
            transform: Affine::IDENTITY,
            content: None,
            damage: DirtyRegion::new(),
            texture_update: None,
        }
    }

    /// Swaps in freshly allocated storage. Its contents are undefined, so the
    /// whole layer becomes damaged.
    pub(crate) fn replace_texture(&mut self, texture: wgpu::Texture) {
        self.view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.texture = texture;
        self.damage.merge(self.bounds());
    }

    pub(crate) fn set_texture_update(&mut self, update: TextureLayerUpdate) {
        self.texture_update = Some(update);
        self.reselect_filter();
        self.uniforms_dirty = true;
    }

    pub(crate) fn mark_uniforms_written(&mut self) {
        self.uniforms_dirty = false;
    }

    fn reselect_filter(&mut self) {
        let force_filter = self.texture_update.is_some_and(|u| u.force_filter);
        self.filter = select_filter(force_filter, self.transform);
    }

    /// Returns the backing texture.
    #[must_use]
    pub fn gpu_texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Returns a view of the whole backing texture.
    #[must_use]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Returns the sampler the compositor should use for this layer.
    #[must_use]
    pub fn sampler(&self) -> &wgpu::Sampler {
        self.samplers.get(self.filter)
    }

    /// Returns the filter mode of [`sampler`](Self::sampler).
    #[must_use]
    pub fn filter(&self) -> wgpu::FilterMode {
        self.filter
    }

    /// Returns the buffer holding this layer's [`LayerUniforms`].
    #[must_use]
    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    /// Computes the uniform block for the layer's current state.
    #[must_use]
    pub fn uniforms(&self) -> LayerUniforms {
        let uniforms = match &self.texture_update {
            Some(update) => LayerUniforms::for_texture(self.opacity, self.transform, update),
            None => LayerUniforms::for_vector(self.opacity, self.transform, self.blend),
        };
        uniforms.with_color_filter(self.color_filter.is_some())
    }

    /// Returns whether [`uniforms`](Self::uniforms) changed since they were
    /// last written to [`uniform_buffer`](Self::uniform_buffer).
    #[must_use]
    pub fn needs_uniform_upload(&self) -> bool {
        self.uniforms_dirty
    }

    /// Returns the vector content most recently handed to the layer.
    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// Returns the vector content mutably, e.g. for recording into it.
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    /// Returns the area awaiting re-render.
    #[must_use]
    pub fn damage(&self) -> DirtyRegion {
        self.damage
    }

    /// Takes the area awaiting re-render, clipped to the layer, leaving
    /// nothing damaged.
    ///
    /// Returns `None` if nothing needs re-rendering.
    pub fn take_damage(&mut self) -> Option<Rect> {
        let damage = core::mem::take(&mut self.damage).bounds()?;
        let clipped = damage.intersect(self.bounds());
        (clipped.area() > 0.0).then_some(clipped)
    }

    /// Returns the texture-layer state of the latched stream frame, if the
    /// layer currently shows one.
    #[must_use]
    pub fn texture_update(&self) -> Option<&TextureLayerUpdate> {
        self.texture_update.as_ref()
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.texture.width()),
            f64::from(self.texture.height()),
        )
    }
}

impl<C: VectorContent> Layer for WgpuLayer<C> {
    type Content = C;

    fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    fn is_blend(&self) -> bool {
        self.blend
    }

    fn set_blend(&mut self, blend: bool) {
        if self.blend != blend {
            self.blend = blend;
            self.uniforms_dirty = true;
        }
    }

    fn color_filter(&self) -> Option<ColorFilterRef> {
        self.color_filter.clone()
    }

    fn set_color_filter(&mut self, filter: Option<ColorFilterRef>) {
        if !same_filter(self.color_filter.as_ref(), filter.as_ref()) {
            self.uniforms_dirty = true;
        }
        self.color_filter = filter;
    }

    fn opacity(&self) -> Opacity {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: Opacity) {
        if self.opacity != opacity {
            self.opacity = opacity;
            self.uniforms_dirty = true;
        }
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        if self.transform != transform {
            self.transform = transform;
            self.reselect_filter();
            self.uniforms_dirty = true;
        }
    }

    fn texture(&self) -> TextureId {
        self.id
    }

    fn update_deferred(&mut self, content: C, dirty: Rect) {
        // Vector content replaces any latched stream frame.
        if self.texture_update.take().is_some() {
            self.reselect_filter();
            self.uniforms_dirty = true;
        }
        self.content = Some(content);
        self.damage.merge(dirty);
    }
}
