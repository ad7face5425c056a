// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The wgpu [`LayerRenderer`].

use core::marker::PhantomData;

use stratum_core::error::ResizeError;
use stratum_core::layer::{Layer, LayerRenderer, TextureLayerUpdate, VectorContent};
use stratum_core::texture::TextureId;

use crate::layer::{LayerSamplers, WgpuLayer};
use crate::uniforms::LayerUniforms;

/// Texture format used unless [`WgpuLayerRenderer::with_format`] overrides it.
pub const DEFAULT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Usages every layer texture is created with: sampled by the compositor,
/// rendered into by the embedder, and copy source/destination for stream
/// frames and readback.
pub const LAYER_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::TEXTURE_BINDING
    .union(wgpu::TextureUsages::RENDER_ATTACHMENT)
    .union(wgpu::TextureUsages::COPY_DST)
    .union(wgpu::TextureUsages::COPY_SRC);

/// Validates a requested layer size against the largest texture dimension
/// `max` the device supports.
pub fn check_layer_size(width: u32, height: u32, max: u32) -> Result<(), ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::ZeroSize);
    }
    if width > max || height > max {
        return Err(ResizeError::ExceedsLimit { width, height, max });
    }
    Ok(())
}

/// A [`LayerRenderer`] that owns a wgpu device and queue.
///
/// `C` is the vector content type of the layers it manages.
pub struct WgpuLayerRenderer<C> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    next_texture: u32,
    samplers: LayerSamplers,
    _content: PhantomData<fn(C)>,
}

impl<C> core::fmt::Debug for WgpuLayerRenderer<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WgpuLayerRenderer")
            .field("format", &self.format)
            .field("next_texture", &self.next_texture)
            .finish_non_exhaustive()
    }
}

impl<C> WgpuLayerRenderer<C> {
    /// Creates a renderer on `device` that submits uploads through `queue`.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let samplers = LayerSamplers {
            nearest: create_sampler(&device, wgpu::FilterMode::Nearest),
            linear: create_sampler(&device, wgpu::FilterMode::Linear),
        };
        Self {
            device,
            queue,
            format: DEFAULT_FORMAT,
            next_texture: 1,
            samplers,
            _content: PhantomData,
        }
    }

    /// Sets the format of layer textures created from now on.
    ///
    /// Existing layers keep their format until they are resized.
    #[must_use]
    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the device.
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the queue.
    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the layer texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the largest width or height a layer may have.
    #[must_use]
    pub fn max_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Allocates a new `width` × `height` layer.
    pub fn create_layer(&mut self, width: u32, height: u32) -> Result<WgpuLayer<C>, ResizeError> {
        check_layer_size(width, height, self.max_dimension())?;

        let id = TextureId(self.next_texture);
        self.next_texture = self.next_texture.wrapping_add(1).max(1);

        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stratum layer uniforms"),
            size: size_of::<LayerUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut layer = WgpuLayer::new(
            id,
            self.create_texture(width, height),
            self.samplers.clone(),
            uniform_buffer,
        );
        self.write_uniforms(&mut layer);
        Ok(layer)
    }

    /// Uploads `layer`'s current [`LayerUniforms`].
    ///
    /// Every `apply` already flushes changed uniforms. Call this after
    /// mutating a layer directly, outside of an apply.
    pub fn write_uniforms(&self, layer: &mut WgpuLayer<C>) {
        self.queue
            .write_buffer(layer.uniform_buffer(), 0, bytemuck::bytes_of(&layer.uniforms()));
        layer.mark_uniforms_written();
    }

    fn create_texture(&self, width: u32, height: u32) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("stratum layer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: LAYER_USAGES,
            view_formats: &[],
        })
    }
}

fn create_sampler(device: &wgpu::Device, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("stratum layer sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    })
}

impl<C: VectorContent> LayerRenderer for WgpuLayerRenderer<C> {
    type Layer = WgpuLayer<C>;

    fn resize_layer(
        &mut self,
        layer: &mut WgpuLayer<C>,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        check_layer_size(width, height, self.max_dimension())?;
        if layer.size() == (width, height) {
            return Ok(());
        }
        layer.replace_texture(self.create_texture(width, height));
        Ok(())
    }

    fn update_texture_layer(&mut self, layer: &mut WgpuLayer<C>, update: &TextureLayerUpdate) {
        layer.set_texture_update(*update);
    }

    fn flush_layer(&mut self, layer: &mut WgpuLayer<C>) {
        if layer.needs_uniform_upload() {
            self.write_uniforms(layer);
        }
    }
}
