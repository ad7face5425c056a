// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! wgpu backend for stratum.
//!
//! This crate implements the stratum collaborator traits on top of `wgpu`:
//!
//! - [`WgpuLayer`] — a [`Layer`](stratum_core::layer::Layer) backed by a
//!   `wgpu::Texture`, with a uniform buffer describing how the compositor
//!   samples it.
//! - [`WgpuLayerRenderer`] — a
//!   [`LayerRenderer`](stratum_core::layer::LayerRenderer) that reallocates
//!   layer textures within the device's limits and uploads texture-layer
//!   state for external stream frames.
//!
//! Compositing the layers (pipelines, shaders, draw order) is left to the
//! embedding renderer. It binds [`WgpuLayer::view`], [`WgpuLayer::sampler`],
//! and [`WgpuLayer::uniform_buffer`] and reads [`LayerUniforms`] in its
//! shader.

mod layer;
mod renderer;
mod uniforms;

pub use layer::WgpuLayer;
pub use renderer::{DEFAULT_FORMAT, LAYER_USAGES, WgpuLayerRenderer, check_layer_size};
pub use uniforms::{LAYER_UNIFORMS_WGSL, LayerUniforms, composite_mode_index, select_filter};
