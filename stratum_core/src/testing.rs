// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording collaborator doubles shared by the unit tests.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};

use kurbo::{Affine, Rect};

use crate::error::ResizeError;
use crate::layer::{Layer, LayerRenderer, TextureLayerUpdate, VectorContent};
use crate::paint::{ColorFilter, ColorFilterRef, Opacity};
use crate::stream::ExternalStream;
use crate::texture::{TextureId, TextureMatrix, TextureTarget};

/// Scales color channels by a constant.
#[derive(Debug)]
pub(crate) struct Tint(pub(crate) f32);

impl ColorFilter for Tint {
    fn filter_color(&self, [r, g, b, a]: [f32; 4]) -> [f32; 4] {
        [r * self.0, g * self.0, b * self.0, a]
    }
}

/// Display list stand-in that counts property refreshes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FakeContent {
    pub(crate) id: u32,
    pub(crate) refreshes: u32,
}

impl FakeContent {
    pub(crate) fn new(id: u32) -> Self {
        Self { id, refreshes: 0 }
    }
}

impl VectorContent for FakeContent {
    fn update_properties(&mut self) {
        self.refreshes += 1;
    }
}

/// A mutation observed on a [`FakeLayer`], in call order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    SetColorFilter(bool),
    SetOpacity(Opacity),
    SetBlend(bool),
    SetTransform(Affine),
    UpdateDeferred { content: FakeContent, dirty: Rect },
    Resize(u32, u32),
    UpdateTexture(TextureLayerUpdate),
}

#[derive(Debug)]
pub(crate) struct LayerState {
    pub(crate) size: (u32, u32),
    pub(crate) blend: bool,
    pub(crate) color_filter: Option<ColorFilterRef>,
    pub(crate) opacity: Opacity,
    pub(crate) transform: Affine,
    pub(crate) texture: TextureId,
    pub(crate) calls: Vec<Call>,
}

/// Shared-handle layer; clones observe the same state.
#[derive(Clone, Debug)]
pub(crate) struct FakeLayer(pub(crate) Rc<RefCell<LayerState>>);

impl FakeLayer {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(LayerState {
            size: (width, height),
            blend: false,
            color_filter: None,
            opacity: Opacity::OPAQUE,
            transform: Affine::IDENTITY,
            texture: TextureId(1),
            calls: Vec::new(),
        })))
    }

    pub(crate) fn with_blend(self, blend: bool) -> Self {
        self.0.borrow_mut().blend = blend;
        self
    }

    pub(crate) fn with_opacity(self, opacity: Opacity) -> Self {
        self.0.borrow_mut().opacity = opacity;
        self
    }

    pub(crate) fn with_color_filter(self, filter: ColorFilterRef) -> Self {
        self.0.borrow_mut().color_filter = Some(filter);
        self
    }

    pub(crate) fn state(&self) -> Ref<'_, LayerState> {
        self.0.borrow()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub(crate) fn set_size(&self, width: u32, height: u32) {
        self.0.borrow_mut().size = (width, height);
    }
}

impl Layer for FakeLayer {
    type Content = FakeContent;

    fn size(&self) -> (u32, u32) {
        self.0.borrow().size
    }

    fn is_blend(&self) -> bool {
        self.0.borrow().blend
    }

    fn set_blend(&mut self, blend: bool) {
        let mut state = self.0.borrow_mut();
        state.blend = blend;
        state.calls.push(Call::SetBlend(blend));
    }

    fn color_filter(&self) -> Option<ColorFilterRef> {
        self.0.borrow().color_filter.clone()
    }

    fn set_color_filter(&mut self, filter: Option<ColorFilterRef>) {
        let mut state = self.0.borrow_mut();
        state.calls.push(Call::SetColorFilter(filter.is_some()));
        state.color_filter = filter;
    }

    fn opacity(&self) -> Opacity {
        self.0.borrow().opacity
    }

    fn set_opacity(&mut self, opacity: Opacity) {
        let mut state = self.0.borrow_mut();
        state.opacity = opacity;
        state.calls.push(Call::SetOpacity(opacity));
    }

    fn transform(&self) -> Affine {
        self.0.borrow().transform
    }

    fn set_transform(&mut self, transform: Affine) {
        let mut state = self.0.borrow_mut();
        state.transform = transform;
        state.calls.push(Call::SetTransform(transform));
    }

    fn texture(&self) -> TextureId {
        self.0.borrow().texture
    }

    fn update_deferred(&mut self, content: FakeContent, dirty: Rect) {
        self.0
            .borrow_mut()
            .calls
            .push(Call::UpdateDeferred { content, dirty });
    }
}

/// Renderer that records texture updates and can be told to fail resizes.
#[derive(Debug, Default)]
pub(crate) struct FakeRenderer {
    pub(crate) fail_resize: bool,
    pub(crate) resizes: u32,
    pub(crate) flushes: u32,
    pub(crate) texture_updates: Vec<TextureLayerUpdate>,
}

impl LayerRenderer for FakeRenderer {
    type Layer = FakeLayer;

    fn resize_layer(
        &mut self,
        layer: &mut FakeLayer,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        self.resizes += 1;
        let mut state = layer.0.borrow_mut();
        state.calls.push(Call::Resize(width, height));
        if self.fail_resize {
            return Err(ResizeError::OutOfMemory);
        }
        state.size = (width, height);
        Ok(())
    }

    fn update_texture_layer(&mut self, layer: &mut FakeLayer, update: &TextureLayerUpdate) {
        self.texture_updates.push(*update);
        layer.0.borrow_mut().calls.push(Call::UpdateTexture(*update));
    }

    fn flush_layer(&mut self, _layer: &mut FakeLayer) {
        self.flushes += 1;
    }
}

/// Stream that yields a scripted sequence of frame numbers.
#[derive(Debug)]
pub(crate) struct FakeStream {
    queue: VecDeque<u64>,
    current: Option<u64>,
    buffer_size: Option<(u32, u32)>,
    target: TextureTarget,
    matrix: TextureMatrix,
    pub(crate) pulls: u32,
    pub(crate) attached: Vec<TextureId>,
}

impl FakeStream {
    pub(crate) fn new(frames: &[u64]) -> Self {
        Self {
            queue: frames.iter().copied().collect(),
            current: None,
            buffer_size: None,
            target: TextureTarget::Texture2d,
            matrix: TextureMatrix::IDENTITY,
            pulls: 0,
            attached: Vec::new(),
        }
    }

    pub(crate) fn with_buffer_size(mut self, width: u32, height: u32) -> Self {
        self.buffer_size = Some((width, height));
        self
    }

    pub(crate) fn with_target(mut self, target: TextureTarget) -> Self {
        self.target = target;
        self
    }

    pub(crate) fn with_matrix(mut self, matrix: TextureMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub(crate) fn push_frames(&mut self, frames: &[u64]) {
        self.queue.extend(frames.iter().copied());
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl ExternalStream for FakeStream {
    fn pull_next_frame(&mut self) -> bool {
        self.pulls += 1;
        match self.queue.pop_front() {
            Some(frame) => {
                self.current = Some(frame);
                true
            }
            None => false,
        }
    }

    fn frame_number(&self) -> u64 {
        self.current.unwrap_or(0)
    }

    fn current_buffer_size(&self) -> Option<(u32, u32)> {
        self.current.and(self.buffer_size)
    }

    fn transform_matrix(&self) -> TextureMatrix {
        self.matrix
    }

    fn texture_target(&self) -> TextureTarget {
        self.target
    }

    fn attach_to_texture(&mut self, texture: TextureId) {
        self.attached.push(texture);
    }
}
