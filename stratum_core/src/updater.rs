// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deferred layer update buffer.
//!
//! A [`DeferredLayerUpdater`] sits between a producer that describes what a
//! layer should look like and the consumer that owns the render pass. The
//! producer calls setters at any time; nothing touches the layer until the
//! consumer calls [`apply`](DeferredLayerUpdater::apply).
//!
//! # Apply order
//!
//! 1. **Shared properties** — color filter and opacity are pushed to the
//!    layer unconditionally.
//! 2. **Content branch** — exactly one of:
//!    - **Vector** (pending vector content present): resize the layer if the
//!      requested size differs from its current size, set blend, refresh the
//!      content's cached properties, hand content and dirty region to the
//!      layer.
//!    - **External stream** (a stream is attached and no vector content is
//!      pending): attach the stream to the layer's texture once, drain to the
//!      newest frame if one was announced, load a pending transform.
//!    - **Idle**: nothing.
//!
//! 3. **Flush** — [`LayerRenderer::flush_layer`] runs last, on success and
//!    on resize failure alike.
//!
//! # One-shot flags
//!
//! `needs_attach` is cleared right after the stream is attached;
//! `needs_refresh` is cleared when the drain runs, whether or not a frame was
//! available. A pending transform is cleared when it is loaded into the
//! layer.
//!
//! # Resize failure
//!
//! A failed resize aborts the vector branch before any content mutation and
//! keeps the pending content and its dirty region. Shared properties already
//! pushed in step 1 stay applied. The next `apply` retries the resize, and
//! any regions merged in between widen the retained dirty region.

use core::fmt;
use core::mem;

use kurbo::{Affine, Rect};

use crate::error::ApplyError;
use crate::layer::{Layer, LayerRenderer, VectorContent};
use crate::paint::{ColorFilterRef, Opacity, Paint};
use crate::region::DirtyRegion;
use crate::stream::{ExternalStream, latch_latest_frame};
use crate::texture::{TextureId, TextureMatrix, TextureTarget};
use crate::trace::{
    ApplyEvent, ApplyOutcome, FrameDrainEvent, ResizeEvent, StreamAttachEvent, Tracer,
};

/// Vector content type rendered by renderer `R`'s layers.
pub type ContentOf<R> = <<R as LayerRenderer>::Layer as Layer>::Content;

/// Which content branch the next [`apply`](DeferredLayerUpdater::apply)
/// will run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentBranch {
    /// No content update; only shared properties are applied.
    Idle,
    /// Pending vector content is handed to the layer.
    Vector,
    /// The external stream is attached and/or drained.
    ExternalStream,
}

/// Vector content waiting for the next apply.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingContent<C> {
    /// Nothing pending.
    Empty,
    /// Content plus the accumulated area it invalidates.
    Vector {
        /// The content to hand to the layer.
        content: C,
        /// Union of every rectangle set since the last successful apply.
        dirty: DirtyRegion,
    },
}

impl<C> Default for PendingContent<C> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<C> PendingContent<C> {
    /// Returns `true` if nothing is pending.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the pending dirty region (empty when nothing is pending).
    #[must_use]
    pub const fn dirty(&self) -> DirtyRegion {
        match self {
            Self::Empty => DirtyRegion::EMPTY,
            Self::Vector { dirty, .. } => *dirty,
        }
    }
}

/// An attached external stream and its one-shot flags.
#[derive(Debug)]
struct StreamSlot<S> {
    stream: S,
    needs_attach: bool,
    needs_refresh: bool,
}

/// Placeholder stream type for updaters that never attach a stream.
///
/// It has no values, so the external-stream branch of such an updater can
/// never run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoStream {}

impl ExternalStream for NoStream {
    fn pull_next_frame(&mut self) -> bool {
        match *self {}
    }

    fn frame_number(&self) -> u64 {
        match *self {}
    }

    fn current_buffer_size(&self) -> Option<(u32, u32)> {
        match *self {}
    }

    fn transform_matrix(&self) -> TextureMatrix {
        match *self {}
    }

    fn texture_target(&self) -> TextureTarget {
        match *self {}
    }

    fn attach_to_texture(&mut self, _texture: TextureId) {
        match *self {}
    }
}

/// Buffers property and content changes for one layer until
/// [`apply`](Self::apply).
///
/// The updater owns the layer handle and the renderer used to mutate it.
/// Dropping the updater releases both, together with its color-filter
/// reference and stream.
pub struct DeferredLayerUpdater<R: LayerRenderer, S = NoStream> {
    layer: R::Layer,
    renderer: R,

    // -- Content --
    pending: PendingContent<ContentOf<R>>,
    stream: Option<StreamSlot<S>>,
    pending_transform: Option<Affine>,

    // -- Property mirror (last write wins) --
    width: u32,
    height: u32,
    blend: bool,
    opacity: Opacity,
    color_filter: Option<ColorFilterRef>,
}

impl<R: LayerRenderer, S> fmt::Debug for DeferredLayerUpdater<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredLayerUpdater")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("blend", &self.blend)
            .field("opacity", &self.opacity)
            .field("has_color_filter", &self.color_filter.is_some())
            .field("dirty", &self.pending.dirty())
            .field("pending_transform", &self.pending_transform)
            .field("has_stream", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: LayerRenderer, S: ExternalStream> DeferredLayerUpdater<R, S> {
    /// Creates an updater for `layer`, snapshotting its current size, blend
    /// flag, opacity, and color filter.
    #[must_use]
    pub fn new(layer: R::Layer, renderer: R) -> Self {
        let (width, height) = layer.size();
        let blend = layer.is_blend();
        let opacity = layer.opacity();
        let color_filter = layer.color_filter();
        Self {
            layer,
            renderer,
            pending: PendingContent::Empty,
            stream: None,
            pending_transform: None,
            width,
            height,
            blend,
            opacity,
            color_filter,
        }
    }

    // -- Producer API --

    /// Takes opacity and color filter from `paint`.
    ///
    /// `None` resets to full opacity, source-over, and no color filter.
    pub fn set_paint(&mut self, paint: Option<&Paint>) {
        self.opacity = Opacity::from_paint(paint);
        // Clone the new reference before the old one is dropped.
        let filter = paint.and_then(|p| p.color_filter.clone());
        self.color_filter = filter;
    }

    /// Requests a layer size. Returns `true` if the request changed.
    ///
    /// The layer is only resized during a vector-content apply, and only if
    /// its size at that moment differs from the request.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if (self.width, self.height) == (width, height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Requests a blend flag. Returns `true` if the request changed.
    pub fn set_blend(&mut self, blend: bool) -> bool {
        if self.blend == blend {
            return false;
        }
        self.blend = blend;
        true
    }

    /// Makes `content` the pending vector content and merges `dirty` into
    /// the pending dirty region.
    ///
    /// Pending vector content takes precedence over the external stream at
    /// the next apply.
    pub fn set_vector_content(&mut self, content: ContentOf<R>, dirty: Rect) {
        let mut region = match mem::take(&mut self.pending) {
            PendingContent::Vector { dirty, .. } => dirty,
            PendingContent::Empty => DirtyRegion::new(),
        };
        region.merge(dirty);
        self.pending = PendingContent::Vector {
            content,
            dirty: region,
        };
    }

    /// Sets or clears the transform loaded into the layer on the next
    /// external-stream apply.
    pub fn set_transform(&mut self, transform: Option<Affine>) {
        self.pending_transform = transform;
    }

    /// Associates the external stream this layer displays.
    ///
    /// The first stream is kept for the updater's lifetime and is attached to
    /// the layer's texture on the next external-stream apply. A stream can
    /// only be associated once; later calls hand the stream back.
    pub fn set_external_stream(&mut self, stream: S) -> Result<(), S> {
        if self.stream.is_some() {
            return Err(stream);
        }
        self.stream = Some(StreamSlot {
            stream,
            needs_attach: true,
            needs_refresh: false,
        });
        Ok(())
    }

    /// Announces that the stream has a new frame to latch on the next apply.
    ///
    /// Has no effect until a stream is associated.
    pub fn mark_stream_frame_available(&mut self) {
        if let Some(slot) = &mut self.stream {
            slot.needs_refresh = true;
        }
    }

    // -- Consumer API --

    /// Applies every pending change to the layer.
    ///
    /// See the [module documentation](self) for the exact order. Fails only
    /// if the layer cannot be resized, in which case the pending vector
    /// content is kept for the next call.
    pub fn apply(&mut self) -> Result<(), ApplyError> {
        self.apply_traced(&mut Tracer::none())
    }

    /// Like [`apply`](Self::apply), reporting each step to `tracer`.
    pub fn apply_traced(&mut self, tracer: &mut Tracer<'_>) -> Result<(), ApplyError> {
        self.layer.set_color_filter(self.color_filter.clone());
        self.layer.set_opacity(self.opacity);

        let branch = self.pending_branch();
        let result = match branch {
            ContentBranch::Vector => self.apply_vector_content(tracer),
            ContentBranch::ExternalStream => {
                self.apply_stream(tracer);
                Ok(())
            }
            ContentBranch::Idle => Ok(()),
        };
        self.renderer.flush_layer(&mut self.layer);

        tracer.apply(&ApplyEvent {
            branch,
            outcome: match result {
                Ok(()) => ApplyOutcome::Applied,
                Err(ApplyError::Resize { .. }) => ApplyOutcome::ResizeFailed,
            },
        });
        result
    }

    fn apply_vector_content(&mut self, tracer: &mut Tracer<'_>) -> Result<(), ApplyError> {
        let current = self.layer.size();
        let requested = (self.width, self.height);
        if current != requested {
            let resized = self
                .renderer
                .resize_layer(&mut self.layer, self.width, self.height);
            tracer.resize(&ResizeEvent {
                from: current,
                to: requested,
                ok: resized.is_ok(),
            });
            resized.map_err(|source| ApplyError::Resize {
                width: self.width,
                height: self.height,
                source,
            })?;
        }

        self.layer.set_blend(self.blend);
        if let PendingContent::Vector { mut content, dirty } = mem::take(&mut self.pending) {
            content.update_properties();
            self.layer.update_deferred(content, dirty.to_rect());
        }
        Ok(())
    }

    fn apply_stream(&mut self, tracer: &mut Tracer<'_>) {
        let Some(slot) = &mut self.stream else {
            return;
        };

        if slot.needs_attach {
            let texture = self.layer.texture();
            slot.stream.attach_to_texture(texture);
            slot.needs_attach = false;
            tracer.stream_attach(&StreamAttachEvent { texture });
        }

        if slot.needs_refresh {
            let latched = latch_latest_frame(&mut slot.stream, self.width, self.height, self.blend);
            slot.needs_refresh = false;
            if let Some((outcome, update)) = latched {
                tracer.frame_drain(&FrameDrainEvent {
                    frame_number: outcome.frame_number,
                    dropped: outcome.dropped,
                    force_filter: update.force_filter,
                });
                self.renderer.update_texture_layer(&mut self.layer, &update);
            }
        }

        if let Some(transform) = self.pending_transform.take() {
            self.layer.set_transform(transform);
        }
    }

    // -- Inspection --

    /// Returns the branch the next apply will run.
    #[must_use]
    pub fn pending_branch(&self) -> ContentBranch {
        if !self.pending.is_empty() {
            ContentBranch::Vector
        } else if self.stream.is_some() {
            ContentBranch::ExternalStream
        } else {
            ContentBranch::Idle
        }
    }

    /// Returns the pending vector content.
    #[must_use]
    pub fn pending_content(&self) -> &PendingContent<ContentOf<R>> {
        &self.pending
    }

    /// Returns the pending dirty region.
    #[must_use]
    pub fn dirty_region(&self) -> DirtyRegion {
        self.pending.dirty()
    }

    /// Returns the transform waiting to be loaded, if any.
    #[must_use]
    pub fn pending_transform(&self) -> Option<Affine> {
        self.pending_transform
    }

    /// Returns whether the stream still has to be attached to the texture.
    #[must_use]
    pub fn needs_stream_attach(&self) -> bool {
        self.stream.as_ref().is_some_and(|slot| slot.needs_attach)
    }

    /// Returns whether a stream frame was announced since the last drain.
    #[must_use]
    pub fn needs_stream_refresh(&self) -> bool {
        self.stream.as_ref().is_some_and(|slot| slot.needs_refresh)
    }

    /// Returns the requested `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the requested blend flag.
    #[must_use]
    pub fn blend(&self) -> bool {
        self.blend
    }

    /// Returns the requested opacity.
    #[must_use]
    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Returns the requested color filter.
    #[must_use]
    pub fn color_filter(&self) -> Option<&ColorFilterRef> {
        self.color_filter.as_ref()
    }

    /// Returns the layer.
    #[must_use]
    pub fn layer(&self) -> &R::Layer {
        &self.layer
    }

    /// Returns the layer mutably.
    ///
    /// Only the consumer context may mutate the layer.
    pub fn layer_mut(&mut self) -> &mut R::Layer {
        &mut self.layer
    }

    /// Returns the renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Returns the associated stream, if any.
    #[must_use]
    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref().map(|slot| &slot.stream)
    }

    /// Returns the associated stream mutably, if any.
    pub fn stream_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut().map(|slot| &mut slot.stream)
    }

    /// Consumes the updater, returning the layer, renderer, and stream.
    ///
    /// Pending changes that were never applied are discarded.
    #[must_use]
    pub fn into_parts(self) -> (R::Layer, R, Option<S>) {
        (self.layer, self.renderer, self.stream.map(|slot| slot.stream))
    }
}
