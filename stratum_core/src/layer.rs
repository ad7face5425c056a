// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for layer backends.
//!
//! Stratum splits GPU work into *backend* implementations of three traits:
//!
//! - **[`Layer`]** — The GPU-resident render target. Exposes its current
//!   properties and accepts new ones. The updater owns exactly one layer
//!   value; backends that share layers between owners implement `Layer` on a
//!   reference-counted handle, so dropping the updater releases one
//!   reference.
//!
//! - **[`VectorContent`]** — A retained display list rendered into the layer.
//!   Its cached properties are refreshed right before it is handed over.
//!
//! - **[`LayerRenderer`]** — The rendering context that resizes layer storage
//!   and uploads stream frames into the layer's texture.
//!
//! The external image-stream contract lives in
//! [`stream`](crate::stream) alongside the frame-drain policy.
//!
//! # Apply pseudocode
//!
//! A consumer-side frame callback typically looks like this:
//!
//! ```rust,ignore
//! fn on_render_pass(updaters: &mut [DeferredLayerUpdater<GpuRenderer, Camera>]) {
//!     for updater in updaters {
//!         if let Err(err) = updater.apply() {
//!             // The layer keeps showing its previous content; the next
//!             // render pass retries.
//!             log_resize_failure(err);
//!         }
//!     }
//! }
//! ```

use kurbo::{Affine, Rect};

use crate::error::ResizeError;
use crate::paint::{ColorFilterRef, Opacity};
use crate::texture::{TextureId, TextureMatrix, TextureTarget};

/// A retained display list that renders into a layer.
pub trait VectorContent {
    /// Refreshes properties the content caches from its own scene state.
    ///
    /// Called once per successful vector-content apply, before the content is
    /// handed to [`Layer::update_deferred`].
    fn update_properties(&mut self);
}

/// A GPU-resident offscreen render target.
pub trait Layer {
    /// The vector content type this layer can render.
    type Content: VectorContent;

    /// Returns the current size of the layer's GPU storage as
    /// `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Returns whether the layer blends with what is beneath it.
    fn is_blend(&self) -> bool;

    /// Sets whether the layer blends with what is beneath it.
    fn set_blend(&mut self, blend: bool);

    /// Returns the layer's color filter.
    fn color_filter(&self) -> Option<ColorFilterRef>;

    /// Replaces the layer's color filter.
    fn set_color_filter(&mut self, filter: Option<ColorFilterRef>);

    /// Returns the layer's opacity.
    fn opacity(&self) -> Opacity;

    /// Sets the layer's opacity.
    fn set_opacity(&mut self, opacity: Opacity);

    /// Returns the layer's transform.
    fn transform(&self) -> Affine;

    /// Replaces the layer's transform.
    fn set_transform(&mut self, transform: Affine);

    /// Returns the handle of the texture backing this layer.
    fn texture(&self) -> TextureId;

    /// Stores `content` in the layer's content slot, scheduling the `dirty`
    /// area to be re-rendered on the next draw.
    fn update_deferred(&mut self, content: Self::Content, dirty: Rect);
}

/// Parameters for uploading a latched stream frame into a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureLayerUpdate {
    /// Configured layer width.
    pub width: u32,
    /// Configured layer height.
    pub height: u32,
    /// Whether the layer may take the opaque fast path (the inverse of its
    /// blend flag).
    pub opaque: bool,
    /// Whether sampling must filter regardless of the usual heuristics,
    /// because the frame size differs from the layer size.
    pub force_filter: bool,
    /// How the frame is bound for sampling.
    pub target: TextureTarget,
    /// Texture-coordinate transform reported for the frame.
    pub matrix: TextureMatrix,
}

/// The rendering context that owns GPU-side layer mutations.
pub trait LayerRenderer {
    /// The layer type this renderer operates on.
    type Layer: Layer;

    /// Reallocates `layer`'s storage at `width` × `height`.
    fn resize_layer(
        &mut self,
        layer: &mut Self::Layer,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError>;

    /// Points `layer` at the frame most recently latched into its texture.
    fn update_texture_layer(&mut self, layer: &mut Self::Layer, update: &TextureLayerUpdate);

    /// Called once at the end of every `apply`, after all mutations of that
    /// call have reached `layer`, including when the resize failed.
    ///
    /// Backends that mirror layer state on the GPU upload it here, so the
    /// mirror sees the final state of the apply rather than an intermediate
    /// one.
    fn flush_layer(&mut self, layer: &mut Self::Layer) {
        _ = layer;
    }
}
