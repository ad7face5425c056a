// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred property and content updates for GPU-backed render layers.
//!
//! `stratum_core` buffers changes to an offscreen layer that is described on
//! one context (the *producer*) and mutated on another (the *consumer*, which
//! owns the only safe window to touch GPU resources). Changes accumulate in a
//! [`DeferredLayerUpdater`](updater::DeferredLayerUpdater) and are pushed to
//! the layer in one [`apply`](updater::DeferredLayerUpdater::apply) call. The
//! crate is `no_std` compatible (with `alloc`) and performs no GPU work
//! itself; it decides what must happen and in which order, then delegates to
//! the collaborator traits in [`layer`] and [`stream`].
//!
//! # Architecture
//!
//! ```text
//!   producer                                consumer
//!   ────────                                ────────
//!   set_paint / set_size / set_blend ─┐
//!   set_vector_content ───────────────┼──► DeferredLayerUpdater ──► apply()
//!   set_transform ────────────────────┤                              │
//!   set_external_stream ──────────────┤          ┌───────────────────┤
//!   mark_stream_frame_available ──────┘          ▼                   ▼
//!                                   shared properties     vector │ stream branch
//!                                   (filter, opacity)     content  (attach, drain,
//!                                                         branch    transform)
//! ```
//!
//! **[`updater`]** — The deferred update buffer and its `apply` dispatch.
//!
//! **[`region`]** — Dirty-rectangle accumulation for the vector-content path.
//!
//! **[`stream`]** — The [`ExternalStream`](stream::ExternalStream) consumer
//! contract and the frame-drain policy that latches the newest frame.
//!
//! **[`layer`]** — The [`Layer`](layer::Layer),
//! [`VectorContent`](layer::VectorContent), and
//! [`LayerRenderer`](layer::LayerRenderer) traits that backends implement.
//!
//! **[`paint`]** — Opacity, composite modes, and color-filter references.
//!
//! **[`texture`]** — Texture handles, binding targets, and texture matrices.
//!
//! **[`error`]** — Resize and apply errors.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! update instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod error;
pub mod layer;
pub mod paint;
pub mod region;
pub mod stream;
pub mod texture;
pub mod trace;
pub mod updater;

#[cfg(test)]
mod testing;
