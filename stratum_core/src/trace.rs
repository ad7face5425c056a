// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layer updates.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`apply_traced`](crate::updater::DeferredLayerUpdater::apply_traced) calls
//! at each step. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`UpdateStats`] is a convenience sink that counts events across many
//! applies.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::texture::TextureId;
use crate::updater::ContentBranch;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How an `apply` call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplyOutcome {
    /// All pending work for the selected branch was applied.
    Applied,
    /// The layer could not be resized; pending content was kept.
    ResizeFailed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once at the end of every `apply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyEvent {
    /// Content branch that ran.
    pub branch: ContentBranch,
    /// How the call ended.
    pub outcome: ApplyOutcome,
}

/// Emitted for every resize attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeEvent {
    /// Layer size before the attempt.
    pub from: (u32, u32),
    /// Requested size.
    pub to: (u32, u32),
    /// Whether the renderer succeeded.
    pub ok: bool,
}

/// Emitted when the external stream is bound to the layer's texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamAttachEvent {
    /// Texture the stream now latches into.
    pub texture: TextureId,
}

/// Emitted after a frame drain latched a new frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDrainEvent {
    /// Number of the frame left latched.
    pub frame_number: u64,
    /// Frames discarded because a newer one was queued behind them.
    pub dropped: u32,
    /// Whether filtering was forced by a buffer/layer size mismatch.
    pub force_filter: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from layer updates.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the end of every `apply`.
    fn on_apply(&mut self, e: &ApplyEvent) {
        _ = e;
    }

    /// Called after every resize attempt.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called when the external stream is attached to a texture.
    fn on_stream_attach(&mut self, e: &StreamAttachEvent) {
        _ = e;
    }

    /// Called after a frame drain latched a frame.
    fn on_frame_drain(&mut self, e: &FrameDrainEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`ApplyEvent`].
    #[inline]
    pub fn apply(&mut self, e: &ApplyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_apply(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResizeEvent`].
    #[inline]
    pub fn resize(&mut self, e: &ResizeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resize(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StreamAttachEvent`].
    #[inline]
    pub fn stream_attach(&mut self, e: &StreamAttachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stream_attach(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameDrainEvent`].
    #[inline]
    pub fn frame_drain(&mut self, e: &FrameDrainEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_drain(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateStats
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that counts update events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Total `apply` calls.
    pub applies: u64,
    /// Applies that ran the vector-content branch successfully.
    pub vector_updates: u64,
    /// Applies that ran the external-stream branch.
    pub stream_updates: u64,
    /// Applies that failed to resize the layer.
    pub resize_failures: u64,
    /// Stream attachments.
    pub attaches: u64,
    /// Frames left latched by a drain.
    pub frames_latched: u64,
    /// Frames discarded by drains.
    pub frames_dropped: u64,
}

impl UpdateStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl TraceSink for UpdateStats {
    fn on_apply(&mut self, e: &ApplyEvent) {
        self.applies += 1;
        match (e.branch, e.outcome) {
            (_, ApplyOutcome::ResizeFailed) => self.resize_failures += 1,
            (ContentBranch::Vector, ApplyOutcome::Applied) => self.vector_updates += 1,
            (ContentBranch::ExternalStream, ApplyOutcome::Applied) => self.stream_updates += 1,
            (ContentBranch::Idle, ApplyOutcome::Applied) => {}
        }
    }

    fn on_stream_attach(&mut self, _e: &StreamAttachEvent) {
        self.attaches += 1;
    }

    fn on_frame_drain(&mut self, e: &FrameDrainEvent) {
        self.frames_latched += 1;
        self.frames_dropped += u64::from(e.dropped);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
