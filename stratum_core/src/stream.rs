// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External image streams and the frame-drain policy.
//!
//! An [`ExternalStream`] is the consumer end of a producer/consumer frame
//! queue (a camera, a video decoder, another process rendering into a
//! buffer queue). Frames are latched into the layer's texture one pull at a
//! time. A queue running in synchronous mode keeps every queued frame until
//! it is consumed, so latching a single frame per synchronization point lets
//! the backlog grow without bound.
//!
//! [`drain_to_latest`] therefore pulls repeatedly until no newer frame is
//! available, discarding every superseded frame. Latency is bounded by one
//! queue depth and only the newest frame is ever shown.
//!
//! # Termination
//!
//! Draining stops when a pull reports no frame, or when the stream's frame
//! number does not advance across a successful pull (some consumers re-latch
//! the current frame instead of failing).

use crate::layer::TextureLayerUpdate;
use crate::texture::{TextureId, TextureMatrix, TextureTarget};

/// The consumer end of a buffered image stream.
pub trait ExternalStream {
    /// Latches the next queued frame into the attached texture.
    ///
    /// Returns `false` if no frame was available.
    fn pull_next_frame(&mut self) -> bool;

    /// Returns the producer-assigned number of the currently latched frame.
    fn frame_number(&self) -> u64;

    /// Returns the `(width, height)` of the currently latched frame's
    /// backing buffer, if one is latched.
    fn current_buffer_size(&self) -> Option<(u32, u32)>;

    /// Returns the texture-coordinate transform of the latched frame.
    fn transform_matrix(&self) -> TextureMatrix;

    /// Returns how the latched frame must be bound for sampling.
    fn texture_target(&self) -> TextureTarget;

    /// Binds the stream to `texture`. Subsequent pulls latch into it.
    fn attach_to_texture(&mut self, texture: TextureId);
}

/// Result of a successful [`drain_to_latest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Number of the frame left latched.
    pub frame_number: u64,
    /// Frames latched and then superseded during the drain.
    pub dropped: u32,
}

/// Pulls frames from `stream` until the newest available one is latched.
///
/// Returns `None` if the first pull yields nothing, in which case the stream
/// is left untouched and no texture update is needed.
pub fn drain_to_latest<S: ExternalStream + ?Sized>(stream: &mut S) -> Option<DrainOutcome> {
    if !stream.pull_next_frame() {
        return None;
    }

    let mut frame_number = stream.frame_number();
    let mut dropped = 0_u32;
    while stream.pull_next_frame() {
        let next = stream.frame_number();
        if next == frame_number {
            break;
        }
        frame_number = next;
        dropped = dropped.saturating_add(1);
    }

    Some(DrainOutcome {
        frame_number,
        dropped,
    })
}

/// Returns whether a frame must be resampled with filtering because its
/// backing buffer does not match the layer size.
///
/// Without a buffer there is nothing to compare, so no filtering is forced.
#[must_use]
pub fn needs_forced_filter(buffer_size: Option<(u32, u32)>, layer_size: (u32, u32)) -> bool {
    buffer_size.is_some_and(|size| size != layer_size)
}

/// Drains `stream` to its newest frame and builds the texture-layer update
/// for a layer of `width` × `height`.
///
/// Returns `None` when no frame was available.
pub fn latch_latest_frame<S: ExternalStream + ?Sized>(
    stream: &mut S,
    width: u32,
    height: u32,
    blend: bool,
) -> Option<(DrainOutcome, TextureLayerUpdate)> {
    let outcome = drain_to_latest(stream)?;
    let update = TextureLayerUpdate {
        width,
        height,
        opaque: !blend,
        force_filter: needs_forced_filter(stream.current_buffer_size(), (width, height)),
        target: stream.texture_target(),
        matrix: stream.transform_matrix(),
    };
    Some((outcome, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStream;

    #[test]
    fn empty_stream_is_a_no_op() {
        let mut stream = FakeStream::new(&[]);
        assert_eq!(drain_to_latest(&mut stream), None);
        assert_eq!(stream.pulls, 1, "only the first pull is attempted");
    }

    #[test]
    fn single_frame_is_latched() {
        let mut stream = FakeStream::new(&[3]);
        let outcome = drain_to_latest(&mut stream);
        assert_eq!(
            outcome,
            Some(DrainOutcome {
                frame_number: 3,
                dropped: 0
            })
        );
    }

    #[test]
    fn repeated_frame_number_stops_drain() {
        let mut stream = FakeStream::new(&[5, 6, 6, 7]);
        let outcome = drain_to_latest(&mut stream).expect("frames were queued");
        assert_eq!(outcome.frame_number, 6);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(stream.pulls, 3);
        assert_eq!(stream.queued(), 1, "frame 7 stays queued");
    }

    #[test]
    fn drains_backlog_to_newest() {
        let mut stream = FakeStream::new(&[10, 11, 12, 13]);
        let outcome = drain_to_latest(&mut stream).expect("frames were queued");
        assert_eq!(outcome.frame_number, 13);
        assert_eq!(outcome.dropped, 3);
        assert_eq!(stream.queued(), 0);
        assert_eq!(stream.frame_number(), 13);
    }

    #[test]
    fn forced_filter_on_size_mismatch() {
        assert!(needs_forced_filter(Some((80, 60)), (100, 100)));
        assert!(!needs_forced_filter(Some((100, 100)), (100, 100)));
        assert!(!needs_forced_filter(None, (100, 100)));
    }

    #[test]
    fn latch_builds_texture_update() {
        let mut stream = FakeStream::new(&[1, 2])
            .with_buffer_size(80, 60)
            .with_target(TextureTarget::External)
            .with_matrix(TextureMatrix::FLIP_V);
        let (outcome, update) =
            latch_latest_frame(&mut stream, 100, 100, false).expect("frames were queued");
        assert_eq!(outcome.frame_number, 2);
        assert_eq!(
            update,
            TextureLayerUpdate {
                width: 100,
                height: 100,
                opaque: true,
                force_filter: true,
                target: TextureTarget::External,
                matrix: TextureMatrix::FLIP_V,
            }
        );
    }

    #[test]
    fn latch_on_empty_stream_builds_nothing() {
        let mut stream = FakeStream::new(&[]).with_buffer_size(80, 60);
        assert!(latch_latest_frame(&mut stream, 100, 100, true).is_none());
    }
}
