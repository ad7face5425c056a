// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed by a one-byte
//! tag. [`decode`] reads them back as an iterator of [`RecordedEvent`].

use stratum_core::texture::TextureId;
use stratum_core::trace::{
    ApplyEvent, ApplyOutcome, FrameDrainEvent, ResizeEvent, StreamAttachEvent, TraceSink,
};
use stratum_core::updater::ContentBranch;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_APPLY: u8 = 1;
const TAG_RESIZE: u8 = 2;
const TAG_STREAM_ATTACH: u8 = 3;
const TAG_FRAME_DRAIN: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_size(&mut self, (width, height): (u32, u32)) {
        self.write_u32(width);
        self.write_u32(height);
    }

    fn write_branch(&mut self, b: ContentBranch) {
        self.write_u8(match b {
            ContentBranch::Idle => 0,
            ContentBranch::Vector => 1,
            ContentBranch::ExternalStream => 2,
        });
    }

    fn write_outcome(&mut self, o: ApplyOutcome) {
        self.write_u8(match o {
            ApplyOutcome::Applied => 0,
            ApplyOutcome::ResizeFailed => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_apply(&mut self, e: &ApplyEvent) {
        self.write_u8(TAG_APPLY);
        self.write_branch(e.branch);
        self.write_outcome(e.outcome);
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.write_u8(TAG_RESIZE);
        self.write_size(e.from);
        self.write_size(e.to);
        self.write_bool(e.ok);
    }

    fn on_stream_attach(&mut self, e: &StreamAttachEvent) {
        self.write_u8(TAG_STREAM_ATTACH);
        self.write_u32(e.texture.0);
    }

    fn on_frame_drain(&mut self, e: &FrameDrainEvent) {
        self.write_u8(TAG_FRAME_DRAIN);
        self.write_u64(e.frame_number);
        self.write_u32(e.dropped);
        self.write_bool(e.force_filter);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// An [`ApplyEvent`].
    Apply(ApplyEvent),
    /// A [`ResizeEvent`].
    Resize(ResizeEvent),
    /// A [`StreamAttachEvent`].
    StreamAttach(StreamAttachEvent),
    /// A [`FrameDrainEvent`].
    FrameDrain(FrameDrainEvent),
}

impl RecordedEvent {
    /// Re-emits this event into `sink`.
    pub fn replay(&self, sink: &mut dyn TraceSink) {
        match self {
            Self::Apply(e) => sink.on_apply(e),
            Self::Resize(e) => sink.on_resize(e),
            Self::StreamAttach(e) => sink.on_stream_attach(e),
            Self::FrameDrain(e) => sink.on_frame_drain(e),
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_size(&mut self) -> Option<(u32, u32)> {
        Some((self.read_u32()?, self.read_u32()?))
    }

    fn read_branch(&mut self) -> Option<ContentBranch> {
        Some(match self.read_u8()? {
            0 => ContentBranch::Idle,
            1 => ContentBranch::Vector,
            _ => ContentBranch::ExternalStream,
        })
    }

    fn read_outcome(&mut self) -> Option<ApplyOutcome> {
        Some(match self.read_u8()? {
            0 => ApplyOutcome::Applied,
            _ => ApplyOutcome::ResizeFailed,
        })
    }

    fn decode_apply(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Apply(ApplyEvent {
            branch: self.read_branch()?,
            outcome: self.read_outcome()?,
        }))
    }

    fn decode_resize(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Resize(ResizeEvent {
            from: self.read_size()?,
            to: self.read_size()?,
            ok: self.read_bool()?,
        }))
    }

    fn decode_stream_attach(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StreamAttach(StreamAttachEvent {
            texture: TextureId(self.read_u32()?),
        }))
    }

    fn decode_frame_drain(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameDrain(FrameDrainEvent {
            frame_number: self.read_u64()?,
            dropped: self.read_u32()?,
            force_filter: self.read_bool()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_APPLY => self.decode_apply(),
            TAG_RESIZE => self.decode_resize(),
            TAG_STREAM_ATTACH => self.decode_stream_attach(),
            TAG_FRAME_DRAIN => self.decode_frame_drain(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
