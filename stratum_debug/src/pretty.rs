// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use stratum_core::trace::{
    ApplyEvent, ApplyOutcome, FrameDrainEvent, ResizeEvent, StreamAttachEvent, TraceSink,
};
use stratum_core::updater::ContentBranch;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    lines: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, lines: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Returns the number of lines written so far.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        // A broken diagnostics pipe must never disturb the update itself.
        if writeln!(self.writer, "{args}").is_ok() {
            self.lines += 1;
        }
    }
}

fn branch_name(branch: ContentBranch) -> &'static str {
    match branch {
        ContentBranch::Idle => "idle",
        ContentBranch::Vector => "vector",
        ContentBranch::ExternalStream => "stream",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_apply(&mut self, e: &ApplyEvent) {
        let outcome = match e.outcome {
            ApplyOutcome::Applied => "ok",
            ApplyOutcome::ResizeFailed => "RESIZE FAILED",
        };
        self.line(format_args!(
            "[apply] branch={} outcome={outcome}",
            branch_name(e.branch),
        ));
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let status = if e.ok { "ok" } else { "FAILED" };
        self.line(format_args!(
            "[resize] {}x{} -> {}x{} {status}",
            e.from.0, e.from.1, e.to.0, e.to.1,
        ));
    }

    fn on_stream_attach(&mut self, e: &StreamAttachEvent) {
        self.line(format_args!("[attach] texture={}", e.texture.0));
    }

    fn on_frame_drain(&mut self, e: &FrameDrainEvent) {
        self.line(format_args!(
            "[drain] frame={} dropped={} filter={}",
            e.frame_number,
            e.dropped,
            if e.force_filter { "forced" } else { "auto" },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::texture::TextureId;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_apply() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_apply(&ApplyEvent {
            branch: ContentBranch::Vector,
            outcome: ApplyOutcome::ResizeFailed,
        });
        let output = output(sink);
        assert!(output.contains("[apply]"), "got: {output}");
        assert!(output.contains("branch=vector"), "got: {output}");
        assert!(output.contains("RESIZE FAILED"), "got: {output}");
    }

    #[test]
    fn pretty_print_drain_reports_dropped_frames() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_drain(&FrameDrainEvent {
            frame_number: 12,
            dropped: 4,
            force_filter: true,
        });
        let output = output(sink);
        assert_eq!(output, "[drain] frame=12 dropped=4 filter=forced\n");
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_stream_attach(&StreamAttachEvent {
            texture: TextureId(9),
        });
        sink.on_resize(&ResizeEvent {
            from: (10, 10),
            to: (20, 30),
            ok: true,
        });
        assert_eq!(sink.lines(), 2);
        let output = output(sink);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, ["[attach] texture=9", "[resize] 10x10 -> 20x30 ok"]);
    }
}
