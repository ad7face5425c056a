// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for layer updates.
//!
//! Only one step of [`apply`](crate::updater::DeferredLayerUpdater::apply)
//! can fail: resizing the layer's backing storage. Everything else either
//! succeeds or reports "nothing to do" through its return value (for example,
//! an external stream with no new frame).

use thiserror::Error;

/// A [`LayerRenderer`](crate::layer::LayerRenderer) could not resize a layer.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeError {
    /// A zero width or height was requested.
    #[error("cannot resize layer to an empty size")]
    ZeroSize,

    /// The requested size exceeds the device's texture limits.
    #[error("layer size {width}x{height} exceeds the maximum texture dimension {max}")]
    ExceedsLimit {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest supported texture dimension.
        max: u32,
    },

    /// The backing storage could not be allocated.
    #[error("out of memory while allocating layer storage")]
    OutOfMemory,
}

/// Failure reported by [`apply`](crate::updater::DeferredLayerUpdater::apply).
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyError {
    /// The layer could not be resized to the requested size.
    ///
    /// Pending vector content and its dirty region are kept, so a later
    /// `apply` retries the resize.
    #[error("failed to resize layer to {width}x{height}")]
    Resize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Why the renderer refused.
        #[source]
        source: ResizeError,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::error::Error as _;

    use super::*;

    #[test]
    fn resize_error_messages() {
        assert_eq!(
            ResizeError::ExceedsLimit {
                width: 9000,
                height: 10,
                max: 8192
            }
            .to_string(),
            "layer size 9000x10 exceeds the maximum texture dimension 8192"
        );
    }

    #[test]
    fn apply_error_exposes_source() {
        let err = ApplyError::Resize {
            width: 200,
            height: 150,
            source: ResizeError::OutOfMemory,
        };
        assert_eq!(err.to_string(), "failed to resize layer to 200x150");
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("out of memory while allocating layer storage")
        );
    }
}
