// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-derived layer properties: opacity, composite mode, and color filter.

use alloc::sync::Arc;
use core::fmt;

/// Porter-Duff / separable blend mode used when compositing a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositeMode {
    /// Discard the destination.
    Clear,
    /// Replace the destination with the source.
    Src,
    /// Standard source-over alpha compositing.
    #[default]
    SrcOver,
    /// Source kept where the destination is opaque.
    SrcIn,
    /// Destination kept where the source is transparent.
    DstOut,
    /// Additive blend.
    Plus,
    /// Multiply blend.
    Multiply,
    /// Screen blend.
    Screen,
}

/// Layer opacity: an alpha in `0.0..=1.0` plus the mode used to composite it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Opacity {
    /// Alpha multiplier, clamped to `0.0..=1.0`.
    pub alpha: f32,
    /// Composite mode.
    pub mode: CompositeMode,
}

impl Opacity {
    /// Fully opaque, source-over.
    pub const OPAQUE: Self = Self {
        alpha: 1.0,
        mode: CompositeMode::SrcOver,
    };

    /// Creates an opacity, clamping `alpha` into `0.0..=1.0`.
    ///
    /// NaN alphas are treated as fully opaque.
    #[must_use]
    pub fn new(alpha: f32, mode: CompositeMode) -> Self {
        let alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self { alpha, mode }
    }

    /// Extracts the opacity a paint would apply to a layer.
    ///
    /// An absent paint yields [`Opacity::OPAQUE`].
    #[must_use]
    pub fn from_paint(paint: Option<&Paint>) -> Self {
        paint.map_or(Self::OPAQUE, |p| Self::new(p.alpha, p.mode))
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// A color transformation applied while compositing a layer.
///
/// Filters are created and owned by the caller; layers and updaters only hold
/// shared [`ColorFilterRef`] handles to them.
pub trait ColorFilter: fmt::Debug + Send + Sync {
    /// Maps a premultiplied RGBA color.
    fn filter_color(&self, rgba: [f32; 4]) -> [f32; 4];
}

/// Shared handle to a [`ColorFilter`].
pub type ColorFilterRef = Arc<dyn ColorFilter>;

/// Returns whether two optional filter handles point at the same filter.
#[must_use]
pub fn same_filter(a: Option<&ColorFilterRef>, b: Option<&ColorFilterRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// The subset of a paint descriptor that affects how a layer is composited.
#[derive(Clone, Debug)]
pub struct Paint {
    /// Alpha multiplier in `0.0..=1.0`.
    pub alpha: f32,
    /// Composite mode.
    pub mode: CompositeMode,
    /// Optional color filter.
    pub color_filter: Option<ColorFilterRef>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            mode: CompositeMode::SrcOver,
            color_filter: None,
        }
    }
}

impl Paint {
    /// Returns this paint with the given alpha.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns this paint with the given composite mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns this paint with the given color filter.
    #[must_use]
    pub fn with_color_filter(mut self, filter: ColorFilterRef) -> Self {
        self.color_filter = Some(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Tint;

    #[test]
    fn absent_paint_is_opaque_source_over() {
        assert_eq!(Opacity::from_paint(None), Opacity::OPAQUE);
    }

    #[test]
    fn paint_alpha_and_mode_are_extracted() {
        let paint = Paint::default()
            .with_alpha(0.25)
            .with_mode(CompositeMode::Multiply);
        let opacity = Opacity::from_paint(Some(&paint));
        assert_eq!(opacity.alpha, 0.25);
        assert_eq!(opacity.mode, CompositeMode::Multiply);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Opacity::new(1.5, CompositeMode::Src).alpha, 1.0);
        assert_eq!(Opacity::new(-0.5, CompositeMode::Src).alpha, 0.0);
        assert_eq!(Opacity::new(f32::NAN, CompositeMode::Src).alpha, 1.0);
    }

    #[test]
    fn filter_identity_is_pointer_identity() {
        let a: ColorFilterRef = Arc::new(Tint(0.5));
        let b: ColorFilterRef = Arc::new(Tint(0.5));
        assert!(same_filter(Some(&a), Some(&a.clone())));
        assert!(!same_filter(Some(&a), Some(&b)));
        assert!(!same_filter(Some(&a), None));
        assert!(same_filter(None, None));
    }
}
