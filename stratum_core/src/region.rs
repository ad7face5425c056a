// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-region accumulation for vector-content updates.

use kurbo::Rect;

/// The bounding rectangle of layer area that must be re-rendered.
///
/// Successive [`merge`](Self::merge) calls grow the region to the union of
/// every merged rectangle; the region never shrinks until it is
/// [`reset`](Self::reset). Rectangles without positive area are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirtyRegion {
    bounds: Option<Rect>,
}

impl DirtyRegion {
    /// An empty region.
    pub const EMPTY: Self = Self { bounds: None };

    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns `true` if nothing is dirty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns the accumulated bounds, if any.
    #[must_use]
    pub const fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Returns the accumulated bounds, or [`Rect::ZERO`] when empty.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        self.bounds.unwrap_or(Rect::ZERO)
    }

    /// Merges `rect` into the region.
    ///
    /// An empty region becomes `rect`; otherwise the region becomes the
    /// bounding box of both.
    pub fn merge(&mut self, rect: Rect) {
        if !has_area(rect) {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(rect),
            None => rect,
        });
    }

    /// Clears the region.
    pub fn reset(&mut self) {
        self.bounds = None;
    }
}

fn has_area(rect: Rect) -> bool {
    rect.x0 < rect.x1 && rect.y0 < rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_merge_sets_bounds() {
        let mut region = DirtyRegion::new();
        assert!(region.is_empty());
        region.merge(Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(region.bounds(), Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
    }

    #[test]
    fn merges_to_bounding_box() {
        let mut region = DirtyRegion::new();
        region.merge(Rect::new(0.0, 0.0, 10.0, 10.0));
        region.merge(Rect::new(50.0, 5.0, 60.0, 70.0));
        region.merge(Rect::new(-5.0, 2.0, 1.0, 3.0));
        assert_eq!(region.to_rect(), Rect::new(-5.0, 0.0, 60.0, 70.0));
    }

    #[test]
    fn contained_rect_does_not_shrink() {
        let mut region = DirtyRegion::new();
        region.merge(Rect::new(0.0, 0.0, 100.0, 100.0));
        region.merge(Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(region.to_rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn empty_rects_are_ignored() {
        let mut region = DirtyRegion::new();
        region.merge(Rect::new(5.0, 5.0, 5.0, 50.0));
        assert!(region.is_empty(), "zero-width rect must not dirty the region");

        region.merge(Rect::new(0.0, 0.0, 10.0, 10.0));
        region.merge(Rect::new(40.0, 40.0, 30.0, 30.0));
        assert_eq!(region.to_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn reset_empties_region() {
        let mut region = DirtyRegion::new();
        region.merge(Rect::new(0.0, 0.0, 10.0, 10.0));
        region.reset();
        assert!(region.is_empty());
        assert_eq!(region.to_rect(), Rect::ZERO);
    }
}
