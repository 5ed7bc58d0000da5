#![forbid(unsafe_code)]

//! Geometric primitives in viewport pixel space.
//!
//! All coordinates are `f64` pixels with the origin at the viewport's
//! top-left corner. Values produced by a host measurement may be fractional
//! or negative (a region scrolled partially out of view).

/// Bounding box of an inspected region, captured at hover-start.
///
/// Edges follow the DOM `getBoundingClientRect` convention: `right` and
/// `bottom` are absolute coordinates, not extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorRect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl AnchorRect {
    /// Zero-sized rect at the origin, used when a region cannot be measured.
    pub const DEGENERATE: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create an anchor from its four edges.
    #[inline]
    pub const fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    /// Create an anchor from an origin and a size.
    #[inline]
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(y, x, x + width, y + height)
    }

    /// Horizontal extent (may be negative for malformed input).
    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent (may be negative for malformed input).
    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// True if every edge is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// True for zero-area or malformed rects.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Replace a non-finite measurement with [`AnchorRect::DEGENERATE`].
    ///
    /// Finite zero-sized rects are kept as-is: their position is still
    /// meaningful to the positioner.
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.is_finite() {
            self
        } else {
            Self::DEGENERATE
        }
    }
}

/// Width/height pair, used for both the viewport and the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp non-finite or negative dimensions to zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }

    /// True when both dimensions are finite and strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Top-left corner of the floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelPlacement {
    pub top: f64,
    pub left: f64,
}

impl PanelPlacement {
    /// Create a new placement.
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_extents() {
        let r = AnchorRect::new(100.0, 500.0, 600.0, 140.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 40.0);
        assert!(!r.is_degenerate());
    }

    #[test]
    fn from_origin_size_matches_edges() {
        let r = AnchorRect::from_origin_size(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r, AnchorRect::new(20.0, 10.0, 40.0, 60.0));
    }

    #[test]
    fn zero_sized_is_degenerate_but_kept() {
        let r = AnchorRect::new(50.0, 50.0, 50.0, 50.0);
        assert!(r.is_degenerate());
        assert_eq!(r.sanitized(), r);
    }

    #[test]
    fn nan_sanitizes_to_origin() {
        let r = AnchorRect::new(f64::NAN, 1.0, 2.0, 3.0);
        assert!(r.is_degenerate());
        assert_eq!(r.sanitized(), AnchorRect::DEGENERATE);
    }

    #[test]
    fn size_sanitize() {
        let s = Size::new(-5.0, f64::INFINITY).sanitized();
        assert_eq!(s, Size::new(0.0, 0.0));
        assert!(!s.is_positive());
        assert!(Size::new(320.0, 280.0).is_positive());
    }
}
