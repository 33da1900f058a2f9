//! Geometry APIs
//!
//! DOMRect and the root margin used to grow or shrink an intersection root.

use crate::DomError;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if rects intersect. Touching edges count.
    pub fn intersects(&self, other: &DOMRect) -> bool {
        !(self.right() < other.x ||
          self.x > other.right() ||
          self.bottom() < other.y ||
          self.y > other.bottom())
    }

    /// Get intersection rect
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
    }

    /// Same rect moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f64),
    /// Percentage of the root's width (left/right) or height (top/bottom)
    Percent(f64),
}

impl MarginValue {
    fn parse(token: &str) -> Option<Self> {
        if let Some(px) = token.strip_suffix("px") {
            return px.parse().ok().map(MarginValue::Px);
        }
        if let Some(pct) = token.strip_suffix('%') {
            return pct.parse().ok().map(MarginValue::Percent);
        }
        // Unitless zero is the only bare number CSS lengths allow
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(MarginValue::Px(0.0)),
            _ => None,
        }
    }

    fn resolve(&self, basis: f64) -> f64 {
        match *self {
            MarginValue::Px(v) => v,
            MarginValue::Percent(p) => basis * p / 100.0,
        }
    }
}

/// Root margin (`top right bottom left`, CSS margin shorthand)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginValue::Px(0.0);
        Self { top: zero, right: zero, bottom: zero, left: zero }
    }
}

impl RootMargin {
    /// Parse 1-4 lengths in px or %
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidRootMargin(input.to_string());

        let values = input
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let (top, right, bottom, left) = match values.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(invalid()),
        };
        Ok(Self { top, right, bottom, left })
    }

    /// Grow (or shrink, for negative margins) `root` by this margin
    pub fn apply(&self, root: DOMRect) -> DOMRect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);

        DOMRect::from_xywh(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}
