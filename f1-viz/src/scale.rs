//! Continuous and ordinal scales.

use serde::Serialize;

/// Chart margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Maps a continuous domain onto a continuous range.
///
/// A degenerate domain (both ends equal) maps every value to the middle of
/// the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (value - d0) / span
        };
        r0 + t * (r1 - r0)
    }
}

/// Places `len` evenly spaced points across a range with outer padding.
///
/// A reversed range (start > end) lays the points out right to left. A single
/// point sits in the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    len: usize,
    range: (f64, f64),
    padding: f64,
}

impl PointScale {
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        Self {
            len,
            range,
            padding,
        }
    }

    /// Distance between neighbouring points.
    pub fn step(&self) -> f64 {
        let (lo, hi) = self.bounds();
        let n = self.len as f64;
        (hi - lo) / (n - 1.0 + self.padding * 2.0).max(1.0)
    }

    /// Position of the point at `index`, or `None` when out of bounds.
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }
        let (lo, hi) = self.bounds();
        let step = self.step();
        let start = lo + (hi - lo - step * (self.len as f64 - 1.0)) * 0.5;
        let slot = if self.range.0 > self.range.1 {
            self.len - 1 - index
        } else {
            index
        };
        Some(start + step * slot as f64)
    }

    fn bounds(&self) -> (f64, f64) {
        let (a, b) = self.range;
        (a.min(b), a.max(b))
    }
}
