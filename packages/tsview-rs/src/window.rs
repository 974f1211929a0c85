//! Window parameters and the clamp rules applied before every query.

use serde::{Deserialize, Serialize};

/// Requested window as supplied by the caller, possibly out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub start: i64,
    pub size: i64,
}

impl WindowParams {
    pub fn new(start: i64, size: i64) -> Self {
        Self { start, size }
    }

    /// Correct the request against a series of `len` points.
    ///
    /// In order: start is clamped to `[0, len-1]`, size is raised to at least
    /// 1, then shortened so the window ends at the last point. Returns `None`
    /// only when the series is empty.
    pub fn clamp(&self, len: usize) -> Option<ClampedWindow> {
        if len == 0 {
            return None;
        }
        let last = (len - 1) as i64;
        let start = self.start.clamp(0, last) as usize;
        let mut size = self.size.max(1) as usize;
        if start.saturating_add(size) > len {
            size = len - start;
        }
        Some(ClampedWindow { start, len: size })
    }
}

/// A window guaranteed to lie inside the series it was clamped against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampedWindow {
    pub start: usize,
    pub len: usize,
}

impl ClampedWindow {
    /// Inclusive last index
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }

    pub fn params(&self) -> WindowParams {
        WindowParams::new(self.start as i64, self.len as i64)
    }
}

/// Inclusive bounds of segment `i` when `window` is split into `width`
/// contiguous segments.
///
/// Segment starts are `S + floor(i*N/width)`; the last segment absorbs the
/// rounding remainder. Together the segments cover every index of the window
/// exactly once.
///
/// `width` is limited to `[1, N]`, so a window narrower than the requested
/// width splits into one segment per point. An `i` past the last segment
/// returns the last segment.
pub fn segment_bounds(window: ClampedWindow, width: usize, i: usize) -> (usize, usize) {
    debug_assert!(window.len > 0, "clamped windows are never empty");
    let width = width.min(window.len).max(1);
    let i = i.min(width - 1);
    let offset = |k: usize| (k as u128 * window.len as u128 / width as u128) as usize;
    let start = window.start + offset(i);
    let end = if i + 1 == width {
        window.end()
    } else {
        window.start + offset(i + 1) - 1
    };
    (start, end)
}
