//! Fixed-width projection of a window for band+line rendering.

use rayon::prelude::*;

use crate::range::{range_mean, range_stats};
use crate::store::SeriesStore;
use crate::types::{Projection, WindowStats, WindowView};
use crate::window::{segment_bounds, ClampedWindow, WindowParams};

/// Output widths at or above this are aggregated on the rayon pool
pub const PARALLEL_SEGMENT_THRESHOLD: usize = 4096;

/// Project the window `(start, size)` of `store` onto `output_width` points.
///
/// The window is clamped first. An empty store has no window to clamp to, so
/// its projection is the empty sequence, reported as `None`.
pub fn project(
    store: &SeriesStore,
    start: i64,
    size: i64,
    output_width: usize,
) -> Option<WindowView> {
    let window = WindowParams::new(start, size).clamp(store.len())?;
    Some(project_window(store, window, output_width))
}

/// Project an already clamped window.
///
/// Windows wider than `output_width` are split into exactly `output_width`
/// segments, each reported as (first x, min, max, mean) so extrema survive
/// downsampling. Narrower windows pass raw points through with
/// `low = high = mean = y`. The window's summary statistics are computed once
/// over the whole window, independent of the width.
pub fn project_window(store: &SeriesStore, window: ClampedWindow, output_width: usize) -> WindowView {
    crate::profile_scope!("project_window");
    let output_width = output_width.max(1);
    let downsampled = window.len > output_width;

    let projection = if downsampled {
        downsample(store, window, output_width)
    } else {
        passthrough(store, window)
    };

    let stats = WindowStats::from_range(&range_stats(store, window.start, window.end()));

    log::trace!(
        "Projected window [{}, {}] to {} points (downsampled: {})",
        window.start,
        window.end(),
        projection.len(),
        downsampled
    );

    WindowView {
        window,
        downsampled,
        projection,
        stats,
    }
}

fn passthrough(store: &SeriesStore, window: ClampedWindow) -> Projection {
    let range = window.start..=window.end();
    let mut projection = Projection::with_capacity(window.len);
    for (&x, &y) in store.x()[range.clone()].iter().zip(&store.y()[range]) {
        projection.push(x, y, y, y);
    }
    projection
}

fn downsample(store: &SeriesStore, window: ClampedWindow, width: usize) -> Projection {
    let summarize = |i: usize| {
        let (seg_start, seg_end) = segment_bounds(window, width, i);
        let stats = range_stats(store, seg_start, seg_end);
        (
            store.x()[seg_start],
            stats.min,
            stats.max,
            range_mean(store, seg_start, seg_end),
        )
    };

    let segments: Vec<(f64, f64, f64, f64)> = if width >= PARALLEL_SEGMENT_THRESHOLD {
        (0..width).into_par_iter().map(summarize).collect()
    } else {
        (0..width).map(summarize).collect()
    };

    let mut projection = Projection::with_capacity(width);
    for (x, low, high, mean) in segments {
        projection.push(x, low, high, mean);
    }
    projection
}
