//! Exact range aggregates over an indexed series.
//!
//! Min and max scan at most the two partial blocks at the ends of the
//! interval and fold the precomputed extrema of every whole block in between,
//! so the cost is `O(B + blocks spanned)` instead of `O(end - start)`. Sums
//! come from prefix-sum differences in constant time.

use crate::store::SeriesStore;
use crate::types::RangeStats;

/// Min, max, sum and sum of squares of `y[start..=end]`.
///
/// `end` is clamped to the last index. An empty store or `start > end` yields
/// [`RangeStats::empty`], whose min is `+inf` and max is `-inf`.
pub fn range_stats(store: &SeriesStore, start: usize, end: usize) -> RangeStats {
    if store.is_empty() {
        return RangeStats::empty();
    }
    let end = end.min(store.len() - 1);
    if start > end {
        return RangeStats::empty();
    }

    let (min, max) = range_extrema(store, start, end);
    let prefix_sum = store.prefix_sum();
    let prefix_sum_sq = store.prefix_sum_sq();

    RangeStats {
        min,
        max,
        sum: prefix_sum[end + 1] - prefix_sum[start],
        sum_sq: prefix_sum_sq[end + 1] - prefix_sum_sq[start],
        count: end - start + 1,
    }
}

/// Arithmetic mean of `y[start..=end]` from prefix sums alone.
///
/// Same bounds rules as [`range_stats`]: `end` is clamped to the last index,
/// and an empty store or `start > end` yields NaN.
pub fn range_mean(store: &SeriesStore, start: usize, end: usize) -> f64 {
    if store.is_empty() {
        return f64::NAN;
    }
    let end = end.min(store.len() - 1);
    if start > end {
        return f64::NAN;
    }
    let prefix_sum = store.prefix_sum();
    (prefix_sum[end + 1] - prefix_sum[start]) / (end - start + 1) as f64
}

/// Block-accelerated extrema; caller guarantees `start <= end < len`.
fn range_extrema(store: &SeriesStore, start: usize, end: usize) -> (f64, f64) {
    let y = store.y();
    let block_size = store.block_size();
    let start_block = start / block_size;
    let end_block = end / block_size;

    if start_block == end_block {
        return scan(&y[start..=end], f64::INFINITY, f64::NEG_INFINITY);
    }

    let head_end = ((start_block + 1) * block_size - 1).min(store.len() - 1);
    let (mut min, mut max) = scan(&y[start..=head_end], f64::INFINITY, f64::NEG_INFINITY);

    let block_min = store.block_min();
    let block_max = store.block_max();
    for block in (start_block + 1)..end_block {
        if block_min[block] < min {
            min = block_min[block];
        }
        if block_max[block] > max {
            max = block_max[block];
        }
    }

    let tail_start = end_block * block_size;
    scan(&y[tail_start..=end], min, max)
}

fn scan(values: &[f64], mut min: f64, mut max: f64) -> (f64, f64) {
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}
