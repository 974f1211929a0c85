//! Immutable indexed series.

use chrono::{DateTime, Utc};
use std::ops::Range;
use uuid::Uuid;

use crate::indexer::StreamingIndexer;
use crate::range::range_stats;
use crate::types::{SeriesInfo, WindowStats};

/// Raw series plus its prefix-sum and block-extrema indexes.
///
/// Only [`StreamingIndexer::finish`] produces a store, so all derived arrays
/// are always consistent with `x`/`y`. A store is never mutated afterwards; a
/// new load produces a new store.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    id: Uuid,
    loaded_at: DateTime<Utc>,
    block_size: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
    block_min: Vec<f64>,
    block_max: Vec<f64>,
}

pub(crate) struct StoreParts {
    pub block_size: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub prefix_sum: Vec<f64>,
    pub prefix_sum_sq: Vec<f64>,
    pub block_min: Vec<f64>,
    pub block_max: Vec<f64>,
}

impl SeriesStore {
    pub(crate) fn from_parts(parts: StoreParts) -> Self {
        debug_assert_eq!(parts.x.len(), parts.y.len());
        debug_assert_eq!(parts.prefix_sum.len(), parts.y.len() + 1);
        debug_assert_eq!(parts.prefix_sum_sq.len(), parts.y.len() + 1);
        debug_assert_eq!(parts.block_min.len(), parts.y.len().div_ceil(parts.block_size));
        debug_assert_eq!(parts.block_min.len(), parts.block_max.len());

        Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            block_size: parts.block_size,
            x: parts.x,
            y: parts.y,
            prefix_sum: parts.prefix_sum,
            prefix_sum_sq: parts.prefix_sum_sq,
            block_min: parts.block_min,
            block_max: parts.block_max,
        }
    }

    /// Index an in-memory sequence of pairs in one pass.
    pub fn from_pairs<I>(pairs: I, block_size: usize) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut indexer = StreamingIndexer::new(block_size);
        for (x, y) in pairs {
            indexer.push(x, y);
        }
        indexer.finish()
    }

    /// A store with no points
    pub fn empty(block_size: usize) -> Self {
        StreamingIndexer::new(block_size).finish()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.block_min.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Cumulative sums of `y`, length `len() + 1`, starting at 0
    pub fn prefix_sum(&self) -> &[f64] {
        &self.prefix_sum
    }

    /// Cumulative sums of `y²`, length `len() + 1`, starting at 0
    pub fn prefix_sum_sq(&self) -> &[f64] {
        &self.prefix_sum_sq
    }

    pub fn block_min(&self) -> &[f64] {
        &self.block_min
    }

    pub fn block_max(&self) -> &[f64] {
        &self.block_max
    }

    /// Raw index range covered by block `block`; the last block may be short.
    pub fn block_range(&self, block: usize) -> Range<usize> {
        let start = (block * self.block_size).min(self.len());
        let end = ((block + 1) * self.block_size).min(self.len());
        start..end
    }

    /// Describe the store for reporting.
    pub fn info(&self, source: impl Into<String>) -> SeriesInfo {
        let stats = if self.is_empty() {
            None
        } else {
            Some(WindowStats::from_range(&range_stats(self, 0, self.len() - 1)))
        };

        SeriesInfo {
            id: self.id.to_string(),
            source: source.into(),
            length: self.len(),
            block_size: self.block_size,
            block_count: self.block_count(),
            first_x: self.x.first().copied(),
            last_x: self.x.last().copied(),
            stats,
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_range_short_final_block() {
        let store = SeriesStore::from_pairs((0..5).map(|i| (i as f64, i as f64)), 2);
        assert_eq!(store.block_count(), 3);
        assert_eq!(store.block_range(0), 0..2);
        assert_eq!(store.block_range(2), 4..5);
        assert_eq!(store.block_range(3), 5..5);
    }

    #[test]
    fn test_info_for_empty_store() {
        let store = SeriesStore::empty(10);
        let info = store.info("empty.csv");
        assert_eq!(info.length, 0);
        assert_eq!(info.block_count, 0);
        assert!(info.stats.is_none());
        assert!(info.first_x.is_none());
    }

    #[test]
    fn test_info_reports_whole_series() {
        let store = SeriesStore::from_pairs([(1.0, 5.0), (2.0, 10.0), (3.0, -3.0), (4.0, 7.0)], 2);
        let info = store.info("scenario.csv");
        assert_eq!(info.length, 4);
        assert_eq!(info.block_count, 2);
        assert_eq!(info.first_x, Some(1.0));
        assert_eq!(info.last_x, Some(4.0));
        let stats = info.stats.unwrap();
        assert_eq!(stats.min, -3.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.avg, 4.75);
    }

    #[test]
    fn test_each_store_gets_distinct_id() {
        let a = SeriesStore::empty(1);
        let b = SeriesStore::empty(1);
        assert_ne!(a.id(), b.id());
    }
}
