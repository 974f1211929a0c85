use crate::store::{SeriesStore, StoreParts};

/// Single-pass builder for a [`SeriesStore`].
///
/// Pairs must be pushed in stream order; prefix sums and block boundaries
/// depend on it. Nothing built here is visible outside until
/// [`finish`](Self::finish) hands over a complete store.
#[derive(Debug)]
pub struct StreamingIndexer {
    block_size: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
    block_min: Vec<f64>,
    block_max: Vec<f64>,
    running_sum: f64,
    running_sum_sq: f64,
    current_min: f64,
    current_max: f64,
    count_in_block: usize,
}

impl StreamingIndexer {
    /// Create an indexer with the given block size (0 is raised to 1).
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
            x: Vec::new(),
            y: Vec::new(),
            prefix_sum: vec![0.0],
            prefix_sum_sq: vec![0.0],
            block_min: Vec::new(),
            block_max: Vec::new(),
            running_sum: 0.0,
            running_sum_sq: 0.0,
            current_min: f64::INFINITY,
            current_max: f64::NEG_INFINITY,
            count_in_block: 0,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Points accepted so far
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Append one accepted pair and extend every index.
    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);

        self.running_sum += y;
        self.running_sum_sq += y * y;
        self.prefix_sum.push(self.running_sum);
        self.prefix_sum_sq.push(self.running_sum_sq);

        if y < self.current_min {
            self.current_min = y;
        }
        if y > self.current_max {
            self.current_max = y;
        }
        self.count_in_block += 1;
        if self.count_in_block == self.block_size {
            self.close_block();
        }
    }

    fn close_block(&mut self) {
        self.block_min.push(self.current_min);
        self.block_max.push(self.current_max);
        self.current_min = f64::INFINITY;
        self.current_max = f64::NEG_INFINITY;
        self.count_in_block = 0;
    }

    /// Close the trailing partial block, if any, and freeze the store.
    pub fn finish(mut self) -> SeriesStore {
        if self.count_in_block > 0 {
            self.close_block();
        }

        log::debug!(
            "Indexed {} points into {} blocks of {}",
            self.y.len(),
            self.block_min.len(),
            self.block_size
        );

        SeriesStore::from_parts(StoreParts {
            block_size: self.block_size,
            x: self.x,
            y: self.y,
            prefix_sum: self.prefix_sum,
            prefix_sum_sq: self.prefix_sum_sq,
            block_min: self.block_min,
            block_max: self.block_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[f64], block_size: usize) -> SeriesStore {
        let mut indexer = StreamingIndexer::new(block_size);
        for (i, &y) in values.iter().enumerate() {
            indexer.push(i as f64, y);
        }
        indexer.finish()
    }

    #[test]
    fn test_prefix_sums_match_running_totals() {
        let values = [5.0, 10.0, -3.0, 7.0, 0.5];
        let store = build(&values, 3);
        for i in 0..=values.len() {
            let sum: f64 = values[..i].iter().sum();
            let sum_sq: f64 = values[..i].iter().map(|v| v * v).sum();
            assert_eq!(store.prefix_sum()[i], sum);
            assert_eq!(store.prefix_sum_sq()[i], sum_sq);
        }
    }

    #[test]
    fn test_block_extrema_with_short_final_block() {
        let values = [4.0, 1.0, 9.0, -2.0, 3.0, 8.0, 6.0];
        let store = build(&values, 3);
        assert_eq!(store.block_min(), &[1.0, -2.0, 6.0]);
        assert_eq!(store.block_max(), &[9.0, 8.0, 6.0]);
    }

    #[test]
    fn test_exact_multiple_of_block_size_has_no_extra_block() {
        let store = build(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(store.block_count(), 2);
        assert_eq!(store.block_min(), &[1.0, 3.0]);
        assert_eq!(store.block_max(), &[2.0, 4.0]);
    }

    #[test]
    fn test_empty_indexer() {
        let store = StreamingIndexer::new(10).finish();
        assert!(store.is_empty());
        assert_eq!(store.prefix_sum(), &[0.0]);
        assert_eq!(store.prefix_sum_sq(), &[0.0]);
        assert_eq!(store.block_count(), 0);
    }

    #[test]
    fn test_zero_block_size_is_raised() {
        let indexer = StreamingIndexer::new(0);
        assert_eq!(indexer.block_size(), 1);
    }
}
