use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::window::{ClampedWindow, WindowParams};

/// Number of consecutive points summarised by one block-extrema entry
pub const DEFAULT_BLOCK_SIZE: usize = 10_000;

/// Bytes requested from the input source per read
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Window size requested after a load (clamped to the series length)
pub const DEFAULT_WINDOW_SIZE: i64 = 1000;

/// Index advance per playback tick
pub const DEFAULT_STEP: usize = 10;

/// Time between automatic window advances
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Render resolution in points
pub const DEFAULT_OUTPUT_WIDTH: usize = 800;

/// Every externally supplied knob of the engine.
///
/// Out-of-range values are corrected by [`ViewConfig::normalized`] and by the
/// window clamp rules, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub block_size: usize,
    pub chunk_size: usize,
    pub window_start: i64,
    pub window_size: i64,
    pub step: usize,
    pub tick_interval_ms: u64,
    pub output_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            window_start: 0,
            window_size: DEFAULT_WINDOW_SIZE,
            step: DEFAULT_STEP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            output_width: DEFAULT_OUTPUT_WIDTH,
        }
    }
}

impl ViewConfig {
    /// Raise zero sizes to 1 so every downstream division is defined.
    pub fn normalized(mut self) -> Self {
        self.block_size = self.block_size.max(1);
        self.chunk_size = self.chunk_size.max(1);
        self.output_width = self.output_width.max(1);
        self
    }

    pub fn window(&self) -> WindowParams {
        WindowParams::new(self.window_start, self.window_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Exact aggregate over an index interval of a series.
///
/// An empty interval reports `min = +inf` and `max = -inf`; callers must not
/// treat those sentinels as observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub sum_sq: f64,
    pub count: usize,
}

impl RangeStats {
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
            count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean; NaN for an empty interval.
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Population variance `sumSq/N - mean^2`.
    ///
    /// Not Bessel-corrected, and small negative results from floating-point
    /// cancellation are returned unchanged.
    pub fn variance(&self) -> f64 {
        let n = self.count as f64;
        let mean = self.mean();
        self.sum_sq / n - mean * mean
    }
}

/// Summary readout for the active window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub variance: f64,
}

impl WindowStats {
    pub fn from_range(stats: &RangeStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            avg: stats.mean(),
            variance: stats.variance(),
        }
    }
}

/// Render-ready band+line series: one x array and three parallel y arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub x: Vec<f64>,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
    pub mean: Vec<f64>,
}

impl Projection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
            mean: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: f64, low: f64, high: f64, mean: f64) {
        self.x.push(x);
        self.low.push(low);
        self.high.push(high);
        self.mean.push(mean);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Everything the rendering surface needs for one window position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowView {
    pub window: ClampedWindow,
    pub downsampled: bool,
    pub projection: Projection,
    pub stats: WindowStats,
}

/// Descriptive metadata for a completed load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: String,
    pub source: String,
    pub length: usize,
    pub block_size: usize,
    pub block_count: usize,
    pub first_x: Option<f64>,
    pub last_x: Option<f64>,
    pub stats: Option<WindowStats>,
    pub loaded_at: String,
}
