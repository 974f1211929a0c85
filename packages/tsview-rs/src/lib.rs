//! Streaming ingestion and windowed range statistics for large `x,y` series.
//!
//! Text is parsed chunk by chunk into a [`SeriesStore`] carrying prefix sums
//! of `y` and `y²` plus per-block extrema. Range aggregates and fixed-width
//! projections are then answered from those indexes without rescanning the
//! raw points.

pub mod error;
pub mod indexer;
pub mod ingest;
pub mod mmap_utils;
pub mod parser;
pub mod playback;
pub mod profiling;
pub mod projector;
pub mod range;
pub mod session;
pub mod store;
pub mod types;
pub mod window;

pub use error::{Result, TsViewError};
pub use indexer::StreamingIndexer;
pub use ingest::{
    ingest_async, ingest_bytes, ingest_file, ingest_path_async, ingest_reader, CancelFlag,
    IngestOptions, Ingestion,
};
pub use parser::{parse_record, parse_str, LineSplitter};
pub use playback::{next_start, run_player, Frame};
pub use projector::{project, project_window};
pub use range::{range_mean, range_stats};
pub use session::{LoadTicket, Session, TickOutcome, ViewRequest, ViewResponse};
pub use store::SeriesStore;
pub use types::*;
pub use window::{segment_bounds, ClampedWindow, WindowParams};
