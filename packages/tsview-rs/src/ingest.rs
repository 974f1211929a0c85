//! Chunked ingestion from byte sources into a [`SeriesStore`].
//!
//! Every entry point drives the same [`Ingestion`] state machine: read a
//! chunk, frame it into lines, index the valid records, repeat. Only one chunk
//! plus the carried partial line is held at a time besides the growing store.
//! Chunks must be applied in stream order, and a failed or cancelled load is
//! discarded whole; there is no resuming from a midpoint.

use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, TsViewError};
use crate::indexer::StreamingIndexer;
use crate::mmap_utils::mmap_file;
use crate::parser::{parse_record, LineSplitter};
use crate::profiling::ProfileScope;
use crate::store::SeriesStore;
use crate::types::{ViewConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE};

/// Shared flag used to abandon an in-flight load
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TsViewError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Index granularity and read size for one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub block_size: usize,
    pub chunk_size: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl From<&ViewConfig> for IngestOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            block_size: config.block_size,
            chunk_size: config.chunk_size,
        }
    }
}

impl IngestOptions {
    fn chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

/// Resumable ingestion state threaded through successive reads.
#[derive(Debug)]
pub struct Ingestion {
    offset: u64,
    total_size: Option<u64>,
    splitter: LineSplitter,
    indexer: StreamingIndexer,
}

impl Ingestion {
    pub fn new(block_size: usize) -> Self {
        Self {
            offset: 0,
            total_size: None,
            splitter: LineSplitter::new(),
            indexer: StreamingIndexer::new(block_size),
        }
    }

    /// Declare the source size so [`is_complete`](Self::is_complete) can
    /// report termination.
    pub fn with_total_size(mut self, total_size: u64) -> Self {
        self.total_size = Some(total_size);
        self
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Records accepted so far
    pub fn records(&self) -> usize {
        self.indexer.len()
    }

    /// Whether every byte of a sized source has been fed
    pub fn is_complete(&self) -> bool {
        self.total_size.is_some_and(|total| self.offset >= total)
    }

    /// Consume the next chunk in stream order.
    pub fn feed(&mut self, chunk: &[u8]) {
        let indexer = &mut self.indexer;
        self.splitter.feed(chunk, |line| {
            if let Some((x, y)) = parse_record(line) {
                indexer.push(x, y);
            }
        });
        self.offset += chunk.len() as u64;
    }

    /// Flush the carried fragment as the final record batch and freeze.
    pub fn finish(mut self) -> SeriesStore {
        let indexer = &mut self.indexer;
        self.splitter.finish(|line| {
            if let Some((x, y)) = parse_record(line) {
                indexer.push(x, y);
            }
        });
        self.indexer.finish()
    }
}

fn log_finished(source: &str, store: &SeriesStore, bytes: u64, scope: &ProfileScope) {
    log::info!(
        "Loaded {} records ({} blocks of {}) from {} ({} bytes) in {:.1}ms",
        store.len(),
        store.block_count(),
        store.block_size(),
        source,
        bytes,
        scope.elapsed_ms()
    );
}

/// Index an in-memory buffer, chunked exactly like a streamed source.
pub fn ingest_bytes(bytes: &[u8], options: IngestOptions) -> SeriesStore {
    let mut ingestion = Ingestion::new(options.block_size).with_total_size(bytes.len() as u64);
    for chunk in bytes.chunks(options.chunk_size()) {
        ingestion.feed(chunk);
    }
    ingestion.finish()
}

/// Index everything a blocking reader yields until end of input.
///
/// A read error abandons the partially built store and reports the byte
/// offset at which it happened.
pub fn ingest_reader<R: Read>(
    mut reader: R,
    options: IngestOptions,
    cancel: &CancelFlag,
) -> Result<SeriesStore> {
    let scope = ProfileScope::new("ingest_reader");
    let mut ingestion = Ingestion::new(options.block_size);
    let mut buf = vec![0u8; options.chunk_size()];

    loop {
        cancel.check()?;
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                ingestion.feed(&buf[..n]);
                log::trace!(
                    "Read {} bytes, offset {}, {} records",
                    n,
                    ingestion.offset(),
                    ingestion.records()
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(TsViewError::Read {
                    offset: ingestion.offset(),
                    source,
                })
            }
        }
    }

    let bytes = ingestion.offset();
    let store = ingestion.finish();
    log_finished("reader", &store, bytes, &scope);
    Ok(store)
}

/// Index a file through a read-only memory map, one chunk at a time.
pub fn ingest_file(path: &Path, options: IngestOptions, cancel: &CancelFlag) -> Result<SeriesStore> {
    let scope = ProfileScope::new(format!("ingest_file {}", path.display()));
    if !path.exists() {
        return Err(TsViewError::FileNotFound(path.display().to_string()));
    }

    let total_size = std::fs::metadata(path)?.len();
    log::info!("Loading {} ({} bytes)", path.display(), total_size);

    // Zero-length files cannot be mapped on every platform.
    if total_size == 0 {
        return Ok(StreamingIndexer::new(options.block_size).finish());
    }

    let mmap = mmap_file(path)?;
    let mut ingestion = Ingestion::new(options.block_size).with_total_size(total_size);
    let chunk_size = options.chunk_size() as u64;

    while !ingestion.is_complete() {
        cancel.check()?;
        let start = ingestion.offset();
        let end = (start + chunk_size).min(total_size);
        ingestion.feed(&mmap[start as usize..end as usize]);
        log::trace!("Mapped chunk [{}, {}), {} records", start, end, ingestion.records());
    }

    let store = ingestion.finish();
    log_finished(&path.display().to_string(), &store, total_size, &scope);
    Ok(store)
}

/// Index an asynchronous byte source, yielding to the runtime between chunks
/// so a host event loop stays responsive during large loads.
pub async fn ingest_async<R>(
    mut reader: R,
    options: IngestOptions,
    cancel: &CancelFlag,
) -> Result<SeriesStore>
where
    R: AsyncRead + Unpin,
{
    let scope = ProfileScope::new("ingest_async");
    let mut ingestion = Ingestion::new(options.block_size);
    let mut buf = vec![0u8; options.chunk_size()];

    loop {
        cancel.check()?;
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(TsViewError::Read {
                    offset: ingestion.offset(),
                    source,
                })
            }
        };
        ingestion.feed(&buf[..n]);
        tokio::task::yield_now().await;
    }

    let bytes = ingestion.offset();
    let store = ingestion.finish();
    log_finished("async reader", &store, bytes, &scope);
    Ok(store)
}

/// Open `path` with tokio and ingest it asynchronously.
pub async fn ingest_path_async(
    path: &Path,
    options: IngestOptions,
    cancel: &CancelFlag,
) -> Result<SeriesStore> {
    let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TsViewError::FileNotFound(path.display().to_string()),
        _ => TsViewError::IoError(e),
    })?;
    log::info!("Loading {} asynchronously", path.display());
    ingest_async(file, options, cancel).await
}
