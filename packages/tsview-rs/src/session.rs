//! Session state: one current store, the window parameters, and the most
//! recent view computed from them.
//!
//! Views are a pure function of `(store, window, width)`. Every parameter
//! change issues a new [`ViewRequest`] with a higher sequence number, and a
//! response is only accepted when it answers the latest request, so results
//! that arrive late are dropped rather than merged.

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::error::{Result, TsViewError};
use crate::ingest::{ingest_async, ingest_file, CancelFlag, IngestOptions};
use crate::playback::next_start;
use crate::projector::project_window;
use crate::store::SeriesStore;
use crate::types::{ViewConfig, WindowView};
use crate::window::{ClampedWindow, WindowParams};

/// Handle for one in-flight load
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    cancel: CancelFlag,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flag the ingestion should poll; raised when a newer load starts.
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }
}

/// A self-contained view computation that can run on any thread
#[derive(Debug, Clone)]
pub struct ViewRequest {
    seq: u64,
    store: Arc<SeriesStore>,
    window: ClampedWindow,
    output_width: usize,
}

impl ViewRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn window(&self) -> ClampedWindow {
        self.window
    }

    pub fn run(self) -> ViewResponse {
        ViewResponse {
            seq: self.seq,
            view: project_window(&self.store, self.window, self.output_width),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewResponse {
    seq: u64,
    view: WindowView,
}

impl ViewResponse {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn view(&self) -> &WindowView {
        &self.view
    }
}

/// Result of one playback tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The window moved to this start index
    Advanced(usize),
    /// No further advance is possible; playback switched off
    Stopped,
    /// Playback is not running
    Idle,
}

#[derive(Debug)]
pub struct Session {
    config: ViewConfig,
    store: Option<Arc<SeriesStore>>,
    source: Option<String>,
    window: WindowParams,
    generation: u64,
    pending: Option<CancelFlag>,
    view_seq: u64,
    view: Option<WindowView>,
    playing: bool,
}

impl Session {
    pub fn new(config: ViewConfig) -> Self {
        let config = config.normalized();
        let window = config.window();
        Self {
            config,
            store: None,
            source: None,
            window,
            generation: 0,
            pending: None,
            view_seq: 0,
            view: None,
            playing: false,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The current completed store, shared so in-flight queries keep it alive
    pub fn store(&self) -> Option<Arc<SeriesStore>> {
        self.store.clone()
    }

    /// Name of the source the current store was loaded from
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn window(&self) -> WindowParams {
        self.window
    }

    pub fn view(&self) -> Option<&WindowView> {
        self.view.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start a new load, cancelling any load still in flight.
    ///
    /// Playback stops. The current store stays visible until the new load
    /// finishes successfully.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.pending.take() {
            log::warn!("Cancelling load {} in favour of a newer one", self.generation);
            previous.cancel();
        }
        self.playing = false;
        self.generation += 1;

        let cancel = CancelFlag::new();
        self.pending = Some(cancel.clone());
        LoadTicket {
            generation: self.generation,
            cancel,
        }
    }

    /// Install the outcome of the load identified by `ticket`.
    ///
    /// A superseded ticket is rejected with [`TsViewError::StaleLoad`]. A
    /// failed load leaves the previous store and view untouched. A successful
    /// load resets the window to the configured start and size and always
    /// recomputes the view once.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<SeriesStore>,
        source: impl Into<String>,
    ) -> Result<()> {
        if ticket.generation != self.generation {
            log::warn!(
                "Discarding result of load {} (current load is {})",
                ticket.generation,
                self.generation
            );
            return Err(TsViewError::StaleLoad(ticket.generation));
        }
        self.pending = None;

        let store = result.inspect_err(|e| {
            if e.is_cancellation() {
                log::warn!("Load {} abandoned: {}", ticket.generation, e);
            } else {
                log::error!("Load {} failed: {}", ticket.generation, e);
            }
        })?;

        log::info!(
            "Installed load {} with {} points",
            ticket.generation,
            store.len()
        );
        self.store = Some(Arc::new(store));
        self.source = Some(source.into());
        self.set_window(self.config.window());
        Ok(())
    }

    /// Load a file synchronously through a memory map.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let ticket = self.begin_load();
        let result = ingest_file(path, IngestOptions::from(&self.config), ticket.cancel_flag());
        self.finish_load(ticket, result, path.display().to_string())
    }

    /// Load from an asynchronous byte source.
    pub async fn load_async<R>(&mut self, reader: R, source: impl Into<String>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let ticket = self.begin_load();
        let options = IngestOptions::from(&self.config);
        let result = ingest_async(reader, options, ticket.cancel_flag()).await;
        self.finish_load(ticket, result, source)
    }

    /// Replace the window parameters and recompute the view.
    ///
    /// With a store present the parameters are clamped first and the clamped
    /// values are kept, so repeated calls with the result are no-ops.
    pub fn set_window(&mut self, params: WindowParams) {
        self.window = match self.store.as_ref().and_then(|s| params.clamp(s.len())) {
            Some(clamped) => clamped.params(),
            None => params,
        };
        self.recompute();
    }

    pub fn set_window_start(&mut self, start: i64) {
        self.set_window(WindowParams::new(start, self.window.size));
    }

    pub fn set_window_size(&mut self, size: i64) {
        self.set_window(WindowParams::new(self.window.start, size));
    }

    /// Issue a view computation for the current parameters.
    ///
    /// Any earlier request becomes stale.
    pub fn request_view(&mut self) -> Option<ViewRequest> {
        let store = self.store.clone()?;
        let window = self.window.clamp(store.len())?;
        self.view_seq += 1;
        Some(ViewRequest {
            seq: self.view_seq,
            store,
            window,
            output_width: self.config.output_width,
        })
    }

    /// Accept a computed view if it answers the latest request.
    pub fn accept_view(&mut self, response: ViewResponse) -> bool {
        if response.seq != self.view_seq {
            log::debug!(
                "Dropping stale view {} (latest is {})",
                response.seq,
                self.view_seq
            );
            return false;
        }
        self.view = Some(response.view);
        true
    }

    fn recompute(&mut self) {
        match self.request_view() {
            Some(request) => {
                let response = request.run();
                self.accept_view(response);
            }
            None => self.view = None,
        }
    }

    /// Start automatic advance; ignored without a non-empty store.
    pub fn play(&mut self) -> bool {
        self.playing = self.store.as_ref().is_some_and(|s| !s.is_empty()) && !self.is_loading();
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance the window by the configured step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }
        let Some(len) = self.store.as_ref().map(|s| s.len()) else {
            self.playing = false;
            return TickOutcome::Stopped;
        };
        let start = self.window.start.max(0) as usize;
        match next_start(start, self.config.step, len) {
            Some(next) => {
                self.set_window_start(next as i64);
                TickOutcome::Advanced(next)
            }
            None => {
                self.playing = false;
                TickOutcome::Stopped
            }
        }
    }
}
