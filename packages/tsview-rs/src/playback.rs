//! Automatic window advance.
//!
//! [`next_start`] is the whole state transition; [`run_player`] drives it on
//! a tokio interval and publishes each new view through a `watch` channel, so
//! a consumer that falls behind only ever sees the latest window.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::ingest::CancelFlag;
use crate::projector::project_window;
use crate::store::SeriesStore;
use crate::types::{ViewConfig, WindowView};
use crate::window::WindowParams;

/// Start index after one tick, or `None` when playback must stop.
///
/// Stops on an empty series, when the window already starts at the last
/// point, or when the step no longer moves the start.
pub fn next_start(prev: usize, step: usize, len: usize) -> Option<usize> {
    if len == 0 || prev >= len - 1 {
        return None;
    }
    let next = prev.saturating_add(step).min(len - 1);
    if next == prev {
        None
    } else {
        Some(next)
    }
}

/// One published window position
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub view: WindowView,
}

/// Publish the starting window, then advance it every
/// `config.tick_interval()` until playback stops, `cancel` is raised or the
/// receiver goes away.
///
/// The window keeps its clamped size; near the end of the series the size
/// shrinks with the clamp and stays shrunk. Returns the number of frames
/// published.
pub async fn run_player(
    store: Arc<SeriesStore>,
    start: WindowParams,
    config: ViewConfig,
    tx: watch::Sender<Option<Frame>>,
    cancel: CancelFlag,
) -> u64 {
    let len = store.len();
    let Some(mut window) = start.clamp(len) else {
        log::debug!("Nothing to play: series is empty");
        return 0;
    };

    let mut interval = tokio::time::interval(config.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;

    let mut tick = 0u64;
    let view = project_window(&store, window, config.output_width);
    if tx.send(Some(Frame { tick, view })).is_err() {
        return 0;
    }
    let mut published = 1;

    loop {
        interval.tick().await;
        if cancel.is_cancelled() {
            log::debug!("Playback cancelled after {} frames", published);
            break;
        }
        let Some(next) = next_start(window.start, config.step, len) else {
            log::debug!("Playback reached the end at index {}", window.start);
            break;
        };
        let Some(clamped) = WindowParams::new(next as i64, window.len as i64).clamp(len) else {
            break;
        };
        window = clamped;
        tick += 1;

        let view = project_window(&store, window, config.output_width);
        if tx.send(Some(Frame { tick, view })).is_err() {
            log::debug!("Playback receiver dropped");
            break;
        }
        published += 1;
    }

    published
}
