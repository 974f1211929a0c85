use crate::cli::PlayArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tsview_rs::{run_player, CancelFlag, ClampedWindow, Frame, Projection, WindowStats};

#[derive(Serialize)]
struct FrameOutput<'a> {
    tick: u64,
    window: ClampedWindow,
    downsampled: bool,
    stats: WindowStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<&'a Projection>,
}

pub async fn execute(args: PlayArgs) -> i32 {
    let mut config = match params::resolve_config(&args.source, Some(&args.window)) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };
    if let Some(step) = args.step {
        config.step = step;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.tick_interval_ms = interval_ms;
    }

    let store = match params::load_store(&args.source.file, &config) {
        Ok(s) => Arc::new(s),
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    log::info!(
        "Playing {} points: step={}, interval={}ms",
        store.len(),
        config.step,
        config.tick_interval_ms
    );

    let (tx, mut rx) = watch::channel::<Option<Frame>>(None);
    let cancel = CancelFlag::new();
    let player = tokio::spawn(run_player(
        store,
        config.window(),
        config.clone(),
        tx,
        cancel.clone(),
    ));

    let mut printed = 0u64;
    while rx.changed().await.is_ok() {
        if args.max_frames.is_some_and(|max| printed >= max) {
            cancel.cancel();
            break;
        }
        let Some(frame) = rx.borrow_and_update().clone() else {
            continue;
        };

        let line = FrameOutput {
            tick: frame.tick,
            window: frame.view.window,
            downsampled: frame.view.downsampled,
            stats: frame.view.stats,
            projection: args.with_projection.then_some(&frame.view.projection),
        };
        match output::to_json(&line, true).and_then(|json| output::write_output(&json, None)) {
            Ok(()) => printed += 1,
            Err(e) => {
                eprintln!("Error: {}", e);
                cancel.cancel();
                return exit_codes::EXECUTION_ERROR;
            }
        }

        if args.max_frames.is_some_and(|max| printed >= max) {
            cancel.cancel();
            break;
        }
    }
    drop(rx);

    match player.await {
        Ok(published) => {
            log::info!("Printed {} of {} published frames", printed, published);
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: playback task failed: {}", e);
            exit_codes::EXECUTION_ERROR
        }
    }
}
