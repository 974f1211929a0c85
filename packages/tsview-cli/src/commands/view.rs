use crate::cli::ViewArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use serde::Serialize;
use tsview_rs::{project, ClampedWindow, WindowStats, WindowView};

#[derive(Serialize)]
struct ViewOutput {
    file: String,
    length: usize,
    output_width: usize,
    #[serde(flatten)]
    view: Option<WindowView>,
}

#[derive(Serialize)]
struct StatsOnlyOutput {
    file: String,
    length: usize,
    window: Option<ClampedWindow>,
    stats: Option<WindowStats>,
}

pub fn execute(args: ViewArgs) -> i32 {
    let config = match params::resolve_config(&args.source, Some(&args.window)) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let store = match params::load_store(&args.source.file, &config) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let view = project(
        &store,
        config.window_start,
        config.window_size,
        config.output_width,
    );
    if view.is_none() {
        log::warn!("{} contains no valid records", args.source.file);
    }

    let result = if args.stats_only {
        let stats = StatsOnlyOutput {
            file: args.source.file.clone(),
            length: store.len(),
            window: view.as_ref().map(|v| v.window),
            stats: view.as_ref().map(|v| v.stats),
        };
        output::emit(&stats, &args.output)
    } else {
        let full = ViewOutput {
            file: args.source.file.clone(),
            length: store.len(),
            output_width: config.output_width,
            view,
        };
        output::emit(&full, &args.output)
    };

    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::EXECUTION_ERROR
        }
    }
}
