use crate::cli::StatsArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use serde::Serialize;
use tsview_rs::range_stats;

#[derive(Serialize)]
struct StatsOutput {
    file: String,
    length: usize,
    start: usize,
    end: usize,
    count: usize,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
    mean: Option<f64>,
    variance: Option<f64>,
}

pub fn execute(args: StatsArgs) -> i32 {
    let config = match params::resolve_config(&args.source, None) {
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

    let end = args.end.unwrap_or_else(|| store.len().saturating_sub(1));
    let stats = range_stats(&store, args.start, end);
    let (mean, variance) = if stats.is_empty() {
        (None, None)
    } else {
        (Some(stats.mean()), Some(stats.variance()))
    };

    let result = StatsOutput {
        file: args.source.file.clone(),
        length: store.len(),
        start: args.start,
        end,
        count: stats.count,
        min: stats.min,
        max: stats.max,
        sum: stats.sum,
        sum_sq: stats.sum_sq,
        mean,
        variance,
    };

    match output::emit(&result, &args.output) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::EXECUTION_ERROR
        }
    }
}
