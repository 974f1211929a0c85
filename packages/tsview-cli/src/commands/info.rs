use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

pub fn execute(args: InfoArgs) -> i32 {
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

    let info = store.info(args.source.file.clone());

    if args.json {
        match output::to_json(&info, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
        return exit_codes::SUCCESS;
    }

    println!("File: {}", info.source);
    println!("Points: {}", info.length);
    println!("Blocks: {} x {} points", info.block_count, info.block_size);
    match (info.first_x, info.last_x) {
        (Some(first), Some(last)) => println!("X range: {} .. {}", first, last),
        _ => println!("X range: (empty)"),
    }
    if let Some(stats) = info.stats {
        println!("Min: {}", stats.min);
        println!("Max: {}", stats.max);
        println!("Average: {}", stats.avg);
        println!("Variance: {}", stats.variance);
    }

    exit_codes::SUCCESS
}
