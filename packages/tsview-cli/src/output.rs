use std::io::Write;
use std::path::Path;

use crate::cli::OutputArgs;

/// Write JSON string to stdout or a file.
pub fn write_output(json: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(Path::new(path), json)
            .map_err(|e| format!("Failed to write output file '{}': {}", path, e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .and_then(|_| handle.flush())
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Serialize a value to JSON (pretty or compact).
///
/// Non-finite floats, such as the sentinels of an empty range, become `null`.
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, String> {
    if compact {
        serde_json::to_string(value).map_err(|e| format!("JSON serialization failed: {}", e))
    } else {
        serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {}", e))
    }
}

/// Serialize and write according to the shared output flags.
pub fn emit<T: serde::Serialize>(value: &T, args: &OutputArgs) -> Result<(), String> {
    let json = to_json(value, args.compact)?;
    write_output(&json, args.output.as_deref())?;
    if let Some(ref path) = args.output {
        log::info!("Results written to {}", path);
    }
    Ok(())
}
