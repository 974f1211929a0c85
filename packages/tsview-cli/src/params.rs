use crate::cli::{SourceArgs, WindowArgs};
use std::path::Path;
use tsview_rs::{ingest_file, CancelFlag, IngestOptions, SeriesStore, ViewConfig};

/// Validate a single file path: existence and regular file.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("Input file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", file_path));
    }
    Ok(())
}

/// Read a JSON view configuration; missing keys take the library defaults.
pub fn load_config(config_path: Option<&str>) -> Result<ViewConfig, String> {
    match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("Invalid config file '{}': {}", path, e))
        }
        None => Ok(ViewConfig::default()),
    }
}

/// Layer command-line flags over the config file.
pub fn resolve_config(source: &SourceArgs, window: Option<&WindowArgs>) -> Result<ViewConfig, String> {
    let mut config = load_config(source.config.as_deref())?;

    if let Some(block_size) = source.block_size {
        config.block_size = block_size;
    }
    if let Some(chunk_size) = source.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(window) = window {
        if let Some(start) = window.start {
            config.window_start = start;
        }
        if let Some(size) = window.size {
            config.window_size = size;
        }
        if let Some(width) = window.width {
            config.output_width = width;
        }
    }

    Ok(config.normalized())
}

/// Validate and ingest the input file.
pub fn load_store(file_path: &str, config: &ViewConfig) -> Result<SeriesStore, String> {
    validate_file(file_path)?;
    ingest_file(
        Path::new(file_path),
        IngestOptions::from(config),
        &CancelFlag::new(),
    )
    .map_err(|e| format!("Failed to load '{}': {}", file_path, e))
}
