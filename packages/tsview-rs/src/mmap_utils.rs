use crate::error::{Result, TsViewError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Open a file and map it into memory (read-only)
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TsViewError::FileNotFound(path.display().to_string()),
        _ => TsViewError::IoError(e),
    })?;
    // The mapping is only read while the ingestion that owns it runs.
    let mmap = unsafe { Mmap::map(&file).map_err(TsViewError::IoError)? };
    Ok(mmap)
}
