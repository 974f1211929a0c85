//! Record parsing for `x,y` text input.
//!
//! Input arrives in chunks whose boundaries can fall anywhere, including in
//! the middle of a number or of a multi-byte UTF-8 sequence. [`LineSplitter`]
//! carries the trailing partial line between chunks as raw bytes, so decoding
//! only ever happens on complete lines.

/// Field separator between x and y
pub const SEPARATOR: char = ',';

/// Chunk-boundary tolerant line framer.
///
/// Holds back exactly the trailing partial line of each chunk and emits it
/// once the rest of the line (or end of input) arrives.
#[derive(Debug, Default, Clone)]
pub struct LineSplitter {
    leftover: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame one chunk, calling `on_line` for every complete line in order.
    ///
    /// The terminating `\n` is not part of the emitted line.
    pub fn feed<F: FnMut(&[u8])>(&mut self, chunk: &[u8], mut on_line: F) {
        let mut start = 0;
        while let Some(pos) = chunk[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            if self.leftover.is_empty() {
                on_line(&chunk[start..end]);
            } else {
                self.leftover.extend_from_slice(&chunk[start..end]);
                on_line(&self.leftover);
                self.leftover.clear();
            }
            start = end + 1;
        }
        self.leftover.extend_from_slice(&chunk[start..]);
    }

    /// Flush the carried fragment once input is exhausted.
    pub fn finish<F: FnMut(&[u8])>(&mut self, mut on_line: F) {
        if !self.leftover.is_empty() {
            on_line(&self.leftover);
            self.leftover.clear();
        }
    }

    /// Bytes currently held back waiting for the rest of their line
    pub fn leftover(&self) -> &[u8] {
        &self.leftover
    }
}

/// Parse one logical line into an `(x, y)` pair.
///
/// The line is split on `,` and the first two fields are used; anything past
/// the second separator is ignored. Fields are trimmed before parsing so
/// `\r\n` line endings and padded columns are accepted. Returns `None` for
/// blank lines, missing or empty fields, non-numeric text, NaN, and lines
/// that are not valid UTF-8.
pub fn parse_record(line: &[u8]) -> Option<(f64, f64)> {
    let line = std::str::from_utf8(line).ok()?;
    let mut fields = line.split(SEPARATOR);
    let x = parse_field(fields.next()?)?;
    let y = parse_field(fields.next()?)?;
    Some((x, y))
}

fn parse_field(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a complete in-memory text into its valid records, in order.
pub fn parse_str(text: &str) -> Vec<(f64, f64)> {
    let mut records = Vec::new();
    let mut splitter = LineSplitter::new();
    let mut collect = |line: &[u8]| {
        if let Some(pair) = parse_record(line) {
            records.push(pair);
        }
    };
    splitter.feed(text.as_bytes(), &mut collect);
    splitter.finish(&mut collect);
    records
}
