//! Delimited-text backend.
//!
//! Reads a file line by line and splits each line by an optional separator. Rows are produced
//! lazily through [`TextRows`], so a consumer can act on them before the end of the file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{Row, Value};

/// Open `path` and return an iterator over its rows.
///
/// Opening the file is eager: a missing or unreadable path fails here, once, before any row is
/// produced. An empty `separator` behaves like no separator (each line is a single-cell row).
pub fn read_text_rows(path: impl AsRef<Path>, separator: Option<&str>) -> LoadResult<TextRows<File>> {
    let file = File::open(path)?;
    Ok(TextRows::new(file, separator))
}

/// Read every row of a delimited-text file into memory.
pub fn read_text_rows_to_end(path: impl AsRef<Path>, separator: Option<&str>) -> LoadResult<Vec<Row>> {
    read_text_rows(path, separator)?.collect()
}

/// Incremental row iterator over a text source.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. A final line without a terminator is still
/// produced; a trailing terminator does not add an empty row. Invalid UTF-8 is decoded lossily.
/// The first read error is yielded once and the iterator is fused afterwards.
#[derive(Debug)]
pub struct TextRows<R> {
    reader: BufReader<R>,
    separator: Option<String>,
    pending: VecDeque<String>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> TextRows<R> {
    /// Wrap any reader.
    pub fn new(reader: R, separator: Option<&str>) -> Self {
        Self {
            reader: BufReader::new(reader),
            separator: separator.filter(|s| !s.is_empty()).map(str::to_owned),
            pending: VecDeque::new(),
            buf: Vec::new(),
            done: false,
        }
    }

    fn split_line(&self, line: String) -> Row {
        match &self.separator {
            Some(sep) => line.split(sep.as_str()).map(Value::utf8).collect(),
            None => vec![Value::Utf8(line)],
        }
    }

    // Fill `pending` with the lines of the next `\n`-terminated chunk. Returns false at EOF.
    fn fill_pending(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }

        let mut chunk: &[u8] = &self.buf;
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        }
        if let Some(rest) = chunk.strip_suffix(b"\r") {
            chunk = rest;
        }

        // Bytes that are not UTF-8 become U+FFFD instead of failing the whole file.
        let text = String::from_utf8_lossy(chunk);
        self.pending.extend(text.split('\r').map(str::to_owned));
        Ok(true)
    }
}

impl<R: Read> Iterator for TextRows<R> {
    type Item = LoadResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(self.split_line(line)));
            }
            if self.done {
                return None;
            }
            match self.fill_pending() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(LoadError::from(e)));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for TextRows<R> {}
