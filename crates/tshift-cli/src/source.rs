//! Log sources: plain files, gzip files, and stdin.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// Buffer size for reading log files.
const BUFFER_SIZE: usize = 64 * 1024;

/// An opened log source.
pub struct LogSource {
    name: String,
    reader: Box<dyn BufRead + Send>,
}

impl std::fmt::Debug for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSource").field("name", &self.name).finish()
    }
}

impl LogSource {
    /// Opens `path`. `-` means stdin; a `.gz` extension is decompressed.
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str() == "-" {
            return Ok(Self::stdin());
        }

        let name = path.display().to_string();
        let file = File::open(path).with_context(|| format!("failed to open {name}"))?;

        let reader: Box<dyn BufRead + Send> =
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
                tracing::debug!(path = %name, "reading gzip-compressed log");
                Box::new(BufReader::with_capacity(BUFFER_SIZE, MultiGzDecoder::new(file)))
            } else {
                Box::new(BufReader::with_capacity(BUFFER_SIZE, file))
            };

        Ok(Self { name, reader })
    }

    pub fn stdin() -> Self {
        Self::from_reader("<stdin>", BufReader::new(io::stdin()))
    }

    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates `(line number, line)` pairs starting at 1.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; log files are not
    /// always clean.
    pub fn lines(self) -> NumberedLines {
        NumberedLines {
            reader: self.reader,
            number: 0,
            buf: Vec::new(),
        }
    }
}

/// Iterator over the lines of a [`LogSource`].
pub struct NumberedLines {
    reader: Box<dyn BufRead + Send>,
    number: usize,
    buf: Vec<u8>,
}

impl Iterator for NumberedLines {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                self.number += 1;
                let line = String::from_utf8_lossy(&self.buf).into_owned();
                Some(Ok((self.number, line)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
