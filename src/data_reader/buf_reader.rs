// Buffered line reader over plain or gzip-compressed files.

use std::{
    fs::File,
    io::{self, prelude::*},
    path::Path,
};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

pub(crate) struct LineReader {
    reader: Box<dyn BufRead>,
    buf: String,
}

impl LineReader {
    /// Files ending in `.gz` are decompressed on the fly.
    pub(crate) fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        let reader: Box<dyn BufRead> = match path.extension().and_then(|x| x.to_str()) {
            Some("gz") => Box::new(io::BufReader::new(MultiGzDecoder::new(file))),
            _ => Box::new(io::BufReader::new(file)),
        };
        Ok(Self {
            reader,
            buf: String::with_capacity(2048),
        })
    }
}

impl Iterator for LineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        self.reader
            .read_line(&mut self.buf)
            .map(|u| {
                if u == 0 {
                    None
                } else {
                    Some(self.buf.trim_end_matches(|c| c == '\n' || c == '\r').to_string())
                }
            })
            .transpose()
    }
}
