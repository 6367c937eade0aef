//! Reading shader source text from disk.

use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SourceError;

/// Line length the fixed-buffer reader accepts per read (a 256 byte buffer
/// minus the terminator).
pub const LEGACY_LINE_LIMIT: usize = 255;

/// How long a single line may be before the loader splits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineLimit {
    #[default]
    Unbounded,
    /// Fixed-buffer reading: at most `n` characters per read. Longer lines
    /// are split and their remainder becomes a new line. End of stream with
    /// nothing read still appends an empty line.
    ///
    /// `n` counts bytes, so a split inside a multi-byte UTF-8 character
    /// decodes both halves as U+FFFD.
    Legacy(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLoader {
    limit: LineLimit,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_limit(limit: LineLimit) -> Self {
        Self { limit }
    }

    /// Reads the whole file at `path`, one `\n` after every line.
    ///
    /// Only failing to open the file is an error. A read error part way
    /// through is logged and whatever was read up to that point is returned.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<String, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let text = self.read(BufReader::new(file));
        debug!(
            "Loaded {:?}: {} lines, {} bytes",
            path,
            text.matches('\n').count(),
            text.len()
        );
        Ok(text)
    }

    pub fn read<R: BufRead>(&self, mut reader: R) -> String {
        let mut text = String::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            // Bytes consumed before a failed read stay in `line` and are kept.
            let (read, failed) = match reader.read_until(b'\n', &mut line) {
                Ok(read) => (read, false),
                Err(e) => {
                    warn!("Shader source read stopped early: {}", e);
                    (line.len(), true)
                }
            };

            let terminated = line.last() == Some(&b'\n');
            if terminated {
                line.pop();
            }

            match self.limit {
                LineLimit::Unbounded => {
                    if read == 0 {
                        break;
                    }
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    push_line(&mut text, &line);
                    if failed {
                        break;
                    }
                }
                LineLimit::Legacy(max) => {
                    if line.is_empty() {
                        push_line(&mut text, &[]);
                    } else {
                        for chunk in line.chunks(max.max(1)) {
                            push_line(&mut text, chunk);
                        }
                    }
                    if failed || !terminated {
                        break;
                    }
                }
            }
        }

        text
    }
}

fn push_line(text: &mut String, line: &[u8]) {
    text.push_str(&String::from_utf8_lossy(line));
    text.push('\n');
}
