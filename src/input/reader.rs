use anyhow::{Context, Result, bail};
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Reads the text of a one-shot message.
pub struct InputReader;

impl InputReader {
    /// Returns `text` as-is when given, otherwise reads stdin.
    pub fn read(text: Option<&str>) -> Result<String> {
        match text {
            Some(text) => Ok(text.to_string()),
            None => Self::read_from(io::stdin().lock()),
        }
    }

    /// Reads the whole of `reader`, dropping a single trailing line break.
    ///
    /// Only the terminator is removed; other surrounding whitespace is part
    /// of the message.
    pub fn read_from<R: Read>(mut reader: R) -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Input size ({:.1} MB) exceeds maximum allowed size (1 MB).",
                    buffer.len() as f64 / 1024.0 / 1024.0
                );
            }
        }

        let mut text = String::from_utf8(buffer).context("Input is not valid UTF-8")?;
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Ok(text)
    }
}
