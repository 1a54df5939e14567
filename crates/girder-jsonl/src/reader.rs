//! JSONL reading operations.
//!
//! [`JsonlReader`] reads one record per line and tracks line numbers so parse
//! failures point at the offending line. Blank lines are ignored.

use crate::error::{Error, Result};
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for JSONL (JSON Lines) data.
///
/// # Examples
///
/// ```no_run
/// use girder_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("dependencies.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_record::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last line read; 0 before the first read.
    line_number: usize,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Returns the number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line into `buf` and returns its length without the
    /// line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    async fn next_line(&mut self) -> Result<Option<usize>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut end = self.buf.len();
        while end > 0 && matches!(self.buf[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        Ok(Some(end))
    }

    /// Reads the next record, failing on the first malformed line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on read failures and [`Error::Json`] when a
    /// non-blank line does not parse as `T`.
    pub async fn read_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            let Some(len) = self.next_line().await? else {
                return Ok(None);
            };
            let line = &self.buf[..len];
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let line_number = self.line_number;
            return serde_json::from_slice(line)
                .map(Some)
                .map_err(|source| Error::Json {
                    line_number,
                    source,
                });
        }
    }

    /// Reads the next record, turning bad lines into warnings.
    ///
    /// # Errors
    ///
    /// Only I/O failures are returned as errors.
    pub async fn read_record_resilient<T: DeserializeOwned>(
        &mut self,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<T>> {
        loop {
            let Some(len) = self.next_line().await? else {
                return Ok(None);
            };
            let line = &self.buf[..len];
            let line_number = self.line_number;

            let Ok(text) = std::str::from_utf8(line) else {
                tracing::warn!(line_number, "skipping line with invalid UTF-8");
                warnings.push(Warning::InvalidUtf8 { line_number });
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            match serde_json::from_str(text) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => {
                    tracing::warn!(line_number, error = %e, "skipping malformed JSONL line");
                    warnings.push(Warning::MalformedJson {
                        line_number,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Reads every record of a JSONL file, collecting warnings for bad lines.
///
/// A missing file reads as empty, so freshly initialized directories and
/// first runs need no special casing.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file exists but cannot be read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "record file missing, treating as empty");
            return Ok((Vec::new(), Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut reader = JsonlReader::new(file);
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    while let Some(record) = reader.read_record_resilient(&mut warnings).await? {
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        warnings = warnings.len(),
        "loaded JSONL file"
    );
    Ok((records, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn reads_records_and_skips_blank_lines() {
        let data = Cursor::new(b"{\"id\":1}\n\n   \n{\"id\":2}\r\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.read_record::<Row>().await.unwrap(), Some(Row { id: 1 }));
        assert_eq!(reader.read_record::<Row>().await.unwrap(), Some(Row { id: 2 }));
        assert_eq!(reader.read_record::<Row>().await.unwrap(), None);
        assert_eq!(reader.line_number(), 4);
    }

    #[tokio::test]
    async fn strict_read_reports_line_number() {
        let data = Cursor::new(b"{\"id\":1}\nnot json\n".to_vec());
        let mut reader = JsonlReader::new(data);

        reader.read_record::<Row>().await.unwrap();
        let err = reader.read_record::<Row>().await.unwrap_err();
        match err {
            Error::Json { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resilient_read_collects_warnings() {
        let data = Cursor::new(b"{\"id\":1}\n{broken\n\xff\xfe\n{\"id\":3}\n".to_vec());
        let mut reader = JsonlReader::new(data);
        let mut warnings = Vec::new();

        let mut rows = Vec::new();
        while let Some(row) = reader
            .read_record_resilient::<Row>(&mut warnings)
            .await
            .unwrap()
        {
            rows.push(row);
        }

        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 3 }]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].kind(), "malformed_json");
        assert_eq!(warnings[0].line_number(), 2);
        assert_eq!(warnings[1], Warning::InvalidUtf8 { line_number: 3 });
    }
}
