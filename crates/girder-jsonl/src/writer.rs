//! JSONL writing operations.

use crate::error::{Error, Result};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSONL (JSON Lines) data.
///
/// Each value is serialized onto a single line followed by `\n`. Output is
/// buffered; call [`flush`](Self::flush) before dropping the writer.
pub struct JsonlWriter<W> {
    writer: BufWriter<W>,
    records: usize,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            records: 0,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Serializes one value as a line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the value cannot be serialized and
    /// [`Error::Io`] on write failures.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value).map_err(|source| Error::Json {
            line_number: 0,
            source,
        })?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.records += 1;
        Ok(())
    }

    /// Serializes every value of an iterator, one per line.
    ///
    /// # Errors
    ///
    /// Stops at the first failing value; see [`write`](Self::write).
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying writer.
    ///
    /// Buffered data that was not flushed is lost.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::io::Cursor;

    #[derive(Serialize)]
    struct Row<'a> {
        id: u32,
        name: &'a str,
    }

    #[tokio::test]
    async fn writes_one_line_per_record() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer
            .write_all([Row { id: 1, name: "a" }, Row { id: 2, name: "b" }])
            .await
            .unwrap();
        writer.flush().await.unwrap();

        assert_eq!(writer.records_written(), 2);
        let bytes = writer.into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n");
    }
}
