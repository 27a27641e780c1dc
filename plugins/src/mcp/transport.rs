//! Line-delimited transport: one JSON message per `\n`-terminated line.

use ghmcp_core::api::EngineError;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Next frame with surrounding ASCII whitespace removed, or `None` at EOF. Blank
    /// lines come back empty. Bytes are not checked for UTF-8 here; a bad frame is a
    /// protocol problem for the caller, not a stream failure.
    pub async fn read_frame(&mut self) -> Result<Option<Vec<u8>>, EngineError> {
        let mut frame = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut frame)
            .await
            .map_err(|source| EngineError::StreamIo {
                stream: "stdin",
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(frame.trim_ascii().to_vec()))
    }

    pub async fn write_line(&mut self, message: &str) -> Result<(), EngineError> {
        let io = |source| EngineError::StreamIo {
            stream: "stdout",
            source,
        };
        self.writer.write_all(message.as_bytes()).await.map_err(io)?;
        self.writer.write_all(b"\n").await.map_err(io)?;
        self.writer.flush().await.map_err(io)
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn reads_frames_until_eof() {
        let input = b"one\r\n\n  two  \nthree".to_vec();
        let mut t = LineTransport::new(Cursor::new(input), Vec::new());

        assert_eq!(t.read_frame().await.unwrap().as_deref(), Some(&b"one"[..]));
        assert_eq!(t.read_frame().await.unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(t.read_frame().await.unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(t.read_frame().await.unwrap().as_deref(), Some(&b"three"[..]));
        assert_eq!(t.read_frame().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_appends_newline() {
        let mut t = LineTransport::new(Cursor::new(Vec::new()), Vec::new());
        t.write_line("{\"ok\":true}").await.unwrap();
        assert_eq!(t.into_writer(), b"{\"ok\":true}\n");
    }

    #[tokio::test]
    async fn invalid_utf8_is_passed_through_as_bytes() {
        let mut t = LineTransport::new(Cursor::new(vec![0xff, 0xfe, b'\n', b'x']), Vec::new());
        assert_eq!(t.read_frame().await.unwrap(), Some(vec![0xff, 0xfe]));
        assert_eq!(t.read_frame().await.unwrap(), Some(b"x".to_vec()));
    }

    #[tokio::test]
    async fn read_failure_is_a_stdin_error() {
        let mock = tokio_test::io::Builder::new()
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let mut t = LineTransport::new(mock, Vec::new());
        let err = t.read_frame().await.unwrap_err();
        assert!(matches!(err, EngineError::StreamIo { stream: "stdin", .. }));
    }
}
