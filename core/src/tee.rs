//! Logging tee for the stdio transport.
//!
//! `LoggedReader` and `LoggedWriter` sit between the raw process streams and the
//! protocol engine. Every successful read or write is mirrored to the logger after
//! the wrapped stream has completed it; the bytes the engine sees are exactly the
//! bytes the wrapped stream produced, in the same chunks.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::logging::Logger;
use crate::util::preview_bytes;

/// Wraps a transport pair so that both directions are logged.
pub fn log_io<R, W>(
    input: R,
    output: W,
    logger: &Logger,
    preview_limit: Option<usize>,
) -> (LoggedReader<R>, LoggedWriter<W>) {
    (
        LoggedReader::new(input, logger.clone(), preview_limit),
        LoggedWriter::new(output, logger.clone(), preview_limit),
    )
}

fn record(
    logger: &Logger,
    label: &'static str,
    verb: &'static str,
    bytes: &[u8],
    limit: Option<usize>,
) {
    let text = preview_bytes(bytes, limit);
    let n = bytes.len();
    logger.in_scope(|| {
        tracing::info!(target: "ghmcp::io", "[{}]: {} {} bytes: {}", label, verb, n, text)
    });
}

pub struct LoggedReader<R> {
    inner: R,
    logger: Logger,
    preview_limit: Option<usize>,
}

impl<R> LoggedReader<R> {
    pub fn new(inner: R, logger: Logger, preview_limit: Option<usize>) -> Self {
        Self {
            inner,
            logger,
            preview_limit,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for LoggedReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let res = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = &res {
            let got = &buf.filled()[before..];
            if !got.is_empty() {
                record(&this.logger, "stdin", "received", got, this.preview_limit);
            }
        }
        res
    }
}

pub struct LoggedWriter<W> {
    inner: W,
    logger: Logger,
    preview_limit: Option<usize>,
}

impl<W> LoggedWriter<W> {
    pub fn new(inner: W, logger: Logger, preview_limit: Option<usize>) -> Self {
        Self {
            inner,
            logger,
            preview_limit,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for LoggedWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let res = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = &res {
            if *n > 0 {
                record(&this.logger, "stdout", "sending", &buf[..*n], this.preview_limit);
            }
        }
        res
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::testing::capture_logger;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn reads_pass_through_unchanged_and_in_order() {
        let (logger, captured) = capture_logger();
        let (mut host, engine_side) = tokio::io::duplex(64);
        let mut reader = LoggedReader::new(engine_side, logger, None);

        let frames: [&[u8]; 3] = [
            b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
            b"\xff\xfe raw \x00 bytes",
            b"tail\n",
        ];
        let mut expected = Vec::new();
        for f in frames {
            host.write_all(f).await.unwrap();
            expected.extend_from_slice(f);
        }
        drop(host);

        let mut buf = [0u8; 256];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &expected[..]);
        assert_eq!(reader.read(&mut buf).await.unwrap(), 0);

        let text = captured.text();
        assert!(text.contains("[stdin]: received"));
        assert!(text.contains("\"method\":\"ping\""));
    }

    #[tokio::test]
    async fn each_read_chunk_matches_the_source_chunk() {
        let (logger, _captured) = capture_logger();
        let src: &[u8] = b"abcdefghij";
        let mut plain = src;
        let mut teed = LoggedReader::new(src, logger, None);

        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        loop {
            let n1 = plain.read(&mut a).await.unwrap();
            let n2 = teed.read(&mut b).await.unwrap();
            assert_eq!(n1, n2);
            assert_eq!(a[..n1], b[..n2]);
            if n1 == 0 {
                break;
            }
        }
    }

    #[tokio::test]
    async fn writes_pass_through_and_log_exact_bytes() {
        let (logger, captured) = capture_logger();
        let mut writer = LoggedWriter::new(Vec::<u8>::new(), logger, None);

        writer.write_all(b"{\"result\":{}}\n").await.unwrap();
        writer.flush().await.unwrap();
        writer.shutdown().await.unwrap();

        assert_eq!(writer.into_inner(), b"{\"result\":{}}\n".to_vec());
        let text = captured.text();
        assert!(text.contains("[stdout]: sending 14 bytes: {\"result\":{}}"));
    }

    #[tokio::test]
    async fn eof_is_not_logged() {
        let (logger, captured) = capture_logger();
        let mut reader = LoggedReader::new(tokio::io::empty(), logger, None);
        let mut buf = Vec::new();
        assert_eq!(reader.read_to_end(&mut buf).await.unwrap(), 0);
        assert!(captured.text().is_empty());
    }

    #[tokio::test]
    async fn preview_limit_truncates_log_but_not_data() {
        let (logger, captured) = capture_logger();
        let payload = vec![b'x'; 100];
        let (mut reader, _writer) = log_io(&payload[..], tokio::io::sink(), &logger, Some(10));

        let mut buf = [0u8; 256];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &payload[..]);

        let text = captured.text();
        assert!(text.contains("received 100 bytes: xxxxxxxxxx… (90 more bytes)"));
    }

    #[tokio::test]
    async fn binary_preview_reports_omitted_source_bytes() {
        let (logger, captured) = capture_logger();
        let payload = vec![0xffu8; 20];
        let mut reader = LoggedReader::new(&payload[..], logger, Some(4));

        let mut buf = [0u8; 256];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &payload[..]);

        let text = captured.text();
        assert!(text.contains("received 20 bytes: "), "{text}");
        assert!(text.contains("(16 more bytes)"), "{text}");
    }

    #[tokio::test]
    async fn errors_from_wrapped_stream_propagate() {
        struct Broken;

        impl AsyncWrite for Broken {
            fn poll_write(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
                _buf: &[u8],
            ) -> Poll<io::Result<usize>> {
                Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
            }

            fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
                Poll::Ready(Ok(()))
            }

            fn poll_shutdown(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
            ) -> Poll<io::Result<()>> {
                Poll::Ready(Ok(()))
            }
        }

        let (logger, captured) = capture_logger();
        let mut writer = LoggedWriter::new(Broken, logger, None);
        let err = writer.write_all(b"hello").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(!captured.text().contains("sending"));
    }

    #[tokio::test]
    async fn read_error_after_data_keeps_what_was_logged() {
        let (logger, captured) = capture_logger();
        let mock = tokio_test::io::Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut reader = LoggedReader::new(mock, logger, None);

        let mut buf = [0u8; 16];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"partial");
        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);

        let text = captured.text();
        assert!(text.contains("[stdin]: received 7 bytes: partial"));
        assert_eq!(text.matches("[stdin]").count(), 1);
    }
}
