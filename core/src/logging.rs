//! Shared logger handle.
//!
//! The process builds one `tracing` subscriber at startup. `Logger` keeps a handle to
//! it so components that are handed a logger explicitly (the supervisor, the logging
//! tee, the protocol engine) write to the same sink regardless of which dispatcher is
//! the thread default at the time.

use std::io;

use tracing::Dispatch;

#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Handle to whatever dispatcher is currently the default for this thread.
    pub fn current() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(|d| d.clone()),
        }
    }

    /// Runs `f` with this logger as the default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Raw line writer for code that expects a plain `io::Write` log sink.
    pub fn writer(&self, prefix: &'static str) -> LogWriter {
        LogWriter {
            logger: self.clone(),
            prefix,
            buf: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Line-buffered `io::Write` adapter: every complete line becomes one info record.
pub struct LogWriter {
    logger: Logger,
    prefix: &'static str,
    buf: Vec<u8>,
}

impl LogWriter {
    fn emit(&self, raw: &[u8]) {
        let mut line = raw;
        if line.last() == Some(&b'\n') {
            line = &line[..line.len() - 1];
        }
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }
        if line.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(line);
        let prefix = self.prefix;
        self.logger
            .in_scope(|| tracing::info!(target: "ghmcp::log", prefix = prefix, "{}", text));
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.emit(&line);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            self.emit(&rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
