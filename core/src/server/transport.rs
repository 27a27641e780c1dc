use tokio::io::{AsyncRead, AsyncWrite};

use crate::logging::Logger;
use crate::tee::log_io;

pub type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;
pub type BoxedWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// The input/output pair handed to the protocol engine.
pub struct TransportPair {
    pub input: BoxedReader,
    pub output: BoxedWriter,
}

impl TransportPair {
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// The process's own stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }

    /// Same streams, with every read and write mirrored to `logger`.
    pub fn logged(self, logger: &Logger, preview_limit: Option<usize>) -> Self {
        let (input, output) = log_io(self.input, self.output, logger, preview_limit);
        Self::new(input, output)
    }
}
