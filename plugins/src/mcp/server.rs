//! MCP engine: reads JSON-RPC lines, answers requests, ignores notifications.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use ghmcp_core::api::{
    BoxedReader, BoxedWriter, ClientFactory, EngineArgs, EngineError, LogWriter, Logger,
    ProtocolEngine,
};
use tokio_util::sync::CancellationToken;

use super::protocol::{parse_message, Incoming, Response};
use super::tools::Toolset;
use super::transport::LineTransport;

pub const SERVER_NAME: &str = "github-mcp-server";

pub struct McpServer {
    version: String,
    tools: Toolset,
    clients: Arc<dyn ClientFactory>,
    logger: Logger,
}

impl McpServer {
    /// Resolves tool strings through the translator right away, so an export taken
    /// after construction contains every key this server uses.
    pub fn new(args: EngineArgs) -> Self {
        let tools = Toolset::new(args.read_only, args.translator.as_ref());
        Self {
            version: args.version,
            tools,
            clients: args.clients,
            logger: args.logger,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tools(&self) -> &Toolset {
        &self.tools
    }

    pub(crate) fn clients(&self) -> &Arc<dyn ClientFactory> {
        &self.clients
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Handles one non-blank frame. Returns the response to send, if any.
    pub async fn handle_frame(&self, frame: &[u8], diag: &mut LogWriter) -> Option<Response> {
        match parse_message(frame) {
            Err(rejected) => {
                let _ = writeln!(diag, "failed to handle message: {}", rejected.message);
                Some(rejected.into())
            }
            Ok(Incoming::Notification { method, .. }) => {
                self.logger.in_scope(|| {
                    tracing::debug!(target: "ghmcp::mcp", method = %method, "notification ignored")
                });
                None
            }
            Ok(Incoming::Request { id, method, params }) => {
                self.logger.in_scope(|| {
                    tracing::debug!(target: "ghmcp::mcp", method = %method, id = %id, "request")
                });
                Some(self.dispatch(id, &method, params).await)
            }
        }
    }
}

#[async_trait]
impl ProtocolEngine for McpServer {
    fn name(&self) -> &str {
        SERVER_NAME
    }

    async fn run(
        &self,
        shutdown: CancellationToken,
        input: BoxedReader,
        output: BoxedWriter,
    ) -> Result<(), EngineError> {
        let mut transport = LineTransport::new(input, output);
        let mut diag = self.logger.writer("stdioserver");

        loop {
            let frame = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    self.logger.in_scope(|| {
                        tracing::debug!(target: "ghmcp::mcp", "shutdown requested, leaving read loop")
                    });
                    return Ok(());
                }
                frame = transport.read_frame() => frame,
            };

            let frame = match frame {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.logger
                        .in_scope(|| tracing::debug!(target: "ghmcp::mcp", "stdin closed"));
                    return Ok(());
                }
                Err(e) => {
                    let _ = writeln!(diag, "error reading message: {e}");
                    return Err(e);
                }
            };
            if frame.is_empty() {
                continue;
            }

            let Some(response) = self.handle_frame(&frame, &mut diag).await else {
                continue;
            };
            let encoded = match serde_json::to_string(&response) {
                Ok(s) => s,
                Err(e) => {
                    let _ = writeln!(diag, "failed to marshal response: {e}");
                    continue;
                }
            };
            if let Err(e) = transport.write_line(&encoded).await {
                let _ = writeln!(diag, "failed to write response: {e}");
                return Err(e);
            }
        }
    }
}
