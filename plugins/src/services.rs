use std::path::PathBuf;
use std::sync::Arc;

use ghmcp_core::api::{ApiClient, EngineArgs, ProtocolEngine, ServerFactory, Translator};

use crate::github::{GitHubClient, DEFAULT_TIMEOUT_MS};
use crate::mcp::McpServer;
use crate::translations::TranslationHelper;

/// Production wiring: reqwest GitHub client, MCP engine, on-disk translations.
pub struct GitHubServerFactory {
    timeout_ms: u64,
    translator: Arc<TranslationHelper>,
}

impl GitHubServerFactory {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            translator: Arc::new(TranslationHelper::new()),
        }
    }

    pub fn with_translations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.translator = Arc::new(TranslationHelper::with_path(path));
        self
    }
}

impl Default for GitHubServerFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl ServerFactory for GitHubServerFactory {
    fn build_client(
        &self,
        host: &str,
        token: &str,
        version: &str,
    ) -> anyhow::Result<Arc<dyn ApiClient>> {
        let client = GitHubClient::new(host, token, version, self.timeout_ms)?;
        tracing::debug!(target: "ghmcp::github", client = ?client, "github client ready");
        Ok(Arc::new(client))
    }

    fn translator(&self) -> Arc<dyn Translator> {
        self.translator.clone()
    }

    fn build_engine(&self, args: EngineArgs) -> anyhow::Result<Box<dyn ProtocolEngine>> {
        Ok(Box::new(McpServer::new(args)))
    }
}
