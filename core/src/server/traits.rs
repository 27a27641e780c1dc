use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::logging::Logger;

use super::transport::{BoxedReader, BoxedWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl ApiMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A single call against the upstream REST API, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: ApiMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(&self, req: ApiRequest) -> anyhow::Result<Value>;
}

/// Hands tool handlers the upstream client.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn client(&self) -> anyhow::Result<Arc<dyn ApiClient>>;
}

/// Client factory over one client built eagerly at startup.
#[derive(Clone)]
pub struct SharedClient(Arc<dyn ApiClient>);

impl SharedClient {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl ClientFactory for SharedClient {
    async fn client(&self) -> anyhow::Result<Arc<dyn ApiClient>> {
        Ok(self.0.clone())
    }
}

pub trait Translator: Send + Sync {
    /// Looks up `key`, falling back to `default`, and records the result.
    fn translate(&self, key: &str, default: &str) -> String;

    /// Persists every value recorded so far.
    fn export(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ProtocolEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Serves requests from `input` until it reaches EOF (`Ok`) or fails.
    /// `shutdown` is a hint; the engine may stop early once it fires.
    async fn run(
        &self,
        shutdown: CancellationToken,
        input: BoxedReader,
        output: BoxedWriter,
    ) -> Result<(), EngineError>;
}

pub struct EngineArgs {
    pub clients: Arc<dyn ClientFactory>,
    pub version: String,
    pub read_only: bool,
    pub translator: Arc<dyn Translator>,
    pub logger: Logger,
}

/// Builds the collaborators of a stdio server run.
pub trait ServerFactory: Send + Sync {
    fn build_client(
        &self,
        host: &str,
        token: &str,
        version: &str,
    ) -> anyhow::Result<Arc<dyn ApiClient>>;

    fn translator(&self) -> Arc<dyn Translator>;

    fn build_engine(&self, args: EngineArgs) -> anyhow::Result<Box<dyn ProtocolEngine>>;
}
