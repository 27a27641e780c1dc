#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ghmcp_core::api::{
    ApiClient, ApiRequest, BoxedReader, BoxedWriter, EngineArgs, EngineError, Logger,
    ProtocolEngine, RunConfig, ServerFactory, Translator,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn capture_logger() -> (Logger, Captured) {
    let captured = Captured::default();
    let sink = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (Logger::new(tracing::Dispatch::new(subscriber)), captured)
}

pub fn run_config(logger: Logger) -> RunConfig {
    RunConfig {
        read_only: false,
        logger,
        log_commands: false,
        command_log_limit: None,
        export_translations: false,
        host: String::new(),
        auth_token: String::new(),
        version: "0.0.0-test".into(),
    }
}

/// Ordered record of what the collaborators were asked to do.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<&'static str>>>);

impl Events {
    pub fn push(&self, e: &'static str) {
        self.0.lock().unwrap().push(e);
    }

    pub fn list(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum EngineKind {
    /// Echoes every input line back until EOF.
    Echo,
    /// Fails immediately with a protocol error.
    Fail,
    /// Reads once, then never returns and ignores shutdown.
    Block,
    Panic,
}

pub struct TestFactory {
    pub kind: EngineKind,
    pub fail_client: bool,
    pub events: Events,
}

impl TestFactory {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            fail_client: false,
            events: Events::default(),
        }
    }
}

struct NullClient;

#[async_trait]
impl ApiClient for NullClient {
    async fn request(&self, _req: ApiRequest) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

struct RecordingTranslator(Events);

impl Translator for RecordingTranslator {
    fn translate(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }

    fn export(&self) -> anyhow::Result<()> {
        self.0.push("export");
        Ok(())
    }
}

impl ServerFactory for TestFactory {
    fn build_client(
        &self,
        host: &str,
        _token: &str,
        _version: &str,
    ) -> anyhow::Result<Arc<dyn ApiClient>> {
        self.events.push("build_client");
        if self.fail_client {
            anyhow::bail!("invalid host {host:?}");
        }
        Ok(Arc::new(NullClient))
    }

    fn translator(&self) -> Arc<dyn Translator> {
        Arc::new(RecordingTranslator(self.events.clone()))
    }

    fn build_engine(&self, _args: EngineArgs) -> anyhow::Result<Box<dyn ProtocolEngine>> {
        self.events.push("build_engine");
        Ok(Box::new(TestEngine {
            kind: self.kind,
            events: self.events.clone(),
        }))
    }
}

struct TestEngine {
    kind: EngineKind,
    events: Events,
}

fn stdin_err(source: io::Error) -> EngineError {
    EngineError::StreamIo {
        stream: "stdin",
        source,
    }
}

fn stdout_err(source: io::Error) -> EngineError {
    EngineError::StreamIo {
        stream: "stdout",
        source,
    }
}

#[async_trait]
impl ProtocolEngine for TestEngine {
    fn name(&self) -> &str {
        "test"
    }

    async fn run(
        &self,
        _shutdown: CancellationToken,
        mut input: BoxedReader,
        mut output: BoxedWriter,
    ) -> Result<(), EngineError> {
        self.events.push("run");
        match self.kind {
            EngineKind::Echo => {
                let mut lines = BufReader::new(input).lines();
                while let Some(line) = lines.next_line().await.map_err(stdin_err)? {
                    output.write_all(line.as_bytes()).await.map_err(stdout_err)?;
                    output.write_all(b"\n").await.map_err(stdout_err)?;
                    output.flush().await.map_err(stdout_err)?;
                }
                Ok(())
            }
            EngineKind::Fail => Err(EngineError::Protocol("boom: malformed frame".into())),
            EngineKind::Block => {
                let mut buf = [0u8; 1];
                let _ = input.read(&mut buf).await;
                std::future::pending::<Result<(), EngineError>>().await
            }
            EngineKind::Panic => panic!("engine exploded"),
        }
    }
}
