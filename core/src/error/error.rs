use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("server failed: {0}")]
    Server(#[from] ServerError),
    #[error("config error: {0}")]
    Config(String),
    #[error("failed to initialize logger: {0}")]
    Logger(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Failures of a single stdio server run, from startup to the engine's outcome.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),
    #[error("failed to create GitHub client: {0:#}")]
    ClientInit(#[source] anyhow::Error),
    #[error("failed to create MCP server: {0:#}")]
    EngineInit(#[source] anyhow::Error),
    #[error("failed to export translations: {0:#}")]
    Translations(#[source] anyhow::Error),
    #[error("error running server: {0}")]
    Run(#[from] EngineError),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("engine stopped without reporting an outcome")]
    Aborted,
}

impl ServerError {
    /// True when the failure happened before the run loop was started.
    pub fn is_startup(&self) -> bool {
        !matches!(self, Self::Run(_))
    }
}
