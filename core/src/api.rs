//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `ghmcp_core::api` instead of reaching into internal modules.

pub use crate::config::{
    apply_env_overrides, load, resolve_host, AppConfig, GitHubConfig, LoggingConfig, RunConfig,
    ServerConfig,
};
pub use crate::error::{CliError, EngineError, ServerError};
pub use crate::lifecycle::{LifecycleContext, ShutdownReason};
pub use crate::logging::{LogWriter, Logger};
pub use crate::outcome::{outcome_channel, Outcome, OutcomeReceiver, OutcomeSender};
pub use crate::server::{
    run_stdio, serve, ApiClient, ApiMethod, ApiRequest, BoxedReader, BoxedWriter, ClientFactory,
    EngineArgs, ProtocolEngine, ServerFactory, SharedClient, TransportPair, Translator,
    READY_LINE,
};
pub use crate::tee::{log_io, LoggedReader, LoggedWriter};
pub use crate::util::{preview_bytes, preview_text};
