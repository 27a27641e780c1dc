//! Stdio transport supervisor.
//!
//! Owns one server run: builds the upstream client and the protocol engine, starts the
//! engine on its own task and waits for whichever comes first, a shutdown signal or
//! the engine's terminal outcome.
//!
//! After a shutdown signal the supervisor returns without waiting for the engine task.
//! A read blocked on stdin is not interrupted; the caller is expected to exit the
//! process, which closes the descriptors.

use std::io::Write;
use std::sync::Arc;

use crate::config::RunConfig;
use crate::error::ServerError;
use crate::lifecycle::LifecycleContext;
use crate::outcome::outcome_channel;

use super::traits::{EngineArgs, ServerFactory, SharedClient};
use super::transport::TransportPair;

pub const READY_LINE: &str = "GitHub MCP Server running on stdio";

/// Runs the server on the process's stdin/stdout until EOF, an engine error, or
/// SIGINT/SIGTERM.
pub async fn run_stdio(cfg: &RunConfig, factory: &dyn ServerFactory) -> Result<(), ServerError> {
    let lifecycle = LifecycleContext::with_os_signals().map_err(ServerError::Signal)?;
    let mut stderr = std::io::stderr();
    serve(cfg, factory, lifecycle, TransportPair::stdio(), &mut stderr).await
}

/// `run_stdio` with the lifecycle context, transport and readiness sink supplied by
/// the caller. The lifecycle context is dropped (and thereby cancelled) on return.
pub async fn serve(
    cfg: &RunConfig,
    factory: &dyn ServerFactory,
    lifecycle: LifecycleContext,
    transport: TransportPair,
    ready_out: &mut (dyn Write + Send),
) -> Result<(), ServerError> {
    let logger = &cfg.logger;

    let client = match factory.build_client(&cfg.host, &cfg.auth_token, &cfg.version) {
        Ok(client) => client,
        Err(e) => {
            logger.in_scope(|| tracing::error!("failed to create GitHub client: {:#}", e));
            return Err(ServerError::ClientInit(e));
        }
    };

    let translator = factory.translator();
    let engine = factory
        .build_engine(EngineArgs {
            clients: Arc::new(SharedClient::new(client)),
            version: cfg.version.clone(),
            read_only: cfg.read_only,
            translator: translator.clone(),
            logger: logger.clone(),
        })
        .map_err(ServerError::EngineInit)?;

    // Engine construction registers every translatable string.
    if cfg.export_translations {
        translator.export().map_err(ServerError::Translations)?;
    }

    let transport = if cfg.log_commands {
        transport.logged(logger, cfg.command_log_limit)
    } else {
        transport
    };

    let (outcome_tx, outcome_rx) = outcome_channel();
    let shutdown = lifecycle.token();
    let TransportPair { input, output } = transport;
    logger.in_scope(|| {
        tracing::debug!(engine = engine.name(), read_only = cfg.read_only, "starting engine")
    });
    tokio::spawn(async move {
        let outcome = engine.run(shutdown, input, output).await;
        outcome_tx.complete(outcome);
    });

    let _ = writeln!(ready_out, "{}", READY_LINE);
    let _ = ready_out.flush();

    tokio::select! {
        biased;
        _ = lifecycle.cancelled() => {
            let reason = lifecycle.reason().map(|r| r.as_str()).unwrap_or("unknown");
            logger.in_scope(|| tracing::info!(reason = reason, "shutting down server..."));
            Ok(())
        }
        outcome = outcome_rx.wait() => {
            outcome?;
            Ok(())
        }
    }
}
