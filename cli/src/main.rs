use clap::Parser;
use ghmcp_cli::commands::{cli, stdio};
use ghmcp_cli::logging;
use ghmcp_core::api::{self as core_api, CliError, ServerError};

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    // Exit from inside the runtime: after a shutdown signal the engine task may still be
    // parked on a stdin read that runtime teardown would wait for.
    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = core_api::load(args.global.config.as_deref())
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    let settings = stdio::resolve_settings(&cfg, &args.global, |k| std::env::var(k).ok());

    let (logger, guard) = logging::init_logger(&cfg.logging, settings.log_file.as_deref())?;
    if let Some(guard) = guard {
        let _ = LOG_GUARD.set(guard);
    }

    match args.command {
        cli::Commands::Stdio => stdio::handle_stdio(settings, logger, cli::VERSION).await,
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success, including shutdown on SIGINT/SIGTERM
    // 1: server run failed
    // 2: usage error (reported by clap before we get here)
    // 3: config or logger initialisation failed
    // 4: GitHub client could not be created
    match e {
        CliError::Config(_) | CliError::Logger(_) => 3,
        CliError::Server(ServerError::ClientInit(_)) => 4,
        CliError::Server(_) => 1,
        CliError::Io(_) | CliError::Anyhow(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_api::EngineError;

    #[test]
    fn exit_codes_follow_the_failure_stage() {
        assert_eq!(exit_code_for_error(&CliError::Config("x".into())), 3);
        assert_eq!(exit_code_for_error(&CliError::Logger("x".into())), 3);
        assert_eq!(
            exit_code_for_error(&ServerError::ClientInit(anyhow::anyhow!("bad host")).into()),
            4
        );
        assert_eq!(
            exit_code_for_error(&ServerError::Run(EngineError::Aborted).into()),
            1
        );
    }
}
