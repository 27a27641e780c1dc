use ghmcp_core::api as core_api;
use ghmcp_plugins::services::GitHubServerFactory;

use crate::commands::cli::GlobalArgs;

pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

/// Effective settings for one `stdio` run after merging config file, `APP_*` env,
/// command line flags and `GH_HOST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdioSettings {
    pub read_only: bool,
    pub log_file: Option<String>,
    pub log_commands: bool,
    pub command_log_limit: Option<usize>,
    pub export_translations: bool,
    pub host: String,
    pub timeout_ms: u64,
}

pub fn resolve_settings<F>(
    cfg: &core_api::AppConfig,
    flags: &GlobalArgs,
    lookup: F,
) -> StdioSettings
where
    F: Fn(&str) -> Option<String>,
{
    let log_file = flags
        .log_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| cfg.server.log_file())
        .map(str::to_string);
    let configured_host = flags.gh_host.as_deref().unwrap_or(&cfg.github.host);

    StdioSettings {
        read_only: flags.read_only || cfg.server.read_only,
        log_file,
        log_commands: flags.enable_command_logging || cfg.server.enable_command_logging,
        command_log_limit: cfg.server.command_log_limit(),
        export_translations: flags.export_translations || cfg.server.export_translations,
        host: core_api::resolve_host(configured_host, lookup),
        timeout_ms: cfg.github.timeout_ms,
    }
}

pub async fn handle_stdio(
    settings: StdioSettings,
    logger: core_api::Logger,
    version: &str,
) -> Result<i32, core_api::CliError> {
    let run_cfg = core_api::RunConfig {
        read_only: settings.read_only,
        logger,
        log_commands: settings.log_commands,
        command_log_limit: settings.command_log_limit,
        export_translations: settings.export_translations,
        host: settings.host,
        auth_token: std::env::var(TOKEN_ENV).unwrap_or_default(),
        version: version.to_string(),
    };
    run_cfg
        .logger
        .in_scope(|| tracing::debug!(config = ?run_cfg, "starting stdio server"));

    let factory = GitHubServerFactory::new(settings.timeout_ms);
    core_api::run_stdio(&run_cfg, &factory).await?;
    Ok(0)
}
