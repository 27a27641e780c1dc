use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// `<version> (<commit>) <date>`; commit and date are stamped by build.rs.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GHMCP_BUILD_COMMIT"),
    ") ",
    env!("GHMCP_BUILD_DATE")
);

#[derive(Parser, Debug)]
#[command(
    name = "github-mcp-server",
    about = "GitHub MCP Server",
    long_about = "A GitHub MCP server that handles various tools and resources.",
    version = VERSION
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand. Unset flags leave config file and `APP_*` values
/// alone.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Restrict the server to read-only operations
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Path to log file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<String>,

    /// When enabled, the server will log all command requests and responses to the log file
    #[arg(long, global = true)]
    pub enable_command_logging: bool,

    /// Save translations to a JSON file
    #[arg(long, global = true)]
    pub export_translations: bool,

    /// Specify the GitHub hostname (for GitHub Enterprise etc.)
    #[arg(long, global = true, value_name = "HOST")]
    pub gh_host: Option<String>,

    /// Config file (TOML). Defaults to ~/.github-mcp-server/config.toml, then ./config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start stdio server
    ///
    /// Start a server that communicates via standard input/output streams using JSON-RPC
    /// messages.
    Stdio,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let args = Args::try_parse_from([
            "github-mcp-server",
            "stdio",
            "--read-only",
            "--gh-host",
            "ghe.example.com",
            "--log-file",
            "/tmp/x.log",
        ])
        .unwrap();
        assert_eq!(args.command, Commands::Stdio);
        assert!(args.global.read_only);
        assert!(!args.global.enable_command_logging);
        assert_eq!(args.global.gh_host.as_deref(), Some("ghe.example.com"));
        assert_eq!(args.global.log_file.as_deref(), Some("/tmp/x.log"));
    }

    #[test]
    fn global_flags_are_accepted_before_the_subcommand() {
        let args = Args::try_parse_from([
            "github-mcp-server",
            "--enable-command-logging",
            "--export-translations",
            "stdio",
        ])
        .unwrap();
        assert!(args.global.enable_command_logging);
        assert!(args.global.export_translations);
    }

    #[test]
    fn subcommand_is_required() {
        let err = Args::try_parse_from(["github-mcp-server"]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_flags_are_usage_errors() {
        let err = Args::try_parse_from(["github-mcp-server", "stdio", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn version_carries_commit_and_date() {
        let err = Args::try_parse_from(["github-mcp-server", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(VERSION.contains(" ("));
    }
}
