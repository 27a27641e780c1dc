//! github-mcp-server command line: argument parsing, logging setup and subcommands.

pub mod commands;
pub mod logging;
