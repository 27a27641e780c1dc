use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter string used for console logging, e.g. "info" or "ghmcp_core=debug".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// EnvFilter string used when logging to a file.
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_logging_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
            file_level: default_file_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub enable_command_logging: bool,

    #[serde(default)]
    pub export_translations: bool,

    /// Log file path. Unset or empty logs to stderr.
    #[serde(default)]
    pub log_file: Option<String>,

    /// Upper bound on how much of each frame the command log records. 0 keeps everything.
    #[serde(default)]
    pub command_log_max_bytes: usize,
}

impl ServerConfig {
    pub fn log_file(&self) -> Option<&str> {
        self.log_file
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn command_log_limit(&self) -> Option<usize> {
        (self.command_log_max_bytes > 0).then_some(self.command_log_max_bytes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub hostname (GitHub Enterprise etc.). Empty means github.com.
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
