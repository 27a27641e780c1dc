use std::fmt;

use crate::logging::Logger;

/// Everything one stdio server run needs, fixed before the run starts.
#[derive(Clone)]
pub struct RunConfig {
    pub read_only: bool,
    pub logger: Logger,
    pub log_commands: bool,
    /// Per-frame cap on what the command log records; `None` records whole frames.
    pub command_log_limit: Option<usize>,
    pub export_translations: bool,
    pub host: String,
    pub auth_token: String,
    pub version: String,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.auth_token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("RunConfig")
            .field("read_only", &self.read_only)
            .field("log_commands", &self.log_commands)
            .field("command_log_limit", &self.command_log_limit)
            .field("export_translations", &self.export_translations)
            .field("host", &self.host)
            .field("auth_token", &token)
            .field("version", &self.version)
            .finish()
    }
}
