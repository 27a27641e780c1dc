mod load;
mod run;
mod types;

pub use load::{
    apply_env_overrides, get_data_dir, load, load_from_path, parse_bool, resolve_host, ENV_PREFIX,
};
pub use run::RunConfig;
pub use types::{AppConfig, GitHubConfig, LoggingConfig, ServerConfig};
