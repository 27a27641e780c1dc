//! User-overridable tool strings.
//!
//! Values resolve as `GITHUB_MCP_<KEY>` env var, then the JSON catalog on disk, then
//! the built-in default. Everything resolved is remembered so `export` can write a
//! complete catalog for users to edit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ghmcp_core::api::Translator;

pub const DEFAULT_CATALOG_FILE: &str = "github-mcp-server-config.json";
pub const ENV_PREFIX: &str = "GITHUB_MCP_";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct TranslationHelper {
    path: PathBuf,
    catalog: BTreeMap<String, String>,
    recorded: Mutex<BTreeMap<String, String>>,
    env: EnvLookup,
}

impl TranslationHelper {
    /// Catalog in the working directory, as the server has always looked for it.
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CATALOG_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let catalog = load_catalog(&path);
        Self {
            path,
            catalog,
            recorded: Mutex::new(BTreeMap::new()),
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    pub fn recorded(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TranslationHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for TranslationHelper {
    fn translate(&self, key: &str, default: &str) -> String {
        let key = key.to_uppercase();
        let mut recorded = self.lock();
        if let Some(v) = recorded.get(&key) {
            return v.clone();
        }

        let value = (self.env)(&format!("{ENV_PREFIX}{key}"))
            .or_else(|| self.catalog.get(&key).cloned())
            .unwrap_or_else(|| default.to_string());
        recorded.insert(key, value.clone());
        value
    }

    fn export(&self) -> anyhow::Result<()> {
        let recorded = self.recorded();
        let json = serde_json::to_string_pretty(&recorded)?;
        std::fs::write(&self.path, json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", self.path.display()))?;
        tracing::info!(
            target: "ghmcp::translations",
            path = %self.path.display(),
            entries = recorded.len(),
            "exported translations"
        );
        Ok(())
    }
}

fn load_catalog(path: &Path) -> BTreeMap<String, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return BTreeMap::new(),
    };
    match serde_json::from_str::<BTreeMap<String, String>>(&content) {
        Ok(map) => map
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect(),
        Err(e) => {
            tracing::warn!(
                target: "ghmcp::translations",
                path = %path.display(),
                error = %e,
                "ignoring unreadable translation catalog"
            );
            BTreeMap::new()
        }
    }
}
