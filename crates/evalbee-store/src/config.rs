//! evalbee configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level evalbee configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalbeeConfig {
    /// Directory holding the JSON record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Batch label for imported students.
    #[serde(default = "default_batch")]
    pub default_batch: String,
    /// Maximum students returned by a name search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Max submissions graded at once during batch grading.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Students inserted per store call during roster import.
    #[serde(default = "default_import_chunk_size")]
    pub import_chunk_size: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./evalbee-data")
}
fn default_batch() -> String {
    "JEE".to_string()
}
fn default_search_limit() -> usize {
    10
}
fn default_parallelism() -> usize {
    4
}
fn default_import_chunk_size() -> usize {
    200
}

impl Default for EvalbeeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_batch: default_batch(),
            search_limit: default_search_limit(),
            parallelism: default_parallelism(),
            import_chunk_size: default_import_chunk_size(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never re-scanned. An
/// unterminated `${` is kept as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `evalbee.toml` in the current directory
/// 2. `~/.config/evalbee/config.toml`
///
/// `EVALBEE_DATA_DIR` overrides `data_dir`.
pub fn load_config() -> Result<EvalbeeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EvalbeeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("evalbee.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => EvalbeeConfig::default(),
    };

    if let Ok(dir) = std::env::var("EVALBEE_DATA_DIR") {
        if !dir.trim().is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    config.default_batch = resolve_env_vars(&config.default_batch);

    anyhow::ensure!(config.search_limit >= 1, "search_limit must be at least 1");
    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(
        config.import_chunk_size >= 1,
        "import_chunk_size must be at least 1"
    );

    tracing::debug!(?config_path, data_dir = %config.data_dir.display(), "loaded config");
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<EvalbeeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<EvalbeeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("evalbee"))
}
