//! Configuration for dominsp.
//!
//! Lives at `~/.dominsp/config.toml` unless a path is given explicitly:
//!
//! ```toml
//! [general]
//! database = "/home/me/.dominsp.json"
//!
//! [lexicon]
//! provider = "thesaurus"
//! thesaurus_path = "${HOME}/.dominsp/thesaurus.txt"
//!
//! [registrar]
//! tld = "com"
//! ```
//!
//! Every section and key is optional; consumers apply their own defaults.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use dominsp_store::atomic_write;

const CONFIG_DIR: &str = ".dominsp";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATABASE_FILE: &str = ".dominsp.json";
const DEFAULT_THESAURUS_FILE: &str = "thesaurus.txt";

#[derive(Debug, Default, Deserialize)]
pub struct DominspConfig {
    pub general: Option<GeneralConfig>,
    pub lexicon: Option<LexiconConfig>,
    pub registrar: Option<RegistrarConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    /// Path to the JSON record database. `${VAR}` and a leading `~/` expand.
    pub database: Option<String>,
}

/// Which lexical source `process` expands words with.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LexiconProvider {
    /// Datamuse words API (network).
    #[default]
    Datamuse,
    /// Local comma-separated thesaurus file.
    Thesaurus,
}

/// Lexical expansion settings.
///
/// ```toml
/// [lexicon]
/// provider = "datamuse"
/// datamuse_url = "https://api.datamuse.com"
/// max_results = 100
/// timeout_seconds = 10
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub provider: LexiconProvider,
    pub thesaurus_path: Option<String>,
    pub datamuse_url: Option<String>,
    pub max_results: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Availability lookup settings.
///
/// ```toml
/// [registrar]
/// rdap_url = "https://rdap.verisign.com/com/v1"
/// tld = "com"
/// timeout_seconds = 10
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RegistrarConfig {
    pub rdap_url: Option<String>,
    pub tld: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to edit config at {}: {source}", path.display())]
    Edit {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("failed to write config at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Expand `${VAR}` references; unset variables expand to nothing.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Expand env vars and a leading `~/` into a path.
pub fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_env_vars(value.trim());
    if let Some(stripped) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(expanded)
}

impl DominspConfig {
    /// Load the config at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn database_path(&self) -> Option<PathBuf> {
        self.general
            .as_ref()
            .and_then(|general| general.database.as_deref())
            .map(expand_path)
    }

    #[must_use]
    pub fn lexicon_provider(&self) -> LexiconProvider {
        self.lexicon
            .as_ref()
            .map(|lexicon| lexicon.provider)
            .unwrap_or_default()
    }

    /// Configured thesaurus file, or `~/.dominsp/thesaurus.txt`.
    #[must_use]
    pub fn thesaurus_path(&self) -> Option<PathBuf> {
        self.lexicon
            .as_ref()
            .and_then(|lexicon| lexicon.thesaurus_path.as_deref())
            .map(expand_path)
            .or_else(|| config_dir().map(|dir| dir.join(DEFAULT_THESAURUS_FILE)))
    }

    /// Record `database` under `[general]` in the config at `path`.
    ///
    /// Uses `toml_edit` to preserve comments and unrelated settings. Creates
    /// the file and its parent directory when missing.
    pub fn persist_database(path: &Path, database: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = if path.exists() {
            fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            String::new()
        };

        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .map_err(|source| ConfigError::Edit {
                path: path.to_path_buf(),
                source,
            })?;

        if !doc.contains_key("general") {
            doc["general"] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        doc["general"]["database"] = toml_edit::value(database.display().to_string());

        atomic_write(path, doc.to_string().as_bytes()).map_err(write_err)?;

        tracing::info!(path = %path.display(), database = %database.display(), "Config updated");
        Ok(())
    }
}

/// `~/.dominsp`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// `~/.dominsp/config.toml`
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// `~/.dominsp.json`
#[must_use]
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_DATABASE_FILE))
}
