use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "todo-server.toml";

const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Top-level server configuration loaded from `todo-server.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Load from `path` when given, else from `./todo-server.toml` if it
    /// exists, else fall back to defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::from_path(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from an explicit file. The file must exist.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML or out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        self.server.validate()
    }
}

/// `[server]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default = "default_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_origins(),
        }
    }
}

impl ListenConfig {
    fn validate(&self) -> Result<()> {
        if self.cors_origins.iter().any(|origin| origin.trim().is_empty()) {
            bail!("cors origins must not be blank");
        }
        Ok(())
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9090))
}

fn default_origins() -> Vec<String> {
    vec![DEFAULT_ORIGIN.to_owned()]
}

/// `[pagination]` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_size: usize,
    #[serde(default = "max_page_size")]
    pub max_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: max_page_size(),
        }
    }
}

impl PaginationConfig {
    fn validate(self) -> Result<()> {
        if self.max_size == 0 {
            bail!("pagination max_size must be positive");
        }
        if !(1..=self.max_size).contains(&self.default_size) {
            bail!(
                "pagination default_size {} must be between 1 and max_size {}",
                self.default_size,
                self.max_size
            );
        }
        Ok(())
    }
}

const fn default_page_size() -> usize {
    10
}

const fn max_page_size() -> usize {
    100
}

/// `[logging]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_documented_values() -> Result<()> {
        let config = ServerConfig::from_toml_str("")?;
        assert_eq!(config.server.bind.to_string(), "127.0.0.1:9090");
        assert_eq!(config.server.cors_origins, vec!["http://localhost:8080"]);
        assert_eq!(config.pagination, PaginationConfig::default());
        assert_eq!(config.pagination.default_size, 10);
        assert_eq!(config.pagination.max_size, 100);
        assert_eq!(config.logging.filter, "info");
        Ok(())
    }

    #[test]
    fn load_config_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut file = fs::File::create(&path)?;
        writeln!(
            file,
            "[server]\nbind = \"0.0.0.0:8000\"\ncors_origins = [\"https://app.example\"]\n\n[pagination]\ndefault_size = 25\nmax_size = 50\n\n[logging]\nfilter = \"debug\""
        )?;

        let config = ServerConfig::load(Some(&path))?;
        assert_eq!(config.server.bind.port(), 8000);
        assert_eq!(config.server.cors_origins, vec!["https://app.example"]);
        assert_eq!(config.pagination.default_size, 25);
        assert_eq!(config.pagination.max_size, 50);
        assert_eq!(config.logging.filter, "debug");
        Ok(())
    }

    #[test]
    fn explicit_missing_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let Err(err) = ServerConfig::load(Some(&dir.path().join("absent.toml"))) else {
            panic!("missing config file should error");
        };
        assert!(err.to_string().contains("failed to read"));
        Ok(())
    }

    #[test]
    fn default_size_must_fit_max_size() {
        let Err(err) = ServerConfig::from_toml_str("[pagination]\ndefault_size = 200\nmax_size = 100")
        else {
            panic!("oversized default page should error");
        };
        assert!(err.to_string().contains("default_size 200"));
    }

    #[test]
    fn zero_max_size_is_rejected() {
        let Err(err) = ServerConfig::from_toml_str("[pagination]\ndefault_size = 1\nmax_size = 0")
        else {
            panic!("zero max size should error");
        };
        assert!(err.to_string().contains("max_size must be positive"));
    }

    #[test]
    fn blank_origins_are_rejected() {
        assert!(ServerConfig::from_toml_str("[server]\ncors_origins = [\"  \"]").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ServerConfig::from_toml_str("[server]\nport = 80").is_err());
    }
}
