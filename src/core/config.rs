//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub phonetic: PhoneticConfig,
    pub remote: RemoteConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Nickname dictionary (JSON or CSV); built-in defaults when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneticConfig {
    /// Maximum length of each metaphone code
    pub max_code_len: usize,
    /// Also compute the alternate code
    pub alternate: bool,
}

/// Shape of the single retry sent after a failed chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryShape {
    /// Plain `{"input": "..."}` prompt payload
    Prompt,
    /// No retry; degrade right away
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Workers AI account id
    pub account_id: Option<String>,
    /// Workers AI API token
    pub api_token: Option<String>,
    /// Model slug, e.g. `@cf/meta/llama-3-8b-instruct`
    pub model: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub retry_shape: RetryShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index that records are written to and searched in
    pub index_name: String,
    /// Default result limit
    pub default_limit: usize,
}

impl Default for PhoneticConfig {
    fn default() -> Self {
        Self {
            max_code_len: 4,
            alternate: true,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            model: None,
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            timeout_secs: 12,
            retry_shape: RetryShape::Prompt,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            default_limit: 10,
        }
    }
}

impl RemoteConfig {
    /// Credentials are usable only when both values are non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let account = self.account_id.as_deref().map(str::trim)?;
        let token = self.api_token.as_deref().map(str::trim)?;
        if account.is_empty() || token.is_empty() {
            return None;
        }
        Some((account, token))
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_REMOTE_MODEL)
    }
}

impl Config {
    /// Load configuration from default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Environment variables win over the config file
    fn apply_env(&mut self) {
        if let Ok(account) = std::env::var("CLOUDFLARE_ACCOUNT_ID") {
            self.remote.account_id = Some(account);
        }
        if let Ok(token) = std::env::var("CLOUDFLARE_API_TOKEN") {
            self.remote.api_token = Some(token);
        }
        if let Ok(model) = std::env::var("CLOUDFLARE_MODEL") {
            self.remote.model = Some(model);
        }
        if let Ok(path) = std::env::var("NAMESEEK_NICKNAMES_PATH") {
            self.dictionary.path = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Get the nameseek home directory
    pub fn home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("NAMESEEK_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "nameseek", "nameseek")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine nameseek home directory".to_string(),
            })
    }

    /// Get the directory holding all backend indexes
    pub fn indexes_dir() -> Result<PathBuf> {
        Ok(Self::home()?.join("indexes"))
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}

pub const DEFAULT_INDEX_NAME: &str = "persons";
pub const DEFAULT_PRIMARY_KEY: &str = "id";
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://api.cloudflare.com";
pub const DEFAULT_REMOTE_MODEL: &str = "@cf/meta/llama-3-8b-instruct";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.phonetic.max_code_len, 4);
        assert!(config.phonetic.alternate);
        assert_eq!(config.remote.timeout_secs, 12);
        assert_eq!(config.remote.retry_shape, RetryShape::Prompt);
        assert_eq!(config.search.index_name, "persons");
        assert!(config.remote.credentials().is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [remote]
            account_id = "acct"
            api_token = "tok"
            retry_shape = "disabled"

            [phonetic]
            max_code_len = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.credentials(), Some(("acct", "tok")));
        assert_eq!(config.remote.retry_shape, RetryShape::Disabled);
        assert_eq!(config.remote.model(), DEFAULT_REMOTE_MODEL);
        assert_eq!(config.phonetic.max_code_len, 6);
        assert!(config.phonetic.alternate);
        assert_eq!(config.search.default_limit, 10);
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let remote = RemoteConfig {
            account_id: Some("acct".to_string()),
            api_token: Some("   ".to_string()),
            ..RemoteConfig::default()
        };
        assert!(remote.credentials().is_none());
    }
}
