//! Configuration management for the portfolio dashboard.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the backend endpoint, table sizing and cache behaviour.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used under the platform config directory.
const APP_DIR: &str = "portfolio-tui";

/// Environment variable overriding `api_base_url`.
pub const ENV_API_URL: &str = "PORTFOLIO_TUI_API_URL";
/// Environment variable overriding `api_token`.
pub const ENV_API_TOKEN: &str = "PORTFOLIO_TUI_API_TOKEN";

/// Symbols offered by the prices checklist when none are configured.
pub const DEFAULT_SYMBOLS: [&str; 13] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "TRXUSDT", "WLFIUSDT", "XLMUSDT", "TONUSDT", "UNIUSDT",
    "TAOUSDT", "POLUSDT", "GUNUSDT", "GNOUSDT", "IOTAUSDT",
];

/// Application configuration structure.
///
/// Contains backend credentials and display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analytics backend
    pub api_base_url: String,
    /// Optional bearer token sent with every request
    pub api_token: Option<String>,
    /// Quote asset used for the market cap snapshot
    pub quote: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Age after which a cached query is refreshed in the background
    pub stale_after_secs: u64,
    /// Delay before a search keystroke is applied to the table
    pub search_debounce_ms: u64,
    /// Rows per page on the market cap table
    pub market_cap_page_size: usize,
    /// Rows per page on the prices table
    pub prices_page_size: usize,
    /// Initial "top N" assets shown on the market cap page
    pub default_top_n: usize,
    /// Symbols offered on the prices page
    pub default_symbols: Vec<String>,
    /// Log file path (relative to config dir or absolute)
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_token: None,
            quote: "USDT".to_string(),
            request_timeout_secs: 30,
            stale_after_secs: 300,
            search_debounce_ms: 300,
            market_cap_page_size: 50,
            prices_page_size: 20,
            default_top_n: 50,
            default_symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            log_file: "portfolio-tui.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/portfolio-tui/config.jsonc`
    /// 3. `~/.config/portfolio-tui/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Apply `PORTFOLIO_TUI_*` environment overrides.
    ///
    /// # Arguments
    /// * `lookup` - Variable lookup, usually `std::env::var(..).ok()`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
    }

    /// Get default configuration file path.
    ///
    /// Returns `$XDG_CONFIG_HOME/portfolio-tui/config.jsonc` or `~/.config/portfolio-tui/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join(APP_DIR).join("config.jsonc"))
    }

    /// Get log file path.
    ///
    /// If `log_file` is absolute, returns it as-is.
    /// Otherwise, returns path relative to config directory.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        let log_path = Path::new(&self.log_file);
        if log_path.is_absolute() {
            Ok(log_path.to_path_buf())
        } else {
            let config_dir = config_dir()
                .ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
            Ok(config_dir.join(APP_DIR).join(&self.log_file))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Strip `//` comments that are not inside a string literal.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if let Some(comment_pos) = line.find("//") {
                // Simplified: escaped quotes are not handled
                let before_comment = &line[..comment_pos];
                let quote_count = before_comment.matches('"').count();
                if quote_count % 2 == 0 {
                    line[..comment_pos].trim_end()
                } else {
                    line
                }
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert!(config.api_token.is_none());
        assert_eq!(config.market_cap_page_size, 50);
        assert_eq!(config.prices_page_size, 20);
        assert_eq!(config.default_symbols.len(), 13);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let config = Config {
            api_base_url: "http://analytics.internal:9000".to_string(),
            default_top_n: 25,
            ..Config::default()
        };

        config.save(Some(&config_path)).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.api_base_url, "http://analytics.internal:9000");
        assert_eq!(loaded.default_top_n, 25);
    }

    #[test]
    fn test_config_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let jsonc_content = r#"{
            // Backend running next to the dashboard
            "api_base_url": "http://127.0.0.1:8000",
            "quote": "BUSD" // trailing comment
        }"#;

        fs::write(&config_path, jsonc_content).unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(loaded.quote, "BUSD");
        assert_eq!(loaded.search_debounce_ms, 300);
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load(Some(&temp_dir.path().join("absent.jsonc"))).unwrap();
        assert_eq!(loaded.quote, "USDT");
    }

    #[test]
    fn test_config_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(|name| match name {
            ENV_API_URL => Some("https://risk.example.com".to_string()),
            ENV_API_TOKEN => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://risk.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));

        let mut untouched = Config::default();
        untouched.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched.api_base_url, "http://localhost:8000");
        assert!(untouched.api_token.is_none());
    }

    #[test]
    fn test_log_file_path_absolute() {
        let config = Config {
            log_file: "/tmp/portfolio.log".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.log_file_path().unwrap(),
            PathBuf::from("/tmp/portfolio.log")
        );
    }
}
