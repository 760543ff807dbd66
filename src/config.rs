//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.calltone.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Analysis selection settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "calltone_dashboard.md".to_string()
}

/// Backend HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend API base URL.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Ask the backend to serve cached results when available.
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: default_timeout(),
            use_cache: true,
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    120 // uncached analysis runs the backend's full NLP pipeline
}

/// Ticker/quarter selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Default ticker symbol.
    #[serde(default = "default_ticker")]
    pub ticker: String,

    /// Number of recent quarters to analyze.
    #[serde(default = "default_quarters")]
    pub quarters: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ticker: default_ticker(),
            quarters: default_quarters(),
        }
    }
}

fn default_ticker() -> String {
    "NVDA".to_string()
}

fn default_quarters() -> usize {
    4
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the enhanced-narrative blocks on change cards.
    #[serde(default = "default_true")]
    pub include_narratives: bool,

    /// Include the per-quarter transcript cards section.
    #[serde(default = "default_true")]
    pub include_transcripts: bool,

    /// Number of themes in the top-themes display.
    #[serde(default = "default_top_themes")]
    pub top_themes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_narratives: true,
            include_transcripts: true,
            top_themes: default_top_themes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_top_themes() -> usize {
    crate::derive::DEFAULT_THEME_LIMIT
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".calltone.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Selection settings - always override since they have defaults in CLI
        self.analysis.ticker = args.normalized_ticker();
        self.analysis.quarters = args.quarters;
        self.backend.url = args.backend_url.clone();

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.backend.timeout_seconds = timeout;
        }

        // Cache bypass - the flag only ever disables caching
        if args.no_cache {
            self.backend.use_cache = false;
        }

        // Output - only override if provided
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert_eq!(config.analysis.ticker, "NVDA");
        assert_eq!(config.analysis.quarters, 4);
        assert!(config.backend.use_cache);
        assert_eq!(config.report.top_themes, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_dashboard.md"
verbose = true

[backend]
url = "http://analysis.internal:5000"
timeout_seconds = 300

[analysis]
ticker = "AMD"
quarters = 2

[report]
include_narratives = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_dashboard.md");
        assert!(config.general.verbose);
        assert_eq!(config.backend.url, "http://analysis.internal:5000");
        assert_eq!(config.backend.timeout_seconds, 300);
        assert_eq!(config.analysis.ticker, "AMD");
        assert_eq!(config.analysis.quarters, 2);
        assert!(!config.report.include_narratives);
        // Unspecified fields keep their defaults
        assert!(config.backend.use_cache);
        assert!(config.report.include_transcripts);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[report]"));
    }
}
